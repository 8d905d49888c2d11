use notemark_core::{PageMetadata, ResolveStrategy};
use notemark_logging::{notemark_debug, notemark_warn};

use crate::in_page::{InPageOutcome, InPageResolver};
use crate::remote::RemoteResolver;

/// Runs the strategy chosen for a target. In-page resolution that needs a
/// fallback is followed by exactly one remote resolution of the same URL.
#[derive(Clone)]
pub struct MetadataResolver {
    remote: RemoteResolver,
    in_page: InPageResolver,
}

impl MetadataResolver {
    pub fn new(remote: RemoteResolver, in_page: InPageResolver) -> Self {
        Self { remote, in_page }
    }

    pub async fn resolve(&self, url: &str, strategy: ResolveStrategy) -> PageMetadata {
        match strategy {
            ResolveStrategy::Remote => self.remote.resolve(url).await,
            ResolveStrategy::InPage { tab_id } => match self.in_page.resolve(tab_id, url).await {
                InPageOutcome::Ok(metadata) => {
                    notemark_debug!("[{}] read metadata from tab {}", url, tab_id);
                    metadata
                }
                InPageOutcome::FallbackRequired(reason) => {
                    notemark_warn!("[{}] in-page read failed, fetching remotely: {}", url, reason);
                    self.remote.resolve(url).await
                }
            },
        }
    }
}
