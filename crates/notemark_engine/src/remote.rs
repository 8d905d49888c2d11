use std::sync::Arc;

use notemark_core::{finalize_metadata, MetadataCandidates, PageMetadata};
use notemark_logging::{notemark_debug, notemark_warn};

use crate::decode::decode_html;
use crate::extract::{extract_head_metadata, HeadMetadata};
use crate::Fetcher;

/// Strategy R: fetch the page over HTTP and read its `<head>`.
///
/// Has no failure case. Any fetch error (status, network, timeout) is logged
/// and degrades to [`PageMetadata::degraded`].
#[derive(Clone)]
pub struct RemoteResolver {
    fetcher: Arc<dyn Fetcher>,
    favicon_template: String,
}

impl RemoteResolver {
    pub fn new(fetcher: Arc<dyn Fetcher>, favicon_template: impl Into<String>) -> Self {
        Self {
            fetcher,
            favicon_template: favicon_template.into(),
        }
    }

    pub async fn resolve(&self, url: &str) -> PageMetadata {
        let output = match self.fetcher.fetch(url).await {
            Ok(output) => output,
            Err(err) => {
                notemark_warn!("[{}] remote fetch failed: {}", url, err);
                return PageMetadata::degraded(url);
            }
        };

        let decoded = decode_html(&output.bytes, output.metadata.content_type.as_deref());
        let head = extract_head_metadata(&decoded.html);
        notemark_debug!(
            "[{}] fetched {} bytes ({}), final url {}",
            url,
            output.metadata.byte_len,
            decoded.encoding_label,
            output.metadata.final_url
        );

        let mut candidates = candidates_from_head(head);
        if candidates.title.is_none() {
            candidates.title = Some(url.to_string());
        }
        finalize_metadata(url, candidates, &self.favicon_template)
    }
}

/// og:title before `<title>`, og:description before `name=description`.
pub(crate) fn candidates_from_head(head: HeadMetadata) -> MetadataCandidates {
    MetadataCandidates {
        title: head.og_title.or(head.title),
        description: head.og_description.or(head.meta_description),
        cover: head.og_image,
    }
}
