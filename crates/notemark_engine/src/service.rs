use notemark_core::{DocumentId, PageMetadata};
use notemark_logging::{notemark_debug, notemark_trace};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, COOKIE};
use serde::Serialize;

use crate::payload::{
    bookmark_transaction, image_transaction, BlockPlacement, LoadPageChunkRequest,
    LoadPageChunkResponse, SaveTransactionsRequest,
};
use crate::ServiceSettings;

pub const USER_HEADER: &str = "x-notion-active-user-header";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WriteError {
    #[error("document {document_id} not found; check the id and access")]
    SpaceNotFound { document_id: String },
    #[error("bookmark write rejected with status {status}")]
    BookmarkRejected { status: u16 },
    #[error("image write rejected with status {status}")]
    ImageRejected { status: u16 },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

/// Destination document and the user on whose behalf blocks are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteContext {
    pub space_id: String,
    pub parent_id: DocumentId,
    pub user_id: String,
}

/// The remote document service: one read to find the space, then write-only transactions.
#[async_trait::async_trait]
pub trait DocumentService: Send + Sync {
    async fn resolve_space_id(
        &self,
        document_id: &DocumentId,
        user_id: &str,
    ) -> Result<String, WriteError>;

    async fn create_bookmark_block(
        &self,
        ctx: &WriteContext,
        metadata: &PageMetadata,
        url: &str,
        caption: Option<&str>,
    ) -> Result<(), WriteError>;

    async fn create_image_block(&self, ctx: &WriteContext, image_url: &str)
        -> Result<(), WriteError>;
}

#[derive(Debug, Clone)]
pub struct NotionClient {
    settings: ServiceSettings,
    client: reqwest::Client,
}

impl NotionClient {
    pub fn new(settings: ServiceSettings) -> Result<Self, WriteError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| WriteError::Transport(err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self, call: &str) -> String {
        format!("{}/{}", self.settings.api_base.trim_end_matches('/'), call)
    }

    fn headers(&self, user_id: &str) -> Result<HeaderMap, WriteError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_HEADER,
            HeaderValue::from_str(user_id)
                .map_err(|err| WriteError::Transport(format!("invalid user id header: {err}")))?,
        );
        if let Some(token) = self.settings.session_token.as_deref() {
            headers.insert(
                COOKIE,
                HeaderValue::from_str(&format!("token_v2={token}"))
                    .map_err(|err| WriteError::Transport(format!("invalid session token: {err}")))?,
            );
        }
        Ok(headers)
    }

    async fn post<T: Serialize>(
        &self,
        call: &str,
        user_id: &str,
        body: &T,
    ) -> Result<reqwest::Response, WriteError> {
        let body =
            serde_json::to_vec(body).map_err(|err| WriteError::InvalidResponse(err.to_string()))?;
        notemark_trace!("POST {} ({} bytes)", call, body.len());
        self.client
            .post(self.endpoint(call))
            .headers(self.headers(user_id)?)
            .body(body)
            .send()
            .await
            .map_err(|err| WriteError::Transport(err.to_string()))
    }

    async fn save(
        &self,
        ctx: &WriteContext,
        request: &SaveTransactionsRequest,
    ) -> Result<u16, WriteError> {
        let response = self.post("saveTransactions", &ctx.user_id, request).await?;
        let status = response.status();
        notemark_debug!("saveTransactions {} -> {}", request.request_id, status);
        Ok(status.as_u16())
    }

    fn placement<'a>(ctx: &'a WriteContext) -> BlockPlacement<'a> {
        BlockPlacement {
            space_id: &ctx.space_id,
            parent_id: ctx.parent_id.as_str(),
            now_ms: chrono::Utc::now().timestamp_millis(),
        }
    }
}

#[async_trait::async_trait]
impl DocumentService for NotionClient {
    async fn resolve_space_id(
        &self,
        document_id: &DocumentId,
        user_id: &str,
    ) -> Result<String, WriteError> {
        let not_found = || WriteError::SpaceNotFound {
            document_id: document_id.to_string(),
        };
        let request = LoadPageChunkRequest::first_chunk(document_id.as_str());
        let response = self.post("loadPageChunk", user_id, &request).await?;
        if !response.status().is_success() {
            return Err(not_found());
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|err| WriteError::Transport(err.to_string()))?;
        let chunk: LoadPageChunkResponse = serde_json::from_slice(&bytes)
            .map_err(|err| WriteError::InvalidResponse(err.to_string()))?;
        chunk
            .space_id_of(document_id.as_str())
            .map(ToOwned::to_owned)
            .ok_or_else(not_found)
    }

    async fn create_bookmark_block(
        &self,
        ctx: &WriteContext,
        metadata: &PageMetadata,
        url: &str,
        caption: Option<&str>,
    ) -> Result<(), WriteError> {
        let request = bookmark_transaction(Self::placement(ctx), metadata, url, caption);
        match self.save(ctx, &request).await? {
            status if (200..300).contains(&status) => Ok(()),
            status => Err(WriteError::BookmarkRejected { status }),
        }
    }

    async fn create_image_block(
        &self,
        ctx: &WriteContext,
        image_url: &str,
    ) -> Result<(), WriteError> {
        let request = image_transaction(Self::placement(ctx), image_url);
        match self.save(ctx, &request).await? {
            status if (200..300).contains(&status) => Ok(()),
            status => Err(WriteError::ImageRejected { status }),
        }
    }
}
