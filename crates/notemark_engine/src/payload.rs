//! Wire shapes for the document service's `loadPageChunk` and `saveTransactions` calls.

use std::collections::{BTreeMap, HashMap};

use notemark_core::{generate_identifier, PageMetadata};
use serde::{Deserialize, Serialize};

/// Rich-text property value: `[["text"]]`.
pub type RichText = Vec<Vec<String>>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveTransactionsRequest {
    pub request_id: String,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub space_id: String,
    pub operations: Vec<Operation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    pub id: String,
    pub table: String,
    pub path: Vec<String>,
    pub command: Command,
    pub args: OperationArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Command {
    Set,
    ListAfter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OperationArgs {
    Block(Box<BlockArgs>),
    ListAfter { after: String, id: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockArgs {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: String,
    pub version: u32,
    pub alive: bool,
    pub parent_id: String,
    pub parent_table: String,
    pub created_time: i64,
    pub last_edited_time: i64,
    pub space_id: String,
    pub properties: BTreeMap<String, RichText>,
    pub format: BlockFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct BlockFormat {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bookmark_icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bookmark_cover: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_source: Option<String>,
}

/// Where new blocks go and when they are stamped.
#[derive(Debug, Clone, Copy)]
pub struct BlockPlacement<'a> {
    pub space_id: &'a str,
    pub parent_id: &'a str,
    pub now_ms: i64,
}

/// Bookmark block plus its append to the parent's content list, as one transaction.
pub fn bookmark_transaction(
    placement: BlockPlacement<'_>,
    metadata: &PageMetadata,
    url: &str,
    caption: Option<&str>,
) -> SaveTransactionsRequest {
    let mut properties = BTreeMap::new();
    properties.insert("link".to_string(), rich_text(url));
    properties.insert(
        "title".to_string(),
        rich_text(metadata.display_title(url)),
    );
    properties.insert(
        "description".to_string(),
        rich_text(metadata.description.as_deref().unwrap_or_default()),
    );
    if let Some(caption) = caption.filter(|c| !c.trim().is_empty()) {
        properties.insert("caption".to_string(), rich_text(caption));
    }

    let format = BlockFormat {
        block_color: Some("default".to_string()),
        bookmark_icon: metadata.icon.clone(),
        bookmark_cover: metadata.cover.clone(),
        ..BlockFormat::default()
    };

    insert_block(placement, "bookmark", properties, format)
}

/// Standalone image block, placed ahead of a bookmark when covers are imported.
pub fn image_transaction(
    placement: BlockPlacement<'_>,
    image_url: &str,
) -> SaveTransactionsRequest {
    let mut properties = BTreeMap::new();
    properties.insert("source".to_string(), rich_text(image_url));
    let format = BlockFormat {
        display_source: Some(image_url.to_string()),
        ..BlockFormat::default()
    };
    insert_block(placement, "image", properties, format)
}

fn insert_block(
    placement: BlockPlacement<'_>,
    block_type: &str,
    properties: BTreeMap<String, RichText>,
    format: BlockFormat,
) -> SaveTransactionsRequest {
    let block_id = generate_identifier();
    let set = Operation {
        id: block_id.clone(),
        table: "block".to_string(),
        path: Vec::new(),
        command: Command::Set,
        args: OperationArgs::Block(Box::new(BlockArgs {
            id: block_id.clone(),
            block_type: block_type.to_string(),
            version: 1,
            alive: true,
            parent_id: placement.parent_id.to_string(),
            parent_table: "block".to_string(),
            created_time: placement.now_ms,
            last_edited_time: placement.now_ms,
            space_id: placement.space_id.to_string(),
            properties,
            format,
        })),
    };
    // An `after` id that is not a sibling makes the service append at the end.
    let append = Operation {
        id: placement.parent_id.to_string(),
        table: "block".to_string(),
        path: vec!["content".to_string()],
        command: Command::ListAfter,
        args: OperationArgs::ListAfter {
            after: generate_identifier(),
            id: block_id,
        },
    };

    SaveTransactionsRequest {
        request_id: generate_identifier(),
        transactions: vec![Transaction {
            id: generate_identifier(),
            space_id: placement.space_id.to_string(),
            operations: vec![set, append],
        }],
    }
}

fn rich_text(text: &str) -> RichText {
    vec![vec![text.to_string()]]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadPageChunkRequest {
    pub page_id: String,
    pub limit: u32,
    pub cursor: ChunkCursor,
    pub chunk_number: u32,
    pub vertical_columns: bool,
}

impl LoadPageChunkRequest {
    pub fn first_chunk(page_id: &str) -> Self {
        Self {
            page_id: page_id.to_string(),
            limit: 1,
            cursor: ChunkCursor::default(),
            chunk_number: 0,
            vertical_columns: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ChunkCursor {
    pub stack: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadPageChunkResponse {
    #[serde(default)]
    pub record_map: Option<RecordMap>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordMap {
    #[serde(default)]
    pub block: HashMap<String, BlockRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockRecord {
    #[serde(default)]
    pub value: Option<BlockValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockValue {
    #[serde(default)]
    pub space_id: Option<String>,
}

impl LoadPageChunkResponse {
    pub fn space_id_of(&self, document_id: &str) -> Option<&str> {
        self.record_map
            .as_ref()?
            .block
            .get(document_id)?
            .value
            .as_ref()?
            .space_id
            .as_deref()
            .filter(|space| !space.is_empty())
    }
}
