// SPDX-License-Identifier: PMPL-1.0-or-later
//! LogSeq HTTP API client
//!
//! All calls go to a single `/api` endpoint as `{"method", "args"}` POSTs
//! with bearer auth. Page-level operations are composed from the block
//! primitives the way the editor API expects: create an anchor block,
//! `insertBatchBlock` the forest after it, then set page properties on the
//! first block (LogSeq stores page properties there).

use crate::store::PageStore;
use crate::types::{
    property_to_value, BlockEntity, PageContent, PageEntity, RpcRequest, UpdateMode, UpdateSummary,
};
use crate::{ApiError, Result};
use async_trait::async_trait;
use logmark_core::{merge_properties, BatchBlock, Properties};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(6);

/// Connection settings for a local LogSeq instance.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub protocol: String,
    pub host: String,
    pub port: u16,
    pub token: String,
}

impl ClientConfig {
    /// Defaults matching LogSeq's HTTP API server (`http://127.0.0.1:12315`).
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            protocol: "http".to_string(),
            host: "127.0.0.1".to_string(),
            port: 12315,
            token: token.into(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}://{}:{}/api", self.protocol, self.host, self.port)
    }
}

/// HTTP client for the LogSeq API.
pub struct LogseqClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl LogseqClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_endpoint(config.endpoint(), config.token)
    }

    /// Build against an explicit `/api` endpoint URL.
    pub fn with_endpoint(endpoint: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ApiError::Init)?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            token: token.into(),
        })
    }

    /// One RPC round-trip. Transport and HTTP-status failures carry the
    /// method name so callers can report which remote operation failed.
    async fn call<T: DeserializeOwned>(&self, method: &'static str, args: Value) -> Result<T> {
        debug!(%method, "calling logseq api");
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&RpcRequest { method, args })
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|source| ApiError::Request { method, source })?;

        response
            .json::<T>()
            .await
            .map_err(|source| ApiError::Response {
                method,
                message: source.to_string(),
            })
    }

    // =========================================================================
    // Block-level primitives
    // =========================================================================

    /// Root-level blocks of a page, in document order.
    pub async fn get_page_blocks(&self, name: &str) -> Result<Vec<BlockEntity>> {
        let blocks: Option<Vec<BlockEntity>> = self
            .call("logseq.Editor.getPageBlocksTree", json!([name]))
            .await?;
        Ok(blocks.unwrap_or_default())
    }

    /// Insert a block forest after (or under) the anchor block.
    pub async fn insert_batch_block(
        &self,
        anchor_uuid: &str,
        blocks: &[BatchBlock],
        sibling: bool,
    ) -> Result<Value> {
        info!(count = blocks.len(), sibling, "inserting batch blocks");
        self.call(
            "logseq.Editor.insertBatchBlock",
            json!([anchor_uuid, blocks, {"sibling": sibling}]),
        )
        .await
    }

    /// Append one block to the end of a page.
    pub async fn append_block_in_page(
        &self,
        name: &str,
        content: &str,
        properties: Option<&Properties>,
    ) -> Result<BlockEntity> {
        debug!(page = %name, "appending block");
        let args = match properties.filter(|p| !p.is_empty()) {
            Some(props) => json!([name, content, {"properties": props}]),
            None => json!([name, content]),
        };
        let block: Option<BlockEntity> = self.call("logseq.Editor.appendBlockInPage", args).await?;
        Ok(block.unwrap_or_default())
    }

    pub async fn remove_block(&self, uuid: &str) -> Result<()> {
        debug!(%uuid, "removing block");
        let _: Value = self.call("logseq.Editor.removeBlock", json!([uuid])).await?;
        Ok(())
    }

    pub async fn upsert_block_property(
        &self,
        uuid: &str,
        key: &str,
        value: &logmark_core::PropertyValue,
    ) -> Result<()> {
        let _: Value = self
            .call(
                "logseq.Editor.upsertBlockProperty",
                json!([uuid, key, property_to_value(value)]),
            )
            .await?;
        Ok(())
    }

    /// Remove every root block of a page. Returns the number removed.
    pub async fn clear_page_content(&self, name: &str) -> Result<usize> {
        info!(page = %name, "clearing page content");
        let blocks = self.get_page_blocks(name).await?;
        for block in &blocks {
            if let Some(uuid) = &block.uuid {
                self.remove_block(uuid).await?;
            }
        }
        Ok(blocks.len())
    }

    /// Current page properties, read from the first block.
    pub async fn page_properties(&self, name: &str) -> Result<Properties> {
        let blocks = self.get_page_blocks(name).await?;
        Ok(blocks
            .first()
            .map(BlockEntity::typed_properties)
            .unwrap_or_default())
    }

    /// Set page properties by upserting each key on the first block.
    async fn set_page_properties(&self, name: &str, properties: &Properties) -> Result<()> {
        let blocks = self.get_page_blocks(name).await?;
        let Some(uuid) = blocks.first().and_then(|b| b.uuid.as_deref()) else {
            warn!(page = %name, "page has no first block, cannot set properties");
            return Ok(());
        };
        for (key, value) in properties {
            self.upsert_block_property(uuid, key, value).await?;
        }
        info!(page = %name, count = properties.len(), "updated page properties");
        Ok(())
    }

    async fn page_exists(&self, name: &str) -> Result<bool> {
        let pages = self.list_pages().await?;
        Ok(pages
            .iter()
            .filter_map(PageEntity::display_name)
            .any(|candidate| candidate == name))
    }

    /// Sequential fallback when no anchor block is available.
    async fn append_forest(&self, name: &str, blocks: &[BatchBlock]) -> Result<()> {
        for block in blocks {
            let properties = Some(&block.properties).filter(|p| !p.is_empty());
            self.append_block_in_page(name, &block.content, properties)
                .await?;
            if !block.children.is_empty() {
                Box::pin(self.append_forest(name, &block.children)).await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl PageStore for LogseqClient {
    async fn list_pages(&self) -> Result<Vec<PageEntity>> {
        debug!("listing pages");
        let pages: Option<Vec<PageEntity>> =
            self.call("logseq.Editor.getAllPages", json!([])).await?;
        Ok(pages.unwrap_or_default())
    }

    async fn get_page_content(&self, name: &str) -> Result<Option<PageContent>> {
        info!(page = %name, "getting page content");
        let page: Option<PageEntity> = self.call("logseq.Editor.getPage", json!([name])).await?;
        let Some(page) = page else {
            return Ok(None);
        };

        let blocks = self.get_page_blocks(name).await?;
        // Page properties live in the page's first block.
        let properties = blocks
            .first()
            .map(BlockEntity::typed_properties)
            .unwrap_or_default();

        Ok(Some(PageContent {
            page,
            properties,
            blocks,
        }))
    }

    async fn create_page(
        &self,
        name: &str,
        blocks: &[BatchBlock],
        properties: &Properties,
    ) -> Result<()> {
        info!(page = %name, blocks = blocks.len(), "creating page");
        let _: Value = self
            .call(
                "logseq.Editor.createPage",
                json!([name, {}, {"createFirstBlock": true}]),
            )
            .await?;

        if !blocks.is_empty() {
            match self
                .get_page_blocks(name)
                .await?
                .first()
                .and_then(|b| b.uuid.clone())
            {
                Some(anchor) => {
                    // Insert the forest as siblings after the auto-created
                    // first block, then drop that empty anchor.
                    self.insert_batch_block(&anchor, blocks, true).await?;
                    self.remove_block(&anchor).await?;
                }
                None => {
                    warn!(page = %name, "no anchor block, appending sequentially");
                    self.append_forest(name, blocks).await?;
                }
            }
        }

        // Properties go on after insertion so they land on the real first
        // block rather than the removed anchor.
        if !properties.is_empty() {
            self.set_page_properties(name, properties).await?;
        }

        info!(page = %name, "created page");
        Ok(())
    }

    async fn update_page(
        &self,
        name: &str,
        blocks: &[BatchBlock],
        properties: &Properties,
        mode: UpdateMode,
    ) -> Result<UpdateSummary> {
        info!(page = %name, %mode, blocks = blocks.len(), "updating page");
        if !self.page_exists(name).await? {
            return Err(ApiError::PageNotFound(name.to_string()));
        }

        let mut summary = UpdateSummary {
            mode,
            cleared: 0,
            inserted: 0,
            properties: Properties::new(),
        };

        if mode == UpdateMode::Replace {
            summary.cleared = self.clear_page_content(name).await?;
        }

        if !blocks.is_empty() {
            match mode {
                UpdateMode::Replace => {
                    // The page is empty now; re-anchor on a freshly appended
                    // first block, then batch-insert the rest around it.
                    let first = &blocks[0];
                    let anchor = self
                        .append_block_in_page(
                            name,
                            &first.content,
                            Some(&first.properties).filter(|p| !p.is_empty()),
                        )
                        .await?;
                    if let Some(anchor_uuid) = anchor.uuid.as_deref() {
                        if !first.children.is_empty() {
                            self.insert_batch_block(anchor_uuid, &first.children, false)
                                .await?;
                        }
                        if blocks.len() > 1 {
                            self.insert_batch_block(anchor_uuid, &blocks[1..], true)
                                .await?;
                        }
                    }
                }
                UpdateMode::Append => {
                    let existing = self.get_page_blocks(name).await?;
                    match existing.last().and_then(|b| b.uuid.as_deref()) {
                        Some(last_uuid) => {
                            self.insert_batch_block(last_uuid, blocks, true).await?;
                        }
                        None => self.append_forest(name, blocks).await?,
                    }
                }
            }
            summary.inserted = blocks.len();
        }

        if !properties.is_empty() {
            let effective = match mode {
                // Append keeps existing page properties; new keys override.
                UpdateMode::Append => {
                    merge_properties(&self.page_properties(name).await?, properties)
                }
                UpdateMode::Replace => properties.clone(),
            };
            self.set_page_properties(name, &effective).await?;
            summary.properties = effective;
        }

        Ok(summary)
    }

    async fn delete_page(&self, name: &str) -> Result<()> {
        info!(page = %name, "deleting page");
        if !self.page_exists(name).await? {
            return Err(ApiError::PageNotFound(name.to_string()));
        }
        let _: Value = self.call("logseq.Editor.deletePage", json!([name])).await?;
        info!(page = %name, "deleted page");
        Ok(())
    }

    async fn search(&self, query: &str) -> Result<Value> {
        info!(%query, "searching");
        self.call("logseq.search", json!([query, {}])).await
    }
}
