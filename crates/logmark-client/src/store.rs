// SPDX-License-Identifier: PMPL-1.0-or-later
//! Abstract page-store collaborator
//!
//! The tool-dispatch layer programs against this trait rather than the
//! concrete HTTP client, so remote calls can be swapped out in tests.

use crate::types::{PageContent, PageEntity, UpdateMode, UpdateSummary};
use crate::Result;
use async_trait::async_trait;
use logmark_core::{BatchBlock, Properties};
use serde_json::Value;

/// The fixed RPC-style surface of the remote knowledge base.
#[async_trait]
pub trait PageStore: Send + Sync {
    /// All pages in the graph.
    async fn list_pages(&self) -> Result<Vec<PageEntity>>;

    /// Page metadata, page properties and the full block tree.
    /// `None` when the page does not exist.
    async fn get_page_content(&self, name: &str) -> Result<Option<PageContent>>;

    /// Create a page populated with the given forest and page properties.
    async fn create_page(
        &self,
        name: &str,
        blocks: &[BatchBlock],
        properties: &Properties,
    ) -> Result<()>;

    /// Update an existing page; fails with `PageNotFound` otherwise.
    async fn update_page(
        &self,
        name: &str,
        blocks: &[BatchBlock],
        properties: &Properties,
        mode: UpdateMode,
    ) -> Result<UpdateSummary>;

    /// Delete an existing page; fails with `PageNotFound` otherwise.
    async fn delete_page(&self, name: &str) -> Result<()>;

    /// Full-text search across pages and blocks.
    async fn search(&self, query: &str) -> Result<Value>;
}
