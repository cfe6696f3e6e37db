// SPDX-License-Identifier: PMPL-1.0-or-later
//! Logmark Client - LogSeq HTTP API client
//!
//! Provides:
//! - `LogseqClient`, an async client for LogSeq's local HTTP API
//! - `PageStore`, the abstract page-store surface the tool layer uses
//! - Page-level create/update/delete/search composed from the editor API's
//!   block primitives
//!
//! Remote failures are propagated unchanged, tagged with the operation name
//! and page identifier; nothing is retried automatically.

use thiserror::Error;

pub mod client;
pub mod store;
pub mod types;

pub use client::{ClientConfig, LogseqClient};
pub use store::PageStore;
pub use types::{
    BlockEntity, PageContent, PageEntity, UpdateMode, UpdateSummary,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("remote call `{method}` failed: {source}")]
    Request {
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected response from `{method}`: {message}")]
    Response {
        method: &'static str,
        message: String,
    },

    #[error("page '{0}' does not exist")]
    PageNotFound(String),

    #[error("failed to build HTTP client: {0}")]
    Init(#[source] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;
