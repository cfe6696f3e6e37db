// SPDX-License-Identifier: PMPL-1.0-or-later
//! Logmark Core - markdown to LogSeq block-tree conversion
//!
//! This crate provides:
//! - The block forest model (`Block`, `Marker`, `PropertyValue`)
//! - Frontmatter extraction and serialization
//! - The conversion pipeline: tokenizer, indentation normalizer, tree
//!   builder with atomic code-fence handling
//! - Batch payload assembly for the remote insert API
//!
//! Conversion is pure and infallible: malformed markdown degrades to its
//! most literal safe interpretation instead of erroring.

pub mod batch;
pub mod block;
pub mod convert;
pub mod frontmatter;

pub use batch::{merge_properties, to_batch, BatchBlock};
pub use block::{Block, Marker, ParsedPage, Properties, PropertyValue};
pub use convert::{convert_markdown, ConvertConfig};
