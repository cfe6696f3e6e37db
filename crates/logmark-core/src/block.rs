// SPDX-License-Identifier: PMPL-1.0-or-later
//! Block tree model for LogSeq page content
//!
//! A page is an ordered forest of [`Block`]s. Parent→child is a
//! one-directional owning sequence; children hold no back-pointer, so the
//! tree is acyclic by construction.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Task state derived from checkbox syntax (`- [ ]` / `- [x]`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Marker {
    #[default]
    None,
    Todo,
    Done,
}

impl Marker {
    /// LogSeq content keyword for this marker, if any.
    pub const fn keyword(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Todo => Some("TODO"),
            Self::Done => Some("DONE"),
        }
    }

    fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Property value: the two shapes LogSeq page/block properties take.
///
/// Deliberately a closed variant rather than an open JSON-like type; the
/// downstream payload only ever renders scalars and string lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Scalar(String),
    List(Vec<String>),
}

impl PropertyValue {
    pub fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar(value.into())
    }

    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

/// Page- or block-level property mapping. Ordered for deterministic output.
pub type Properties = BTreeMap<String, PropertyValue>;

/// One node in LogSeq's hierarchical content model; roughly one bullet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub content: String,
    /// Nesting depth: 0 for roots, parent depth + 1 for every child.
    pub depth: usize,
    #[serde(default, skip_serializing_if = "Marker::is_none")]
    pub marker: Marker,
    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Block>,
}

impl Block {
    pub fn new(content: impl Into<String>, depth: usize) -> Self {
        Self {
            content: content.into(),
            depth,
            marker: Marker::None,
            properties: Properties::new(),
            children: Vec::new(),
        }
    }

    pub fn with_marker(content: impl Into<String>, depth: usize, marker: Marker) -> Self {
        Self {
            marker,
            ..Self::new(content, depth)
        }
    }

    /// Total number of blocks in this subtree, self included.
    pub fn block_count(&self) -> usize {
        1 + self.children.iter().map(Block::block_count).sum::<usize>()
    }

    /// Depth of the deepest descendant.
    pub fn max_depth(&self) -> usize {
        self.children
            .iter()
            .map(Block::max_depth)
            .max()
            .unwrap_or(self.depth)
    }
}

/// Result of one conversion pass: page properties from frontmatter plus the
/// ordered block forest. Transient; built fresh per call, no shared state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedPage {
    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Block>,
}

impl ParsedPage {
    pub fn block_count(&self) -> usize {
        self.blocks.iter().map(Block::block_count).sum()
    }
}
