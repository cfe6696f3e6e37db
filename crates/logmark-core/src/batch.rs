// SPDX-License-Identifier: PMPL-1.0-or-later
//! Batch payload assembly
//!
//! The remote insert API (`insertBatchBlock`) takes a tree of
//! `IBatchBlock`-shaped records: `content`, optional `children`, optional
//! `properties`. Markers travel inside the content as LogSeq `TODO`/`DONE`
//! keywords. Page properties stay a separate record next to the forest and
//! land on the page's first block at the remote end.

use crate::block::{Block, ParsedPage, Properties};
use serde::{Deserialize, Serialize};

/// One node of the remote insert payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchBlock {
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BatchBlock>,
    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,
}

impl From<&Block> for BatchBlock {
    fn from(block: &Block) -> Self {
        let content = match block.marker.keyword() {
            Some(keyword) if block.content.is_empty() => keyword.to_string(),
            Some(keyword) => format!("{keyword} {}", block.content),
            None => block.content.clone(),
        };
        Self {
            content,
            children: block.children.iter().map(BatchBlock::from).collect(),
            properties: block.properties.clone(),
        }
    }
}

/// Serialize a block forest into the insert payload shape.
pub fn to_batch(blocks: &[Block]) -> Vec<BatchBlock> {
    blocks.iter().map(BatchBlock::from).collect()
}

impl ParsedPage {
    /// The payload consumed by the remote create/update operations.
    pub fn to_batch(&self) -> Vec<BatchBlock> {
        to_batch(&self.blocks)
    }
}

/// Append-mode property merge: keys from `incoming` override same-named
/// existing keys, everything else is kept.
pub fn merge_properties(existing: &Properties, incoming: &Properties) -> Properties {
    let mut merged = existing.clone();
    for (key, value) in incoming {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{Marker, PropertyValue};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_marker_renders_as_content_keyword() {
        let block = Block::with_marker("Buy milk", 0, Marker::Todo);
        let batch = BatchBlock::from(&block);
        assert_eq!(batch.content, "TODO Buy milk");

        let done = Block::with_marker("Ship it", 0, Marker::Done);
        assert_eq!(BatchBlock::from(&done).content, "DONE Ship it");
    }

    #[test]
    fn test_payload_shape_omits_empty_fields() {
        let mut parent = Block::new("parent", 0);
        parent.children.push(Block::new("child", 1));

        let json = serde_json::to_value(BatchBlock::from(&parent)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "content": "parent",
                "children": [{"content": "child"}],
            })
        );
    }

    #[test]
    fn test_properties_travel_with_their_block() {
        let mut block = Block::new("annotated", 0);
        block
            .properties
            .insert("pages".into(), PropertyValue::scalar("12-30"));

        let json = serde_json::to_value(BatchBlock::from(&block)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "content": "annotated",
                "properties": {"pages": "12-30"},
            })
        );
    }

    #[test]
    fn test_merge_new_keys_override() {
        let mut existing = Properties::new();
        existing.insert("priority".into(), PropertyValue::scalar("low"));
        existing.insert("owner".into(), PropertyValue::scalar("sam"));

        let mut incoming = Properties::new();
        incoming.insert("priority".into(), PropertyValue::scalar("high"));
        incoming.insert("tags".into(), PropertyValue::list(["x"]));

        let merged = merge_properties(&existing, &incoming);
        assert_eq!(merged["priority"], PropertyValue::scalar("high"));
        assert_eq!(merged["owner"], PropertyValue::scalar("sam"));
        assert_eq!(merged["tags"], PropertyValue::list(["x"]));
    }
}
