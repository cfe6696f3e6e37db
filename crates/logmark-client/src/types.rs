// SPDX-License-Identifier: PMPL-1.0-or-later
//! Wire types for the LogSeq HTTP API
//!
//! The API is a single POST endpoint taking `{"method", "args"}` envelopes.
//! Entities come back as loosely-shaped JSON; only the fields the bridge
//! relies on are typed, the rest rides along untouched.

use logmark_core::{Properties, PropertyValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// RPC envelope for one API call.
#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
    pub method: &'a str,
    pub args: Value,
}

/// A page entity as returned by `getAllPages` / `getPage`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageEntity {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "originalName")]
    pub original_name: Option<String>,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl PageEntity {
    /// Human-facing page name: `originalName` preserves casing, `name` is
    /// the lowercased key.
    pub fn display_name(&self) -> Option<&str> {
        self.original_name.as_deref().or(self.name.as_deref())
    }
}

/// A block entity as returned by `getPageBlocksTree`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockEntity {
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub properties: serde_json::Map<String, Value>,
    #[serde(default)]
    pub children: Vec<Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl BlockEntity {
    /// Block properties narrowed to the scalar/list shapes the bridge uses.
    pub fn typed_properties(&self) -> Properties {
        self.properties
            .iter()
            .map(|(key, value)| (key.clone(), property_from_value(value)))
            .collect()
    }
}

/// Page metadata plus its full block tree, the result of a content fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageContent {
    pub page: PageEntity,
    /// Page properties, lifted from the first block where LogSeq stores them.
    #[serde(default)]
    pub properties: Properties,
    pub blocks: Vec<BlockEntity>,
}

/// How `update_page` treats existing content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateMode {
    /// New blocks go after the last existing top-level block; page
    /// properties merge, new keys overriding.
    Append,
    /// Existing blocks are cleared first; page properties are replaced.
    Replace,
}

impl std::fmt::Display for UpdateMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Append => "append",
            Self::Replace => "replace",
        })
    }
}

/// What an update actually did, for caller-side reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSummary {
    pub mode: UpdateMode,
    /// Blocks removed by replace mode.
    pub cleared: usize,
    /// Top-level blocks inserted.
    pub inserted: usize,
    /// Page properties in effect after the update.
    pub properties: Properties,
}

/// Narrow an arbitrary JSON property value to the closed scalar/list shape.
pub fn property_from_value(value: &Value) -> PropertyValue {
    match value {
        Value::Array(items) => PropertyValue::List(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
        ),
        Value::String(s) => PropertyValue::Scalar(s.clone()),
        other => PropertyValue::Scalar(other.to_string()),
    }
}

/// Widen a property value back to JSON for `upsertBlockProperty` args.
pub fn property_to_value(value: &PropertyValue) -> Value {
    match value {
        PropertyValue::Scalar(s) => Value::String(s.clone()),
        PropertyValue::List(items) => {
            Value::Array(items.iter().cloned().map(Value::String).collect())
        }
    }
}
