// SPDX-License-Identifier: PMPL-1.0-or-later
//! Frontmatter extraction
//!
//! A document may open with a `---` delimited metadata region holding a flat
//! `key: value` mapping. Values are scalars or bracketed string lists
//! (`tags: [a, b]`). Extraction never fails: a missing opening delimiter or
//! an unterminated region degrades to "whole input is body, no properties".

use crate::block::{Properties, PropertyValue};

const DELIMITER: &str = "---";

/// Split `input` into (page properties, body).
///
/// The opening delimiter must be the very first line. The closing delimiter
/// is the next line that is exactly `---` (trailing whitespace tolerated).
pub fn extract(input: &str) -> (Properties, &str) {
    let mut lines = input.split_inclusive('\n');

    let Some(first) = lines.next() else {
        return (Properties::new(), input);
    };
    if first.trim_end() != DELIMITER {
        return (Properties::new(), input);
    }

    let mut properties = Properties::new();
    let mut consumed = first.len();

    for line in lines {
        let trimmed = line.trim_end();
        if trimmed == DELIMITER {
            consumed += line.len();
            return (properties, &input[consumed..]);
        }
        if let Some((key, value)) = parse_entry(trimmed) {
            properties.insert(key, value);
        }
        consumed += line.len();
    }

    // Unterminated region: fall back to treating the whole input as body.
    (Properties::new(), input)
}

fn parse_entry(line: &str) -> Option<(String, PropertyValue)> {
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), parse_value(value.trim())))
}

fn parse_value(value: &str) -> PropertyValue {
    if let Some(inner) = value
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        let items = inner
            .split(',')
            .map(|item| unquote(item.trim()).to_string())
            .filter(|item| !item.is_empty())
            .collect();
        return PropertyValue::List(items);
    }
    PropertyValue::Scalar(unquote(value).to_string())
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Serialize properties back to the delimited frontmatter form.
///
/// Inverse of [`extract`] for well-formed mappings; used when round-tripping
/// page content back out of the store.
pub fn to_string(properties: &Properties) -> String {
    let mut output = String::from(DELIMITER);
    output.push('\n');
    for (key, value) in properties {
        output.push_str(key);
        output.push_str(": ");
        match value {
            PropertyValue::Scalar(scalar) => output.push_str(scalar),
            PropertyValue::List(items) => {
                output.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        output.push_str(", ");
                    }
                    output.push_str(item);
                }
                output.push(']');
            }
        }
        output.push('\n');
    }
    output.push_str(DELIMITER);
    output.push('\n');
    output
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn key_strategy() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_-]{0,12}"
    }

    // Values that survive the flat key: value line format unambiguously.
    fn scalar_strategy() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9][a-zA-Z0-9 _.-]{0,24}".prop_map(|s| s.trim().to_string())
    }

    fn value_strategy() -> impl Strategy<Value = PropertyValue> {
        prop_oneof![
            scalar_strategy().prop_map(PropertyValue::Scalar),
            prop::collection::vec("[a-zA-Z0-9_-]{1,10}", 0..4).prop_map(PropertyValue::List),
        ]
    }

    fn properties_strategy() -> impl Strategy<Value = Properties> {
        prop::collection::btree_map(key_strategy(), value_strategy(), 0..6)
    }

    proptest! {
        // Property: any document not opening with `---` yields no properties
        // and an untouched body.
        #[test]
        fn prop_body_without_delimiter_passes_through(body in "[^-][ -~\n]{0,200}") {
            let (props, rest) = extract(&body);
            prop_assert!(props.is_empty());
            prop_assert_eq!(rest, body.as_str());
        }

        // Property: serialize then extract yields the original mapping.
        #[test]
        fn prop_roundtrip(props in properties_strategy()) {
            let serialized = to_string(&props);
            let (reparsed, body) = extract(&serialized);
            prop_assert_eq!(reparsed, props);
            prop_assert_eq!(body, "");
        }
    }
}
