// SPDX-License-Identifier: PMPL-1.0-or-later
//! Markdown → block tree conversion pipeline
//!
//! One pass per call: frontmatter extraction, line tokenization, code-fence
//! aggregation, indentation normalization, tree building. Pure and
//! allocation-local; conversion never fails, malformed input degrades to
//! its most literal safe interpretation.

pub mod indent;
pub mod token;
pub mod tree;

use crate::block::ParsedPage;
use crate::frontmatter;
use indent::IndentStack;
use token::{TokenKind, Tokenizer};
use tree::TreeBuilder;

/// Conversion knobs. One instance is consistent for one document.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Columns a tab character expands to when measuring indentation.
    pub tab_width: usize,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self { tab_width: 2 }
    }
}

/// Convert a full markdown document (frontmatter included) into page
/// properties plus the ordered block forest.
pub fn convert_markdown(input: &str, config: &ConvertConfig) -> ParsedPage {
    let (properties, body) = frontmatter::extract(input);
    let blocks = parse_blocks(body, config);
    ParsedPage { properties, blocks }
}

/// Convert body text (frontmatter already removed) into a block forest.
pub fn parse_blocks(body: &str, config: &ConvertConfig) -> Vec<crate::block::Block> {
    let mut tokens = Tokenizer::new(body, config.tab_width).peekable();
    let mut indents = IndentStack::new();
    let mut builder = TreeBuilder::new();

    while let Some(token) = tokens.next() {
        match token.kind {
            TokenKind::Heading { rank, text } => {
                // Heading nesting is structural, not indentation-derived.
                indents.reset();
                builder.heading(rank, text);
            }
            TokenKind::Item { text, marker } => {
                let depth = indents.depth_for(token.indent);
                builder.item(depth, text, marker, token.indent);
            }
            TokenKind::Property { key, value } => builder.property(key, value),
            TokenKind::FenceOpen { line, .. } => {
                builder.leaf(aggregate_fence(line, &mut tokens));
            }
            TokenKind::Quote { line } => {
                builder.leaf(aggregate_quote(line, &mut tokens));
            }
            TokenKind::Rule => builder.leaf("---".to_string()),
            TokenKind::Text { line } => builder.text(&line, token.indent),
            TokenKind::Blank => builder.blank(),
            // The aggregators below consume these; a stray one (never
            // produced by the tokenizer) would be literal text.
            TokenKind::FenceContent { line } | TokenKind::FenceClose { line } => {
                builder.text(&line, token.indent);
            }
        }
    }

    builder.finish()
}

/// Collapse an OPEN..CLOSE fence span into one atomic text unit, fences
/// included. An unterminated fence swallows the rest of the document.
fn aggregate_fence(
    open_line: String,
    tokens: &mut std::iter::Peekable<Tokenizer<'_>>,
) -> String {
    let mut text = open_line;
    for token in tokens {
        match token.kind {
            TokenKind::FenceContent { line } => {
                text.push('\n');
                text.push_str(&line);
            }
            TokenKind::FenceClose { line } => {
                text.push('\n');
                text.push_str(&line);
                break;
            }
            // Tokenizer only leaves fence mode at the closing fence, so
            // anything else means end of input was reached first.
            _ => break,
        }
    }
    text
}

/// Join contiguous `>` lines into a single quote unit, prefixes kept.
fn aggregate_quote(
    first_line: String,
    tokens: &mut std::iter::Peekable<Tokenizer<'_>>,
) -> String {
    let mut text = first_line;
    while let Some(token) = tokens.peek() {
        let TokenKind::Quote { line } = &token.kind else {
            break;
        };
        text.push('\n');
        text.push_str(line);
        tokens.next();
    }
    text
}
