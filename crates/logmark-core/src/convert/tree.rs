// SPDX-License-Identifier: PMPL-1.0-or-later
//! Block tree construction
//!
//! Consumes the depth-annotated token stream and produces the ordered block
//! forest. Containers (headings by rank, then open list items) live on an
//! explicit stack; closing an entry moves its finished block into the new
//! top's children, so parent→child stays a one-directional owning sequence.

use crate::block::{Block, Marker, PropertyValue};

#[derive(Debug, Clone, Copy)]
enum OpenKind {
    Heading { rank: u8 },
    Item { rel_depth: usize, indent: usize },
}

#[derive(Debug)]
struct Open {
    kind: OpenKind,
    block: Block,
}

#[derive(Debug, Default)]
pub struct TreeBuilder {
    roots: Vec<Block>,
    stack: Vec<Open>,
    /// Whether the most recently attached leaf is a paragraph that further
    /// text lines may merge into. Cleared by every structural token.
    paragraph_open: bool,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Heading of rank R: closes the list context, pops open headings of
    /// rank >= R, then opens a new section under the surviving top.
    pub fn heading(&mut self, rank: u8, text: String) {
        self.close_items();
        while let Some(OpenKind::Heading { rank: open }) = self.top_kind() {
            if open < rank {
                break;
            }
            self.close_top();
        }
        let depth = self.stack.len();
        self.stack.push(Open {
            kind: OpenKind::Heading { rank },
            block: Block::new(text, depth),
        });
        self.paragraph_open = false;
    }

    /// List or checkbox item at normalized depth `rel_depth` within the
    /// current list context. `indent` is the raw expanded width, kept so
    /// continuation text can tell whether it nests under this item.
    pub fn item(&mut self, rel_depth: usize, text: String, marker: Marker, indent: usize) {
        while let Some(OpenKind::Item { rel_depth: open, .. }) = self.top_kind() {
            if open < rel_depth {
                break;
            }
            self.close_top();
        }
        let depth = self.stack.len();
        self.stack.push(Open {
            kind: OpenKind::Item { rel_depth, indent },
            block: Block::with_marker(text, depth, marker),
        });
        self.paragraph_open = false;
    }

    /// Plain text line. Nests under the innermost open item unless it is
    /// dedented strictly past it; only then is the item chain closed.
    /// Consecutive text lines merge into one paragraph block.
    pub fn text(&mut self, line: &str, indent: usize) {
        while let Some(OpenKind::Item { indent: open, .. }) = self.top_kind() {
            if indent >= open {
                break;
            }
            self.close_top();
            self.paragraph_open = false;
        }
        if self.paragraph_open {
            if let Some(paragraph) = self.last_attached_mut() {
                paragraph.content.push(' ');
                paragraph.content.push_str(line);
                return;
            }
        }
        let depth = self.stack.len();
        self.attach(Block::new(line, depth));
        self.paragraph_open = true;
    }

    /// Atomic leaf (aggregated code fence, joined blockquote, rule text):
    /// attaches to the innermost open block as-is.
    pub fn leaf(&mut self, content: String) {
        let depth = self.stack.len();
        self.attach(Block::new(content, depth));
        self.paragraph_open = false;
    }

    /// `key:: value` annotation: becomes a property of the immediately
    /// preceding sibling (or of the enclosing open block when it opens a
    /// section). With nothing to annotate it degrades to literal text.
    pub fn property(&mut self, key: String, value: String) {
        self.paragraph_open = false;
        if let Some(previous) = self.last_attached_mut() {
            previous.properties.insert(key, PropertyValue::Scalar(value));
            return;
        }
        if let Some(open) = self.stack.last_mut() {
            open.block.properties.insert(key, PropertyValue::Scalar(value));
            return;
        }
        self.attach(Block::new(format!("{key}:: {value}"), 0));
    }

    /// Blank line: terminates any paragraph merge, nothing else.
    pub fn blank(&mut self) {
        self.paragraph_open = false;
    }

    pub fn finish(mut self) -> Vec<Block> {
        while !self.stack.is_empty() {
            self.close_top();
        }
        self.roots
    }

    fn top_kind(&self) -> Option<OpenKind> {
        self.stack.last().map(|open| open.kind)
    }

    fn close_items(&mut self) {
        while matches!(self.top_kind(), Some(OpenKind::Item { .. })) {
            self.close_top();
        }
    }

    fn close_top(&mut self) {
        if let Some(open) = self.stack.pop() {
            match self.stack.last_mut() {
                Some(parent) => parent.block.children.push(open.block),
                None => self.roots.push(open.block),
            }
        }
    }

    fn attach(&mut self, block: Block) {
        match self.stack.last_mut() {
            Some(open) => open.block.children.push(block),
            None => self.roots.push(block),
        }
    }

    /// Most recent block attached at the current insertion point.
    fn last_attached_mut(&mut self) -> Option<&mut Block> {
        match self.stack.last_mut() {
            Some(open) => open.block.children.last_mut(),
            None => self.roots.last_mut(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_heading_rank_nesting() {
        let mut builder = TreeBuilder::new();
        builder.heading(1, "Top".into());
        builder.heading(2, "Inner".into());
        builder.heading(3, "Deep".into());
        builder.heading(2, "Sibling".into());
        let roots = builder.finish();

        assert_eq!(roots.len(), 1);
        let top = &roots[0];
        assert_eq!(top.content, "Top");
        assert_eq!(top.depth, 0);
        assert_eq!(top.children.len(), 2);
        assert_eq!(top.children[0].content, "Inner");
        assert_eq!(top.children[0].children[0].content, "Deep");
        assert_eq!(top.children[1].content, "Sibling");
        assert_eq!(top.children[1].depth, 1);
    }

    #[test]
    fn test_skipped_rank_still_nests_under_nearest_lower() {
        let mut builder = TreeBuilder::new();
        builder.heading(1, "Top".into());
        builder.heading(4, "Jumped".into());
        builder.heading(2, "Back".into());
        let roots = builder.finish();

        let top = &roots[0];
        assert_eq!(top.children[0].content, "Jumped");
        assert_eq!(top.children[0].depth, 1);
        assert_eq!(top.children[1].content, "Back");
    }

    #[test]
    fn test_items_attach_to_most_recent_parent() {
        let mut builder = TreeBuilder::new();
        builder.heading(1, "Tasks".into());
        builder.item(0, "Task 1".into(), Marker::Todo, 0);
        builder.item(1, "Subtask A".into(), Marker::None, 2);
        builder.item(1, "Subtask B".into(), Marker::None, 2);
        builder.item(0, "Task 2".into(), Marker::None, 0);
        let roots = builder.finish();

        let tasks = &roots[0];
        assert_eq!(tasks.children.len(), 2);
        let task1 = &tasks.children[0];
        assert_eq!(task1.marker, Marker::Todo);
        assert_eq!(task1.depth, 1);
        assert_eq!(task1.children.len(), 2);
        assert_eq!(task1.children[0].content, "Subtask A");
        assert_eq!(task1.children[0].depth, 2);
        assert_eq!(tasks.children[1].content, "Task 2");
    }

    #[test]
    fn test_content_before_any_heading_is_root_level() {
        let mut builder = TreeBuilder::new();
        builder.text("intro paragraph", 0);
        builder.heading(1, "Later".into());
        let roots = builder.finish();

        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].content, "intro paragraph");
        assert_eq!(roots[0].depth, 0);
        assert_eq!(roots[1].content, "Later");
    }

    #[test]
    fn test_consecutive_text_merges_into_one_paragraph() {
        let mut builder = TreeBuilder::new();
        builder.heading(1, "Notes".into());
        builder.text("first line", 0);
        builder.text("second line", 0);
        builder.blank();
        builder.text("new paragraph", 0);
        let roots = builder.finish();

        let notes = &roots[0];
        assert_eq!(notes.children.len(), 2);
        assert_eq!(notes.children[0].content, "first line second line");
        assert_eq!(notes.children[1].content, "new paragraph");
    }

    #[test]
    fn test_equal_indent_text_continues_the_open_item() {
        let mut builder = TreeBuilder::new();
        builder.item(0, "Task".into(), Marker::None, 0);
        builder.text("continuation", 0);
        let roots = builder.finish();

        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].content, "Task");
        assert_eq!(roots[0].children.len(), 1);
        assert_eq!(roots[0].children[0].content, "continuation");
        assert_eq!(roots[0].children[0].depth, 1);
    }

    #[test]
    fn test_dedented_text_closes_the_item_chain() {
        let mut builder = TreeBuilder::new();
        builder.item(0, "Task".into(), Marker::None, 2);
        builder.text("continuation", 4);
        builder.text("flush text", 0);
        let roots = builder.finish();

        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].content, "Task");
        assert_eq!(roots[0].children[0].content, "continuation");
        assert_eq!(roots[1].content, "flush text");
        assert_eq!(roots[1].depth, 0);
    }

    #[test]
    fn test_property_attaches_to_preceding_sibling() {
        let mut builder = TreeBuilder::new();
        builder.item(0, "Task".into(), Marker::None, 0);
        builder.item(0, "Next".into(), Marker::None, 0);
        builder.property("status".into(), "active".into());
        let roots = builder.finish();

        assert_eq!(roots.len(), 2);
        assert!(roots[0].properties.is_empty());
        assert_eq!(
            roots[1].properties["status"],
            PropertyValue::scalar("active")
        );
    }

    #[test]
    fn test_property_with_no_preceding_block_stays_literal() {
        let mut builder = TreeBuilder::new();
        builder.property("orphan".into(), "value".into());
        let roots = builder.finish();

        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].content, "orphan:: value");
    }

    #[test]
    fn test_property_under_fresh_heading_annotates_the_heading() {
        let mut builder = TreeBuilder::new();
        builder.heading(1, "Page".into());
        builder.property("type".into(), "journal".into());
        let roots = builder.finish();

        assert_eq!(roots[0].properties["type"], PropertyValue::scalar("journal"));
        assert!(roots[0].children.is_empty());
    }

    #[test]
    fn test_leaf_attaches_to_innermost_open_block() {
        let mut builder = TreeBuilder::new();
        builder.heading(1, "Docs".into());
        builder.item(0, "Example".into(), Marker::None, 0);
        builder.leaf("```\ncode\n```".into());
        let roots = builder.finish();

        let item = &roots[0].children[0];
        assert_eq!(item.children[0].content, "```\ncode\n```");
        assert_eq!(item.children[0].depth, 2);
    }

    #[test]
    fn test_child_depth_is_parent_depth_plus_one() {
        fn check(block: &Block) {
            for child in &block.children {
                assert_eq!(child.depth, block.depth + 1);
                check(child);
            }
        }

        let mut builder = TreeBuilder::new();
        builder.heading(1, "A".into());
        builder.heading(3, "B".into());
        builder.item(0, "c".into(), Marker::None, 0);
        builder.item(1, "d".into(), Marker::None, 4);
        builder.text("e", 8);
        builder.heading(2, "F".into());
        for root in &builder.finish() {
            assert_eq!(root.depth, 0);
            check(root);
        }
    }
}
