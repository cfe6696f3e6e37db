// SPDX-License-Identifier: PMPL-1.0-or-later
//! Indentation normalization
//!
//! Raw leading-whitespace widths are irregular in the wild (mixed tabs,
//! three-space nesting, dedents to widths never seen before). The stack
//! maps each item's width onto a canonical depth sequence: a strictly
//! greater width opens a new level, a known width pops back to its level,
//! and an in-between width snaps down to the nearest enclosing level so
//! noise never invents intermediate depths.

/// Stack of previously seen indentation widths; index = depth.
#[derive(Debug, Default)]
pub struct IndentStack {
    widths: Vec<usize>,
}

impl IndentStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalized depth for an item line of the given expanded width.
    pub fn depth_for(&mut self, width: usize) -> usize {
        if let Some(&top) = self.widths.last() {
            if width > top {
                self.widths.push(width);
                return self.widths.len() - 1;
            }
        } else {
            // First item of a list context anchors depth 0 whatever its width.
            self.widths.push(width);
            return 0;
        }

        while let Some(&top) = self.widths.last() {
            if top <= width {
                break;
            }
            self.widths.pop();
        }

        match self.widths.last() {
            // Exact match pops back to that level; a width strictly between
            // two levels snaps down to the enclosing one.
            Some(_) => self.widths.len() - 1,
            None => {
                // Dedented past the anchor width; re-anchor at depth 0.
                self.widths.push(width);
                0
            }
        }
    }

    /// Forget all open levels. Called when a heading closes the list context.
    pub fn reset(&mut self) {
        self.widths.clear();
    }
}
