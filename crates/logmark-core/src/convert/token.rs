// SPDX-License-Identifier: PMPL-1.0-or-later
//! Line tokenizer
//!
//! Classifies the body one line at a time. Classification is stateless
//! except for fenced code: an opening fence switches the tokenizer into raw
//! capture until a closing fence of the same character (and at least the
//! same length) is seen, and every interior line is fence content no matter
//! what markdown syntax it carries.

use crate::block::Marker;

/// Line classification plus the expanded leading-whitespace width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub indent: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Heading { rank: u8, text: String },
    /// Bullet, ordered or checkbox item; checkbox syntax is already
    /// stripped and folded into `marker`.
    Item { text: String, marker: Marker },
    /// `key:: value` annotation line (LogSeq property syntax).
    Property { key: String, value: String },
    FenceOpen { fence: Fence, line: String },
    FenceContent { line: String },
    FenceClose { line: String },
    Quote { line: String },
    Rule,
    Text { line: String },
    Blank,
}

/// Open-fence descriptor used to match the closing line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fence {
    pub character: char,
    pub length: usize,
}

/// Tokenizer over the body lines of one document.
pub struct Tokenizer<'a> {
    lines: std::str::Lines<'a>,
    tab_width: usize,
    open_fence: Option<Fence>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(body: &'a str, tab_width: usize) -> Self {
        Self {
            lines: body.lines(),
            tab_width,
            open_fence: None,
        }
    }

    fn classify(&mut self, line: &str) -> Token {
        let indent = indent_width(line, self.tab_width);
        let rest = line.trim();

        if let Some(open) = self.open_fence {
            if let Some(fence) = fence_of(rest) {
                let bare = rest[fence.length..].trim().is_empty();
                if bare && fence.character == open.character && fence.length >= open.length {
                    self.open_fence = None;
                    return Token {
                        kind: TokenKind::FenceClose {
                            line: line.to_string(),
                        },
                        indent,
                    };
                }
            }
            return Token {
                kind: TokenKind::FenceContent {
                    line: line.to_string(),
                },
                indent,
            };
        }

        if rest.is_empty() {
            return Token {
                kind: TokenKind::Blank,
                indent,
            };
        }

        if let Some(fence) = fence_of(rest) {
            self.open_fence = Some(fence);
            return Token {
                kind: TokenKind::FenceOpen {
                    fence,
                    line: line.to_string(),
                },
                indent,
            };
        }

        if let Some((rank, text)) = heading_of(rest) {
            return Token {
                kind: TokenKind::Heading { rank, text },
                indent,
            };
        }

        if is_rule(rest) {
            return Token {
                kind: TokenKind::Rule,
                indent,
            };
        }

        if rest.starts_with('>') {
            return Token {
                kind: TokenKind::Quote {
                    line: rest.to_string(),
                },
                indent,
            };
        }

        if let Some((key, value)) = property_of(rest) {
            return Token {
                kind: TokenKind::Property { key, value },
                indent,
            };
        }

        if let Some((text, marker)) = item_of(rest) {
            return Token {
                kind: TokenKind::Item { text, marker },
                indent,
            };
        }

        if is_marker_line(rest) {
            return Token {
                kind: TokenKind::Item {
                    text: rest.to_string(),
                    marker: Marker::None,
                },
                indent,
            };
        }

        Token {
            kind: TokenKind::Text {
                line: rest.to_string(),
            },
            indent,
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let line = self.lines.next()?;
        Some(self.classify(line))
    }
}

/// Leading whitespace width in columns, tabs expanded to `tab_width`.
fn indent_width(line: &str, tab_width: usize) -> usize {
    let mut width = 0;
    for ch in line.chars() {
        match ch {
            ' ' => width += 1,
            '\t' => width += tab_width,
            _ => break,
        }
    }
    width
}

fn fence_of(rest: &str) -> Option<Fence> {
    let character = rest.chars().next()?;
    if character != '`' && character != '~' {
        return None;
    }
    let length = rest.chars().take_while(|&c| c == character).count();
    if length < 3 {
        return None;
    }
    Some(Fence { character, length })
}

fn heading_of(rest: &str) -> Option<(u8, String)> {
    let hashes = rest.chars().take_while(|&c| c == '#').count();
    if !(1..=6).contains(&hashes) {
        return None;
    }
    let after = &rest[hashes..];
    let text = after.strip_prefix([' ', '\t'])?;
    Some((hashes as u8, text.trim().to_string()))
}

fn is_rule(rest: &str) -> bool {
    let mut chars = rest.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !matches!(first, '-' | '*' | '_') {
        return false;
    }
    rest.chars().all(|c| c == first) && rest.len() >= 3
}

fn property_of(rest: &str) -> Option<(String, String)> {
    let (key, value) = rest.split_once("::")?;
    let key = key.trim();
    if key.is_empty()
        || !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return None;
    }
    Some((key.to_string(), value.trim().to_string()))
}

fn item_of(rest: &str) -> Option<(String, Marker)> {
    let text = bullet_text(rest).or_else(|| ordered_text(rest))?;
    if let Some((text, marker)) = checkbox_of(text) {
        return Some((text, marker));
    }
    Some((text.trim().to_string(), Marker::None))
}

fn bullet_text(rest: &str) -> Option<&str> {
    let first = rest.chars().next()?;
    if !matches!(first, '-' | '*' | '+') {
        return None;
    }
    rest[1..].strip_prefix([' ', '\t'])
}

fn ordered_text(rest: &str) -> Option<&str> {
    let digits = rest.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let after = rest[digits..].strip_prefix('.')?;
    after.strip_prefix([' ', '\t'])
}

/// A workflow keyword line such as `TODO call the bank` or `DOING review`:
/// an uppercase word of at least three characters followed by text. The
/// line stands as its own block, content kept verbatim so the keyword
/// survives.
fn is_marker_line(rest: &str) -> bool {
    let Some((word, tail)) = rest.split_once(char::is_whitespace) else {
        return false;
    };
    let mut chars = word.chars();
    let leads_upper = chars.next().is_some_and(|c| c.is_ascii_uppercase());
    leads_upper
        && word.len() >= 3
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_' || c == '-')
        && !tail.trim().is_empty()
}

fn checkbox_of(text: &str) -> Option<(String, Marker)> {
    let rest = text.strip_prefix('[')?;
    let mut chars = rest.chars();
    let state = chars.next()?;
    let marker = match state {
        ' ' => Marker::Todo,
        'x' | 'X' => Marker::Done,
        _ => return None,
    };
    let after = chars.as_str().strip_prefix(']')?;
    let mut content = after.trim().to_string();
    // The original bridge strips redundant TODO:/DONE: prefixes inside
    // checkbox text since the marker already carries the state.
    for prefix in ["TODO:", "DONE:"] {
        if let Some(stripped) = content.strip_prefix(prefix) {
            content = stripped.trim().to_string();
            break;
        }
    }
    Some((content, marker))
}
