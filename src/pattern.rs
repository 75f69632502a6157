// SPDX-License-Identifier: MIT OR Apache-2.0

//! Log format patterns that reference diagnostic context.
//!
//! A pattern is literal text with `%X{key}` placeholders, the conversion logging backends
//! conventionally use for per-thread diagnostic values.  `%X{key:-default}` supplies a
//! default for an absent key.  Every other `%` sequence belongs to the backend and is passed
//! through untouched, `%%` included, so a pattern can be rendered here first and handed on
//! to the backend's own formatter.  An escaped `%%X{key}` is not a placeholder.
//!
//! Placeholders resolve through [`context::lookup`](crate::context::lookup): the event's own
//! properties first, then the calling thread's inherited context.
//!
//! ```rust
//! use buildwise::ContextPattern;
//! use buildwise::context::ContextMap;
//!
//! let pattern = ContextPattern::parse("[%X{maven.project.id}] %d %X{maven.mojo.goal:-none}").unwrap();
//! let event: ContextMap = [("maven.project.id", "com.acme:widget:1.0")].into_iter().collect();
//! assert_eq!(pattern.render(&event), "[com.acme:widget:1.0] %d none");
//! ```

use crate::context::{EventProperties, lookup};

/// An error in a pattern string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("expected '{{' after %X at offset {0}")]
    MissingBrace(usize),
    #[error("placeholder opened at offset {0} is never closed")]
    Unclosed(usize),
    #[error("placeholder at offset {0} has an empty key")]
    EmptyKey(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Segment {
    Literal(String),
    Key {
        key: String,
        default: Option<String>,
    },
}

/// A parsed pattern, ready to render against log events.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContextPattern {
    segments: Vec<Segment>,
}

impl ContextPattern {
    pub fn parse(pattern: &str) -> Result<ContextPattern, PatternError> {
        let mut segments = Vec::new();
        //holds the text up to the next placeholder
        let mut literal = String::new();
        let mut chars = pattern.char_indices().peekable();

        while let Some((offset, c)) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }
            match chars.peek() {
                Some((_, '%')) => {
                    chars.next();
                    // stays escaped for the backend
                    literal.push_str("%%");
                }
                Some((_, 'X')) => {
                    chars.next();
                    match chars.next() {
                        Some((_, '{')) => {}
                        _ => return Err(PatternError::MissingBrace(offset)),
                    }
                    let mut body = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        body.push(c);
                    }
                    if !closed {
                        return Err(PatternError::Unclosed(offset));
                    }
                    let (key, default) = match body.split_once(":-") {
                        Some((key, default)) => (key.to_string(), Some(default.to_string())),
                        None => (body, None),
                    };
                    if key.is_empty() {
                        return Err(PatternError::EmptyKey(offset));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Key { key, default });
                }
                // some other conversion; not ours
                _ => literal.push('%'),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(ContextPattern { segments })
    }

    /// The context keys the pattern references, in order of appearance.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Key { key, .. } => Some(key.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Renders the pattern for one log event.
    ///
    /// Absent keys render as their default, or as nothing.
    pub fn render(&self, event: &impl EventProperties) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(l) => out.push_str(l),
                Segment::Key { key, default } => match lookup(event, key) {
                    Some(value) => out.push_str(&value),
                    None => out.push_str(default.as_deref().unwrap_or("")),
                },
            }
        }
        out
    }
}

impl std::str::FromStr for ContextPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContextPattern::parse(s)
    }
}
