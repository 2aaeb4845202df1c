//! URL templates with named placeholders.
//!
//! # Syntax
//! - `:name` where `name` is one or more of `[A-Za-z0-9_]`
//! - `{name}` (the axum path syntax), same name rules
//!
//! A template parsed from the empty string is the "no URL" sentinel: it
//! parses fine but every render fails with [`RouteError::NoUrl`].
//!
//! Duplicate placeholder names are kept, one entry per substitution point.
//! Positional rendering rejects two different values for the same name.

use std::collections::HashMap;
use std::fmt;

use crate::routing::error::{RouteError, RouteResult};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A parsed path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    pattern: String,
    segments: Vec<Segment>,
    params: Vec<String>,
}

impl UrlTemplate {
    /// Parse a pattern into literal segments and ordered params.
    pub fn parse(pattern: &str) -> RouteResult<Self> {
        let malformed = |reason: &str| RouteError::Template {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        let mut params = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.chars().peekable();

        while let Some(ch) = chars.next() {
            let name = match ch {
                ':' => {
                    let mut name = String::new();
                    while let Some(&next) = chars.peek() {
                        if !is_name_char(next) {
                            break;
                        }
                        name.push(next);
                        chars.next();
                    }
                    if name.is_empty() {
                        return Err(malformed("empty placeholder name"));
                    }
                    name
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for next in chars.by_ref() {
                        if next == '}' {
                            closed = true;
                            break;
                        }
                        name.push(next);
                    }
                    if !closed {
                        return Err(malformed("unterminated placeholder"));
                    }
                    if name.is_empty() {
                        return Err(malformed("empty placeholder name"));
                    }
                    if !name.chars().all(is_name_char) {
                        return Err(malformed(&format!("invalid placeholder name {name:?}")));
                    }
                    name
                }
                '}' => return Err(malformed("unmatched '}'")),
                _ => {
                    literal.push(ch);
                    continue;
                }
            };

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            params.push(name.clone());
            segments.push(Segment::Param(name));
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            pattern: pattern.to_string(),
            segments,
            params,
        })
    }

    /// The "no URL" sentinel.
    pub fn empty() -> Self {
        Self {
            pattern: String::new(),
            segments: Vec::new(),
            params: Vec::new(),
        }
    }

    /// True for the "no URL" sentinel.
    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    /// The pattern exactly as registered.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Placeholder names in template order, duplicates included.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Substitute `values` into the placeholders, in template order.
    ///
    /// Values are inserted as their `Display` form without URL-encoding.
    pub fn render<V: fmt::Display>(&self, values: &[V]) -> RouteResult<String> {
        if self.is_empty() {
            return Err(RouteError::NoUrl(self.pattern.clone()));
        }
        if values.len() != self.params.len() {
            return Err(RouteError::ParamCount {
                expected: self.params.len(),
                actual: values.len(),
            });
        }

        let mut out = String::with_capacity(self.pattern.len());
        let mut seen: HashMap<&str, String> = HashMap::new();
        let mut values = values.iter();

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Param(name) => {
                    // Lengths were checked above.
                    let Some(value) = values.next() else {
                        break;
                    };
                    let value = value.to_string();
                    if let Some(first) = seen.get(name.as_str()) {
                        if *first != value {
                            return Err(RouteError::ConflictingParam {
                                name: name.clone(),
                                first: first.clone(),
                                second: value,
                            });
                        }
                    }
                    out.push_str(&value);
                    seen.insert(name, value);
                }
            }
        }

        Ok(out)
    }

    /// The template in `{name}` syntax, for wiring into an axum router.
    pub fn to_route_path(&self) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.clone(),
                Segment::Param(name) => format!("{{{name}}}"),
            })
            .collect()
    }

    /// True if an axum router can mount this template: it starts with `/`,
    /// each placeholder fills a whole path segment, and no name repeats.
    pub fn is_routable(&self) -> bool {
        if !self.pattern.starts_with('/') {
            return false;
        }

        let mut names = std::collections::HashSet::new();
        if !self.params.iter().all(|name| names.insert(name.as_str())) {
            return false;
        }

        self.segments.iter().enumerate().all(|(i, segment)| {
            if let Segment::Param(_) = segment {
                let before = match i.checked_sub(1).map(|j| &self.segments[j]) {
                    Some(Segment::Literal(text)) => text.ends_with('/'),
                    _ => false,
                };
                let after = match self.segments.get(i + 1) {
                    None => true,
                    Some(Segment::Literal(text)) => text.starts_with('/'),
                    Some(Segment::Param(_)) => false,
                };
                before && after
            } else {
                true
            }
        })
    }
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}
