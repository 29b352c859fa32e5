//! Backend-neutral translated query types
//!
//! The query translator lowers a declarative, declared-name query descriptor
//! into this vocabulary; backends consume it without knowing anything about
//! model schemas. Field names here are always storage names.

use std::collections::BTreeSet;

use crate::document::{Document, Value};
use crate::error::{Error, Result};
use crate::key::RecordId;

/// A compiled SQL-LIKE-style pattern
///
/// `%` matches any run of characters, `_` any single character, and `\`
/// escapes the following literal. A doubled `%%` is accepted as a literal
/// percent as well, so both `10\% %` and `10%% %` match `10% Off`.
///
/// The compiled form is an anchored regex source string; backends with a
/// native regex engine compile it directly, others may reinterpret the
/// original pattern via [`LikePattern::source`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikePattern {
    source: String,
    regex: String,
}

impl LikePattern {
    /// Compile a like-pattern into its anchored regex form
    pub fn compile(pattern: &str) -> Self {
        let mut regex = String::with_capacity(pattern.len() + 8);
        regex.push('^');

        let mut chars = pattern.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some(escaped) => push_literal(&mut regex, escaped),
                    // Trailing backslash escapes nothing; keep it literal.
                    None => push_literal(&mut regex, '\\'),
                },
                '%' => {
                    if chars.peek() == Some(&'%') {
                        chars.next();
                        push_literal(&mut regex, '%');
                    } else {
                        regex.push_str("(?s:.*)");
                    }
                }
                '_' => regex.push_str("(?s:.)"),
                literal => push_literal(&mut regex, literal),
            }
        }

        regex.push('$');
        Self {
            source: pattern.to_string(),
            regex,
        }
    }

    /// The original, uncompiled pattern
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The anchored regex source the pattern compiled to
    pub fn regex(&self) -> &str {
        &self.regex
    }
}

fn push_literal(regex: &mut String, c: char) {
    let mut buf = [0u8; 4];
    regex.push_str(&regex::escape(c.encode_utf8(&mut buf)));
}

/// A single-field condition
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Field equals the given value exactly
    Eq(Value),
    /// Field is a string matching the compiled like-pattern
    Like(LikePattern),
}

/// A conjunction of conditions, optionally pinned to one primary key
///
/// An empty filter matches every record in the collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    /// Primary-key equality, when the query constrains the key
    pub id: Option<RecordId>,
    /// Per-field conditions, all of which must hold
    pub clauses: Vec<(String, Condition)>,
}

impl Filter {
    /// The match-everything filter
    pub fn all() -> Self {
        Self::default()
    }

    /// A filter matching exactly one primary key
    pub fn by_id(id: RecordId) -> Self {
        Self {
            id: Some(id),
            clauses: Vec::new(),
        }
    }

    /// True when the filter has no constraints at all
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.clauses.is_empty()
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Smallest value first
    Asc,
    /// Largest value first
    Desc,
}

impl Direction {
    /// Normalize a dynamic direction value
    ///
    /// Accepts the numbers `1` / `-1` and the strings `"1"`, `"-1"`,
    /// `"asc"`, `"desc"` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery` for any other value.
    pub fn parse(value: &Value) -> Result<Self> {
        match value {
            Value::Number(n) => match n.as_i64() {
                Some(1) => Ok(Self::Asc),
                Some(-1) => Ok(Self::Desc),
                _ => Err(Error::InvalidQuery(format!(
                    "sort direction must be 1 or -1, got {n}"
                ))),
            },
            Value::String(s) => match s.to_ascii_lowercase().as_str() {
                "1" | "asc" => Ok(Self::Asc),
                "-1" | "desc" => Ok(Self::Desc),
                other => Err(Error::InvalidQuery(format!(
                    "sort direction must be 1 or -1, got \"{other}\""
                ))),
            },
            other => Err(Error::InvalidQuery(format!(
                "sort direction must be 1 or -1, got {other}"
            ))),
        }
    }
}

/// One key of a multi-key sort; caller order is preserved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Storage field name, or [`ID_FIELD`](crate::ID_FIELD) for the key
    pub field: String,
    /// Sort direction for this key
    pub direction: Direction,
}

/// Field projection applied to read results
///
/// The primary key is always included; it is carried outside the document,
/// so neither variant can strip it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// Keep only the named storage fields
    Include(BTreeSet<String>),
    /// Drop the named storage fields
    Exclude(BTreeSet<String>),
}

impl Projection {
    /// Apply the projection to a document in place
    pub fn apply(&self, doc: &mut Document) {
        match self {
            Self::Include(fields) => doc.retain(|name, _| fields.contains(name)),
            Self::Exclude(fields) => doc.retain(|name, _| !fields.contains(name)),
        }
    }
}

/// Result window: effective offset and limit after pagination normalization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Window {
    /// Records to skip before the first result
    pub skip: u64,
    /// Maximum records to return; `None` means unbounded
    pub limit: Option<u64>,
}

/// An update applied to one stored record
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// Replace every non-key field with the given document
    Replace(Document),
    /// Merge the given fields into the record, leaving the rest untouched
    Set(Document),
}
