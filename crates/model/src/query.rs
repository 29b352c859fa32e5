//! Declarative query descriptors
//!
//! A `Query` is built against declared field names and knows nothing about
//! storage. The translator (internal to this crate) rewrites it into the
//! backend-neutral form, validating field names and option combinations on
//! the way.
//!
//! Two pagination idioms exist and are mutually exclusive:
//! - `limit` / `skip`: raw window
//! - `page` / `per_page`: computed window, `skip = (page - 1) * per_page`

use std::collections::BTreeMap;

use burrow_core::{Direction, Value};

/// Field values keyed by declared name, as supplied to create/upsert/update
pub type FieldValues = BTreeMap<String, Value>;

/// Build a `FieldValues` map from name/value pairs
///
/// ```
/// use burrow_model::field_values;
///
/// let values = field_values([("title", "Test"), ("content", "Hello world")]);
/// assert_eq!(values.len(), 2);
/// ```
pub fn field_values<K, V, I>(pairs: I) -> FieldValues
where
    K: Into<String>,
    V: Into<Value>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// One condition on a declared field
#[derive(Debug, Clone, PartialEq)]
pub enum WhereClause {
    /// Field equals the value exactly
    Eq(Value),
    /// Field matches a SQL-LIKE-style pattern (`%`, `_`, `\` escapes)
    Like(String),
}

/// A declarative query descriptor
///
/// All top-level clauses are conjoined. Key order in `order_by` calls is
/// preserved through to the backend sort.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub(crate) where_: Vec<(String, WhereClause)>,
    pub(crate) order: Vec<(String, Value)>,
    pub(crate) limit: Option<u64>,
    pub(crate) skip: Option<u64>,
    pub(crate) page: Option<u64>,
    pub(crate) per_page: Option<u64>,
    pub(crate) select: Vec<String>,
    pub(crate) unselect: Vec<String>,
}

impl Query {
    /// An unconstrained query
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value`
    ///
    /// The declared name `id` constrains the primary key; its value must be
    /// a well-formed key string.
    #[must_use]
    pub fn where_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.where_
            .push((field.to_string(), WhereClause::Eq(value.into())));
        self
    }

    /// Require `field` to match a like-pattern
    #[must_use]
    pub fn where_like(mut self, field: &str, pattern: &str) -> Self {
        self.where_
            .push((field.to_string(), WhereClause::Like(pattern.to_string())));
        self
    }

    /// Append a sort key; earlier keys take precedence
    #[must_use]
    pub fn order_by(self, field: &str, direction: Direction) -> Self {
        let raw = match direction {
            Direction::Asc => Value::from(1),
            Direction::Desc => Value::from(-1),
        };
        self.order_by_dynamic(field, raw)
    }

    /// Append a sort key with a dynamic direction value
    ///
    /// Accepts whatever [`Direction::parse`] accepts: `1`, `-1`, `"1"`,
    /// `"-1"`, `"asc"`, `"desc"`. Validation happens at translation time.
    #[must_use]
    pub fn order_by_dynamic(mut self, field: &str, direction: impl Into<Value>) -> Self {
        self.order.push((field.to_string(), direction.into()));
        self
    }

    /// Cap the number of returned records
    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skip the first `skip` records
    #[must_use]
    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Select the 1-based result page (requires `per_page`)
    #[must_use]
    pub fn page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    /// Records per page
    #[must_use]
    pub fn per_page(mut self, per_page: u64) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Include only `field` (and the primary key) in results
    ///
    /// Mutually exclusive with `unselect`. Fields left out are absent on the
    /// resulting records, never null.
    #[must_use]
    pub fn select(mut self, field: &str) -> Self {
        self.select.push(field.to_string());
        self
    }

    /// Exclude `field` from results
    ///
    /// Mutually exclusive with `select`. The primary key cannot be excluded.
    #[must_use]
    pub fn unselect(mut self, field: &str) -> Self {
        self.unselect.push(field.to_string());
        self
    }
}

/// The update half of `find_and_modify`
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateSpec {
    /// Replace every field of the matched record with the given values
    Replace(FieldValues),
    /// Merge the given values into the matched record ($set semantics)
    Set(FieldValues),
}

/// Options for `find_and_modify`
#[derive(Debug, Clone, Copy, Default)]
pub struct FindAndModifyOptions {
    /// Insert a new record when nothing matches
    pub upsert: bool,
    /// Return the post-update record instead of the pre-update one
    pub new: bool,
}
