//! Query translation: declared names down to backend filters
//!
//! One layer turns the convenience surface into the exact backend call
//! shape. Everything schema-related is validated here, so backends never see
//! an unknown field or a malformed key.

use std::collections::BTreeSet;

use burrow_core::{
    Condition, Direction, Document, Error, Filter, LikePattern, ModelSchema, Operation,
    Projection, RecordId, Result, SortKey, Update, Value, Window, ID_FIELD,
};

use crate::query::{FieldValues, Query, UpdateSpec, WhereClause};

/// The lowered form of one [`Query`]
#[derive(Debug, Clone)]
pub(crate) struct TranslatedQuery {
    pub(crate) filter: Filter,
    pub(crate) sort: Vec<SortKey>,
    pub(crate) window: Window,
    pub(crate) projection: Option<Projection>,
}

/// Lower a full query descriptor
pub(crate) fn translate(
    schema: &ModelSchema,
    query: &Query,
    operation: Operation,
) -> Result<TranslatedQuery> {
    Ok(TranslatedQuery {
        filter: translate_where(schema, query, operation)?,
        sort: translate_order(schema, query)?,
        window: normalize_window(query)?,
        projection: translate_projection(schema, query)?,
    })
}

/// Lower only the predicate of a query (for count/distinct/findAndModify)
pub(crate) fn translate_where(
    schema: &ModelSchema,
    query: &Query,
    operation: Operation,
) -> Result<Filter> {
    let mut filter = Filter::all();
    for (field, clause) in &query.where_ {
        if field == "id" {
            match clause {
                WhereClause::Eq(value) => {
                    let raw = value_as_key(value, operation)?;
                    let id = RecordId::parse(&raw)
                        .map_err(|_| Error::invalid_key(operation, raw))?;
                    filter.id = Some(id);
                }
                WhereClause::Like(_) => {
                    return Err(Error::InvalidQuery(
                        "$like cannot apply to the primary key".to_string(),
                    ));
                }
            }
            continue;
        }

        let storage = schema.storage_name(field)?.to_string();
        let condition = match clause {
            WhereClause::Eq(value) => Condition::Eq(value.clone()),
            WhereClause::Like(pattern) => Condition::Like(LikePattern::compile(pattern)),
        };
        filter.clauses.push((storage, condition));
    }
    Ok(filter)
}

fn value_as_key(value: &Value, operation: Operation) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(Error::invalid_key(operation, other.to_string())),
    }
}

fn translate_order(schema: &ModelSchema, query: &Query) -> Result<Vec<SortKey>> {
    query
        .order
        .iter()
        .map(|(field, raw)| {
            Ok(SortKey {
                field: storage_field(schema, field)?,
                direction: Direction::parse(raw)?,
            })
        })
        .collect()
}

/// Normalize the two pagination idioms into one effective window
///
/// `page`/`per_page` and `limit`/`skip` must not be mixed; pages are
/// 1-based.
fn normalize_window(query: &Query) -> Result<Window> {
    let paged = query.page.is_some() || query.per_page.is_some();
    let raw = query.limit.is_some() || query.skip.is_some();
    if paged && raw {
        return Err(Error::InvalidQuery(
            "page/per_page and limit/skip are mutually exclusive".to_string(),
        ));
    }

    if paged {
        let per_page = query
            .per_page
            .ok_or_else(|| Error::InvalidQuery("page requires per_page".to_string()))?;
        let page = query.page.unwrap_or(1);
        if page == 0 {
            return Err(Error::InvalidQuery("pages are numbered from 1".to_string()));
        }
        let skip = page
            .checked_sub(1)
            .and_then(|p| p.checked_mul(per_page))
            .ok_or_else(|| Error::InvalidQuery("page window exceeds u64".to_string()))?;
        return Ok(Window {
            skip,
            limit: Some(per_page),
        });
    }

    Ok(Window {
        skip: query.skip.unwrap_or(0),
        limit: query.limit,
    })
}

fn translate_projection(schema: &ModelSchema, query: &Query) -> Result<Option<Projection>> {
    if !query.select.is_empty() && !query.unselect.is_empty() {
        return Err(Error::InvalidQuery(
            "select and unselect are mutually exclusive".to_string(),
        ));
    }

    if !query.select.is_empty() {
        let fields: BTreeSet<String> = query
            .select
            .iter()
            .map(|f| storage_field(schema, f))
            .collect::<Result<_>>()?;
        return Ok(Some(Projection::Include(fields)));
    }
    if !query.unselect.is_empty() {
        let fields: BTreeSet<String> = query
            .unselect
            .iter()
            // The key lives outside the document; excluding it is a no-op.
            .filter(|f| f.as_str() != "id")
            .map(|f| storage_field(schema, f))
            .collect::<Result<_>>()?;
        return Ok(Some(Projection::Exclude(fields)));
    }
    Ok(None)
}

/// Storage name for a declared field, with `id` mapped to the reserved key
/// field
pub(crate) fn storage_field(schema: &ModelSchema, field: &str) -> Result<String> {
    if field == "id" {
        return Ok(ID_FIELD.to_string());
    }
    Ok(schema.storage_name(field)?.to_string())
}

/// Map declared field values to a storage document
pub(crate) fn to_storage_doc(schema: &ModelSchema, values: &FieldValues) -> Result<Document> {
    let mut doc = Document::new();
    for (field, value) in values {
        let storage = schema.storage_name(field)?.to_string();
        doc.insert(storage, value.clone());
    }
    Ok(doc)
}

/// Lower an update specification
pub(crate) fn translate_update(schema: &ModelSchema, update: &UpdateSpec) -> Result<Update> {
    Ok(match update {
        UpdateSpec::Replace(values) => Update::Replace(to_storage_doc(schema, values)?),
        UpdateSpec::Set(values) => Update::Set(to_storage_doc(schema, values)?),
    })
}
