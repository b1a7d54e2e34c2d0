//! In-process query evaluation over JSON documents.
//!
//! Used by the stores that cannot push a [`Query`] to the server (Redis
//! hashes and the memory store). The semantics mirror the SQL and BSON
//! translations:
//!
//! - a missing field behaves like `null`
//! - ordering comparisons only match values of the same JSON type
//! - `Ne` matches missing fields
//! - ascending sorts put missing and `null` values first; the sort is
//!   stable, so ties keep store order

use std::cmp::Ordering;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use blog_core::result::AppResult;
use blog_core::types::{
    FilterField, FilterOp, FilterValue, PagedList, Projection, Query, SortField,
};

use crate::document::from_document;

/// Run the full filter, sort, page, project pipeline over `documents`.
pub fn execute<P: DeserializeOwned>(
    documents: impl IntoIterator<Item = Value>,
    projection: &Projection,
    query: &Query,
) -> AppResult<PagedList<P>> {
    projection.validate()?;

    let mut matched: Vec<Value> = documents
        .into_iter()
        .filter(|document| matches(document, &query.filters))
        .collect();
    if matched.is_empty() {
        return Ok(PagedList::empty());
    }

    if let Some(order) = &query.order_by {
        sort(&mut matched, order);
    }

    let total = matched.len() as u64;
    let items = matched
        .into_iter()
        .skip(usize::try_from(query.page.offset()).unwrap_or(usize::MAX))
        .take(usize::try_from(query.page.limit()).unwrap_or(usize::MAX))
        .map(|document| from_document(project(document, projection)))
        .collect::<AppResult<Vec<P>>>()?;

    Ok(PagedList::for_request(items, total, &query.page))
}

/// Whether a document satisfies every filter.
pub fn matches(document: &Value, filters: &[FilterField]) -> bool {
    filters.iter().all(|filter| matches_filter(document, filter))
}

fn matches_filter(document: &Value, filter: &FilterField) -> bool {
    let field = document.get(&filter.field).unwrap_or(&Value::Null);
    let expected = filter.value.to_json();

    match filter.op {
        FilterOp::Eq => equals(field, &expected),
        FilterOp::Ne => !equals(field, &expected),
        FilterOp::Gt => compare(field, &expected) == Some(Ordering::Greater),
        FilterOp::Gte => matches!(
            compare(field, &expected),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        FilterOp::Lt => compare(field, &expected) == Some(Ordering::Less),
        FilterOp::Lte => matches!(
            compare(field, &expected),
            Some(Ordering::Less | Ordering::Equal)
        ),
        FilterOp::Like | FilterOp::ILike => match (field.as_str(), filter.value.as_str()) {
            (Some(text), Some(pattern)) => like(text, pattern, filter.op == FilterOp::ILike),
            _ => false,
        },
        FilterOp::In => match &filter.value {
            FilterValue::StringList(list) => field
                .as_str()
                .is_some_and(|text| list.iter().any(|candidate| candidate == text)),
            _ => equals(field, &expected),
        },
        FilterOp::IsNull => field.is_null(),
        FilterOp::IsNotNull => !field.is_null(),
        FilterOp::Contains => field
            .as_array()
            .is_some_and(|items| items.iter().any(|item| equals(item, &expected))),
    }
}

fn equals(left: &Value, right: &Value) -> bool {
    compare(left, right) == Some(Ordering::Equal) || left == right
}

/// Compare two scalar JSON values of the same type.
///
/// Returns `None` for mismatched types, nulls, arrays and objects.
pub fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
        },
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Stable sort by one top-level field.
pub fn sort(documents: &mut [Value], order: &SortField) {
    documents.sort_by(|a, b| {
        let ordering = sort_key_cmp(
            a.get(&order.field).unwrap_or(&Value::Null),
            b.get(&order.field).unwrap_or(&Value::Null),
        );
        if order.direction.is_descending() {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

fn sort_key_cmp(left: &Value, right: &Value) -> Ordering {
    compare(left, right).unwrap_or_else(|| type_rank(left).cmp(&type_rank(right)))
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Object(_) => 3,
        Value::Array(_) => 4,
        Value::Bool(_) => 5,
    }
}

/// Reduce a document to the projected fields.
///
/// Fields missing from the document are left out.
pub fn project(document: Value, projection: &Projection) -> Value {
    let Some(fields) = projection.field_names() else {
        return document;
    };
    let Value::Object(mut source) = document else {
        return document;
    };

    let mut projected = Map::with_capacity(fields.len());
    for field in fields {
        if let Some(value) = source.remove(field) {
            projected.insert(field.clone(), value);
        }
    }
    Value::Object(projected)
}

/// SQL `LIKE` matching: `%` matches any run, `_` any single character,
/// and a backslash escapes the next character.
pub fn like(text: &str, pattern: &str, case_insensitive: bool) -> bool {
    let fold = |s: &str| -> Vec<char> {
        if case_insensitive {
            s.to_lowercase().chars().collect()
        } else {
            s.chars().collect()
        }
    };
    let text = fold(text);
    let tokens = tokenize_like(&fold(pattern));
    like_tokens(&text, &tokens)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LikeToken {
    Literal(char),
    AnyOne,
    AnyRun,
}

fn tokenize_like(pattern: &[char]) -> Vec<LikeToken> {
    let mut tokens = Vec::with_capacity(pattern.len());
    let mut chars = pattern.iter().copied();
    while let Some(c) = chars.next() {
        tokens.push(match c {
            '\\' => LikeToken::Literal(chars.next().unwrap_or('\\')),
            '%' => LikeToken::AnyRun,
            '_' => LikeToken::AnyOne,
            other => LikeToken::Literal(other),
        });
    }
    tokens
}

fn like_tokens(text: &[char], tokens: &[LikeToken]) -> bool {
    // Greedy wildcard matching with single backtrack point.
    let (mut t, mut p) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match tokens.get(p) {
            Some(LikeToken::AnyRun) => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(LikeToken::AnyOne) => {
                t += 1;
                p += 1;
            }
            Some(LikeToken::Literal(c)) if *c == text[t] => {
                t += 1;
                p += 1;
            }
            _ => match backtrack {
                Some((star, matched)) => {
                    p = star + 1;
                    t = matched + 1;
                    backtrack = Some((star, matched + 1));
                }
                None => return false,
            },
        }
    }

    tokens[p..].iter().all(|token| *token == LikeToken::AnyRun)
}
