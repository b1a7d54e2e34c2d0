//! SQL compilation of [`Query`] and [`Projection`] over JSONB document tables.
//!
//! Tables have the shape `(id TEXT PRIMARY KEY, document JSONB NOT NULL)`.
//! Field names and values are always bound as parameters; the only
//! interpolated identifier is the static collection name.

use serde_json::Value;
use sqlx::types::Json;
use sqlx::{Postgres, QueryBuilder};

use blog_core::types::{FilterField, FilterOp, FilterValue, Projection, Query, SortField};

/// Quote a collection name as a table identifier.
pub fn table(collection: &str) -> String {
    format!("\"{}\"", collection.replace('"', "\"\""))
}

/// `SELECT COUNT(*)` over the rows matching the query filters.
pub fn count<'a>(collection: &str, query: &'a Query) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", table(collection)));
    push_where(&mut builder, &query.filters);
    builder
}

/// `SELECT` of one page of projected documents.
pub fn select<'a>(
    collection: &str,
    projection: &'a Projection,
    query: &'a Query,
) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new("SELECT ");
    push_projection(&mut builder, projection);
    builder.push(format!(" AS document FROM {}", table(collection)));
    push_where(&mut builder, &query.filters);

    if let Some(order) = &query.order_by {
        push_order(&mut builder, order);
    }

    if !query.page.is_unbounded() {
        builder.push(" LIMIT ");
        builder.push_bind(query.page.limit() as i64);
    }
    let offset = query.page.offset();
    if offset > 0 {
        builder.push(" OFFSET ");
        builder.push_bind(offset as i64);
    }
    builder
}

fn push_projection<'a>(builder: &mut QueryBuilder<'a, Postgres>, projection: &'a Projection) {
    let Some(fields) = projection.field_names() else {
        builder.push("document");
        return;
    };

    builder.push(
        "(SELECT COALESCE(jsonb_object_agg(key, value), '{}'::jsonb) \
         FROM jsonb_each(document) WHERE key = ANY(",
    );
    builder.push_bind(fields.to_vec());
    builder.push("))");
}

fn push_order<'a>(builder: &mut QueryBuilder<'a, Postgres>, order: &'a SortField) {
    builder.push(" ORDER BY document -> ");
    builder.push_bind(order.field.as_str());
    if order.direction.is_descending() {
        builder.push(" DESC NULLS LAST");
    } else {
        builder.push(" ASC NULLS FIRST");
    }
}

/// Append a `WHERE` clause joining every filter with `AND`.
pub fn push_where<'a>(builder: &mut QueryBuilder<'a, Postgres>, filters: &'a [FilterField]) {
    for (i, filter) in filters.iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        push_filter(builder, filter);
    }
}

fn push_filter<'a>(builder: &mut QueryBuilder<'a, Postgres>, filter: &'a FilterField) {
    let field = filter.field.as_str();
    match filter.op {
        FilterOp::Eq => {
            push_field(builder, field);
            builder.push(" = ");
            builder.push_bind(Json(filter.value.to_json()));
        }
        FilterOp::Ne => {
            push_field(builder, field);
            builder.push(" IS DISTINCT FROM ");
            builder.push_bind(Json(filter.value.to_json()));
        }
        FilterOp::Gt | FilterOp::Gte | FilterOp::Lt | FilterOp::Lte => {
            let value = filter.value.to_json();
            builder.push("(jsonb_typeof(");
            push_field(builder, field);
            builder.push(") = jsonb_typeof(");
            builder.push_bind(Json(value.clone()));
            builder.push(") AND ");
            push_field(builder, field);
            builder.push(match filter.op {
                FilterOp::Gt => " > ",
                FilterOp::Gte => " >= ",
                FilterOp::Lt => " < ",
                _ => " <= ",
            });
            builder.push_bind(Json(value));
            builder.push(")");
        }
        FilterOp::Like | FilterOp::ILike => {
            push_string_field(builder, field);
            builder.push(if filter.op == FilterOp::Like {
                " LIKE "
            } else {
                " ILIKE "
            });
            builder.push_bind(like_pattern(&filter.value));
            builder.push(")");
        }
        FilterOp::In => match &filter.value {
            FilterValue::StringList(list) => {
                push_string_field(builder, field);
                builder.push(" = ANY(");
                builder.push_bind(list.clone());
                builder.push("))");
            }
            other => {
                push_field(builder, field);
                builder.push(" = ");
                builder.push_bind(Json(other.to_json()));
            }
        },
        FilterOp::IsNull => {
            builder.push("(");
            push_field(builder, field);
            builder.push(" IS NULL OR ");
            push_field(builder, field);
            builder.push(" = 'null'::jsonb)");
        }
        FilterOp::IsNotNull => {
            builder.push("(");
            push_field(builder, field);
            builder.push(" IS NOT NULL AND ");
            push_field(builder, field);
            builder.push(" <> 'null'::jsonb)");
        }
        FilterOp::Contains => {
            builder.push("(jsonb_typeof(");
            push_field(builder, field);
            builder.push(") = 'array' AND ");
            push_field(builder, field);
            builder.push(" @> ");
            builder.push_bind(Json(Value::Array(vec![filter.value.to_json()])));
            builder.push(")");
        }
    }
}

fn push_field<'a>(builder: &mut QueryBuilder<'a, Postgres>, field: &'a str) {
    builder.push("document -> ");
    builder.push_bind(field);
}

/// Opens a parenthesis the caller closes after the comparison.
fn push_string_field<'a>(builder: &mut QueryBuilder<'a, Postgres>, field: &'a str) {
    builder.push("(jsonb_typeof(");
    push_field(builder, field);
    builder.push(") = 'string' AND document ->> ");
    builder.push_bind(field);
}

fn like_pattern(value: &FilterValue) -> String {
    match value {
        FilterValue::String(pattern) => pattern.clone(),
        other => other.to_json().to_string(),
    }
}
