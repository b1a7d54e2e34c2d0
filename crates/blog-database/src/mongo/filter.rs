//! Translation of [`Query`](blog_core::types::Query) parts into BSON documents.

use mongodb::bson::{Bson, Document, doc};

use blog_core::traits::ID_FIELD;
use blog_core::types::{FilterField, FilterOp, FilterValue, Projection, SortField};

/// MongoDB's primary key field.
pub const MONGO_ID_FIELD: &str = "_id";

/// Map an entity field name to its stored name.
pub fn field_name(field: &str) -> &str {
    if field == ID_FIELD { MONGO_ID_FIELD } else { field }
}

/// Convert a filter value into BSON.
pub fn to_bson(value: &FilterValue) -> Bson {
    match value {
        FilterValue::String(s) => Bson::String(s.clone()),
        FilterValue::Integer(i) => Bson::Int64(*i),
        FilterValue::Float(f) => Bson::Double(*f),
        FilterValue::Boolean(b) => Bson::Boolean(*b),
        FilterValue::StringList(list) => {
            Bson::Array(list.iter().cloned().map(Bson::String).collect())
        }
        FilterValue::Null => Bson::Null,
    }
}

/// Build the query document for a conjunction of filters.
pub fn filter_document(filters: &[FilterField]) -> Document {
    let mut conditions: Vec<Document> = filters.iter().map(condition).collect();
    match conditions.len() {
        0 => Document::new(),
        1 => conditions.remove(0),
        _ => doc! { "$and": conditions },
    }
}

fn condition(filter: &FilterField) -> Document {
    let value = to_bson(&filter.value);
    let predicate = match filter.op {
        FilterOp::Eq => doc! { "$eq": value },
        FilterOp::Ne => doc! { "$ne": value },
        FilterOp::Gt => doc! { "$gt": value },
        FilterOp::Gte => doc! { "$gte": value },
        FilterOp::Lt => doc! { "$lt": value },
        FilterOp::Lte => doc! { "$lte": value },
        FilterOp::Like | FilterOp::ILike => {
            let pattern = match &filter.value {
                FilterValue::String(pattern) => pattern.clone(),
                other => other.to_json().to_string(),
            };
            let options = if filter.op == FilterOp::ILike { "is" } else { "s" };
            doc! { "$regex": like_to_regex(&pattern), "$options": options }
        }
        FilterOp::In => match value {
            list @ Bson::Array(_) => doc! { "$in": list },
            other => doc! { "$eq": other },
        },
        FilterOp::IsNull => doc! { "$eq": Bson::Null },
        FilterOp::IsNotNull => doc! { "$ne": Bson::Null },
        FilterOp::Contains => doc! { "$elemMatch": { "$eq": value } },
    };

    let mut condition = Document::new();
    condition.insert(field_name(&filter.field), predicate);
    condition
}

/// Build the sort document for one sort key.
pub fn sort_document(order: &SortField) -> Document {
    let mut sort = Document::new();
    sort.insert(field_name(&order.field), order.direction.as_mongo());
    sort
}

/// Build the projection document, or `None` for the identity projection.
pub fn projection_document(projection: &Projection) -> Option<Document> {
    let fields = projection.field_names()?;
    let mut document = Document::new();
    for field in fields {
        document.insert(field_name(field), 1);
    }
    if !document.contains_key(MONGO_ID_FIELD) {
        document.insert(MONGO_ID_FIELD, 0);
    }
    Some(document)
}

/// Convert a `LIKE` pattern into an anchored regular expression.
pub fn like_to_regex(pattern: &str) -> String {
    let mut regex = String::with_capacity(pattern.len() + 2);
    regex.push('^');
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => push_literal(&mut regex, chars.next().unwrap_or('\\')),
            '%' => regex.push_str(".*"),
            '_' => regex.push('.'),
            other => push_literal(&mut regex, other),
        }
    }
    regex.push('$');
    regex
}

fn push_literal(regex: &mut String, c: char) {
    if "\\.+*?()|[]{}^$#-".contains(c) {
        regex.push('\\');
    }
    regex.push(c);
}
