//! Typed query filters and updates
//!
//! Covers the slice of the MongoDB query language the walkthrough needs.
//! Each value renders to the equivalent BSON document for the driver and
//! can also be evaluated locally, which is what `MemoryStore` does.

use std::cmp::Ordering;

use bson::{doc, Bson, Document};

/// A single-field query predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every document (`{}`)
    All,
    /// `{field: value}`
    Eq(String, Bson),
    /// `{field: {"$gt": value}}`
    Gt(String, Bson),
    /// `{field: {"$lt": value}}`
    Lt(String, Bson),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Self::Eq(field.into(), value.into())
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Self::Gt(field.into(), value.into())
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Self::Lt(field.into(), value.into())
    }

    pub fn to_document(&self) -> Document {
        match self {
            Self::All => Document::new(),
            Self::Eq(field, value) => doc! { field.as_str(): value.clone() },
            Self::Gt(field, value) => doc! { field.as_str(): { "$gt": value.clone() } },
            Self::Lt(field, value) => doc! { field.as_str(): { "$lt": value.clone() } },
        }
    }

    /// Evaluate against a document locally.
    ///
    /// Follows the server for these operators: a missing field matches only
    /// `Eq(_, Null)`, an array field matches when the whole array or any
    /// element does, and values of different type classes never compare.
    /// Int64 against double goes through `f64`, so magnitudes past 2^53 may
    /// round.
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Self::All => true,
            Self::Eq(field, value) => match doc.get(field) {
                None => *value == Bson::Null,
                Some(actual) => any_value(actual, |v| values_equal(v, value)),
            },
            Self::Gt(field, value) => doc.get(field).is_some_and(|actual| {
                any_value(actual, |v| compare(v, value) == Some(Ordering::Greater))
            }),
            Self::Lt(field, value) => doc.get(field).is_some_and(|actual| {
                any_value(actual, |v| compare(v, value) == Some(Ordering::Less))
            }),
        }
    }
}

/// A field update
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// `{"$set": {field: value}}`
    Set(String, Bson),
}

impl Update {
    pub fn set(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Self::Set(field.into(), value.into())
    }

    pub fn to_document(&self) -> Document {
        match self {
            Self::Set(field, value) => doc! { "$set": { field.as_str(): value.clone() } },
        }
    }

    /// Apply in place. Returns true if the document actually changed.
    pub fn apply(&self, doc: &mut Document) -> bool {
        match self {
            Self::Set(field, value) => {
                if doc.get(field) == Some(value) {
                    return false;
                }
                doc.insert(field.as_str(), value.clone());
                true
            }
        }
    }
}

/// The value itself, then each element if it is an array
fn any_value<F>(actual: &Bson, pred: F) -> bool
where
    F: Fn(&Bson) -> bool,
{
    if pred(actual) {
        return true;
    }
    match actual {
        Bson::Array(items) => items.iter().any(pred),
        _ => false,
    }
}

fn values_equal(a: &Bson, b: &Bson) -> bool {
    match compare(a, b) {
        Some(ordering) => ordering == Ordering::Equal,
        None => a == b,
    }
}

/// Ordering within a type class; `None` across classes.
fn compare(a: &Bson, b: &Bson) -> Option<Ordering> {
    match (a, b) {
        (Bson::String(a), Bson::String(b)) => Some(a.cmp(b)),
        (Bson::Boolean(a), Bson::Boolean(b)) => Some(a.cmp(b)),
        (Bson::DateTime(a), Bson::DateTime(b)) => Some(a.cmp(b)),
        (Bson::ObjectId(a), Bson::ObjectId(b)) => Some(a.cmp(b)),
        _ => match (as_integer(a), as_integer(b)) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => as_double(a)?.partial_cmp(&as_double(b)?),
        },
    }
}

fn as_integer(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(n) => Some(i64::from(*n)),
        Bson::Int64(n) => Some(*n),
        _ => None,
    }
}

fn as_double(value: &Bson) -> Option<f64> {
    match value {
        Bson::Double(n) => Some(*n),
        other => as_integer(other).map(|n| n as f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(name: &str, money: i64) -> Document {
        doc! { "name": name, "bank_money": money }
    }

    #[test]
    fn renders_driver_documents() {
        assert_eq!(Filter::All.to_document(), doc! {});
        assert_eq!(
            Filter::eq("name", "michael").to_document(),
            doc! { "name": "michael" }
        );
        assert_eq!(
            Filter::gt("bank_money", 900_i64).to_document(),
            doc! { "bank_money": { "$gt": 900_i64 } }
        );
        assert_eq!(
            Filter::lt("bank_money", 1000_i64).to_document(),
            doc! { "bank_money": { "$lt": 1000_i64 } }
        );
        assert_eq!(
            Update::set("bank_money", 2000_i64).to_document(),
            doc! { "$set": { "bank_money": 2000_i64 } }
        );
    }

    #[test]
    fn numeric_comparison_crosses_types() {
        let doc = account("Jack", 800);
        assert!(Filter::lt("bank_money", 1000_i32).matches(&doc));
        assert!(Filter::lt("bank_money", 800.5_f64).matches(&doc));
        assert!(Filter::eq("bank_money", 800.0_f64).matches(&doc));
        assert!(!Filter::gt("bank_money", 800_i32).matches(&doc));
    }

    #[test]
    fn missing_field_or_type_mismatch_never_matches() {
        let doc = account("michael", 1000);
        assert!(!Filter::eq("email", "x").matches(&doc));
        assert!(!Filter::gt("email", 0_i64).matches(&doc));
        assert!(!Filter::gt("name", 0_i64).matches(&doc));
        assert!(!Filter::eq("bank_money", "1000").matches(&doc));
        assert!(Filter::All.matches(&doc));
    }

    #[test]
    fn null_matches_missing_field() {
        let doc = account("michael", 1000);
        assert!(Filter::eq("email", Bson::Null).matches(&doc));
        assert!(Filter::eq("email", Bson::Null).matches(&doc! { "email": Bson::Null }));
        assert!(!Filter::eq("name", Bson::Null).matches(&doc));
    }

    #[test]
    fn array_fields_match_on_any_element() {
        let doc = doc! { "tags": ["vip", "new"], "scores": [3_i32, 12_i32] };
        assert!(Filter::eq("tags", "vip").matches(&doc));
        assert!(Filter::eq("tags", vec![Bson::from("vip"), Bson::from("new")]).matches(&doc));
        assert!(!Filter::eq("tags", "old").matches(&doc));
        assert!(Filter::gt("scores", 10_i64).matches(&doc));
        assert!(Filter::lt("scores", 5_i64).matches(&doc));
        assert!(!Filter::gt("scores", 20_i64).matches(&doc));
    }

    #[test]
    fn string_equality_is_exact() {
        let doc = account("michael", 1000);
        assert!(Filter::eq("name", "michael").matches(&doc));
        assert!(!Filter::eq("name", "Michael").matches(&doc));
    }

    #[test]
    fn set_reports_modification() {
        let mut doc = account("michael", 1000);
        let update = Update::set("bank_money", 2000_i64);

        assert!(update.apply(&mut doc));
        assert_eq!(doc.get_i64("bank_money").unwrap(), 2000);
        // Field keeps its position
        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["name", "bank_money"]);

        // Setting the same value again matches but does not modify
        assert!(!update.apply(&mut doc));
    }

    #[test]
    fn set_adds_missing_field() {
        let mut doc = doc! { "name": "Andy" };
        assert!(Update::set("content", "hello").apply(&mut doc));
        assert_eq!(doc.get_str("content").unwrap(), "hello");
    }
}
