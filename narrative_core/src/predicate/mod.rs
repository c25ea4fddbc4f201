//! Requirement evaluation.
//!
//! The storylet registry only needs to ask "does this state satisfy this
//! query?". [`Predicate`] is that question; [`QueryMatcher`] answers it for
//! document-style queries:
//!
//! - `{"field": literal}` - equality (or membership when the field is an array)
//! - `{"field": {"$gt": 3, "$lt": 9}}` - field operators, all must hold
//! - `{"$or": [{...}, {...}]}` - logical combinators over sub-queries
//! - `"a.b.0"` - dotted paths into nested objects and arrays

mod operators;

use serde_json::{Map, Value};
use thiserror::Error;

use operators::{apply_operator, is_operator_doc, literal_matches};

/// Errors found while evaluating a query.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("unknown operator: {0}")]
    UnknownOperator(String),

    #[error("operator {operator} expects {expected}")]
    InvalidOperand {
        operator: String,
        expected: &'static str,
    },
}

/// Decides whether a candidate object satisfies a query document.
pub trait Predicate {
    fn test(&self, query: &Map<String, Value>, candidate: &Map<String, Value>) -> bool;
}

impl<F> Predicate for F
where
    F: Fn(&Map<String, Value>, &Map<String, Value>) -> bool,
{
    fn test(&self, query: &Map<String, Value>, candidate: &Map<String, Value>) -> bool {
        self(query, candidate)
    }
}

/// Document-query matcher.
///
/// An empty query matches everything; the storylet registry excludes empty
/// requirements itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryMatcher;

impl QueryMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate a query, reporting malformed queries as errors.
    pub fn check(
        &self,
        query: &Map<String, Value>,
        candidate: &Map<String, Value>,
    ) -> Result<bool, QueryError> {
        match_document(query, candidate)
    }
}

impl Predicate for QueryMatcher {
    fn test(&self, query: &Map<String, Value>, candidate: &Map<String, Value>) -> bool {
        self.check(query, candidate).unwrap_or(false)
    }
}

pub(crate) fn match_document(
    query: &Map<String, Value>,
    doc: &Map<String, Value>,
) -> Result<bool, QueryError> {
    for (key, condition) in query {
        let matched = match key.as_str() {
            "$and" => {
                let mut all = true;
                for sub in sub_queries(key, condition)? {
                    if !match_document(sub, doc)? {
                        all = false;
                        break;
                    }
                }
                all
            }
            "$or" | "$nor" => {
                let mut any = false;
                for sub in sub_queries(key, condition)? {
                    if match_document(sub, doc)? {
                        any = true;
                        break;
                    }
                }
                if key == "$or" {
                    any
                } else {
                    !any
                }
            }
            "$not" => {
                let sub = condition.as_object().ok_or_else(|| QueryError::InvalidOperand {
                    operator: key.clone(),
                    expected: "a query object",
                })?;
                !match_document(sub, doc)?
            }
            op if op.starts_with('$') => return Err(QueryError::UnknownOperator(op.to_string())),
            path => match_field(lookup(doc, path), condition)?,
        };

        if !matched {
            return Ok(false);
        }
    }

    Ok(true)
}

/// Match one field value (absent when `None`) against a condition.
pub(crate) fn match_field(value: Option<&Value>, condition: &Value) -> Result<bool, QueryError> {
    match condition {
        Value::Object(ops) if is_operator_doc(ops) => {
            for (op, operand) in ops {
                if !apply_operator(op, operand, value)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        literal => Ok(literal_matches(value, literal)),
    }
}

/// Resolve a dotted path against a document.
fn lookup<'a>(doc: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = doc.get(segments.next()?)?;

    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    Some(current)
}

fn sub_queries<'a>(
    operator: &str,
    condition: &'a Value,
) -> Result<Vec<&'a Map<String, Value>>, QueryError> {
    let invalid = || QueryError::InvalidOperand {
        operator: operator.to_string(),
        expected: "an array of query objects",
    };

    condition
        .as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|sub| sub.as_object().ok_or_else(invalid))
        .collect()
}
