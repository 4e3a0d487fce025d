//! Terminal-state predicates

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::PredicateError;

/// Decides whether a fetched value ends the poll.
///
/// Implemented for plain closures `Fn(&T) -> bool`, for [`TryPredicate`]
/// (fallible closures), and for [`TerminalStates`] over JSON values.
pub trait TerminalPredicate<T>: Send + Sync {
    /// Returns `Ok(true)` when no further polling is useful.
    fn is_terminal(&self, value: &T) -> Result<bool, PredicateError>;
}

impl<T, F> TerminalPredicate<T> for F
where
    F: Fn(&T) -> bool + Send + Sync,
{
    fn is_terminal(&self, value: &T) -> Result<bool, PredicateError> {
        Ok(self(value))
    }
}

/// Wrapper for fallible predicate closures.
#[derive(Debug, Clone, Copy)]
pub struct TryPredicate<F>(pub F);

impl<T, F> TerminalPredicate<T> for TryPredicate<F>
where
    F: Fn(&T) -> Result<bool, PredicateError> + Send + Sync,
{
    fn is_terminal(&self, value: &T) -> Result<bool, PredicateError> {
        (self.0)(value)
    }
}

/// Terminal vocabulary for a JSON status field.
///
/// The field name and the set of terminal tags are data, not code: the
/// checkout API has used both `status` and `state`, and its terminal set
/// has changed between releases. Tags are compared by exact string equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalStates {
    field: String,
    states: BTreeSet<String>,
}

impl TerminalStates {
    /// Terminal set `states` read from top-level field `field`.
    pub fn new<I, S>(field: impl Into<String>, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field: field.into(),
            states: states.into_iter().map(Into::into).collect(),
        }
    }

    /// Name of the status field.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Terminal tags in sorted order.
    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.states.iter().map(String::as_str)
    }

    /// Whether `tag` is one of the terminal tags.
    pub fn contains(&self, tag: &str) -> bool {
        self.states.contains(tag)
    }

    /// Read the status tag from a JSON object.
    pub fn tag<'v>(&self, value: &'v Value) -> Result<&'v str, PredicateError> {
        match value.get(&self.field) {
            None | Some(Value::Null) => Err(PredicateError::MissingField {
                field: self.field.clone(),
            }),
            Some(Value::String(tag)) => Ok(tag),
            Some(other) => Err(PredicateError::NotAString {
                field: self.field.clone(),
                found: json_type_name(other),
            }),
        }
    }
}

impl TerminalPredicate<Value> for TerminalStates {
    fn is_terminal(&self, value: &Value) -> Result<bool, PredicateError> {
        self.tag(value).map(|tag| self.contains(tag))
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
