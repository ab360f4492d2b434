//! Record - the field map a formula is evaluated against

use indexmap::IndexMap;
use std::borrow::Cow;
use thiserror::Error;

use crate::FormulaValue;

/// Errors building a record from external data
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RecordError {
    /// The JSON document is not an object
    #[error("Record must be a JSON object, found {found}")]
    NotAnObject { found: String },

    /// The JSON document could not be parsed
    #[error("Invalid record JSON: {message}")]
    InvalidJson { message: String },
}

/// One entity's field state, keyed by field name.
///
/// Related records may be inlined as nested objects so formulas can reach
/// them with dot paths (`account.owner.email`). A record is never mutated
/// by evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: IndexMap<String, FormulaValue>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field insertion
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FormulaValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Set a field value, returning the previous one
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FormulaValue>,
    ) -> Option<FormulaValue> {
        self.fields.insert(name.into(), value.into())
    }

    /// Get a top-level field
    pub fn get(&self, name: &str) -> Option<&FormulaValue> {
        self.fields.get(name)
    }

    /// Iterate over fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FormulaValue)> {
        self.fields.iter()
    }

    /// Number of top-level fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build a record from a JSON object
    pub fn from_json(value: serde_json::Value) -> Result<Self, RecordError> {
        match value {
            serde_json::Value::Object(map) => Ok(map
                .into_iter()
                .map(|(k, v)| (k, FormulaValue::from(v)))
                .collect()),
            other => Err(RecordError::NotAnObject {
                found: json_kind(&other).to_string(),
            }),
        }
    }

    /// Parse a record from JSON text
    pub fn from_json_str(text: &str) -> Result<Self, RecordError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| RecordError::InvalidJson {
                message: e.to_string(),
            })?;
        Self::from_json(value)
    }

    /// Resolve a dot-separated field path.
    ///
    /// Walks one level per segment. As soon as the value being walked is
    /// null/undefined or not an object, the result is `Null`. A missing
    /// final segment yields `Undefined`. Arrays are objects here too: they
    /// answer numeric indices and `length`.
    pub fn resolve_path(&self, path: &str) -> FormulaValue {
        let mut segments = path.split('.');
        let mut current: Option<Cow<'_, FormulaValue>> = segments
            .next()
            .and_then(|first| self.fields.get(first))
            .map(Cow::Borrowed);

        for segment in segments {
            current = match current {
                None => return FormulaValue::Null,
                Some(value) => match member(value, segment) {
                    Member::Found(v) => Some(v),
                    Member::Missing => None,
                    Member::NotAnObject => return FormulaValue::Null,
                },
            };
        }

        current.map(Cow::into_owned).unwrap_or(FormulaValue::Undefined)
    }
}

enum Member<'a> {
    Found(Cow<'a, FormulaValue>),
    Missing,
    NotAnObject,
}

fn member<'a>(value: Cow<'a, FormulaValue>, segment: &str) -> Member<'a> {
    match value {
        Cow::Borrowed(v) => member_of(v, segment),
        Cow::Owned(v) => match member_of(&v, segment) {
            Member::Found(found) => Member::Found(Cow::Owned(found.into_owned())),
            Member::Missing => Member::Missing,
            Member::NotAnObject => Member::NotAnObject,
        },
    }
}

fn member_of<'a>(value: &'a FormulaValue, segment: &str) -> Member<'a> {
    match value {
        FormulaValue::Object(map) => map
            .get(segment)
            .map(|v| Member::Found(Cow::Borrowed(v)))
            .unwrap_or(Member::Missing),
        FormulaValue::Array(items) => {
            if segment == "length" {
                return Member::Found(Cow::Owned(FormulaValue::Number(items.len() as f64)));
            }
            segment
                .parse::<usize>()
                .ok()
                .filter(|_| !segment.starts_with('+'))
                .and_then(|index| items.get(index))
                .map(|v| Member::Found(Cow::Borrowed(v)))
                .unwrap_or(Member::Missing)
        }
        FormulaValue::Date(_) => Member::Missing,
        _ => Member::NotAnObject,
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl<K: Into<String>, V: Into<FormulaValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl From<IndexMap<String, FormulaValue>> for Record {
    fn from(fields: IndexMap<String, FormulaValue>) -> Self {
        Self { fields }
    }
}
