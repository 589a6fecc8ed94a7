//! Generic attribute lookup and value formatting.

use std::collections::HashMap;

use serde::Serialize;

use crate::{Resource, Value};

/// Changes how a value is presented in human-readable output formats.
///
/// Machine-readable formats (JSON, YAML) always get the raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Formatter {
    /// `["a", "b"]` is rendered as `a, b`.
    List,
    /// `{"b": 2, "a": "x"}` is rendered as `a='x', b='2'`.
    Dict,
    /// A list of mappings, each rendered as per [`Formatter::Dict`] on its own
    /// line.
    ListOfDicts,
    /// Compact JSON.
    Json,
}

impl Formatter {
    pub fn format(&self, value: &Value) -> String {
        match self {
            Self::List => format_list(value),
            Self::Dict => format_dict(value),
            Self::ListOfDicts => match value {
                Value::Array(items) => items
                    .iter()
                    .map(format_dict)
                    .collect::<Vec<String>>()
                    .join("\n"),
                _ => format_dict(value),
            },
            Self::Json => value.to_json_string(),
        }
    }
}

fn format_list(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<String>>()
            .join(", "),
        _ => value.to_string(),
    }
}

fn format_dict(value: &Value) -> String {
    match value {
        // Map keys are already sorted.
        Value::Map(m) => m
            .iter()
            .map(|(k, v)| format!("{}='{}'", k, v))
            .collect::<Vec<String>>()
            .join(", "),
        _ => value.to_string(),
    }
}

/// Formatters keyed by attribute name.
pub type Formatters = HashMap<String, Formatter>;

/// A single value to be rendered, along with its (optional) formatter.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    value: Value,
    formatter: Option<Formatter>,
}

impl Cell {
    pub fn new(value: Value, formatter: Option<Formatter>) -> Self {
        Self { value, formatter }
    }

    /// The rendering for tables and other human-oriented formats.
    pub fn human(&self) -> String {
        match self.formatter {
            Some(f) if !self.value.is_null() => f.format(&self.value),
            _ => self.value.to_string(),
        }
    }

    /// The raw value, for structured formats.
    pub fn machine(&self) -> &Value {
        &self.value
    }
}

impl From<Value> for Cell {
    fn from(value: Value) -> Self {
        Self::new(value, None)
    }
}

impl Serialize for Cell {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.value.serialize(serializer)
    }
}

/// Looks up each of the given attributes in the resource.
///
/// Attributes that the resource doesn't have produce a null value (rendered as
/// an empty string): responses for the same kind of resource vary across API
/// versions and server implementations.
pub fn get_item_properties<A>(resource: &Resource, attrs: &[A], formatters: &Formatters) -> Vec<Cell>
where
    A: AsRef<str>,
{
    attrs
        .iter()
        .map(|attr| {
            let attr = attr.as_ref();
            let value = resource.get(attr).cloned().unwrap_or_default();
            Cell::new(value, formatters.get(attr).copied())
        })
        .collect()
}
