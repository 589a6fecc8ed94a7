//! Resources returned by cloud service APIs.

use std::{ffi::OsStr, fs, path::Path, str::FromStr};

use log::debug;
use serde::Serialize;
use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;

use crate::{Error, Map, Value};

/// The supported response body formats from which we can load resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SupportedFormat {
    Json,
    Yaml,
}

impl FromStr for SupportedFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Ok(match lower.as_ref() {
            "json" => Self::Json,
            "yaml" | "yml" => Self::Yaml,
            _ => return Err(Error::UnsupportedFileType(s.to_string())),
        })
    }
}

/// Parses a response body in the given format.
pub fn parse_body(fmt: SupportedFormat, content: &str) -> Result<Value, Error> {
    match fmt {
        SupportedFormat::Json => Ok(Value::from(serde_json::from_str::<JsonValue>(content)?)),
        SupportedFormat::Yaml => Value::try_from(serde_yaml::from_str::<YamlValue>(content)?),
    }
}

/// Reads and parses a response body from the given file, detecting its format
/// from the file extension.
pub fn load_body_from_file<P: AsRef<Path>>(path: P) -> Result<Value, Error> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(OsStr::to_str)
        .ok_or_else(|| Error::CannotDetermineFileType(path.to_path_buf()))?;
    let fmt = SupportedFormat::from_str(ext)
        .map_err(|e| Error::LoadFromFile(path.to_path_buf(), Box::new(e)))?;
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Io(format!("while trying to read from {}", path.display()), e))?;
    debug!("Read {} bytes from {}", content.len(), path.display());
    parse_body(fmt, &content).map_err(|e| Error::LoadFromFile(path.to_path_buf(), Box::new(e)))
}

/// A single resource (a volume, image, server, etc.) as a flat mapping of
/// attribute names to values.
///
/// Nested structures are kept as they are: "flat" means that the resource's
/// own attributes are the top-level keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resource(Map<String, Value>);

impl Resource {
    /// Flattens anything serializable into a resource.
    ///
    /// This is how typed API objects (with nested or optional fields) are
    /// turned into the generic mapping that the projector works with.
    pub fn from_serialize<T: Serialize>(item: &T) -> Result<Self, Error> {
        Self::try_from(Value::from(serde_json::to_value(item)?))
    }

    /// Parses a resource from a response body in the given format.
    pub fn load_as(fmt: SupportedFormat, content: &str) -> Result<Self, Error> {
        Self::try_from(parse_body(fmt, content)?)
    }

    /// Loads a resource from the given file. Automatically detects the file
    /// format and parses it accordingly.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Self::try_from(load_body_from_file(path)?)
    }

    /// Get the value of the attribute with the given name, if present.
    pub fn get<K: AsRef<str>>(&self, attr: K) -> Option<&Value> {
        self.0.get(attr.as_ref())
    }

    pub fn contains_key<K: AsRef<str>>(&self, attr: K) -> bool {
        self.0.contains_key(attr.as_ref())
    }


    /// All attribute names, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Value> for Resource {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Map(m) => Ok(Self(m)),
            other => Err(Error::NotAMapping(other.get_type())),
        }
    }
}

/// Selects a top-level key from a response body.
///
/// Cloud APIs tend to wrap the resource in an envelope named after its type,
/// e.g. `{"volume": {...}}`.
pub fn envelope(value: Value, key: &str) -> Result<Value, Error> {
    match value {
        Value::Map(mut m) => m
            .remove(key)
            .ok_or_else(|| Error::NoSuchKey(key.to_string())),
        other => Err(Error::NotAMapping(other.get_type())),
    }
}

/// Extracts a list of resources from a response body.
///
/// The body may be a bare array, an object wrapping exactly one array (e.g.
/// `{"servers": [...]}`), or an object from which `key` selects the array.
pub fn resources_from_value(value: Value, key: Option<&str>) -> Result<Vec<Resource>, Error> {
    let value = match key {
        Some(key) => envelope(value, key)?,
        None => unwrap_single_list(value),
    };
    match value {
        Value::Array(items) => items.into_iter().map(Resource::try_from).collect(),
        other => Err(Error::NotAList(other.get_type())),
    }
}

fn unwrap_single_list(value: Value) -> Value {
    match value {
        Value::Map(mut m) if m.len() == 1 && m.values().all(|v| v.as_array().is_some()) => {
            if let Some((key, inner)) = m.pop_first() {
                debug!("Unwrapping list of resources from envelope \"{}\"", key);
                return inner;
            }
            Value::Map(m)
        }
        other => other,
    }
}
