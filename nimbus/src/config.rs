//! Configuration-related functionality for Nimbus.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use eyre::{Result, WrapErr};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::load_body_from_file;

/// Display defaults, loaded from a YAML or JSON file.
///
/// Recognized keys are `format`, `noindent`, `prefix` and `log_level`. Values
/// given explicitly on the command line take precedence.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Config(HashMap<String, Value>);

impl Config {
    /// Loads the configuration from the given file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let body = load_body_from_file(path)
            .wrap_err_with(|| format!("failed to load configuration from {}", path.display()))?;
        match Value::from(body) {
            Value::Object(m) => {
                debug!("Loaded configuration from {}", path.display());
                Ok(Self(m.into_iter().collect()))
            }
            _ => Err(eyre::eyre!(
                "configuration file {} must contain a mapping",
                path.display()
            )),
        }
    }

    /// Loads the configuration from the given file if there is one, otherwise
    /// from the default location if a file exists there. Falls back to an
    /// empty configuration.
    pub fn load(maybe_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = maybe_path {
            return Self::load_from_file(path);
        }
        match default_path() {
            Some(default) if default.is_file() => Self::load_from_file(default),
            Some(default) => {
                debug!(
                    "No such configuration file, skipping configuration file loading: {}",
                    default.display()
                );
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Convenience method for constructing a configuration object.
    pub fn with<K, V>(mut self, key: K, value: V) -> Result<Self>
    where
        K: AsRef<str>,
        V: Serialize,
    {
        let _ = self.set(key, value)?;
        Ok(self)
    }

    /// Returns whether or not the configuration contains a value associated
    /// with the given key.
    pub fn contains_key<K: AsRef<str>>(&self, key: K) -> bool {
        self.0.contains_key(key.as_ref())
    }

    /// Set the value associated with the given key.
    pub fn set<K, V>(&mut self, key: K, value: V) -> Result<Option<Value>>
    where
        K: AsRef<str>,
        V: Serialize,
    {
        let value = serde_json::to_value(value)?;
        let key = key.as_ref().to_string();
        let maybe_prev = self.0.insert(key, value);
        Ok(maybe_prev)
    }

    /// Get a reference to the value associated with the given key.
    pub fn get<K: AsRef<str>>(&self, key: K) -> Option<&Value> {
        self.0.get(key.as_ref())
    }

    pub fn get_str<K: AsRef<str>>(&self, key: K) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_bool<K: AsRef<str>>(&self, key: K) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }
}

/// `$HOME/.config/nimbus/config.yaml`, if we know where home is.
pub fn default_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("nimbus")
            .join("config.yaml")
    })
}
