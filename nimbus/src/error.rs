use std::path::PathBuf;

use thiserror::Error;

use crate::ValueType;

/// The primary error type that can be produced by Nimbus.
#[derive(Debug, Error)]
pub enum Error {
    #[error("a resource must be a mapping of attribute names to values, but got a value of type {0}")]
    NotAMapping(ValueType),
    #[error("object property names must be strings")]
    ObjectKeysMustBeStrings,
    #[error("expected a list of resources, but got a value of type {0}")]
    NotAList(ValueType),
    #[error("no such key in response body: \"{0}\"")]
    NoSuchKey(String),
    #[error("I/O error {0}: {1}")]
    Io(String, std::io::Error),
    #[error("failed to load resource from file {0}: {1}")]
    LoadFromFile(PathBuf, Box<Error>),
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),
    #[error("cannot determine file type of file: {0}")]
    CannotDetermineFileType(PathBuf),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("CSV error: {0}")]
    Csv(String),
    #[error("unsupported output format: {0}")]
    UnsupportedOutputFormat(String),
    #[error("the \"{0}\" format cannot be used to render a list of resources")]
    UnsupportedListFormat(String),
    #[error("no recognized column names in {0:?}")]
    NoRecognizedColumns(Vec<String>),
    #[error("cannot sort by unknown column \"{0}\"")]
    UnknownSortColumn(String),
    #[error("unknown resource kind: {0}")]
    UnknownResourceKind(String),
    #[error("unknown log level: {0}")]
    UnknownLogLevel(String),
    #[error("invalid column rename \"{0}\" (expected SOURCE=DISPLAY)")]
    InvalidRename(String),
}
