//! Nimbus is the display layer of a command line client for cloud
//! infrastructure services.
//!
//! Given a resource returned by a REST API (a server, network, image, volume,
//! etc.), it works out which columns to show and under which names, looks up
//! their values and renders them as a table or in a structured format.
//!
//! This crate provides an API that allows for embedding Nimbus into another
//! application. For Nimbus's command line interface, see the `nimbus-cli`
//! crate.

mod catalog;
mod columns;
mod config;
mod error;
mod logging;
mod output;
mod properties;
mod resource;
mod timing;
mod value;

pub use catalog::{ColumnPolicy, ListColumn, ResourceKind};
pub use columns::{project, project_keys, ColumnMap, HiddenColumns, Projection};
pub use config::Config;
pub use error::Error;
pub use logging::{log_level, log_level_from_name, log_level_from_verbosity, DEFAULT_VERBOSE_LEVEL};
pub use output::{render_list, render_one, select_columns, FormatOptions, OutputFormat};
pub use properties::{get_item_properties, Cell, Formatter, Formatters};
pub use resource::{
    envelope, load_body_from_file, parse_body, resources_from_value, Resource, SupportedFormat,
};
pub use timing::TimingSession;
pub use value::{Map, Value, ValueType};
