//! Rendering of projected resources in the various supported output formats.

use std::{cmp::Ordering, io::Write, str::FromStr};

use log::trace;
use prettytable::{format, Cell as TableCell, Row, Table};
use serde::{ser::SerializeMap, Serialize};

use crate::{Cell, Error, Value};

/// The output formats in which resources can be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
    Csv,
    /// Bare values, without column names.
    Value,
    /// `name="value"` lines, suitable for `eval` in a shell.
    Shell,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Table
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_ref() {
            "table" => Self::Table,
            "json" => Self::Json,
            "yaml" | "yml" => Self::Yaml,
            "csv" => Self::Csv,
            "value" => Self::Value,
            "shell" => Self::Shell,
            _ => return Err(Error::UnsupportedOutputFormat(s.to_string())),
        })
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Table => "table",
                Self::Json => "json",
                Self::Yaml => "yaml",
                Self::Csv => "csv",
                Self::Value => "value",
                Self::Shell => "shell",
            }
        )
    }
}

/// Parameters controlling how output is rendered.
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    pub format: OutputFormat,
    /// Only render these columns (in their original order). Renders all
    /// columns if empty.
    pub columns: Vec<String>,
    /// Render JSON on a single line.
    pub noindent: bool,
    /// Prefix for variable names in shell output.
    pub prefix: String,
    /// Sort lists by these columns (in priority order).
    pub sort_columns: Vec<String>,
    pub sort_descending: bool,
}

/// Renders a single resource.
pub fn render_one<W>(
    columns: &[String],
    cells: &[Cell],
    options: &FormatOptions,
    out: &mut W,
) -> Result<(), Error>
where
    W: Write + ?Sized,
{
    let selected = select_columns(columns, &options.columns)?;
    let columns = pick(columns, &selected);
    let cells = pick(cells, &selected);
    trace!("Rendering {} column(s) as {}", columns.len(), options.format);

    match options.format {
        OutputFormat::Table => {
            let mut table = new_table();
            table.set_titles(Row::new(vec![
                TableCell::new("Field"),
                TableCell::new("Value"),
            ]));
            for (column, cell) in columns.iter().zip(cells.iter()) {
                table.add_row(Row::new(vec![
                    TableCell::new(column),
                    TableCell::new(&cell.human()),
                ]));
            }
            table.print(out).map_err(io_error)?;
        }
        OutputFormat::Json => {
            write_json(&Record::new(&columns, &cells), options.noindent, out)?
        }
        OutputFormat::Yaml => write_yaml(&Record::new(&columns, &cells), out)?,
        OutputFormat::Csv => {
            let mut table = Table::new();
            table.add_row(text_row(columns.iter().map(|c| c.to_string())));
            table.add_row(text_row(cells.iter().map(|c| c.human())));
            write_csv(&table, out)?;
        }
        OutputFormat::Value => {
            for cell in cells.iter() {
                writeln!(out, "{}", cell.human()).map_err(io_error)?;
            }
        }
        OutputFormat::Shell => {
            for (column, cell) in columns.iter().zip(cells.iter()) {
                writeln!(
                    out,
                    "{}{}=\"{}\"",
                    options.prefix,
                    shell_name(column),
                    cell.human().replace('"', "\\\"")
                )
                .map_err(io_error)?;
            }
        }
    }
    Ok(())
}

/// Renders a list of resources, one row per resource.
pub fn render_list<W>(
    columns: &[String],
    mut rows: Vec<Vec<Cell>>,
    options: &FormatOptions,
    out: &mut W,
) -> Result<(), Error>
where
    W: Write + ?Sized,
{
    if options.format == OutputFormat::Shell {
        return Err(Error::UnsupportedListFormat(options.format.to_string()));
    }
    sort_rows(columns, &mut rows, &options.sort_columns, options.sort_descending)?;

    let selected = select_columns(columns, &options.columns)?;
    let columns = pick(columns, &selected);
    let rows = rows
        .iter()
        .map(|row| pick(row, &selected))
        .collect::<Vec<Vec<&Cell>>>();
    trace!(
        "Rendering {} row(s) of {} column(s) as {}",
        rows.len(),
        columns.len(),
        options.format
    );

    match options.format {
        OutputFormat::Table => {
            let mut table = new_table();
            table.set_titles(text_row(columns.iter().map(|c| c.to_string())));
            for row in rows.iter() {
                table.add_row(text_row(row.iter().map(|c| c.human())));
            }
            table.print(out).map_err(io_error)?;
        }
        OutputFormat::Json => {
            let records = rows
                .iter()
                .map(|row| Record::new(&columns, row))
                .collect::<Vec<Record>>();
            write_json(&records, options.noindent, out)?
        }
        OutputFormat::Yaml => {
            let records = rows
                .iter()
                .map(|row| Record::new(&columns, row))
                .collect::<Vec<Record>>();
            write_yaml(&records, out)?
        }
        OutputFormat::Csv => {
            let mut table = Table::new();
            table.add_row(text_row(columns.iter().map(|c| c.to_string())));
            for row in rows.iter() {
                table.add_row(text_row(row.iter().map(|c| c.human())));
            }
            write_csv(&table, out)?;
        }
        OutputFormat::Value => {
            for row in rows.iter() {
                let line = row
                    .iter()
                    .map(|c| c.human())
                    .collect::<Vec<String>>()
                    .join(" ");
                writeln!(out, "{}", line).map_err(io_error)?;
            }
        }
        OutputFormat::Shell => unreachable!("rejected above"),
    }
    Ok(())
}

/// Returns the indices of the columns to be rendered.
///
/// Requested columns that don't exist are ignored, unless none of them exist.
pub fn select_columns(columns: &[String], requested: &[String]) -> Result<Vec<usize>, Error> {
    if requested.is_empty() {
        return Ok((0..columns.len()).collect());
    }
    let selected = columns
        .iter()
        .enumerate()
        .filter(|(_, c)| requested.contains(c))
        .map(|(i, _)| i)
        .collect::<Vec<usize>>();
    if selected.is_empty() {
        return Err(Error::NoRecognizedColumns(requested.to_vec()));
    }
    Ok(selected)
}

fn sort_rows(
    columns: &[String],
    rows: &mut [Vec<Cell>],
    sort_columns: &[String],
    descending: bool,
) -> Result<(), Error> {
    let keys = sort_columns
        .iter()
        .map(|name| {
            columns
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| Error::UnknownSortColumn(name.clone()))
        })
        .collect::<Result<Vec<usize>, Error>>()?;
    if keys.is_empty() {
        return Ok(());
    }
    rows.sort_by(|a, b| {
        let ord = keys
            .iter()
            .map(|&i| Value::compare(a[i].machine(), b[i].machine()))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal);
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });
    Ok(())
}

fn pick<'a, T>(items: &'a [T], indices: &[usize]) -> Vec<&'a T> {
    indices.iter().filter_map(|&i| items.get(i)).collect()
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.set_format(
        format::FormatBuilder::new()
            .column_separator('|')
            .borders('|')
            .separators(
                &[
                    format::LinePosition::Top,
                    format::LinePosition::Title,
                    format::LinePosition::Bottom,
                ],
                format::LineSeparator::new('-', '+', '+', '+'),
            )
            .padding(1, 1)
            .build(),
    );
    table
}

fn text_row<I: Iterator<Item = String>>(cells: I) -> Row {
    Row::new(cells.map(|c| TableCell::new(&c)).collect())
}

// Variable names in shell output can't contain the characters that cloud
// APIs like to use in attribute names (e.g. "OS-EXT-AZ:availability_zone").
fn shell_name(column: &str) -> String {
    column.replace(&[':', '-', '.', ' '][..], "_")
}

fn write_json<T, W>(item: &T, noindent: bool, out: &mut W) -> Result<(), Error>
where
    T: Serialize + ?Sized,
    W: Write + ?Sized,
{
    let s = if noindent {
        serde_json::to_string(item)?
    } else {
        serde_json::to_string_pretty(item)?
    };
    writeln!(out, "{}", s).map_err(io_error)
}

fn write_yaml<T, W>(item: &T, out: &mut W) -> Result<(), Error>
where
    T: Serialize + ?Sized,
    W: Write + ?Sized,
{
    let s = serde_yaml::to_string(item)?;
    if s.ends_with('\n') {
        write!(out, "{}", s).map_err(io_error)
    } else {
        writeln!(out, "{}", s).map_err(io_error)
    }
}

fn write_csv<W: Write + ?Sized>(table: &Table, out: &mut W) -> Result<(), Error> {
    let mut writer = table.to_csv(out).map_err(|e| Error::Csv(e.to_string()))?;
    writer.flush().map_err(io_error)
}

fn io_error(e: std::io::Error) -> Error {
    Error::Io("while writing output".to_string(), e)
}

/// A single resource's selected columns, serialized as a mapping in column
/// order.
struct Record<'a> {
    columns: &'a [&'a String],
    cells: &'a [&'a Cell],
}

impl<'a> Record<'a> {
    fn new(columns: &'a [&'a String], cells: &'a [&'a Cell]) -> Self {
        Self { columns, cells }
    }
}

impl<'a> Serialize for Record<'a> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut sm = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, cell) in self.columns.iter().zip(self.cells.iter()) {
            sm.serialize_entry(column, cell.machine())?;
        }
        sm.end()
    }
}
