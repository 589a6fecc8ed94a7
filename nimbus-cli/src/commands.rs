//! The `show` and `list` commands.

use std::{
    collections::BTreeSet,
    ffi::OsStr,
    fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

use eyre::{Result, WrapErr};
use log::{debug, info};
use nimbus::{
    envelope, get_item_properties, load_body_from_file, parse_body, project_keys, render_list,
    render_one, resources_from_value, Cell, Config, Error, FormatOptions, OutputFormat, Resource,
    ResourceKind, SupportedFormat, TimingSession, Value,
};

/// Where to read the API response body from.
#[derive(clap::Args, Debug)]
pub struct InputArgs {
    /// Kind of resource (generic, server, network, image, volume).
    #[clap(default_value = "generic")]
    kind: ResourceKind,

    /// File containing the response body, or "-" for stdin.
    #[clap(short = 'i', long, default_value = "-")]
    file: PathBuf,

    /// Format of the response body, if it can't be inferred from the file
    /// name (json or yaml).
    #[clap(long, default_value = "json")]
    input_format: SupportedFormat,

    /// Top-level key the response body wraps the resource(s) in.
    #[clap(long)]
    key: Option<String>,
}

/// How to render the output.
#[derive(clap::Args, Debug)]
pub struct OutputArgs {
    /// Output format (table, json, yaml, csv, value, shell).
    #[clap(short = 'f', long)]
    format: Option<OutputFormat>,

    /// Only show the given column (can be repeated).
    #[clap(short = 'c', long = "column")]
    columns: Vec<String>,

    /// Render JSON on a single line.
    #[clap(long)]
    noindent: bool,

    /// Prefix for variable names in shell output.
    #[clap(long)]
    prefix: Option<String>,

    /// Sort by the given column (can be repeated).
    #[clap(long = "sort-column")]
    sort_columns: Vec<String>,

    /// Sort in descending order.
    #[clap(long)]
    sort_descending: bool,
}

impl OutputArgs {
    /// Builds the format options, falling back to configured defaults.
    fn options(&self, config: &Config) -> Result<FormatOptions> {
        let format = match self.format {
            Some(f) => f,
            None => config
                .get_str("format")
                .map(OutputFormat::from_str)
                .transpose()?
                .unwrap_or_default(),
        };
        Ok(FormatOptions {
            format,
            columns: self.columns.clone(),
            noindent: self.noindent || config.get_bool("noindent").unwrap_or(false),
            prefix: self
                .prefix
                .clone()
                .or_else(|| config.get_str("prefix").map(ToString::to_string))
                .unwrap_or_default(),
            sort_columns: self.sort_columns.clone(),
            sort_descending: self.sort_descending,
        })
    }
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    #[clap(flatten)]
    input: InputArgs,

    /// Show attribute SOURCE under the name DISPLAY (can be repeated).
    #[clap(long, value_name = "SOURCE=DISPLAY")]
    rename: Vec<String>,

    /// Hide the given attribute (can be repeated).
    #[clap(long)]
    hide: Vec<String>,

    #[clap(flatten)]
    output: OutputArgs,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    #[clap(flatten)]
    input: InputArgs,

    /// Show additional columns.
    #[clap(long)]
    long: bool,

    /// Show every attribute of the listed resources.
    #[clap(long)]
    all_columns: bool,

    #[clap(flatten)]
    output: OutputArgs,
}

/// Renders a single resource.
pub fn show(
    args: &ShowArgs,
    config: &Config,
    timing: &mut TimingSession,
    out: &mut dyn Write,
) -> Result<()> {
    let body = timing.time("load", || read_body(&args.input))?;
    let body = match &args.input.key {
        Some(key) => envelope(body, key)?,
        None => body,
    };
    let resource = Resource::try_from(body)?;

    let mut policy = args.input.kind.policy();
    for rename in args.rename.iter() {
        let (source_attr, display_name) = parse_rename(rename)?;
        policy = policy.rename(source_attr, display_name);
    }
    for attr in args.hide.iter() {
        policy = policy.hide(attr);
    }

    let projection = timing.time("project", || policy.project(&resource));
    debug!(
        "Projected {} attribute(s) of {} onto {} column(s)",
        resource.len(),
        args.input.kind,
        projection.len()
    );
    let cells = get_item_properties(&resource, &projection.attr_columns, &policy.formatters);
    let options = args.output.options(config)?;
    timing.time("render", || {
        render_one(&projection.display_columns, &cells, &options, out)
    })?;
    Ok(())
}

/// Renders a list of resources.
pub fn list(
    args: &ListArgs,
    config: &Config,
    timing: &mut TimingSession,
    out: &mut dyn Write,
) -> Result<()> {
    let body = timing.time("load", || read_body(&args.input))?;
    let resources = resources_from_value(body, args.input.key.as_deref())?;
    info!("Loaded {} {} resource(s)", resources.len(), args.input.kind);

    let policy = args.input.kind.policy();
    let list_columns = policy.list_columns(args.long);
    let (headers, attrs) = if args.all_columns || list_columns.is_empty() {
        let keys = resources
            .iter()
            .flat_map(Resource::keys)
            .collect::<BTreeSet<&String>>();
        let projection = timing.time("project", || {
            project_keys(keys, &policy.column_map, &policy.hidden_columns)
        });
        (projection.display_columns, projection.attr_columns)
    } else {
        (
            list_columns.iter().map(|c| c.header.to_string()).collect(),
            list_columns.iter().map(|c| c.attr.to_string()).collect::<Vec<String>>(),
        )
    };

    let rows = resources
        .iter()
        .map(|r| get_item_properties(r, &attrs, &policy.formatters))
        .collect::<Vec<Vec<Cell>>>();
    let options = args.output.options(config)?;
    timing.time("render", || render_list(&headers, rows, &options, out))?;
    Ok(())
}

/// Renders the timing session as a table.
pub fn print_timing(timing: &TimingSession, out: &mut dyn Write) -> Result<()> {
    let mut rows = timing
        .entries()
        .iter()
        .map(|(label, elapsed)| {
            vec![
                Cell::from(Value::from(label.as_str())),
                seconds(elapsed.as_secs_f64()),
            ]
        })
        .collect::<Vec<Vec<Cell>>>();
    rows.push(vec![
        Cell::from(Value::from("Total")),
        seconds(timing.total().as_secs_f64()),
    ]);
    render_list(
        &["Phase".to_string(), "Seconds".to_string()],
        rows,
        &FormatOptions::default(),
        out,
    )?;
    Ok(())
}

fn seconds(secs: f64) -> Cell {
    Cell::from(Value::from(format!("{:.3}", secs)))
}

fn parse_rename(s: &str) -> Result<(&str, &str), Error> {
    match s.split_once('=') {
        Some((source, display)) if !source.is_empty() && !display.is_empty() => {
            Ok((source, display))
        }
        _ => Err(Error::InvalidRename(s.to_string())),
    }
}

fn read_body(input: &InputArgs) -> Result<Value> {
    read_body_from(input, io::stdin())
}

/// Reads the response body from the file named in `input`, or from `stdin`
/// if that's "-".
fn read_body_from<R: Read>(input: &InputArgs, mut stdin: R) -> Result<Value> {
    if input.file == Path::new("-") {
        let mut content = String::new();
        stdin
            .read_to_string(&mut content)
            .wrap_err("failed to read response body from stdin")?;
        return Ok(parse_body(input.input_format, &content)?);
    }
    let known_extension = input
        .file
        .extension()
        .and_then(OsStr::to_str)
        .map(|ext| SupportedFormat::from_str(ext).is_ok())
        .unwrap_or(false);
    if known_extension {
        return Ok(load_body_from_file(&input.file)?);
    }
    debug!(
        "Reading {} as {:?}",
        input.file.display(),
        input.input_format
    );
    let content = fs::read_to_string(&input.file)
        .wrap_err_with(|| format!("failed to read response body from {}", input.file.display()))?;
    Ok(parse_body(input.input_format, &content)?)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn renames() {
        assert_eq!(parse_rename("tenant_id=project_id").unwrap(), ("tenant_id", "project_id"));
        assert_eq!(parse_rename("a=b=c").unwrap(), ("a", "b=c"));
        assert!(matches!(parse_rename("tenant_id"), Err(Error::InvalidRename(_))));
        assert!(matches!(parse_rename("=x"), Err(Error::InvalidRename(_))));
    }

    #[test]
    fn output_options_fall_back_to_config() {
        let args = OutputArgs {
            format: None,
            columns: vec![],
            noindent: false,
            prefix: None,
            sort_columns: vec![],
            sort_descending: false,
        };
        let config = Config::default()
            .with("format", "json")
            .unwrap()
            .with("noindent", true)
            .unwrap()
            .with("prefix", "os_")
            .unwrap();
        let options = args.options(&config).unwrap();
        assert_eq!(options.format, OutputFormat::Json);
        assert!(options.noindent);
        assert_eq!(options.prefix, "os_");

        let options = args.options(&Config::default()).unwrap();
        assert_eq!(options.format, OutputFormat::Table);

        let bad = Config::default().with("format", "xml").unwrap();
        assert!(args.options(&bad).is_err());
    }

    fn stdin_input(format: SupportedFormat) -> InputArgs {
        InputArgs {
            kind: ResourceKind::Volume,
            file: PathBuf::from("-"),
            input_format: format,
            key: None,
        }
    }

    #[test]
    fn reads_stdin_in_the_given_format() {
        let yaml = "volumes:\n- {id: v1, size: 10}\n- {id: v2, size: .nan}\n";
        let body = read_body_from(&stdin_input(SupportedFormat::Yaml), yaml.as_bytes()).unwrap();
        let volumes = resources_from_value(body, None).unwrap();
        assert_eq!(volumes.len(), 2);
        assert_eq!(volumes[0].get("size"), Some(&Value::Unsigned(10)));

        assert!(read_body_from(&stdin_input(SupportedFormat::Json), yaml.as_bytes()).is_err());
    }

    #[test]
    fn list_sorts_mixed_values() {
        let input = stdin_input(SupportedFormat::Yaml);
        let yaml = "- {id: a, size: \"9\"}\n- {id: b, size: .nan}\n- {id: c, size: 10}\n\
                    - {id: d}\n- {id: e, size: 2.5}\n- {id: f, size: \"10\"}\n";
        let body = read_body_from(&input, yaml.as_bytes()).unwrap();
        let resources = resources_from_value(body, None).unwrap();
        let rows = resources
            .iter()
            .map(|r| get_item_properties(r, &["id", "size"], &Default::default()))
            .collect::<Vec<Vec<Cell>>>();
        let mut out = Vec::new();
        render_list(
            &["ID".to_string(), "Size".to_string()],
            rows,
            &FormatOptions {
                format: OutputFormat::Value,
                columns: vec!["ID".to_string()],
                sort_columns: vec!["Size".to_string()],
                ..Default::default()
            },
            &mut out,
        )
        .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "d\ne\nc\nb\nf\na\n");
    }

    #[test]
    fn timing_table() {
        let mut timing = TimingSession::default();
        timing.record("load", std::time::Duration::from_millis(1500));
        let mut out = Vec::new();
        print_timing(&timing, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("| load "));
        assert!(out.contains("| 1.500 "));
        assert!(out.contains("| Total "));
    }
}
