mod commands;

use std::{io::Write, path::PathBuf};

use clap::Parser;
use log::debug;
use nimbus::{log_level, Config, TimingSession, DEFAULT_VERBOSE_LEVEL};

use commands::{ListArgs, ShowArgs};

#[derive(Parser, Debug)]
#[clap(name = "nimbus", about, version)]
struct Args {
    /// Increase output logging verbosity (can be repeated).
    #[clap(short, long, global = true, parse(from_occurrences))]
    verbose: u64,

    /// Only log errors. Each `-v` given alongside raises the level again.
    #[clap(short, long, global = true)]
    quiet: bool,

    /// Show debugging output.
    #[clap(long, global = true)]
    debug: bool,

    /// Print how long each phase of the command took.
    #[clap(long, global = true)]
    timing: bool,

    /// Configuration file with display defaults.
    #[clap(long, global = true, env = "NIMBUS_CONFIG")]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

impl Args {
    fn verbose_level(&self) -> u64 {
        let base = if self.quiet { 0 } else { DEFAULT_VERBOSE_LEVEL };
        base + self.verbose
    }
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Show the details of a single resource.
    Show(ShowArgs),
    /// List resources.
    List(ListArgs),
}

fn main() {
    let args = Args::parse();
    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {:?}", e);
            std::process::exit(1);
        }
    };
    let level = match log_level(args.verbose_level(), args.debug, config.get_str("log_level")) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = simple_logger::init_with_level(level) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match run(args, &config, &mut out) {
        Ok(_) => debug!("Success!"),
        Err(e) => {
            log::error!("Failed: {:?}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: Args, config: &Config, out: &mut dyn Write) -> eyre::Result<()> {
    let mut timing = TimingSession::default();
    match &args.command {
        Command::Show(show) => commands::show(show, config, &mut timing, out)?,
        Command::List(list) => commands::list(list, config, &mut timing, out)?,
    }
    if args.timing {
        commands::print_timing(&timing, out)?;
    }
    Ok(())
}
