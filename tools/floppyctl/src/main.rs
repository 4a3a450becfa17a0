mod config;
mod env_utils;
mod listing;
mod logging;
mod port_detect;
mod session;
mod workflows;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use logging::Logger;
use session::FloppySession;

#[derive(Debug, Parser)]
#[command(name = "floppyctl")]
#[command(about = "Host client for the floppy listing console")]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
struct ConnectionArgs {
    /// Serial device; autodetected when omitted.
    #[arg(long, global = true)]
    port: Option<String>,
    #[arg(long, global = true)]
    baud: Option<u32>,
    #[arg(long = "timeout-ms", global = true)]
    timeout_ms: Option<u64>,
    /// TOML settings file (default: ./floppyctl.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print one directory as the console renders it.
    Dir(PathArgs),
    /// Print a directory tree with used/free totals.
    Fulldir(PathArgs),
    /// Print size, modification time and attributes of one entry.
    Status(StatusArgs),
    /// Parsed listing as a table or JSON.
    Ls(LsArgs),
    /// Used/free/total bytes as JSON.
    VolumeInfo,
    /// List serial port candidates.
    Ports,
}

#[derive(Debug, Args)]
struct PathArgs {
    path: Option<String>,
}

#[derive(Debug, Args)]
struct StatusArgs {
    path: String,
}

#[derive(Debug, Args)]
struct LsArgs {
    path: Option<String>,
    #[arg(long)]
    json: bool,
    #[arg(long)]
    full: bool,
}

fn open_session(
    args: &ConnectionArgs,
    logger: &mut Logger,
) -> Result<FloppySession<Box<dyn serialport::SerialPort>>> {
    let file = config::load_file_config(args.config.as_deref())?;
    let overrides = config::Overrides {
        port: args.port.clone(),
        baud: args.baud,
        timeout_ms: args.timeout_ms,
    };
    let resolved = config::resolve(file, overrides, &env_utils::process_env)?;
    let port = env_utils::require_port(resolved.port, &env_utils::process_env)?;
    logger.notice(format!(
        "connecting {port} @ {} (timeout {:?})",
        resolved.baud, resolved.timeout
    ));
    FloppySession::open(&port, resolved.baud, resolved.timeout)
}

fn print_lines(logger: &mut Logger, lines: &[String]) {
    for line in lines {
        logger.output(line);
    }
}

impl Commands {
    fn device_command(&self) -> Option<String> {
        match self {
            Commands::Dir(args) => Some(workflows::build_command("dir", args.path.as_deref())),
            Commands::Fulldir(args) => {
                Some(workflows::build_command("fulldir", args.path.as_deref()))
            }
            Commands::Status(args) => Some(workflows::build_command("status", Some(&args.path))),
            Commands::Ls(args) => {
                let verb = if args.full { "fulldir" } else { "dir" };
                Some(workflows::build_command(verb, args.path.as_deref()))
            }
            Commands::VolumeInfo => Some(workflows::build_command("fulldir", None)),
            Commands::Ports => None,
        }
    }
}

fn run(cli: Cli, logger: &mut Logger) -> Result<()> {
    if let Some(command) = cli.command.device_command() {
        logger.begin_command(&command);
    }
    let connection = &cli.connection;
    match cli.command {
        Commands::Dir(args) => {
            let mut session = open_session(connection, logger)?;
            let lines = workflows::run_listing(&mut session, false, args.path.as_deref())?;
            print_lines(logger, &lines);
        }
        Commands::Fulldir(args) => {
            let mut session = open_session(connection, logger)?;
            let lines = workflows::run_listing(&mut session, true, args.path.as_deref())?;
            print_lines(logger, &lines);
        }
        Commands::Status(args) => {
            let mut session = open_session(connection, logger)?;
            let report = workflows::run_status(&mut session, &args.path)?;
            logger.output(format!("Size: {}", report.size));
            logger.output(format!("Last modified: {}", report.modified));
            logger.output(format!("Attributes: {}", report.attributes.join(" ")));
        }
        Commands::Ls(args) => {
            let mut session = open_session(connection, logger)?;
            let listing = workflows::run_ls(&mut session, args.full, args.path.as_deref())?;
            if args.json {
                logger.output(serde_json::to_string_pretty(&listing)?);
            } else {
                logger.output(workflows::format_table(&listing).trim_end());
            }
        }
        Commands::VolumeInfo => {
            let mut session = open_session(connection, logger)?;
            let info = workflows::run_volume_info(&mut session)?;
            logger.output(serde_json::to_string_pretty(&info)?);
        }
        Commands::Ports => {
            let candidates = port_detect::list_candidates();
            if candidates.is_empty() {
                logger.notice("no serial port candidates found");
            }
            for candidate in candidates {
                logger.output(candidate);
            }
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let mut logger = match Logger::from_env() {
        Ok(logger) => logger,
        Err(err) => {
            eprintln!("error: {err:?}");
            std::process::exit(1);
        }
    };
    if let Err(err) = run(cli, &mut logger) {
        logger.failure(&err);
        std::process::exit(1);
    }
}
