//! `fg` command line.
//!
//! Usage:
//!   fg log [-n N] [-l LEVEL] [--since TS] [--until TS] [--file PATH] [--json]

use clap::{Parser, Subcommand};
use fg_logger::core::timestamp::TIMESTAMP_HINT;
use fg_logger::query::{LogQuery, QueryOutcome, DEFAULT_LIMIT};
use fg_logger::{LogConfig, LoggerError};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "fg", version, about = "fg application tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show application logs
    Log(LogArgs),
}

#[derive(clap::Args)]
struct LogArgs {
    /// Number of lines to show
    #[arg(short = 'n', long, default_value_t = DEFAULT_LIMIT)]
    lines: usize,

    /// Filter logs by level (DEBUG, INFO, WARN, ERROR); matches any level containing the text
    #[arg(short, long)]
    level: Option<String>,

    /// Show logs since (format: YYYY-MM-DD HH:MM:SS)
    #[arg(long, value_name = "TIMESTAMP")]
    since: Option<String>,

    /// Show logs until (format: YYYY-MM-DD HH:MM:SS)
    #[arg(long, value_name = "TIMESTAMP")]
    until: Option<String>,

    /// Log file to read instead of ~/.fg/logs/app.log
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Print one JSON object per entry
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        Command::Log(args) => cmd_log(args),
    }
}

fn cmd_log(args: LogArgs) -> ExitCode {
    let path = match args.file.clone() {
        Some(path) => path,
        None => match LogConfig::from_env() {
            Ok(config) => config.log_path,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    let mut query = LogQuery::new().limit(args.lines);
    if let Some(level) = args.level {
        query = query.level(level);
    }
    if let Some(since) = args.since {
        query = query.since(since);
    }
    if let Some(until) = args.until {
        query = query.until(until);
    }

    let outcome = match query.run(&path) {
        Ok(outcome) => outcome,
        Err(LoggerError::InvalidTimeBound { bound, .. }) => {
            eprintln!("Invalid {} time format. Use {}", bound, TIMESTAMP_HINT);
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("Error reading log file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let QueryOutcome::NoLogFile(path) = &outcome {
        println!("No log file found at {}", path.display());
        return ExitCode::SUCCESS;
    }

    match print_outcome(&outcome, args.json) {
        Ok(()) => ExitCode::SUCCESS,
        // Closed pipe (e.g. `fg log | head`) is not an error
        Err(LoggerError::IoError(e)) if e.kind() == io::ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_outcome(outcome: &QueryOutcome, json: bool) -> fg_logger::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if json {
        for record in outcome.records() {
            serde_json::to_writer(&mut out, &record)?;
            out.write_all(b"\n")?;
        }
    } else {
        for line in outcome.lines() {
            writeln!(out, "{}", line)?;
        }
    }
    out.flush()?;
    Ok(())
}
