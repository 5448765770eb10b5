//! mysql2drizzle - convert a MySQL `CREATE TABLE` statement to a Drizzle
//! pg-core schema and PostgreSQL DDL.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mysql2drizzle::config::ConvertOptions;
use mysql2drizzle::{convert_with, try_convert_with, Conversion, Target};

/// Exit code for a statement without a usable column block under `--strict`.
const EXIT_PARSE_FAILURE: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "mysql2drizzle")]
#[command(author, version, about = "Convert MySQL CREATE TABLE to Drizzle pg-core and PostgreSQL DDL", long_about = None)]
struct Cli {
    /// Input file containing one CREATE TABLE statement (`-` or omitted reads stdin)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// What to print: both, drizzle or postgres
    #[arg(short, long, env = "MYSQL2DRIZZLE_TARGET", default_value = "both", value_parser = parse_target)]
    target: Target,

    /// Output format
    #[arg(long, default_value = "text", value_parser = parse_format)]
    format: Format,

    /// Fail with exit code 2 instead of printing placeholders for unparseable input
    #[arg(long)]
    strict: bool,

    /// Log pipeline decisions to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

fn parse_target(s: &str) -> Result<Target, String> {
    s.parse()
}

fn parse_format(s: &str) -> Result<Format, String> {
    match s.to_lowercase().as_str() {
        "text" => Ok(Format::Text),
        "json" => Ok(Format::Json),
        other => Err(format!("unknown format `{}` (expected text or json)", other)),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let sql = read_input(cli.input.as_ref())?;
    let options = ConvertOptions::default();
    tracing::debug!(output = %cli.target, bytes = sql.len(), "converting");

    let conversion = if cli.strict {
        match try_convert_with(&sql, &options) {
            Ok(conversion) => conversion,
            Err(err) => {
                eprintln!("Error: {}", err);
                return Ok(ExitCode::from(EXIT_PARSE_FAILURE));
            }
        }
    } else {
        convert_with(&sql, &options)
    };

    let rendered = render(&conversion, cli.target, cli.format)?;
    match &cli.output {
        Some(path) => fs::write(path, &rendered)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{}", rendered),
    }

    Ok(ExitCode::SUCCESS)
}

fn read_input(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn render(conversion: &Conversion, target: Target, format: Format) -> Result<String> {
    match format {
        Format::Text => Ok(conversion.render(target)),
        Format::Json => {
            let value = match target {
                Target::Both => serde_json::to_value(conversion)?,
                Target::Drizzle => serde_json::json!({
                    "table": conversion.table,
                    "drizzle": conversion.drizzle,
                    "diagnostics": conversion.diagnostics,
                }),
                Target::Postgres => serde_json::json!({
                    "table": conversion.table,
                    "postgres": conversion.postgres,
                    "diagnostics": conversion.diagnostics,
                }),
            };
            let mut json = serde_json::to_string_pretty(&value)?;
            json.push('\n');
            Ok(json)
        }
    }
}
