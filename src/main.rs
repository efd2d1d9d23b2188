use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use scfilter_tools::session::Session;
use scfilter_tools::{FilterError, Result};

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| FilterError::Logging(error.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Buses(args) => execute_buses(args),
        Command::Filter(args) => execute_filter(args),
    }
}

fn execute_buses(args: BusesArgs) -> Result<()> {
    let mut session = Session::new();
    session.load_files(args.input)?;
    for name in session.bus_names() {
        println!("{name}");
    }
    Ok(())
}

fn execute_filter(args: FilterArgs) -> Result<()> {
    let mut session = Session::new();
    session.load_files(args.input)?;
    session.compute(&args.keys, &args.aliases)?;

    if args.json || args.output.is_none() {
        let json = serde_json::to_string_pretty(session.results())?;
        println!("{json}");
    }

    if let Some(output) = args.output {
        let buffer = session.export()?;
        fs::write(&output, buffer)?;
    }

    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Filter short-circuit fault reports into per-file summary tables."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the bus names found across the given reports.
    Buses(BusesArgs),
    /// Filter the reports and emit the summary tables.
    Filter(FilterArgs),
}

#[derive(clap::Args)]
struct BusesArgs {
    /// Report CSV files (GBK encoded).
    #[arg(long, required = true, num_args = 1..)]
    input: Vec<PathBuf>,
}

#[derive(clap::Args)]
struct FilterArgs {
    /// Report CSV files (GBK encoded), processed in the given order.
    #[arg(long, required = true, num_args = 1..)]
    input: Vec<PathBuf>,

    /// Bus-name match keys, comma separated (ASCII or fullwidth commas).
    #[arg(long)]
    keys: String,

    /// Display aliases, comma separated, positionally paired with the keys.
    #[arg(long)]
    aliases: String,

    /// Write the summary tables to this xlsx workbook, one sheet per file.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print the result tables as JSON to stdout. Implied when no output
    /// file is given.
    #[arg(long)]
    json: bool,
}
