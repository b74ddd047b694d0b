use std::fs::File;
use std::io::{self, BufReader};
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context};
use clap::Parser;

use codescope_tools::config::{RunnerConfig, ROUGH_COMPLEXITY_ENV};
use codescope_tools::dispatch::Dispatcher;
use codescope_tools::logging::init_tracing;
use codescope_tools::protocol::{read_from, write_response, Response};

#[derive(Parser)]
#[command(name = "codescope-tools")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version)]
#[command(
    about = "Reads one JSON request, extracts import graphs or complexity, writes one JSON response",
    long_about = None
)]
struct Cli {
    /// Read the request from a file instead of stdin
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Report rough whole-file complexity instead of per-function scores
    #[arg(long, env = ROUGH_COMPLEXITY_ENV)]
    rough_complexity: bool,

    /// Pretty-print the response
    #[arg(long)]
    pretty: bool,

    /// Log at debug level to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (response, status) = match run(&cli) {
        Ok(response) => (response, ExitCode::SUCCESS),
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "request failed");
            (Response::failure(format!("{e:#}")), ExitCode::FAILURE)
        }
    };

    let stdout = io::stdout();
    if let Err(e) = write_response(&response, &mut stdout.lock(), cli.pretty) {
        eprintln!("Error: failed to write response: {e}");
        return ExitCode::FAILURE;
    }
    status
}

fn run(cli: &Cli) -> anyhow::Result<Response> {
    let config = RunnerConfig::from_current_dir()
        .context("Failed to determine working directory")?
        .with_rough_complexity(cli.rough_complexity);

    let raw = match &cli.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open request file {}", path.display()))?;
            read_from(BufReader::new(file))?
        }
        None => read_from(io::stdin().lock())?,
    };

    let dispatcher = Dispatcher::new(config);
    panic::catch_unwind(AssertUnwindSafe(|| dispatcher.handle(raw))).map_err(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        anyhow!("internal error: {message}")
    })
}
