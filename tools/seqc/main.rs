use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use seqc::{CompileOptions, analyze, compile, ingest, project};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Compile motion-step project files into linear sequences.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log pipeline events (equivalent to RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a project file into sequence JSON
    Compile {
        /// Path to the project JSON file
        project: PathBuf,
        /// Sequence name written to the output
        #[arg(short, long)]
        name: Option<String>,
        /// Write the sequence here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the diagnostic report for a project file
    Check {
        /// Path to the project JSON file
        project: PathBuf,
    },
    /// Canonicalize a generated response into sequence JSON
    Ingest {
        /// Path to the response text
        response: PathBuf,
        /// Name used when the response carries none
        #[arg(short, long)]
        name: Option<String>,
        /// Write the sequence here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Compile {
            project,
            name,
            output,
        } => {
            let graph = project::restore(&read(&project)?)?;
            let sequence = compile(&graph, &options(name))?;
            emit(&sequence.to_json_pretty()?, output.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { project } => {
            let graph = project::restore(&read(&project)?)?;
            let report = analyze(&graph)?;
            print!("{}", report);
            if report.passed() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Command::Ingest {
            response,
            name,
            output,
        } => {
            let sequence = ingest::ingest_sequence(&read(&response)?, &options(name))?;
            emit(&sequence.to_json_pretty()?, output.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn options(name: Option<String>) -> CompileOptions {
    match name {
        Some(name) => CompileOptions::named(name),
        None => CompileOptions::default(),
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))
}

fn emit(json: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, format!("{}\n", json))
                .with_context(|| format!("failed to write '{}'", path.display()))?;
            info!(path = %path.display(), "sequence written");
        }
        None => println!("{}", json),
    }
    Ok(())
}
