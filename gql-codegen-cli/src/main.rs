//! # gql-codegen
//!
//! Generate TypeScript types for every GraphQL codegen project in a tree.
//!
//! ## Usage
//!
//! ```bash
//! # Generate everything below the current directory
//! gql-codegen
//!
//! # Search a monorepo, skipping an extra directory name
//! gql-codegen ./packages --exclude dist
//!
//! # Preview without writing
//! gql-codegen --dry-run -v
//! ```

use clap::{ArgAction, Parser};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

use gql_codegen_cli::{
    config::DEFAULT_JS_RUNTIME, error::CliError, logging, run, RunOptions, RunSummary,
    WriteResult,
};

#[derive(Parser)]
#[command(name = "gql-codegen")]
#[command(author, version, about = "Generate TypeScript types from GraphQL schemas", long_about = None)]
struct Cli {
    /// Directory to search for codegen config files
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Preview outputs without writing files
    #[arg(long)]
    dry_run: bool,

    /// JavaScript runtime used to evaluate script configs
    #[arg(long, value_name = "PROGRAM", default_value = DEFAULT_JS_RUNTIME)]
    js_runtime: String,

    /// Additional directory name to skip (repeatable)
    #[arg(long, value_name = "DIR_NAME")]
    exclude: Vec<String>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let options = RunOptions {
        root: cli.root,
        dry_run: cli.dry_run,
        js_runtime: cli.js_runtime,
        exclude: cli.exclude,
    };

    match run(&options).await {
        Ok(summary) => {
            print_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            print_error(&e);
            ExitCode::FAILURE
        }
    }
}

/// Print what a run did.
fn print_summary(summary: &RunSummary) {
    println!(
        "{} Found {} project(s)",
        "✓".green(),
        summary.projects.to_string().green()
    );
    for error in &summary.load_errors {
        println!("  {} {}", "Skipped:".yellow(), error);
    }

    println!(
        "{} Loaded {} schema(s)",
        "✓".green(),
        summary.schemas.to_string().green()
    );

    for output in &summary.outputs {
        match output {
            WriteResult::Written { path, bytes } => {
                println!(
                    "{} Written {} bytes to {}",
                    "✓".green(),
                    bytes,
                    path.display()
                );
            }
            WriteResult::DryRun { path, bytes } => {
                println!(
                    "{} Would write {} bytes to {}",
                    "[dry-run]".yellow(),
                    bytes,
                    path.display()
                );
            }
        }
    }

    println!(
        "{}",
        format!("Done in {:.2?}", summary.elapsed).dimmed()
    );
}

/// Print an error with formatting.
fn print_error(error: &CliError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}
