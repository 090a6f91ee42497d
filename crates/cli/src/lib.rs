#![forbid(unsafe_code)]
#![deny(unused_must_use, dead_code, missing_debug_implementations)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

//! Command-line front end of sdkgen.

pub mod common;
pub mod graphql;
pub mod openapi;

use std::error::Error as _;
use std::time::Instant;

use clap::{CommandFactory, Parser, Subcommand};
use console::style;
use sdkgen_core::{Generated, SdkgenError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Environment variable selecting the log level or filter spec.
pub const LOG_ENV: &str = "SDKGEN_LOG";

/// Crates whose events a plain level applies to.
const LOG_TARGETS: [&str; 2] = ["sdkgen_core", "sdkgen_cli"];

#[derive(Parser, Debug)]
#[command(
    name = "sdkgen",
    version,
    about = "Generate a typed Go client from a GraphQL or OpenAPI schema"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a client from GraphQL SDL files
    Graphql(graphql::GraphqlArgs),
    /// Generate a client from a Swagger 2 YAML or JSON document
    Openapi(openapi::OpenapiArgs),
}

/// Parse `args` (program name first), run the command and return the exit code.
pub fn run(args: Vec<String>) -> i32 {
    match Cli::try_parse_from(args) {
        Ok(cli) => match cli.command {
            Some(Commands::Graphql(args)) => {
                init_tracing(args.common.verbose);
                graphql::run(&args)
            }
            Some(Commands::Openapi(args)) => {
                init_tracing(args.common.verbose);
                openapi::run(&args)
            }
            None => {
                let mut cmd = Cli::command();
                let _ = cmd.print_help();
                println!();
                0
            }
        },
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

/// Print the outcome of a run and map it to an exit code.
pub(crate) fn report(result: Result<Generated, SdkgenError>, started: Instant) -> i32 {
    match result {
        Ok(generated) => {
            let unresolved = generated.report.unresolved_pointers().len();
            let unclassified = generated.report.unclassified_refs.len();
            let dropped = generated.report.dropped_operations.len();
            if unresolved > 0 {
                eprintln!(
                    "{} {unresolved} unresolved schema reference(s) rendered as interface{{}}",
                    style("WARN").yellow().bold()
                );
            }
            if unclassified > 0 {
                eprintln!(
                    "{} {unclassified} reference(s) to operation roots or bodiless responses rendered as interface{{}}",
                    style("WARN").yellow().bold()
                );
            }
            if dropped > 0 {
                eprintln!(
                    "{} {dropped} untagged operation(s) left out of the client",
                    style("WARN").yellow().bold()
                );
            }
            println!(
                "{} {} in {:.2}s",
                style("COMPLETED").green().bold(),
                generated.path.display(),
                started.elapsed().as_secs_f64()
            );
            0
        }
        Err(err) => {
            eprintln!("{} {err}", style("ERROR").red().bold());
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            1
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };

    // SDKGEN_LOG is either a plain level ("trace" ... "error") applied to
    // the sdkgen crates, or a full tracing filter spec.
    let filter = match std::env::var(LOG_ENV) {
        Ok(level) if is_plain_level(&level) => crate_filter(&level),
        Ok(spec) => spec,
        Err(_) => crate_filter(default_level),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn crate_filter(level: &str) -> String {
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}
