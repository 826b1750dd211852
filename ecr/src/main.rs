//! ECR - Error Code Resolver
//!
//! Resolves the canonical error code of a failed service response from its
//! headers and JSON body.
//!
//! Exit status: 0 code resolved, 1 no code determinable, 2 ambiguous
//! error-code headers, 3 unreadable or malformed input.

#![forbid(unsafe_code)]

mod commands;
mod input;

use clap::{Parser, Subcommand};
use commands::{EXIT_INPUT_ERROR, OutputFormat, ResolveArgs};
use ecr_common::{LogConfig, init_logging};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "ecr")]
#[command(author, version, about = "Resolve the canonical error code of a service response")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the error code of a response
    Resolve {
        /// File with one `Name: value` header per line
        #[arg(long, value_name = "FILE")]
        headers: Option<PathBuf>,

        /// Extra header, e.g. ':error-code: ThrottlingException' (repeatable)
        #[arg(short = 'H', long = "header", value_name = "NAME: VALUE")]
        header: Vec<String>,

        /// JSON body file, or '-' for stdin
        #[arg(short, long, value_name = "FILE")]
        body: Option<String>,

        /// Body field holding the error code [default: __type]
        #[arg(long, value_name = "NAME")]
        field_name: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show the recognized headers and the effective body field
    Headers {
        /// Body field holding the error code
        #[arg(long, value_name = "NAME")]
        field_name: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the result
    let mut log_config = LogConfig::from_env("warn").with_stderr();
    if cli.verbose {
        log_config = log_config.with_level("debug");
    }
    let _logging_guards = match init_logging(&log_config) {
        Ok(guards) => Some(guards),
        Err(e) => {
            eprintln!("warning: logging disabled: {e}");
            None
        }
    };

    match cli.command {
        Commands::Resolve {
            headers,
            header,
            body,
            field_name,
            format,
        } => {
            let args = ResolveArgs {
                headers_file: headers,
                header_flags: header,
                body,
                field_name,
                format,
            };
            match commands::resolve(args) {
                Ok(outcome) => outcome.exit_code(),
                Err(err) => {
                    eprintln!("error: {err:#}");
                    ExitCode::from(EXIT_INPUT_ERROR)
                }
            }
        }
        Commands::Headers { field_name } => {
            commands::headers(field_name);
            ExitCode::SUCCESS
        }
    }
}
