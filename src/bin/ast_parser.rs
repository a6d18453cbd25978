//! AST Parser CLI
//!
//! Command-line entry point for the query engine, for shells and other
//! non-SQL callers that want the same output `read_ast`/`parse_ast` would
//! produce inside a host database.

use ast_query_engine::node::ExtractionConfig;
use ast_query_engine::operators::{self, ReadAstOptions};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(
    name = "ast-parser",
    about = "Parallel multi-language AST ingestion and semantic-type query engine",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose diagnostic output on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one or more file patterns and print the flat node table as JSON
    Read {
        /// File paths, directories, or glob patterns
        paths: Vec<String>,

        /// Language override; auto-detected per file when omitted
        #[arg(short, long)]
        language: Option<String>,

        /// Skip unreadable/unparsable files instead of aborting
        #[arg(long)]
        ignore_errors: bool,

        /// "auto" | "smart" | "full" | "none" | "custom"
        #[arg(long, default_value = "auto")]
        peek_mode: String,

        /// Bytes per peek when peek-mode is "custom"
        #[arg(long, default_value_t = 120)]
        peek_size: i32,
    },

    /// Parse a single in-memory source string (stdin or --file)
    Parse {
        /// File to read source from; omit to read stdin
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Language; required since there's no extension to detect from
        #[arg(short, long)]
        language: String,
    },

    /// List every language with a full parsing adapter
    Languages,

    /// Print every taxonomy code and its canonical name
    SemanticTypes,
}

#[derive(Serialize)]
struct CliResponse<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T: Serialize> CliResponse<T> {
    fn ok(data: T) -> Self {
        CliResponse { success: true, data: Some(data), error: None }
    }

    fn err(message: impl Into<String>) -> Self {
        CliResponse { success: false, data: None, error: Some(message.into()) }
    }
}

fn print_json<T: Serialize>(response: CliResponse<T>) {
    match serde_json::to_string_pretty(&response) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("failed to serialize response: {e}"),
    }
}

fn read_stdin_to_string() -> io::Result<String> {
    let mut input = String::new();
    for line in io::stdin().lock().lines() {
        input.push_str(&line?);
        input.push('\n');
    }
    Ok(input)
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Read { paths, language, ignore_errors, peek_mode, peek_size } => {
            run_read(paths, language, ignore_errors, peek_mode, peek_size, cli.verbose)
        }
        Commands::Parse { file, language } => run_parse(file, language, cli.verbose),
        Commands::Languages => run_languages(),
        Commands::SemanticTypes => run_semantic_types(),
    };

    process::exit(exit_code);
}

fn run_read(
    paths: Vec<String>,
    language: Option<String>,
    ignore_errors: bool,
    peek_mode: String,
    peek_size: i32,
    verbose: bool,
) -> i32 {
    if verbose {
        eprintln!("reading {} pattern(s)", paths.len());
    }
    let options = ReadAstOptions {
        language,
        ignore_errors,
        peek_size,
        peek_mode,
        worker_count: None,
    };
    match operators::read_ast(&paths, options) {
        Ok((results, report)) => {
            if verbose {
                eprintln!(
                    "files_processed={} total_nodes={} errors={}",
                    report.files_processed.load(std::sync::atomic::Ordering::Relaxed),
                    report.total_nodes.load(std::sync::atomic::Ordering::Relaxed),
                    report.errors_encountered.load(std::sync::atomic::Ordering::Relaxed),
                );
            }
            print_json(CliResponse::ok(results));
            0
        }
        Err(e) => {
            print_json::<()>(CliResponse::err(e.to_string()));
            1
        }
    }
}

fn run_parse(file: Option<PathBuf>, language: String, verbose: bool) -> i32 {
    let source = match &file {
        Some(path) => std::fs::read_to_string(path),
        None => read_stdin_to_string(),
    };
    let source = match source {
        Ok(s) => s,
        Err(e) => {
            print_json::<()>(CliResponse::err(format!("failed to read source: {e}")));
            return 1;
        }
    };
    let virtual_path = file.as_deref().map(|p| p.to_string_lossy().to_string()).unwrap_or_else(|| "<stdin>".to_string());
    if verbose {
        eprintln!("parsing {virtual_path} as {language}");
    }
    match operators::parse_ast(&source, &language, &virtual_path, ExtractionConfig::default()) {
        Ok(result) => {
            print_json(CliResponse::ok(result));
            0
        }
        Err(e) => {
            print_json::<()>(CliResponse::err(e.to_string()));
            1
        }
    }
}

fn run_languages() -> i32 {
    let languages = operators::ast_supported_languages();
    print_json(CliResponse::ok(languages));
    0
}

fn run_semantic_types() -> i32 {
    let codes = operators::semantic_type_codes();
    print_json(CliResponse::ok(codes));
    0
}
