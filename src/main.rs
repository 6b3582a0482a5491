// src/main.rs — rubric entry point

use clap::Parser;

use rubric::cli::{evaluate, export, patterns, Cli, Commands};
use rubric::infra::config::Config;
use rubric::infra::logger;
use rubric::memory::schema;
use rubric::memory::store::Store;

fn main() {
    // Initialize logging (respects RUST_LOG)
    logger::init_logging("warn");

    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load config (falls back to defaults if no config.toml)
    let config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };

    let store = init_store();

    match &cli.command {
        Some(Commands::Patterns { model, save, json }) => {
            return patterns::run_patterns(model, *save, *json, &config, store.as_ref());
        }
        Some(Commands::Export {
            model,
            format,
            output,
        }) => {
            return export::run_export(model, format, output.as_deref(), store.as_ref());
        }
        None => {}
    }

    // Default: evaluate a response
    let text = build_response_input(&cli)?;
    let args = evaluate::EvaluateArgs {
        text: &text,
        model: &cli.model,
        reasoning: cli.reasoning.as_deref(),
        category: cli.category.as_deref(),
        test_path: cli.test.as_deref(),
        json: cli.json,
        save: cli.save,
        domain: cli.domain.as_deref(),
    };
    evaluate::run_evaluate(&args, &config, store.as_ref())
}

/// Initialize the SQLite store, running migrations if needed.
/// Returns None if the database can't be opened (non-fatal).
fn init_store() -> Option<Store> {
    let db_path = rubric::infra::paths::db_path();

    if let Some(parent) = db_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    match rusqlite::Connection::open(&db_path) {
        Ok(conn) => {
            if let Err(e) = schema::run_migrations(&conn) {
                tracing::warn!("Database migration failed: {}. History disabled.", e);
                return None;
            }
            Some(Store::new(conn))
        }
        Err(e) => {
            tracing::warn!("Could not open database: {}. History disabled.", e);
            None
        }
    }
}

/// Build the response text from CLI args, a file, and/or stdin.
///
/// Modes:
/// 1. `rubric "response text"` — positional args only
/// 2. `rubric -f response.txt` — read from a file
/// 3. `rubric --stdin` or piped input — read everything from stdin
fn build_response_input(cli: &Cli) -> anyhow::Result<String> {
    use std::io::IsTerminal;

    if let Some(ref path) = cli.file {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {path}: {e}"))?;
        return Ok(content);
    }

    let has_args = !cli.text.is_empty();
    let stdin_is_pipe = !std::io::stdin().is_terminal();

    if cli.stdin || (stdin_is_pipe && !has_args) {
        return read_stdin();
    }

    if has_args {
        return Ok(cli.text.join(" "));
    }

    eprintln!("Usage: rubric <response text> | rubric -f <file> | ... | rubric --stdin");
    eprintln!("Run rubric --help for all options.");
    std::process::exit(1);
}

/// Read the response from stdin (for piped input).
fn read_stdin() -> anyhow::Result<String> {
    use std::io::Read;
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
