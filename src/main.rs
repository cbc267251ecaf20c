mod cli;
mod controller;
mod endpoint;
mod error;
mod fmt;
mod form;
mod models;
mod options;
mod settings;
mod tui;

use std::fs::OpenOptions;
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

/// Log to a file under the config dir so the form's screen stays clean.
/// Logging is skipped if the file can't be opened.
fn init_logging() {
    let path = settings::log_path();
    if let Some(dir) = path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gastos=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let endpoint = cli.endpoint.as_deref();
    let result = match cli.command {
        None => cli::entry::run(endpoint),
        Some(Commands::Add {
            payment,
            date,
            category,
            detail,
            responsible,
            amount,
            installment,
            installments,
            recurring,
            dry_run,
        }) => cli::add::run(
            cli::add::AddArgs {
                payment,
                date,
                category,
                detail,
                responsible,
                amount,
                installment,
                installments,
                recurring,
            },
            endpoint,
            dry_run,
        ),
        Some(Commands::Options) => cli::options::run(),
        Some(Commands::Config { set_endpoint, reset }) => cli::config::run(set_endpoint, reset),
        Some(Commands::Status) => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
