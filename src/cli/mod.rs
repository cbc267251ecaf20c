pub mod add;
pub mod config;
pub mod entry;
pub mod options;
pub mod status;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gastos", about = "Log expenses to the household spreadsheet.")]
pub struct Cli {
    /// Endpoint URL for this run (overrides settings)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Submit one expense without opening the form.
    Add {
        /// Payment method (default: first option)
        #[arg(long)]
        payment: Option<String>,
        /// Date: YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
        /// Category (default: first option)
        #[arg(long)]
        category: Option<String>,
        /// What the expense was for
        #[arg(long)]
        detail: String,
        /// Who is responsible (default: first option)
        #[arg(long)]
        responsible: Option<String>,
        /// Amount, e.g. 42.10
        #[arg(long)]
        amount: String,
        /// Installment number, e.g. 1
        #[arg(long)]
        installment: Option<String>,
        /// Total number of installments, e.g. 12
        #[arg(long)]
        installments: Option<String>,
        /// Mark as a recurring expense
        #[arg(long)]
        recurring: bool,
        /// Print the JSON payload instead of sending it
        #[arg(long = "dry-run")]
        dry_run: bool,
    },
    /// List payment methods, categories and responsible parties.
    Options,
    /// Show or change the configured endpoint.
    Config {
        /// New endpoint URL to save
        #[arg(long = "set-endpoint")]
        set_endpoint: Option<String>,
        /// Restore the built-in endpoint
        #[arg(long, conflicts_with = "set_endpoint")]
        reset: bool,
    },
    /// Show settings and log locations.
    Status,
}
