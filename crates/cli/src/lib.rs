pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "storefront",
    about = "Storefront catalog operator CLI",
    long_about = "Apply migrations, load the demo catalog, inspect configuration, and query products.",
    after_help = "Examples:\n  storefront doctor --json\n  storefront catalog list --size 5 --sort price,desc\n  storefront catalog show 3"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load and verify the deterministic demo catalog")]
    Seed,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate configuration and database connectivity")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(
        subcommand,
        about = "Query the product catalog (requires a migrated schema, see `migrate`)"
    )]
    Catalog(CatalogCommand),
}

#[derive(Debug, Subcommand)]
enum CatalogCommand {
    #[command(about = "Print one page of products as JSON")]
    List {
        #[arg(long, default_value_t = 0, help = "Zero-based page number")]
        page: u32,
        #[arg(long, help = "Page size (defaults to pagination.default_page_size)")]
        size: Option<u32>,
        #[arg(long, help = "Sort as `<property>[,asc|desc]`, e.g. `price,desc`")]
        sort: Option<String>,
    },
    #[command(about = "Print a single product by id")]
    Show { id: i64 },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Config => commands::config::run(),
        Command::Doctor { json } => commands::doctor::run(json),
        Command::Catalog(CatalogCommand::List { page, size, sort }) => {
            commands::catalog::list(page, size, sort.as_deref())
        }
        Command::Catalog(CatalogCommand::Show { id }) => commands::catalog::show(id),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
