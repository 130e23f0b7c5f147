//! product-search - Command line front end for the product search service.
//!
//! Commands:
//! - `product-search search` - Search products across every configured source
//! - `product-search suggest` - Type-ahead suggestions
//! - `product-search serve` - Run the HTTP API
//! - `product-search config` - Manage configuration

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use search_observability::{init_tracing, LogFormat};

use commands::{ConfigArgs, SearchArgs, ServeArgs, SuggestArgs};

/// Search products across catalog and marketplace services
#[derive(Parser)]
#[command(name = "product-search")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search products
    Search(SearchArgs),

    /// Suggest product names and categories for partial text
    Suggest(SuggestArgs),

    /// Serve the search HTTP API
    Serve(ServeArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

impl Commands {
    /// Log level used when `RUST_LOG` is unset.
    fn default_directive(&self, verbose: bool) -> &'static str {
        match (self, verbose) {
            (_, true) => "info,search_core=debug,search_data=debug,search_service=debug",
            (Commands::Serve(_), false) => "info,tower_http=info",
            _ => "warn",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let format = if cli.json { LogFormat::Json } else { LogFormat::Human };
    init_tracing(format, cli.command.default_directive(cli.verbose))?;

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    let ctx = match context::Context::load(cli.config.as_deref(), output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    tracing::debug!(config = ?ctx.config_path, sources = ctx.config.sources.len(), "configuration loaded");

    // Execute command
    let result = match cli.command {
        Commands::Search(args) => commands::search::run(args, &ctx).await,
        Commands::Suggest(args) => commands::suggest::run(args, &ctx).await,
        Commands::Serve(args) => commands::serve::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
