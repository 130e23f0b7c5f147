//! CLI command implementations.

pub mod config;
pub mod search;
pub mod serve;
pub mod suggest;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use search_core::catalog::{SourceKind, SourceLabel};
use search_core::SearchPipeline;
use search_data::{decode_envelope, CatalogSource, StaticSource};
use search_service::SearchService;

use crate::context::Context;

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Text to look for in names, descriptions and categories.
    pub query: Option<String>,

    /// Only products in this category.
    #[arg(long)]
    pub category: Option<String>,

    /// Minimum price (inclusive).
    #[arg(long)]
    pub min_price: Option<f64>,

    /// Maximum price (inclusive).
    #[arg(long)]
    pub max_price: Option<f64>,

    /// Sort order: relevance, price_asc, price_desc, rating, name.
    #[arg(short, long, default_value = "relevance")]
    pub sort: String,

    /// Page number.
    #[arg(short, long, default_value = "1")]
    pub page: u32,

    /// Page size (default from config).
    #[arg(short, long)]
    pub limit: Option<u32>,

    /// Show category facets.
    #[arg(long)]
    pub facets: bool,

    /// Read products from a JSON file instead of the configured sources.
    #[arg(long)]
    pub fixture: Option<String>,
}

/// Arguments for the suggest command.
#[derive(Args)]
pub struct SuggestArgs {
    /// Partial text.
    pub text: String,

    /// Read products from a JSON file instead of the configured sources.
    #[arg(long)]
    pub fixture: Option<String>,
}

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind (default from config).
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (default from config).
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}

/// The service for `search` and `suggest`: the configured sources, or a
/// single in-memory source read from `fixture`.
fn build_service(fixture: Option<&str>, ctx: &Context) -> Result<SearchService> {
    let Some(fixture) = fixture else {
        return Ok(SearchService::from_config(&ctx.config)?);
    };

    let path = ctx.resolve_path(fixture);
    let source = load_fixture(&path)?;
    ctx.output.debug(&format!("Using fixture {}", path.display()));

    let sources: Vec<Arc<dyn CatalogSource>> = vec![Arc::new(source)];
    Ok(
        SearchService::new(sources, SearchPipeline::new(ctx.config.normalize.clone()))
            .with_default_page_size(ctx.config.defaults.page_size),
    )
}

fn load_fixture(path: &Path) -> Result<StaticSource> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read fixture: {}", path.display()))?;
    let body: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse fixture: {}", path.display()))?;
    let records = decode_envelope(body)
        .with_context(|| format!("Fixture has no product list: {}", path.display()))?;

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("fixture")
        .to_string();
    let has_sellers = records
        .iter()
        .any(|r| r.get("seller_name").is_some() || r.get("sellerName").is_some());
    let kind = if has_sellers {
        SourceKind::Marketplace
    } else {
        SourceKind::Catalog
    };

    Ok(StaticSource::new(SourceLabel::new(name, kind), records))
}
