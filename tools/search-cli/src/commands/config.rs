//! Configuration management commands.

use anyhow::{bail, Result};
use search_service::config::generate_default_config;

use super::{ConfigArgs, ConfigCommand};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    ctx.output.info("");
    ctx.output.info("[[sources]]");
    for source in &ctx.config.sources {
        let timeout = source
            .timeout_ms
            .map(|ms| format!(", timeout {}ms", ms))
            .unwrap_or_default();
        let auth = if source.auth_token.is_some() { ", token set" } else { "" };
        ctx.output.list_item(&format!(
            "{} [{}] {}{}{}",
            source.name, source.kind, source.url, timeout, auth
        ));
    }

    let normalize = &ctx.config.normalize;
    ctx.output.info("");
    ctx.output.info("[normalize]");
    ctx.output
        .kv("placeholder_image_url", &normalize.placeholder_image_url);
    ctx.output.kv("placeholder_name", &normalize.placeholder_name);
    ctx.output
        .kv("neutral_rating", &normalize.neutral_rating.to_string());
    ctx.output.kv("default_category", &normalize.default_category);

    ctx.output.info("");
    ctx.output.info("[server]");
    ctx.output.kv("host", &ctx.config.server.host);
    ctx.output.kv("port", &ctx.config.server.port.to_string());

    ctx.output.info("");
    ctx.output.info("[defaults]");
    ctx.output
        .kv("page_size", &ctx.config.defaults.page_size.to_string());

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("search.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, generate_default_config())?;

    ctx.output
        .success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    if ctx.config_path.is_none() {
        ctx.output
            .warn("No config file found; validating built-in defaults");
    }

    ctx.config.validate()?;

    for source in &ctx.config.sources {
        if source.url.starts_with("http://") && source.auth_token.is_some() {
            ctx.output.warn(&format!(
                "Source '{}' sends a token over plain http",
                source.name
            ));
        }
    }

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "valid": true }));
    } else {
        ctx.output.success("Configuration is valid");
    }

    Ok(())
}
