//! HTTP server command.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use search_service::http::{serve, shutdown_signal};
use search_service::SearchService;

use super::ServeArgs;
use crate::context::Context;

/// Run the serve command.
pub async fn run(args: ServeArgs, ctx: &Context) -> Result<()> {
    let service = Arc::new(SearchService::from_config(&ctx.config)?);

    let host = args.host.unwrap_or_else(|| ctx.config.server.host.clone());
    let port = args.port.unwrap_or(ctx.config.server.port);
    let addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    ctx.output
        .success(&format!("Serving product search on http://{}", addr));
    for source in &ctx.config.sources {
        ctx.output
            .kv(&source.name, &format!("{} ({})", source.url, source.kind));
    }

    serve(listener, service, shutdown_signal())
        .await
        .context("Server error")?;

    ctx.output.info("Server stopped");
    Ok(())
}
