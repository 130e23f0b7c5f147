//! Suggestion command.

use anyhow::Result;
use search_core::search::SuggestionKind;
use serde_json::json;

use super::{build_service, SuggestArgs};
use crate::context::Context;

/// Run the suggest command.
pub async fn run(args: SuggestArgs, ctx: &Context) -> Result<()> {
    let service = build_service(args.fixture.as_deref(), ctx)?;

    let spinner = ctx.output.spinner("Fetching products...");
    let outcome = service.suggest(&args.text).await;
    spinner.finish_and_clear();

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "success": true,
            "data": outcome.suggestions,
        }));
        return Ok(());
    }

    if outcome.suggestions.is_empty() {
        ctx.output.info(&format!("No suggestions for '{}'", args.text.trim()));
    }

    for entry in &outcome.suggestions {
        let label = match entry.kind {
            SuggestionKind::Product => format!("{}  #{}", entry.text, entry.id),
            SuggestionKind::Category => format!("{}  (category)", entry.text),
        };
        ctx.output.list_item(&label);
    }

    if outcome.metrics.is_degraded() {
        ctx.output.sources(&outcome.sources);
    }
    ctx.output.debug(&outcome.metrics.to_summary());

    Ok(())
}
