//! Product search command.

use anyhow::{bail, Result};
use search_core::search::{QuerySpec, SortKey};
use serde_json::json;

use super::{build_service, SearchArgs};
use crate::context::Context;
use crate::output::{format_price, truncate};

const COLUMN_WIDTHS: [usize; 5] = [10, 32, 10, 16, 6];

/// Run the search command.
pub async fn run(args: SearchArgs, ctx: &Context) -> Result<()> {
    let Some(sort) = SortKey::parse(&args.sort) else {
        bail!(
            "Unknown sort '{}'. Expected one of: relevance, price_asc, price_desc, rating, name",
            args.sort
        );
    };

    let service = build_service(args.fixture.as_deref(), ctx)?;

    let mut query = QuerySpec::new()
        .with_sort(sort)
        .with_price_range(args.min_price, args.max_price)
        .with_pagination(args.page, args.limit.unwrap_or(service.default_page_size()));
    if let Some(text) = &args.query {
        query = query.with_text(text);
    }
    if let Some(category) = &args.category {
        query = query.with_category(category);
    }
    if args.facets {
        query = query.with_facets();
    }

    let spinner = ctx.output.spinner(&format!(
        "Searching {} source(s)...",
        service.source_count()
    ));
    let outcome = service.search(&query).await;
    spinner.finish_and_clear();
    let outcome = outcome?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "success": true,
            "data": outcome.result.products,
            "pagination": outcome.result.pagination,
            "total": outcome.result.total,
            "facets": outcome.result.facets,
            "sources": outcome.sources,
            "metrics": outcome.metrics,
        }));
        return Ok(());
    }

    let result = &outcome.result;
    ctx.output.header(&format!(
        "{} product(s), page {} of {} ({})",
        result.total_matches(),
        result.page(),
        result.total_pages().max(1),
        sort.display_name()
    ));

    if result.is_empty() {
        ctx.output.info("No products found");
    } else {
        ctx.output
            .table_row(&["ID", "NAME", "PRICE", "CATEGORY", "RATING"], &COLUMN_WIDTHS);
        for product in &result.products {
            let name = match &product.seller_name {
                Some(seller) => format!("{} ({})", product.name, seller),
                None => product.name.clone(),
            };
            ctx.output.table_row(
                &[
                    product.id.as_str(),
                    &name,
                    &format_price(product.price),
                    &product.category_name,
                    &format!("{:.1}", product.rating),
                ],
                &COLUMN_WIDTHS,
            );
        }
        let pagination = &result.pagination;
        ctx.output.info(&format!(
            "Showing {}-{} of {}",
            pagination.start_item(),
            pagination.end_item(),
            pagination.total
        ));
    }

    if !result.facets.is_empty() {
        ctx.output.header("Categories");
        for facet in &result.facets {
            let marker = if facet.selected { " *" } else { "" };
            ctx.output
                .list_item(&format!("{} ({}){}", truncate(&facet.value, 40), facet.count, marker));
        }
    }

    ctx.output.header("Sources");
    ctx.output.sources(&outcome.sources);
    ctx.output.debug(&outcome.metrics.to_summary());

    if outcome.metrics.is_degraded() {
        ctx.output
            .warn("Some sources were unavailable; results may be incomplete");
    }

    Ok(())
}
