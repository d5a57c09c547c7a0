//! `search` command: drives one [`StreamSession`] over HTTP until the stream
//! finishes, fails, or the user presses Ctrl-C.

use partscout_client::{HttpSearchSource, PartsClient};
use partscout_core::{AppConfig, GroupKey, ProductGroup, WarehouseOffer};
use partscout_engine::{CartLedger, SessionStatus, StreamSession};

/// Runs a search for `term`, then optionally adds offers to a cart.
///
/// Partial results are printed even when the stream fails or is aborted.
///
/// # Errors
///
/// Returns an error if the client cannot be built, the term is blank, a
/// `--add` key matches no group, or the search ends in failure.
pub(crate) async fn run_search(
    config: &AppConfig,
    term: &str,
    add: &[String],
    json: bool,
) -> anyhow::Result<()> {
    let client = PartsClient::new(config)?;
    let (source, mut events) = HttpSearchSource::channel(client);
    let mut session = StreamSession::new(source);
    session.start(term)?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    while session.is_loading() {
        tokio::select! {
            envelope = events.recv() => match envelope {
                Some(envelope) => {
                    session.apply(envelope);
                }
                None => break,
            },
            _ = &mut ctrl_c => {
                session.abort();
                eprintln!("search aborted");
            }
        }
    }

    let mut cart = CartLedger::with_default_currency(&config.default_currency);
    for raw_key in add {
        let key = GroupKey::parse(raw_key);
        let group = session
            .catalog()
            .get(&key)
            .ok_or_else(|| anyhow::anyhow!("no result group '{key}' in this search"))?;
        let offer = pick_offer(group)
            .ok_or_else(|| anyhow::anyhow!("group '{key}' has no offers in stock"))?;
        cart.add_line(group, offer);
    }

    if json {
        print_json(&session, &cart)?;
    } else {
        print_table(&session, &cart);
    }

    if let Some(message) = session.error_message() {
        anyhow::bail!("{message}");
    }
    Ok(())
}

/// Cheapest offer with stock; `None` when every offer is out of stock.
fn pick_offer(group: &ProductGroup) -> Option<&WarehouseOffer> {
    group.cheapest_available()
}

fn status_label(status: &SessionStatus) -> &'static str {
    match status {
        SessionStatus::Idle => "idle",
        SessionStatus::Loading => "loading",
        SessionStatus::Completed => "completed",
        SessionStatus::Failed { .. } => "failed",
        SessionStatus::Aborted => "aborted",
    }
}

fn print_json<S>(session: &StreamSession<S>, cart: &CartLedger) -> anyhow::Result<()>
where
    S: partscout_engine::SearchSource,
{
    let stats = session.stats();
    let output = serde_json::json!({
        "query": session.query(),
        "status": status_label(session.status()),
        "error": session.error_message(),
        "suppliers": session.suppliers().sorted(),
        "groups": session.catalog().display_order(),
        "stats": {
            "items_applied": stats.items_applied,
            "items_skipped": stats.items_skipped,
            "image_batches": stats.image_batches,
        },
        "cart": {
            "lines": cart.lines(),
            "total": cart.total(),
        },
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_table<S>(session: &StreamSession<S>, cart: &CartLedger)
where
    S: partscout_engine::SearchSource,
{
    let catalog = session.catalog();
    let suppliers = session.suppliers().sorted();

    if catalog.is_empty() {
        println!("no results ({})", status_label(session.status()));
    } else {
        println!(
            "{} groups from {} suppliers: {}",
            catalog.len(),
            suppliers.len(),
            suppliers.join(", ")
        );
    }

    for group in catalog.display_order() {
        println!();
        let tag = if group.is_cross { " [analog]" } else { "" };
        let from = group
            .min_price()
            .map_or_else(|| "\u{2014}".to_string(), |p| format!("from {p}"));
        println!(
            "{}  {} {}{}  {}  {} offers",
            group.internal_id(),
            group.brand,
            group.article,
            tag,
            from,
            group.offer_count()
        );
        if let Some(name) = &group.name {
            println!("  {name}");
        }
        for offer in &group.warehouses {
            let currency = offer.currency.as_deref().unwrap_or("");
            let delivery = offer
                .delivery_days
                .map_or_else(|| "\u{2014}".to_string(), |d| format!("{d}d"));
            println!(
                "  {:<16}{:<20}{:>12} {:<4} qty {:<6} {}",
                offer.supplier, offer.name, offer.price, currency, offer.quantity, delivery
            );
        }
    }

    let skipped = session.stats().items_skipped;
    if skipped > 0 {
        eprintln!("warning: {skipped} malformed items were skipped");
    }

    if !cart.is_empty() {
        println!();
        println!("Cart ({} lines, {} items)", cart.line_count(), cart.item_count());
        for line in cart.lines() {
            println!(
                "  {} x{}  {} {}  {} {}",
                line.product_id,
                line.quantity,
                line.supplier,
                line.warehouse_name,
                line.line_total(),
                line.currency
            );
        }
        println!("  total: {}", cart.total());
    }
}
