use std::sync::Arc;

use anyhow::Context;

use storefront_app::{AppConfig, ShoppingSession, demo_catalog};
use storefront_checkout::CatalogOrderPlacement;
use storefront_core::ProductId;
use storefront_events::Event;
use storefront_session::{CartStore, InMemoryKeyValueStore};

fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid STOREFRONT_* configuration")?;
    storefront_observability::tracing::init(config.log_format);

    let catalog = Arc::new(demo_catalog());
    let placement = Arc::new(CatalogOrderPlacement::new(Arc::clone(&catalog)));
    let store = CartStore::new(Arc::new(InMemoryKeyValueStore::new()), config.cart_key.clone());

    let mut session = ShoppingSession::start(
        Arc::clone(&catalog),
        placement,
        store,
        config.customer_id.clone(),
    );
    let events = session.subscribe();

    let rice = ProductId::new("p-100");
    let oil = ProductId::new("p-101");
    let lamp = ProductId::new("p-200");

    session.add(&rice, 2).context("adding rice")?;
    session.add(&oil, 1).context("adding palm oil")?;
    session.add(&lamp, 1).context("adding solar lamp")?;
    session.increase(&oil).context("stepping palm oil")?;
    session.decrease(&rice);

    if let Err(err) = session.add(&lamp, 10) {
        tracing::warn!(product_id = %lamp, error = %err, "add refused");
    }

    for event in events.drain() {
        tracing::info!(event_type = event.event_type(), "cart changed");
    }
    tracing::info!(
        items = session.item_count(),
        total = %session.total(),
        currency = %config.currency,
        "cart ready for checkout"
    );

    let shipping_address = config.shipping_address.clone().unwrap_or_else(|| {
        tracing::warn!(
            "{} not set; using demo address",
            AppConfig::SHIPPING_ADDRESS
        );
        "Douala, Akwa".to_string()
    });

    let order = session
        .place_order(&shipping_address)
        .context("placing order")?;
    let remaining = events.drain().len();
    tracing::info!(
        order_id = %order.id,
        events = remaining,
        cart_empty = session.cart().is_empty(),
        "order placed"
    );

    println!(
        "{}",
        serde_json::to_string_pretty(&order).context("encoding order")?
    );
    Ok(())
}
