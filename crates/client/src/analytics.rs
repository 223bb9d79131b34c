//! Product analytics events.
//!
//! Events are structured `tracing` records on this module's target, which the
//! default log filter enables. Subscribers pick them up without the stores
//! knowing about it.

use glamora_core::{DesignId, DesignType, OrderId, Price, ProductId};
use tracing::info;

/// A product was added to the cart.
pub fn track_add_to_cart(product_id: &ProductId, quantity: u32) {
    info!(event = "add_to_cart", product_id = %product_id, quantity);
}

/// An order was placed.
pub fn track_purchase(order_id: &OrderId, total: Price, item_count: usize) {
    info!(
        event = "purchase",
        order_id = %order_id,
        total = %total.amount(),
        item_count
    );
}

/// A design was generated.
pub fn track_design_created(design_id: &DesignId, kind: DesignType, style: &str) {
    info!(
        event = "design_created",
        design_id = %design_id,
        kind = %kind,
        style
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;
    use tracing::Subscriber;
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    use super::*;
    use crate::telemetry::DEFAULT_FILTER;

    #[derive(Clone, Default)]
    struct Targets(Arc<Mutex<Vec<String>>>);

    impl<S: Subscriber> Layer<S> for Targets {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            self.0.lock().push(event.metadata().target().to_string());
        }
    }

    #[test]
    fn test_events_pass_default_filter() {
        let seen = Targets::default();
        let subscriber = tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::new(DEFAULT_FILTER))
            .with(seen.clone());

        tracing::subscriber::with_default(subscriber, || {
            track_add_to_cart(&ProductId::new("p1"), 2);
            track_purchase(&OrderId::new("o1"), Price::from_major(100), 1);
            track_design_created(&DesignId::new("d1"), DesignType::Ring, "art deco");
        });

        let seen = seen.0.lock();
        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|target| target == "glamora_client::analytics"));
    }
}
