//! Catalog and order history.

use glamora_client::api::ProductQuery;
use glamora_client::{AppState, Result};

use crate::output;

pub async fn products(state: &AppState, query: ProductQuery) -> Result<()> {
    let page = state.api().list_products(&query).await?;
    if page.products.is_empty() {
        output::line("No products found");
    }
    for product in &page.products {
        output::product(product);
    }
    Ok(())
}

pub async fn orders(state: &AppState, page: u32) -> Result<()> {
    let orders = state.api().list_orders(page).await?;
    if orders.orders.is_empty() {
        output::line("No orders yet");
    }
    for order in &orders.orders {
        output::order(order);
    }
    Ok(())
}
