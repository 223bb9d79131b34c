//! Terminal rendering.
//!
//! Command results go to stdout; logs and errors go to stderr via tracing.

use glamora_client::api::{Order, Product, User};
use glamora_client::models::Design;

#[allow(clippy::print_stdout)]
pub fn line(text: &str) {
    println!("{text}");
}

pub fn user(user: &User) {
    line(&format!("{} <{}> ({:?})", user.name, user.email, user.role));
    line(&format!("  id: {}", user.id));
}

pub fn product(product: &Product) {
    let stock = if product.in_stock { "" } else { "  [out of stock]" };
    line(&format!(
        "{:<16} {:<32} {:>10}{stock}",
        product.id.as_str(),
        product.name,
        product.price.to_string()
    ));
}

pub fn order(order: &Order) {
    let placed = order
        .created_at
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    line(&format!(
        "#{:<12} {:<10} {:>10}  {} item(s)  {placed}",
        order.order_number,
        format!("{:?}", order.status).to_lowercase(),
        order.total.to_string(),
        order.items.len()
    ));
}

pub fn design(design: &Design) {
    let favorite = if design.is_favorite { " *" } else { "" };
    line(&format!(
        "{} {} / {}{favorite}",
        design.id, design.kind, design.style
    ));
    if let Some(description) = &design.description {
        line(&format!("  {description}"));
    }
    line(&format!("  {}", design.image_url));
}
