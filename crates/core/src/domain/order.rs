use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::menu_item::MenuItem;
use crate::domain::money::format_price;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single customer's in-progress order.
///
/// Items are value copies taken at selection time, so later catalog edits never
/// reach into an order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    items: Vec<MenuItem>,
    opened_at: DateTime<Utc>,
}

impl Default for Order {
    fn default() -> Self {
        Self::new()
    }
}

impl Order {
    pub fn new() -> Self {
        Self { id: OrderId::generate(), items: Vec::new(), opened_at: Utc::now() }
    }

    pub fn id(&self) -> &OrderId {
        &self.id
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    pub fn add_item(&mut self, item: MenuItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of item prices. Saturates at `Decimal::MAX` instead of panicking.
    pub fn calculate_total(&self) -> Decimal {
        self.items
            .iter()
            .map(MenuItem::price)
            .fold(Decimal::ZERO, |total, price| total.saturating_add(price))
    }

    pub fn render_lines(&self) -> Vec<String> {
        self.items.iter().map(MenuItem::render).collect()
    }

    pub fn total_message(&self) -> String {
        format!("Total: {}", format_price(self.calculate_total()))
    }
}
