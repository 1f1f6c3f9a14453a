use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::money::{ensure_price_in_range, format_price};
use crate::errors::ValidationError;

/// Separator between name and price in a rendered menu line.
pub const RENDER_SEPARATOR: &str = " - ";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MenuItemId(pub u64);

impl fmt::Display for MenuItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    name: String,
    price: Decimal,
}

impl MenuItem {
    pub fn new(name: impl Into<String>, price: Decimal) -> Result<Self, ValidationError> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField { field: "name" });
        }
        let price = ensure_price_in_range(price)?;

        Ok(Self { name: name.to_owned(), price })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    /// `"<name> - $<price>"` with the price at two decimals.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{RENDER_SEPARATOR}{}", self.name, format_price(self.price))
    }
}

/// Recovers the name portion of a rendered line.
///
/// Splits on the last `" - $"` so names that themselves contain the separator
/// survive. A line without a separator is treated as a bare name.
pub fn rendered_name(line: &str) -> &str {
    let marker = format!("{RENDER_SEPARATOR}{}", crate::domain::money::CURRENCY_SYMBOL);
    match line.rsplit_once(marker.as_str()) {
        Some((name, _)) => name.trim(),
        None => line.trim(),
    }
}
