use std::fmt;

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::catalog::{CatalogEntry, MenuCatalog};
use crate::domain::menu_item::{rendered_name, MenuItem, MenuItemId};
use crate::domain::money::parse_price;
use crate::domain::order::Order;
use crate::errors::{SelectionAction, SessionError, ValidationError};

/// How the presentation layer refers to a catalog entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionKey {
    Id(MenuItemId),
    /// Zero-based position in the current catalog listing.
    Index(usize),
    Name(String),
    /// A rendered `"<name> - $<price>"` line.
    Rendered(String),
}

impl fmt::Display for SelectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id:{id}"),
            Self::Index(index) => write!(f, "index:{index}"),
            Self::Name(name) => write!(f, "name:{name}"),
            Self::Rendered(line) => write!(f, "line:{line}"),
        }
    }
}

/// One operator session: a menu plus the single order currently being built.
///
/// Every operation is synchronous and either fully applies or leaves both the
/// catalog and the order untouched.
#[derive(Clone, Debug, Default)]
pub struct Session {
    catalog: MenuCatalog,
    order: Order,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(catalog: MenuCatalog) -> Self {
        Self { catalog, order: Order::new() }
    }

    pub fn catalog(&self) -> &MenuCatalog {
        &self.catalog
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    pub fn add_menu_item(
        &mut self,
        name: &str,
        price_text: &str,
    ) -> Result<MenuItemId, SessionError> {
        let result = validate_menu_input(name, price_text)
            .and_then(|price| self.catalog.add_item(name, price));

        match result {
            Ok(id) => {
                info!(
                    event_name = "session.menu.item_added",
                    item_id = id.0,
                    name = name.trim(),
                    price = %price_text.trim(),
                    "menu item added"
                );
                Ok(id)
            }
            Err(error) => {
                warn!(
                    event_name = "session.menu.item_rejected",
                    reason = %error,
                    "menu item rejected"
                );
                Err(error.into())
            }
        }
    }

    /// Deletes the selected menu item. `Ok(false)` means nothing matched.
    pub fn delete_menu_item(
        &mut self,
        selection: Option<&SelectionKey>,
    ) -> Result<bool, SessionError> {
        let selection = require_selection(selection, SelectionAction::DeleteMenuItem)?;

        let removed = match selection {
            SelectionKey::Id(id) => self.catalog.remove(*id).is_some(),
            SelectionKey::Index(index) => match self.catalog.get(*index).map(|entry| entry.id) {
                Some(id) => self.catalog.remove(id).is_some(),
                None => false,
            },
            SelectionKey::Name(name) => self.catalog.delete_item(name),
            SelectionKey::Rendered(line) => match self.resolve(selection).map(|e| e.id) {
                Some(id) => self.catalog.remove(id).is_some(),
                None => self.catalog.delete_item(rendered_name(line)),
            },
        };

        info!(
            event_name = "session.menu.item_deleted",
            selection = %selection,
            removed,
            remaining = self.catalog.len(),
            "menu delete processed"
        );
        Ok(removed)
    }

    /// Copies the selected menu item into the current order and returns the copy.
    pub fn add_selected_to_order(
        &mut self,
        selection: Option<&SelectionKey>,
    ) -> Result<MenuItem, SessionError> {
        let selection = require_selection(selection, SelectionAction::AddToOrder)?;

        let Some(entry) = self.resolve(selection) else {
            warn!(
                event_name = "session.order.selection_missing",
                selection = %selection,
                "selection did not match a menu item"
            );
            return Err(SessionError::SelectionNotFound { key: selection.to_string() });
        };

        let item = entry.item.clone();
        self.order.add_item(item.clone());
        info!(
            event_name = "session.order.item_added",
            order_id = %self.order.id(),
            name = item.name(),
            order_size = self.order.len(),
            "item added to order"
        );
        Ok(item)
    }

    pub fn order_total(&self) -> Decimal {
        self.order.calculate_total()
    }

    /// Closes the current order and starts an empty one. Returns the closed order.
    pub fn new_order(&mut self) -> Order {
        let closed = std::mem::take(&mut self.order);
        info!(
            event_name = "session.order.closed",
            order_id = %closed.id(),
            item_count = closed.len(),
            total = %closed.calculate_total(),
            next_order_id = %self.order.id(),
            "order closed"
        );
        closed
    }

    fn resolve(&self, selection: &SelectionKey) -> Option<&CatalogEntry> {
        match selection {
            SelectionKey::Id(id) => self.catalog.find(*id),
            SelectionKey::Index(index) => self.catalog.get(*index),
            SelectionKey::Name(name) => self.catalog.find_by_name(name),
            // A name may itself contain the render separator.
            SelectionKey::Rendered(line) => self
                .catalog
                .find_rendered(line)
                .or_else(|| self.catalog.find_by_name(line)),
        }
    }
}

fn require_selection(
    selection: Option<&SelectionKey>,
    action: SelectionAction,
) -> Result<&SelectionKey, SessionError> {
    match selection {
        Some(selection) => Ok(selection),
        None => {
            warn!(event_name = "session.selection.missing", action = %action, "no selection");
            Err(SessionError::NoSelection { action })
        }
    }
}

fn validate_menu_input(name: &str, price_text: &str) -> Result<Decimal, ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::MissingField { field: "name" });
    }
    parse_price(price_text)
}
