use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::menu_item::{MenuItem, MenuItemId};
use crate::errors::ValidationError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: MenuItemId,
    pub item: MenuItem,
}

/// Ordered menu of priced items.
///
/// Insertion order is preserved and duplicate names are allowed. Ids come from a
/// counter that only moves forward, so an id never refers to two different
/// entries over the catalog's lifetime.
#[derive(Clone, Debug, Default)]
pub struct MenuCatalog {
    entries: Vec<CatalogEntry>,
    last_id: u64,
}

impl MenuCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_item(
        &mut self,
        name: impl Into<String>,
        price: Decimal,
    ) -> Result<MenuItemId, ValidationError> {
        let item = MenuItem::new(name, price)?;
        self.last_id += 1;
        let id = MenuItemId(self.last_id);
        self.entries.push(CatalogEntry { id, item });
        Ok(id)
    }

    /// Removes the first entry named `name`. Returns whether anything was removed.
    pub fn delete_item(&mut self, name: &str) -> bool {
        let name = name.trim();
        match self.entries.iter().position(|entry| entry.item.name() == name) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: MenuItemId) -> Option<MenuItem> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(index).item)
    }

    pub fn list_items(&self) -> impl ExactSizeIterator<Item = &MenuItem> + Clone + '_ {
        self.entries.iter().map(|entry| &entry.item)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn find(&self, id: MenuItemId) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&CatalogEntry> {
        let name = name.trim();
        self.entries.iter().find(|entry| entry.item.name() == name)
    }

    /// Looks up the first entry whose rendered line matches `line` exactly.
    pub fn find_rendered(&self, line: &str) -> Option<&CatalogEntry> {
        let line = line.trim();
        self.entries.iter().find(|entry| entry.item.render() == line)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn render_lines(&self) -> Vec<String> {
        self.list_items().map(MenuItem::render).collect()
    }
}
