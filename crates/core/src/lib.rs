pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod session;

pub use catalog::{CatalogEntry, MenuCatalog};
pub use domain::menu_item::{MenuItem, MenuItemId};
pub use domain::order::{Order, OrderId};
pub use errors::{ErrorKind, SelectionAction, SessionError, ValidationError};
pub use session::{SelectionKey, Session};
