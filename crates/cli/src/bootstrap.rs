use sunrise_core::config::AppConfig;
use sunrise_core::{Session, SessionError};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("seed menu item `{name}` was rejected: {source}")]
    Seed { name: String, source: SessionError },
}

/// Opens a session whose catalog is pre-loaded with the configured menu.
pub fn open_session(config: &AppConfig) -> Result<Session, BootstrapError> {
    let mut session = Session::new();

    for item in &config.menu.items {
        session
            .add_menu_item(&item.name, &item.price)
            .map_err(|source| BootstrapError::Seed { name: item.name.clone(), source })?;
    }

    info!(
        event_name = "system.bootstrap.session_opened",
        shop = config.shop.name.as_str(),
        seeded_items = session.catalog().len(),
        order_id = %session.order().id(),
        "session opened"
    );

    Ok(session)
}
