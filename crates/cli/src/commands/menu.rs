use serde::Serialize;
use sunrise_core::config::AppConfig;
use sunrise_core::domain::money::format_amount;

use crate::bootstrap::open_session;
use crate::commands::CommandResult;

#[derive(Debug, Serialize)]
struct MenuListing {
    shop: String,
    items: Vec<MenuLine>,
}

#[derive(Debug, Serialize)]
struct MenuLine {
    number: usize,
    id: u64,
    name: String,
    price: String,
    #[serde(skip)]
    rendered: String,
}

pub fn run(config: &AppConfig, json_output: bool) -> CommandResult {
    let session = match open_session(config) {
        Ok(session) => session,
        Err(error) => return CommandResult::failure("menu", "bootstrap", error.to_string(), 3),
    };

    let listing = MenuListing {
        shop: config.shop.name.clone(),
        items: session
            .catalog()
            .entries()
            .iter()
            .enumerate()
            .map(|(index, entry)| MenuLine {
                number: index + 1,
                id: entry.id.0,
                name: entry.item.name().to_string(),
                price: format_amount(entry.item.price()),
                rendered: entry.item.render(),
            })
            .collect(),
    };

    if json_output {
        return match serde_json::to_string_pretty(&listing) {
            Ok(output) => CommandResult::plain(0, output),
            Err(error) => CommandResult::failure("menu", "serialization", error.to_string(), 1),
        };
    }

    CommandResult::plain(0, render_human(&listing))
}

fn render_human(listing: &MenuListing) -> String {
    let mut lines = vec![format!("{} menu", listing.shop)];
    if listing.items.is_empty() {
        lines.push("  (no items)".to_string());
    }
    for line in &listing.items {
        lines.push(format!("{:>3}. {}", line.number, line.rendered));
    }
    lines.join("\n")
}
