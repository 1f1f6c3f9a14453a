//! Line-oriented command grammar shared by `sunrise shell` and `sunrise replay`.
//!
//! ```text
//! add <name> | <price>    add a menu item
//! delete [<n>|<name>]     delete a menu item by menu number, name, or rendered line
//! order [<n>|<name>]      add a menu item to the current order
//! menu                    list the menu
//! items                   list the current order
//! total                   show the order total
//! new-order               close the current order and start another
//! help                    show this summary
//! quit                    end the session
//! ```
//!
//! A bare number always means a menu position. Wrap a name in double quotes
//! (`order "7"`) to select it by name instead. Text containing `" - $"` is
//! matched against displayed menu lines first and then as a full name.
//!
//! Blank lines and lines starting with `#` are ignored.

use serde::Serialize;
use sunrise_core::domain::menu_item::RENDER_SEPARATOR;
use sunrise_core::domain::money::{format_price, CURRENCY_SYMBOL};
use sunrise_core::{SelectionKey, Session};
use thiserror::Error;

pub const HELP_LINES: [&str; 10] = [
    "add <name> | <price>    add a menu item",
    "delete [<n>|<name>]     delete a menu item",
    "order [<n>|<name>]      add a menu item to the current order",
    "                        (quote numeric names: order \"7\")",
    "menu                    list the menu",
    "items                   list the current order",
    "total                   show the order total",
    "new-order               close the current order and start another",
    "help                    show this summary",
    "quit                    end the session",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptCommand {
    Add { name: String, price: String },
    Delete { selection: Option<SelectionKey> },
    Order { selection: Option<SelectionKey> },
    Menu,
    Items,
    Total,
    NewOrder,
    Help,
    Quit,
}

impl ScriptCommand {
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Delete { .. } => "delete",
            Self::Order { .. } => "order",
            Self::Menu => "menu",
            Self::Items => "items",
            Self::Total => "total",
            Self::NewOrder => "new-order",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("unknown command `{0}` (try `help`)")]
    UnknownCommand(String),
    #[error("menu numbers start at 1, got `{0}`")]
    InvalidPosition(String),
    #[error("menu number `{0}` is too large")]
    PositionTooLarge(String),
}

/// Parses one input line. `Ok(None)` means there is nothing to run.
pub fn parse_line(line: &str) -> Result<Option<ScriptCommand>, ScriptError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "add" => {
            let (name, price) = rest.split_once('|').unwrap_or((rest, ""));
            ScriptCommand::Add { name: name.trim().to_owned(), price: price.trim().to_owned() }
        }
        "delete" | "del" => ScriptCommand::Delete { selection: parse_selection(rest)? },
        "order" => ScriptCommand::Order { selection: parse_selection(rest)? },
        "menu" => ScriptCommand::Menu,
        "items" => ScriptCommand::Items,
        "total" => ScriptCommand::Total,
        "new-order" => ScriptCommand::NewOrder,
        "help" | "?" => ScriptCommand::Help,
        "quit" | "exit" => ScriptCommand::Quit,
        other => return Err(ScriptError::UnknownCommand(other.to_owned())),
    };

    Ok(Some(command))
}

fn parse_selection(argument: &str) -> Result<Option<SelectionKey>, ScriptError> {
    if argument.is_empty() {
        return Ok(None);
    }

    if let Some(name) = argument.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')) {
        return Ok(Some(SelectionKey::Name(name.to_owned())));
    }

    if argument.chars().all(|ch| ch.is_ascii_digit()) {
        let position = argument
            .parse::<usize>()
            .map_err(|_| ScriptError::PositionTooLarge(argument.to_owned()))?;
        let index = position
            .checked_sub(1)
            .ok_or_else(|| ScriptError::InvalidPosition(argument.to_owned()))?;
        return Ok(Some(SelectionKey::Index(index)));
    }

    let rendered_marker = format!("{RENDER_SEPARATOR}{CURRENCY_SYMBOL}");
    if argument.contains(rendered_marker.as_str()) {
        return Ok(Some(SelectionKey::Rendered(argument.to_owned())));
    }

    Ok(Some(SelectionKey::Name(argument.to_owned())))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyStatus {
    Ok,
    Rejected,
}

/// What a presentation layer shows after one command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub status: ReplyStatus,
    pub error_class: Option<&'static str>,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<String>,
}

impl Reply {
    fn ok(message: impl Into<String>, lines: Vec<String>) -> Self {
        Self { status: ReplyStatus::Ok, error_class: None, message: message.into(), lines }
    }

    fn rejected(error_class: &'static str, message: impl Into<String>) -> Self {
        Self {
            status: ReplyStatus::Rejected,
            error_class: Some(error_class),
            message: message.into(),
            lines: Vec::new(),
        }
    }

    pub fn syntax(error: &ScriptError) -> Self {
        Self::rejected("script_syntax", error.to_string())
    }

    pub fn is_ok(&self) -> bool {
        self.status == ReplyStatus::Ok
    }
}

pub fn execute(session: &mut Session, command: &ScriptCommand) -> Reply {
    match command {
        ScriptCommand::Add { name, price } => match session.add_menu_item(name, price) {
            Ok(id) => {
                let added = session
                    .catalog()
                    .find(id)
                    .map(|entry| entry.item.render())
                    .unwrap_or_else(|| name.clone());
                Reply::ok(format!("Added `{added}`."), session.catalog().render_lines())
            }
            Err(error) => Reply::rejected(error.kind().as_str(), error.user_message()),
        },
        ScriptCommand::Delete { selection } => match session.delete_menu_item(selection.as_ref())
        {
            Ok(true) => Reply::ok("Deleted menu item.", session.catalog().render_lines()),
            Ok(false) => Reply::ok("No matching menu item.", session.catalog().render_lines()),
            Err(error) => Reply::rejected(error.kind().as_str(), error.user_message()),
        },
        ScriptCommand::Order { selection } => {
            match session.add_selected_to_order(selection.as_ref()) {
                Ok(item) => Reply::ok(
                    format!("Added `{item}` to the order."),
                    session.order().render_lines(),
                ),
                Err(error) => Reply::rejected(error.kind().as_str(), error.user_message()),
            }
        }
        ScriptCommand::Menu => {
            let catalog = session.catalog();
            Reply::ok(format!("{} menu item(s).", catalog.len()), catalog.render_lines())
        }
        ScriptCommand::Items => {
            let order = session.order();
            Reply::ok(
                format!("Order {} has {} item(s).", order.id(), order.len()),
                order.render_lines(),
            )
        }
        ScriptCommand::Total => Reply::ok(session.order().total_message(), Vec::new()),
        ScriptCommand::NewOrder => {
            let closed = session.new_order();
            Reply::ok(
                format!(
                    "Closed order {} with {} item(s), total {}. Started order {}.",
                    closed.id(),
                    closed.len(),
                    format_price(closed.calculate_total()),
                    session.order().id()
                ),
                Vec::new(),
            )
        }
        ScriptCommand::Help => {
            Reply::ok("Commands:", HELP_LINES.iter().map(|line| (*line).to_owned()).collect())
        }
        ScriptCommand::Quit => Reply::ok("Goodbye.", Vec::new()),
    }
}
