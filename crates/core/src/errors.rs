use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },
    #[error("field `{field}` is not numeric: `{value}`")]
    NotNumeric { field: &'static str, value: String },
    #[error("field `{field}` must not be negative: `{value}`")]
    Negative { field: &'static str, value: Decimal },
    #[error("field `{field}` exceeds the maximum of {max}: `{value}`")]
    TooLarge { field: &'static str, value: Decimal, max: Decimal },
}

/// Operations that require the presentation layer to supply a selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionAction {
    DeleteMenuItem,
    AddToOrder,
}

impl fmt::Display for SelectionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeleteMenuItem => f.write_str("delete menu item"),
            Self::AddToOrder => f.write_str("add to order"),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no selection provided for `{action}`")]
    NoSelection { action: SelectionAction },
    #[error("selection `{key}` does not match any menu item")]
    SelectionNotFound { key: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NoSelection,
    SelectionNotFound,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NoSelection => "no_selection",
            Self::SelectionNotFound => "selection_not_found",
        }
    }
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NoSelection { .. } => ErrorKind::NoSelection,
            Self::SelectionNotFound { .. } => ErrorKind::SelectionNotFound,
        }
    }

    /// Text suitable for an operator-facing dialog or prompt.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Validation(ValidationError::MissingField { .. }) => {
                "Please enter both name and price."
            }
            Self::Validation(ValidationError::NotNumeric { .. }) => "Price must be a number.",
            Self::Validation(ValidationError::Negative { .. }) => "Price must not be negative.",
            Self::Validation(ValidationError::TooLarge { .. }) => "Price is too large.",
            Self::NoSelection { action: SelectionAction::DeleteMenuItem } => {
                "Select an item to delete."
            }
            Self::NoSelection { action: SelectionAction::AddToOrder } => {
                "Select a menu item first."
            }
            Self::SelectionNotFound { .. } => "The selected item is no longer on the menu.",
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::errors::{ErrorKind, SelectionAction, SessionError, ValidationError};

    #[test]
    fn missing_field_maps_to_both_fields_prompt() {
        let error = SessionError::from(ValidationError::MissingField { field: "price" });

        assert_eq!(error.kind(), ErrorKind::Validation);
        assert_eq!(error.user_message(), "Please enter both name and price.");
    }

    #[test]
    fn not_numeric_is_distinguished_from_missing() {
        let error = SessionError::from(ValidationError::NotNumeric {
            field: "price",
            value: "abc".to_owned(),
        });

        assert_eq!(error.user_message(), "Price must be a number.");
        assert!(error.to_string().contains("abc"));
    }

    #[test]
    fn negative_price_has_its_own_message() {
        let error = SessionError::from(ValidationError::Negative {
            field: "price",
            value: Decimal::new(-150, 2),
        });

        assert_eq!(error.user_message(), "Price must not be negative.");
        assert!(error.to_string().contains("-1.50"));
    }

    #[test]
    fn oversized_price_has_its_own_message() {
        let error = SessionError::from(ValidationError::TooLarge {
            field: "price",
            value: Decimal::new(2_000_000, 0),
            max: Decimal::new(1_000_000, 0),
        });

        assert_eq!(error.kind(), ErrorKind::Validation);
        assert_eq!(error.user_message(), "Price is too large.");
        assert!(error.to_string().contains("1000000"));
    }

    #[test]
    fn no_selection_message_depends_on_action() {
        let delete = SessionError::NoSelection { action: SelectionAction::DeleteMenuItem };
        let order = SessionError::NoSelection { action: SelectionAction::AddToOrder };

        assert_eq!(delete.kind(), ErrorKind::NoSelection);
        assert_eq!(delete.user_message(), "Select an item to delete.");
        assert_eq!(order.user_message(), "Select a menu item first.");
        assert_eq!(order.to_string(), "no selection provided for `add to order`");
    }

    #[test]
    fn error_kinds_have_stable_labels() {
        assert_eq!(ErrorKind::Validation.as_str(), "validation");
        assert_eq!(ErrorKind::NoSelection.as_str(), "no_selection");
        assert_eq!(ErrorKind::SelectionNotFound.as_str(), "selection_not_found");
    }
}
