use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::ValidationError;

pub const CURRENCY_SYMBOL: &str = "$";
pub const DISPLAY_SCALE: u32 = 2;
/// Largest accepted unit price, in whole currency units.
pub const MAX_PRICE_UNITS: i64 = 1_000_000;

pub fn max_price() -> Decimal {
    Decimal::from(MAX_PRICE_UNITS)
}

/// Parses operator-entered price text into an amount between zero and [`max_price`].
///
/// Surrounding whitespace is ignored. Both plain decimal (`4.50`) and scientific
/// (`4.5e0`) notation are accepted; anything else is `NotNumeric`.
pub fn parse_price(text: &str) -> Result<Decimal, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField { field: "price" });
    }

    let amount = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| ValidationError::NotNumeric { field: "price", value: trimmed.to_owned() })?;

    ensure_price_in_range(amount)
}

/// Keeps every accepted price renderable at two decimals and every order total
/// far from `Decimal` overflow.
pub fn ensure_price_in_range(amount: Decimal) -> Result<Decimal, ValidationError> {
    if amount < Decimal::ZERO {
        return Err(ValidationError::Negative { field: "price", value: amount });
    }
    let max = max_price();
    if amount > max {
        return Err(ValidationError::TooLarge { field: "price", value: amount, max });
    }
    Ok(amount.normalize())
}

/// Two-decimal rendering without the currency symbol, e.g. `4.50`.
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded =
        amount.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(DISPLAY_SCALE);
    rounded.to_string()
}

pub fn format_price(amount: Decimal) -> String {
    format!("{CURRENCY_SYMBOL}{}", format_amount(amount))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{format_amount, format_price, max_price, parse_price};
    use crate::errors::ValidationError;

    #[test]
    fn parses_plain_and_padded_prices() {
        assert_eq!(parse_price("4.50"), Ok(Decimal::new(45, 1)));
        assert_eq!(parse_price("  3 "), Ok(Decimal::new(3, 0)));
        assert_eq!(parse_price("0"), Ok(Decimal::ZERO));
    }

    #[test]
    fn accepts_scientific_notation() {
        assert_eq!(parse_price("2.5e1"), Ok(Decimal::new(25, 0)));
    }

    #[test]
    fn blank_price_is_missing_not_malformed() {
        assert_eq!(parse_price("   "), Err(ValidationError::MissingField { field: "price" }));
    }

    #[test]
    fn rejects_non_numeric_text() {
        for text in ["abc", "$4.50", "4,50", "nan"] {
            let error = parse_price(text).expect_err("should reject non-numeric price");
            assert!(
                matches!(error, ValidationError::NotNumeric { ref value, .. } if value == text),
                "unexpected error for `{text}`: {error:?}"
            );
        }
    }

    #[test]
    fn rejects_negative_amounts() {
        let error = parse_price("-1").expect_err("negative price should fail");
        assert!(matches!(error, ValidationError::Negative { .. }));
    }

    #[test]
    fn accepts_the_maximum_price_and_rejects_anything_above() {
        assert_eq!(parse_price("1000000"), Ok(max_price()));
        assert_eq!(format_price(max_price()), "$1000000.00");

        let error = parse_price("1000000.01").expect_err("price above the cap should fail");
        assert!(matches!(error, ValidationError::TooLarge { .. }));
    }

    #[test]
    fn huge_magnitudes_are_rejected_before_they_lose_display_precision() {
        for text in ["79228162514264337593543950335", "7922816251426433759354395033.5"] {
            let error = parse_price(text).expect_err("huge price should fail");
            assert!(
                matches!(error, ValidationError::TooLarge { .. }),
                "unexpected error for `{text}`: {error:?}"
            );
        }
    }

    #[test]
    fn formats_to_two_decimals() {
        assert_eq!(format_amount(Decimal::new(45, 1)), "4.50");
        assert_eq!(format_amount(Decimal::new(3, 0)), "3.00");
        assert_eq!(format_amount(Decimal::ZERO), "0.00");
        assert_eq!(format_amount(Decimal::new(12345, 3)), "12.35");
        assert_eq!(format_price(Decimal::new(575, 2)), "$5.75");
    }
}
