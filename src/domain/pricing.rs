//! Money and weight arithmetic shared by the cart and the order workflow.
//!
//! Prices are stored as integer cents per kilogram and quantities as integer
//! grams, so every calculation here is exact integer math.

use serde::Serialize;

use crate::domain::slot::FulfillmentType;

/// Number of grams in one kilogram.
pub const GRAMS_PER_KG: i64 = 1000;

/// Price of `quantity_grams` at `price_cents` per kilogram, rounded half up to
/// a whole cent.
pub fn line_total_cents(price_cents: i32, quantity_grams: i32) -> i64 {
    let raw = i64::from(price_cents.max(0)) * i64::from(quantity_grams.max(0));
    (raw + GRAMS_PER_KG / 2) / GRAMS_PER_KG
}

/// Subtotal, delivery fee and grand total of a set of priced lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct OrderTotals {
    /// Sum of all line totals.
    pub subtotal_cents: i64,
    /// Delivery fee charged for the order, zero for pickup.
    pub delivery_fee_cents: i64,
    /// `subtotal_cents + delivery_fee_cents`.
    pub total_cents: i64,
}

impl OrderTotals {
    /// Compute the totals for `(price_cents, quantity_grams)` lines.
    ///
    /// The delivery fee is only charged when `fulfillment` is
    /// [`FulfillmentType::Delivery`]; a missing fulfillment choice is treated as
    /// pickup so the cart page can show a subtotal before a slot is picked.
    pub fn compute<I>(
        lines: I,
        fulfillment: Option<FulfillmentType>,
        delivery_fee_cents: i32,
    ) -> Self
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        let subtotal_cents = lines
            .into_iter()
            .map(|(price_cents, quantity_grams)| line_total_cents(price_cents, quantity_grams))
            .sum::<i64>();

        let delivery_fee_cents = match fulfillment {
            Some(FulfillmentType::Delivery) => i64::from(delivery_fee_cents.max(0)),
            _ => 0,
        };

        Self {
            subtotal_cents,
            delivery_fee_cents,
            total_cents: subtotal_cents + delivery_fee_cents,
        }
    }
}

/// Render cents as a decimal amount with two fractional digits.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// Render grams as kilograms without trailing zeros (`1500` -> `1.5`).
pub fn format_kg(grams: i32) -> String {
    let grams = i64::from(grams);
    let whole = grams / GRAMS_PER_KG;
    let fraction = (grams % GRAMS_PER_KG).abs();

    if fraction == 0 {
        return whole.to_string();
    }

    let digits = format!("{fraction:03}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

/// Parse a decimal amount such as `12`, `12.5` or `12,50` into cents.
///
/// Negative values and more than two fractional digits are rejected.
pub fn parse_cents(input: &str) -> Option<i32> {
    parse_scaled(input, 2).and_then(|value| i32::try_from(value).ok())
}

/// Parse a decimal weight in kilograms such as `1.25` into grams.
///
/// Negative values and more than three fractional digits are rejected.
pub fn parse_grams(input: &str) -> Option<i32> {
    parse_scaled(input, 3).and_then(|value| i32::try_from(value).ok())
}

fn parse_scaled(input: &str, max_fraction_digits: usize) -> Option<i64> {
    let normalized = input.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }

    let (whole, fraction) = match normalized.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (normalized.as_str(), ""),
    };

    if fraction.len() > max_fraction_digits {
        return None;
    }

    if whole.is_empty() && fraction.is_empty() {
        return None;
    }

    let all_digits = |part: &str| part.chars().all(|ch| ch.is_ascii_digit());
    if !all_digits(whole) || !all_digits(fraction) {
        return None;
    }

    let whole_value: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let scale = 10_i64.pow(max_fraction_digits as u32);

    let mut fraction_value: i64 = if fraction.is_empty() { 0 } else { fraction.parse().ok()? };
    for _ in fraction.len()..max_fraction_digits {
        fraction_value *= 10;
    }

    whole_value.checked_mul(scale)?.checked_add(fraction_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_total_rounds_half_up() {
        assert_eq!(line_total_cents(1250, 1000), 1250);
        assert_eq!(line_total_cents(1250, 1500), 1875);
        // 999 * 333 / 1000 = 332.667
        assert_eq!(line_total_cents(999, 333), 333);
        // 1 * 500 / 1000 = 0.5
        assert_eq!(line_total_cents(1, 500), 1);
        assert_eq!(line_total_cents(1, 499), 0);
    }

    #[test]
    fn totals_include_fee_only_for_delivery() {
        let lines = vec![(2000, 1500), (1000, 250)];

        let pickup = OrderTotals::compute(lines.clone(), Some(FulfillmentType::Pickup), 500);
        assert_eq!(pickup.subtotal_cents, 3000 + 250);
        assert_eq!(pickup.delivery_fee_cents, 0);
        assert_eq!(pickup.total_cents, 3250);

        let delivery = OrderTotals::compute(lines.clone(), Some(FulfillmentType::Delivery), 500);
        assert_eq!(delivery.subtotal_cents, 3250);
        assert_eq!(delivery.delivery_fee_cents, 500);
        assert_eq!(delivery.total_cents, 3750);

        let undecided = OrderTotals::compute(lines, None, 500);
        assert_eq!(undecided.total_cents, 3250);
    }

    #[test]
    fn formats_amounts_and_weights() {
        assert_eq!(format_cents(1250), "12.50");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(-199), "-1.99");
        assert_eq!(format_kg(1500), "1.5");
        assert_eq!(format_kg(2000), "2");
        assert_eq!(format_kg(250), "0.25");
        assert_eq!(format_kg(5), "0.005");
    }

    #[test]
    fn parses_decimal_inputs() {
        assert_eq!(parse_cents("12"), Some(1200));
        assert_eq!(parse_cents("12.5"), Some(1250));
        assert_eq!(parse_cents(" 12,05 "), Some(1205));
        assert_eq!(parse_cents(".5"), Some(50));
        assert_eq!(parse_cents("12.505"), None);
        assert_eq!(parse_cents("-1"), None);
        assert_eq!(parse_cents("abc"), None);
        assert_eq!(parse_cents(""), None);

        assert_eq!(parse_grams("1.5"), Some(1500));
        assert_eq!(parse_grams("0,25"), Some(250));
        assert_eq!(parse_grams("3"), Some(3000));
        assert_eq!(parse_grams("0.0005"), None);
    }
}
