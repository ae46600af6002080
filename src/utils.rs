// ABOUTME: Small shared helpers: phone normalization and display formatting.
// ABOUTME: Applied before change-diffing so cosmetic differences still count as changes.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Relay CRM Intelligence

//! Shared utility helpers

/// Normalize a phone number to the stored display format.
///
/// 10-digit US numbers become `(NNN) NNN-NNNN`; 11-digit numbers starting
/// with `1` become `+1 (NNN) NNN-NNNN`. Inputs matching neither shape pass
/// through unchanged.
#[must_use]
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    match digits.len() {
        10 => format!("({}) {}-{}", &digits[0..3], &digits[3..6], &digits[6..10]),
        11 if digits.starts_with('1') => format!(
            "+1 ({}) {}-{}",
            &digits[1..4],
            &digits[4..7],
            &digits[7..11]
        ),
        _ => raw.to_owned(),
    }
}

/// Format a monetary amount for display, dropping a zero fraction.
#[must_use]
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{amount:.0}")
    } else {
        format!("{amount:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_ten_digit_numbers() {
        assert_eq!(normalize_phone("5551234567"), "(555) 123-4567");
        assert_eq!(normalize_phone("555.123.4567"), "(555) 123-4567");
    }

    #[test]
    fn normalizes_eleven_digit_numbers_with_country_code() {
        assert_eq!(normalize_phone("15551234567"), "+1 (555) 123-4567");
        assert_eq!(normalize_phone("1-555-123-4567"), "+1 (555) 123-4567");
    }

    #[test]
    fn passes_through_unrecognized_shapes() {
        assert_eq!(normalize_phone("not-a-phone"), "not-a-phone");
        assert_eq!(normalize_phone("+44 20 7946 0958"), "+44 20 7946 0958");
    }

    #[test]
    fn formats_amounts() {
        assert_eq!(format_amount(50000.0), "50000");
        assert_eq!(format_amount(1234.5), "1234.50");
    }
}
