//! GIFI code lists and regex patterns

use lazy_static::lazy_static;
use regex::Regex;

/// Codes that are intentionally absent from mapping tables.
///
/// Totals and catch-all lines with no destination cell. Seeing one of these
/// without a mapping is expected and must not produce a warning.
pub const SAFE_LIST_CODES: &[&str] = &[
    "1599", "2599", "3139", "3499", "3600", "3620", "3640", "3680", "3720", "3849", "8089",
    "8299", "8518", "8519", "9367", "9368", "9369", "9970", "9998", "9999",
];

/// Codes shown in parentheses on statements that still carry positive amounts
pub const POSITIVE_EXCEPTION_CODES: &[&str] = &[
    "1741", // Accumulated amortization of machinery, equipment, furniture and fixtures
    "1743", // Accumulated amortization of automotive equipment
    "1745", // Accumulated amortization of leasehold improvements
    "1775", // Accumulated amortization of intangible assets
    "1786", // Accumulated amortization of resource properties
    "1787", // Accumulated amortization of deferred charges
    "1788", // Accumulated amortization of deferred expenses
    "1919", // Accumulated amortization of goodwill
];

/// Line-item codes are four digits
pub const DEFAULT_CODE_PATTERN: &str = r"\d{4}";

/// Characters removed from an amount before parsing
pub const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥'];

lazy_static! {
    /// Code, then a run of spaces or leader dots, then a parenthesized amount
    pub static ref PARENTHETICAL_AMOUNT: Regex =
        parenthetical_regex(DEFAULT_CODE_PATTERN).expect("default parenthetical pattern");
}

/// Build the parenthetical-amount regex around a code pattern.
///
/// Matches `1000 ($1,234)`, `1000............(1,234)` and `1000 (1234)`.
/// The code is captured as `code`, the bracketed amount as `amount`.
pub fn parenthetical_regex(code_pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"\b(?P<code>{})[\s.]+\((?P<amount>[$€£¥\s]?\s*[\d,]+)\)",
        code_pattern
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_regex_captures_code_and_amount() {
        let caps = PARENTHETICAL_AMOUNT
            .captures("1741 ............ ($45,000)")
            .unwrap();
        assert_eq!(&caps["code"], "1741");
        assert_eq!(&caps["amount"], "$45,000");
    }

    #[test]
    fn test_default_regex_ignores_plain_amounts() {
        assert!(!PARENTHETICAL_AMOUNT.is_match("1000 ........ 1,234"));
        assert!(!PARENTHETICAL_AMOUNT.is_match("(1,234) 1000"));
    }

    #[test]
    fn test_default_regex_needs_whole_code() {
        // five digits are not a four-digit code
        assert!(!PARENTHETICAL_AMOUNT.is_match("12345 (10)"));
    }

    #[test]
    fn test_custom_code_pattern() {
        let re = parenthetical_regex(r"[A-Z]\d{3}").unwrap();
        let caps = re.captures("A100 .... (12)").unwrap();
        assert_eq!(&caps["code"], "A100");
        assert!(parenthetical_regex("(").is_err());
    }

    #[test]
    fn test_code_lists_are_disjoint() {
        for code in POSITIVE_EXCEPTION_CODES {
            assert!(!SAFE_LIST_CODES.contains(code));
        }
    }
}
