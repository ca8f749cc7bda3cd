// Amount normalization: strip formatting, apply the parenthetical sign
use crate::codes::CodeSet;
use crate::error::ValueParseError;
use crate::extractors::parenthetical::ParentheticalFlags;
use crate::patterns::{CURRENCY_SYMBOLS, POSITIVE_EXCEPTION_CODES};
use shared_types::PageExtraction;
use tracing::warn;

/// Codes that stay positive even when printed in parentheses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignExceptions {
    codes: CodeSet,
}

impl SignExceptions {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            codes: CodeSet::new(codes),
        }
    }

    pub fn empty() -> Self {
        Self {
            codes: CodeSet::default(),
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }
}

impl Default for SignExceptions {
    fn default() -> Self {
        Self::new(POSITIVE_EXCEPTION_CODES)
    }
}

/// Parse an amount after dropping commas, currency symbols and parentheses
pub fn parse_amount(raw: &str) -> Result<i64, ValueParseError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, ',' | '(' | ')') && !CURRENCY_SYMBOLS.contains(c))
        .collect();
    cleaned.trim().parse::<i64>().map_err(|_| ValueParseError {
        raw: raw.to_string(),
    })
}

/// Canonical signed amount for one extracted value.
///
/// Unparseable values come back unchanged so one bad cell never sinks the
/// batch. Zero is always "0".
pub fn normalize_value(
    code: &str,
    raw: &str,
    parenthetical: bool,
    exceptions: &SignExceptions,
) -> String {
    let amount = match parse_amount(raw) {
        Ok(amount) => amount,
        Err(e) => {
            warn!(code = %code, error = %e, "Failed to process value");
            return raw.to_string();
        }
    };

    if parenthetical && !exceptions.contains(code) {
        match amount.checked_neg() {
            Some(negated) => negated.to_string(),
            None => {
                warn!(code = %code, raw = %raw, "Amount out of range for negation");
                raw.to_string()
            }
        }
    } else {
        amount.to_string()
    }
}

/// Applies [`normalize_value`] with a fixed exception set
#[derive(Debug, Clone, Default)]
pub struct ValueNormalizer {
    exceptions: SignExceptions,
}

impl ValueNormalizer {
    pub fn new(exceptions: SignExceptions) -> Self {
        Self { exceptions }
    }

    pub fn exceptions(&self) -> &SignExceptions {
        &self.exceptions
    }

    pub fn normalize(&self, code: &str, raw: &str, parenthetical: bool) -> String {
        normalize_value(code, raw, parenthetical, &self.exceptions)
    }

    /// Normalize every value on a page using that page's parenthetical flags
    pub fn normalize_page(
        &self,
        page: &PageExtraction,
        flags: &ParentheticalFlags,
    ) -> PageExtraction {
        page.iter()
            .map(|(code, raw)| (code, self.normalize(code, raw, flags.is_parenthetical(code))))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parenthetical_negates() {
        let ex = SignExceptions::default();
        assert_eq!(normalize_value("1000", "$ (1,234)", true, &ex), "-1234");
    }

    #[test]
    fn test_exception_stays_positive() {
        let ex = SignExceptions::default();
        assert_eq!(normalize_value("1741", "$ (1,234)", true, &ex), "1234");
        assert_eq!(normalize_value("1741", "$45,000", true, &ex), "45000");
    }

    #[test]
    fn test_not_parenthetical_keeps_sign() {
        let ex = SignExceptions::default();
        assert_eq!(normalize_value("1000", "1,234", false, &ex), "1234");
        assert_eq!(normalize_value("1000", "-50", false, &ex), "-50");
    }

    #[test]
    fn test_zero_has_no_sign() {
        let ex = SignExceptions::default();
        assert_eq!(normalize_value("1000", "0", true, &ex), "0");
        assert_eq!(normalize_value("1000", "(0)", true, &ex), "0");
        assert_eq!(normalize_value("1000", "-0", false, &ex), "0");
    }

    #[test]
    fn test_leading_zeros_and_currency_dropped() {
        let ex = SignExceptions::empty();
        assert_eq!(normalize_value("1000", "007", false, &ex), "7");
        assert_eq!(normalize_value("1000", "£1,000", false, &ex), "1000");
        assert_eq!(normalize_value("1000", " € 12 ", true, &ex), "-12");
    }

    #[test]
    fn test_unparseable_passes_through() {
        let ex = SignExceptions::default();
        assert_eq!(normalize_value("1000", "1234.56", true, &ex), "1234.56");
        assert_eq!(normalize_value("1000", "n/a", false, &ex), "n/a");
        assert_eq!(normalize_value("1000", "", true, &ex), "");
    }

    #[test]
    fn test_out_of_range_negation_passes_through() {
        let ex = SignExceptions::empty();
        let raw = "-9223372036854775808";
        assert_eq!(normalize_value("1000", raw, true, &ex), raw);
    }

    #[test]
    fn test_parse_amount_error_carries_raw() {
        assert_eq!(parse_amount("(1,234)"), Ok(1234));
        assert_eq!(
            parse_amount("12a"),
            Err(ValueParseError {
                raw: "12a".to_string()
            })
        );
    }

    #[test]
    fn test_normalize_page_uses_flags_per_code() {
        let normalizer = ValueNormalizer::default();
        let page: PageExtraction = [("1000", "500"), ("1741", "45,000"), ("8000", "(1,200)")]
            .into_iter()
            .collect();
        let mut flags = ParentheticalFlags::new();
        flags.mark("1741");
        flags.mark("8000");

        let normalized = normalizer.normalize_page(&page, &flags);
        let values: Vec<_> = normalized.iter().collect();
        assert_eq!(
            values,
            vec![("1000", "500"), ("1741", "45000"), ("8000", "-1200")]
        );
    }
}
