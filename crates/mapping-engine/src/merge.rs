// Page merging: combine per-page extractions into one document table
use shared_types::{MergedExtraction, PageExtraction};
use tracing::debug;

/// Merge pages in the order given.
///
/// Empty values are treated as missing input. When two pages report the same
/// code the later page wins, but the code keeps the position it was first
/// seen at.
pub fn merge_pages<'a, I>(pages: I) -> MergedExtraction
where
    I: IntoIterator<Item = &'a PageExtraction>,
{
    let mut merged = MergedExtraction::new();
    for page in pages {
        for (code, value) in page.iter() {
            let value = value.trim();
            if code.is_empty() || value.is_empty() {
                continue;
            }
            if let Some(previous) = merged.get(code) {
                if previous != value {
                    debug!(
                        code = %code,
                        previous = %previous,
                        value = %value,
                        "Later page overrides code"
                    );
                }
            }
            merged.insert(code, value);
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn page(pairs: &[(&str, &str)]) -> PageExtraction {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_last_page_wins() {
        let pages = [page(&[("1000", "100")]), page(&[("1000", "200")])];
        let merged = merge_pages(&pages);
        assert_eq!(merged.get("1000"), Some("200"));
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_encounter_order_is_kept() {
        let pages = [
            page(&[("3000", "1"), ("1000", "2")]),
            page(&[("2000", "3"), ("3000", "4")]),
        ];
        let merged = merge_pages(&pages);
        let entries: Vec<_> = merged.iter().collect();
        assert_eq!(entries, vec![("3000", "4"), ("1000", "2"), ("2000", "3")]);
    }

    #[test]
    fn test_empty_values_are_absent() {
        let pages = [page(&[("1000", "500"), ("2599", ""), ("3000", "  ")])];
        let merged = merge_pages(&pages);
        assert_eq!(merged.get("2599"), None);
        assert_eq!(merged.get("3000"), None);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_empty_later_value_does_not_erase() {
        let pages = [page(&[("1000", "100")]), page(&[("1000", "")])];
        assert_eq!(merge_pages(&pages).get("1000"), Some("100"));
    }
}
