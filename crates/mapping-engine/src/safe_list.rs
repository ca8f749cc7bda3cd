//! Codes allowed to be missing from a mapping table

use crate::codes::CodeSet;
use crate::patterns::SAFE_LIST_CODES;

/// Codes that never produce an unmapped-code warning.
///
/// `SafeList::default()` carries the maintained GIFI list; tests and
/// configuration can supply their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeList {
    codes: CodeSet,
}

impl SafeList {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            codes: CodeSet::new(codes),
        }
    }

    /// A list that excuses nothing
    pub fn empty() -> Self {
        Self {
            codes: CodeSet::default(),
        }
    }

    pub fn is_safe_listed(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl Default for SafeList {
    fn default() -> Self {
        Self::new(SAFE_LIST_CODES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_list_covers_gifi_totals() {
        let list = SafeList::default();
        assert_eq!(list.len(), SAFE_LIST_CODES.len());
        for code in ["1599", "2599", "3499", "9999"] {
            assert!(list.is_safe_listed(code), "{} should be safe-listed", code);
        }
        assert!(!list.is_safe_listed("1000"));
    }

    #[test]
    fn test_injected_list_replaces_default() {
        let list = SafeList::new(["4242"]);
        assert!(list.is_safe_listed("4242"));
        assert!(!list.is_safe_listed("2599"));
        assert!(!SafeList::empty().is_safe_listed("2599"));
    }
}
