use std::collections::HashSet;

/// A set of trimmed codes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeSet {
    codes: HashSet<String>,
}

impl CodeSet {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            codes: codes
                .into_iter()
                .map(|c| c.as_ref().trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code.trim())
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_is_trimmed_and_exact() {
        let set = CodeSet::new([" 1000", "2000 ", ""]);
        assert_eq!(set.len(), 2);
        assert!(set.contains("1000"));
        assert!(set.contains(" 2000"));
        assert!(!set.contains("100"));
        assert!(!set.contains(""));
    }
}
