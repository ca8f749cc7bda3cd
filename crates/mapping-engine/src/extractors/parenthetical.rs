// Parenthetical amount detection in page layout text
use crate::error::MappingError;
use crate::patterns::{parenthetical_regex, DEFAULT_CODE_PATTERN, PARENTHETICAL_AMOUNT};
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Codes whose amount was printed in parentheses on one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentheticalFlags {
    codes: HashSet<String>,
}

impl ParentheticalFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, code: &str) {
        self.codes.insert(code.trim().to_string());
    }

    /// Absent codes read as `false`
    pub fn is_parenthetical(&self, code: &str) -> bool {
        self.codes.contains(code.trim())
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Scans layout text for `code ... (amount)` runs
#[derive(Debug, Clone)]
pub struct ParentheticalResolver {
    regex: Regex,
}

impl Default for ParentheticalResolver {
    fn default() -> Self {
        Self {
            regex: PARENTHETICAL_AMOUNT.clone(),
        }
    }
}

impl ParentheticalResolver {
    /// Resolver for codes matching `code_pattern` (a regex fragment)
    pub fn new(code_pattern: &str) -> Result<Self, MappingError> {
        if code_pattern == DEFAULT_CODE_PATTERN {
            return Ok(Self::default());
        }
        Ok(Self {
            regex: parenthetical_regex(code_pattern)?,
        })
    }

    pub fn resolve(&self, layout_text: &str) -> ParentheticalFlags {
        let mut flags = ParentheticalFlags::new();
        for caps in self.regex.captures_iter(layout_text) {
            let code = &caps["code"];
            debug!(code = %code, amount = %&caps["amount"], "Found parenthetical value");
            flags.mark(code);
        }
        flags
    }
}

/// One-shot resolution; an unusable pattern yields no evidence
pub fn resolve_parentheticals(layout_text: &str, code_pattern: &str) -> ParentheticalFlags {
    match ParentheticalResolver::new(code_pattern) {
        Ok(resolver) => resolver.resolve(layout_text),
        Err(e) => {
            warn!(error = %e, "Skipping parenthetical resolution");
            ParentheticalFlags::new()
        }
    }
}
