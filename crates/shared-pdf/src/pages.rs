use crate::error::PdfError;
use std::collections::HashSet;

/// Parse a page selection like "3, 1-2, 5" into page numbers.
///
/// Pages come back in the order they were requested, without duplicates.
/// Page numbers are 1-indexed; 0 is rejected.
pub fn parse_page_selection(input: &str) -> Result<Vec<u32>, PdfError> {
    let mut pages: Vec<u32> = Vec::new();
    let mut seen: HashSet<u32> = HashSet::new();

    let mut push = |page: u32| {
        if seen.insert(page) {
            pages.push(page);
        }
    };

    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if let Some((start, end)) = part.split_once('-') {
            let start: u32 = start.trim().parse().map_err(|_| {
                PdfError::InvalidPageSelection(format!("Invalid start: {}", start))
            })?;
            let end: u32 = end
                .trim()
                .parse()
                .map_err(|_| PdfError::InvalidPageSelection(format!("Invalid end: {}", end)))?;

            if start == 0 {
                return Err(PdfError::InvalidPageSelection(
                    "Page numbers must be >= 1".into(),
                ));
            }
            if start > end {
                return Err(PdfError::InvalidPageSelection(format!(
                    "Start {} > end {}",
                    start, end
                )));
            }

            for page in start..=end {
                push(page);
            }
        } else {
            let page: u32 = part
                .parse()
                .map_err(|_| PdfError::InvalidPageSelection(format!("Invalid page: {}", part)))?;
            if page == 0 {
                return Err(PdfError::InvalidPageSelection(
                    "Page numbers must be >= 1".into(),
                ));
            }
            push(page);
        }
    }

    Ok(pages)
}
