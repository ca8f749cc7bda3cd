//! PDF-side collaborators for the extraction pipeline
//!
//! Everything here sits at the edge of the mapping core: layout text for
//! parenthetical detection, page counting and selection, and rasterizing
//! pages into images for the recognizer.

pub mod error;
pub mod layout;
pub mod pages;
pub mod raster;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::PdfError;
pub use layout::{page_count, LayoutTextSource, PdfLayoutText};
pub use pages::parse_page_selection;
pub use raster::{PdftocairoRasterizer, Rasterizer};
