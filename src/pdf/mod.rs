//! PDF manipulation module

pub mod font;
pub mod merge;
pub mod metadata;
pub mod stamp;

// Re-export commonly used items
pub use merge::merge_documents;
pub use metadata::count_pages;
pub use stamp::{stamp_document, stamp_geometry, StampGeometry, STAMP_FONT_SIZE};
