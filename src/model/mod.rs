//! Domain model types (pure).
//!
//! All types in this module are plain data: decoded wire records, derived row models and the
//! styled text they carry.

pub mod error;
pub mod identifiers;
pub mod review;
pub mod row;
pub mod text;

// Re-export for convenience
pub use error::{AppError, FetchError, ImageError};
pub use identifiers::RowId;
pub use review::{ReviewRecord, ReviewsPage};
pub use row::{RowFactory, RowModel, DEFAULT_COLLAPSED_MAX_LINES};
pub use text::{Font, StyledText, Typography};
