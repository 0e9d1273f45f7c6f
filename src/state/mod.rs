//! List state machine.
//!
//! The controller is the only writer; everything else reads immutable snapshots.

pub mod list_state;
pub mod pagination;

// Re-export for convenience
pub use list_state::{ListState, LoadPhase, Snapshot};
pub use pagination::{
    should_prefetch, PaginationController, RequestOutcome, DEFAULT_PREFETCH_SCREENS,
};
