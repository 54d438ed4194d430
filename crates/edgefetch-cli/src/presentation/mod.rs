//! Shared CLI presentation utilities.
//!
//! Keep this module format-only: no acquisition logic.

pub mod progress;
pub mod tables;

pub use progress::TransferProgress;
pub use tables::{format_size, print_separator, truncate_string};
