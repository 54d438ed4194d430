//! Progress reporting helpers.

mod throttle;

pub use throttle::{ProgressThrottle, throttled};
