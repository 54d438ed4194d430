//! Progress throttling.
//!
//! The engine reports after every chunk; renderers usually want far fewer
//! updates than that.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use edgefetch_core::download::ProgressCallback;

/// Rate-limiter for progress updates.
///
/// Ensures updates are not emitted more frequently than the configured
/// interval.
#[derive(Debug)]
pub struct ProgressThrottle {
    last_emit: Option<Instant>,
    min_interval: Duration,
}

impl ProgressThrottle {
    /// Create a new throttle with the specified minimum interval.
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            last_emit: None,
            min_interval,
        }
    }

    /// Create a throttle with a default interval of 100ms.
    pub const fn default_interval() -> Self {
        Self::new(Duration::from_millis(100))
    }

    /// Check if enough time has passed to emit another update.
    pub fn should_emit(&mut self) -> bool {
        let now = Instant::now();
        match self.last_emit {
            Some(last) if now.duration_since(last) < self.min_interval => false,
            _ => {
                self.last_emit = Some(now);
                true
            }
        }
    }

    /// Force the next check to return true.
    pub const fn reset(&mut self) {
        self.last_emit = None;
    }
}

impl Default for ProgressThrottle {
    fn default() -> Self {
        Self::default_interval()
    }
}

/// Wrap `inner` so it fires at most once per `interval`.
///
/// The first update and the update that reaches the known total always pass.
pub fn throttled(inner: ProgressCallback, interval: Duration) -> ProgressCallback {
    let throttle = Mutex::new(ProgressThrottle::new(interval));
    Arc::new(move |downloaded, total| {
        let complete = total.is_some_and(|t| downloaded >= t);
        let emit = {
            let mut guard = throttle
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if complete {
                guard.reset();
            }
            guard.should_emit()
        };
        if emit {
            inner(downloaded, total);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    #[test]
    fn test_throttle_first_emit() {
        let mut throttle = ProgressThrottle::new(Duration::from_millis(100));
        assert!(throttle.should_emit());
    }

    #[test]
    fn test_throttle_respects_interval() {
        let mut throttle = ProgressThrottle::new(Duration::from_millis(50));
        assert!(throttle.should_emit());
        assert!(!throttle.should_emit());

        std::thread::sleep(Duration::from_millis(60));
        assert!(throttle.should_emit());
    }

    #[test]
    fn test_throttled_callback_always_forwards_completion() {
        let calls = Arc::new(AtomicUsize::new(0));
        let last = Arc::new(AtomicU64::new(0));
        let inner: ProgressCallback = {
            let calls = Arc::clone(&calls);
            let last = Arc::clone(&last);
            Arc::new(move |downloaded, _| {
                calls.fetch_add(1, Ordering::SeqCst);
                last.store(downloaded, Ordering::SeqCst);
            })
        };

        let callback = throttled(inner, Duration::from_secs(60));
        for downloaded in 1..=10 {
            callback(downloaded, Some(10));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(last.load(Ordering::SeqCst), 10);
    }
}
