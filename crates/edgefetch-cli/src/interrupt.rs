//! Ctrl-C handling: the first interrupt cancels, the second quits.

use std::future::Future;

/// Process exit status after a forced quit (128 + SIGINT).
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// What to do with the n-th interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptAction {
    /// Cancel in-flight acquisitions and let them unwind.
    Cancel,
    /// Stop waiting and leave the process.
    Exit,
}

impl InterruptAction {
    /// Action for the `count`-th interrupt, counting from 1.
    pub const fn for_count(count: usize) -> Self {
        if count <= 1 { Self::Cancel } else { Self::Exit }
    }
}

/// Wait for interrupts from `next_signal` until an exit is requested or the
/// signal source fails.
pub async fn watch<S, Fut, C, E>(mut next_signal: S, on_cancel: C, on_exit: E)
where
    S: FnMut() -> Fut,
    Fut: Future<Output = std::io::Result<()>>,
    C: Fn(),
    E: FnOnce(),
{
    let mut count = 0usize;
    while next_signal().await.is_ok() {
        count += 1;
        match InterruptAction::for_count(count) {
            InterruptAction::Cancel => on_cancel(),
            InterruptAction::Exit => {
                on_exit();
                return;
            }
        }
    }
}
