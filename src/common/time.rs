use std::time::{Duration, Instant};

/// Absolute deadline for a bounded wait.
///
/// Captured once before the retry loop so elapsed time across interrupted
/// syscalls accumulates against the caller's original timeout.
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    pub fn after(timeout: Duration) -> Self {
        let now = Instant::now();
        // Clamp absurd timeouts instead of overflowing the clock; a single
        // syscall cannot wait past its c_int millisecond argument anyway.
        let at = now
            .checked_add(timeout)
            .unwrap_or_else(|| now + Duration::from_millis(i32::MAX as u64));
        Self { at }
    }

    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }
}
