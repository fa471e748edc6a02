use libc::c_int;

/// Growth-rounding unit used when the host will not report a page size.
pub const DEFAULT_ALLOCATION_GRANULARITY: usize = 4096;

/// Timeout sentinel the readiness syscall interprets as "block forever".
pub const INDEFINITE_TIMEOUT_MS: c_int = -1;
