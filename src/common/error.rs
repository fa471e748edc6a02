use std::fmt;
use std::os::unix::io::RawFd;

#[derive(Debug)]
pub enum PollError {
    /// The descriptor behind the given key is not in the poll set.
    NotRegistered(RawFd),
    /// The readiness syscall failed with something other than an interrupt.
    Wait(std::io::Error),
    /// The key could not yield a usable descriptor.
    Descriptor(std::io::Error),
    /// Options failed to parse or validate.
    Options(String),
}

impl fmt::Display for PollError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollError::NotRegistered(fd) => write!(f, "Not registered: descriptor {}", fd),
            PollError::Wait(e) => write!(f, "Readiness wait failed: {}", e),
            PollError::Descriptor(e) => write!(f, "Descriptor resolution failed: {}", e),
            PollError::Options(msg) => write!(f, "Options error: {}", msg),
        }
    }
}

impl std::error::Error for PollError {}

impl From<std::io::Error> for PollError {
    fn from(err: std::io::Error) -> Self {
        PollError::Wait(err)
    }
}

pub type Result<T> = std::result::Result<T, PollError>;
