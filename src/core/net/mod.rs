pub mod fd;

pub use fd::{PollFd, Pollable};
