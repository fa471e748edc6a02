//! Readiness multiplexing over the batching poll syscall.
//!
//! Register any key that can yield a descriptor, then wait for the set:
//!
//! ```no_run
//! use pollmux::{EventMask, PollFd, Poller};
//! use std::time::Duration;
//!
//! let mut poller = Poller::new();
//! poller.register(PollFd::borrowed(0), EventMask::READABLE)?;
//!
//! for (key, events) in poller.poll(Some(Duration::from_secs(1)))? {
//!     println!("{:?} is ready for {:?}", key, events);
//! }
//! # Ok::<(), pollmux::PollError>(())
//! ```

pub mod common;
pub mod config;
pub mod core;

pub use common::error::{PollError, Result};
pub use config::PollerOptions;
pub use core::net::fd::{PollFd, Pollable};
pub use core::poll::events::EventMask;
pub use core::poll::poller::Poller;
pub use core::poll::probe::{ReadinessProbe, SysPoll};
