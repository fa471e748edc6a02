pub mod events;
pub mod poller;
pub mod probe;
pub mod quirk;

pub(crate) mod records;
pub(crate) mod registry;

pub use events::EventMask;
pub use poller::Poller;
pub use probe::{ReadinessProbe, SysPoll};
