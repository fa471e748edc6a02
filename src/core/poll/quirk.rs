// Advisory for platforms whose poll implementation can sit forever on a
// failed outbound connection when given no timeout.
use libc::pollfd;
use std::os::unix::io::RawFd;

use crate::core::poll::events::EventMask;

/// Interest mask a caller ends up with when watching for outbound-connection
/// failure: hangup, error, and normal writability.
const DISCONNECT_INTEREST: EventMask = EventMask::HANGUP
    .union(EventMask::ERROR)
    .union(EventMask::WRITABLE_NORMAL);

pub(crate) const STALE_DISCONNECT_ADVICE: &str =
    "an indefinite-timeout wait may never observe a failed outbound connection \
     on this platform; give poll a finite timeout";

/// True when an indefinite wait over `records` could miss a disconnect
/// notification: some record's requested mask is exactly the disconnect
/// triad and its descriptor is a stream socket.
///
/// The caller supplies the stream-socket test and decides what to do with
/// the answer; the poll outcome is never altered.
pub(crate) fn stale_disconnect_risk<F>(records: &[pollfd], is_stream: F) -> bool
where
    F: Fn(RawFd) -> bool,
{
    records
        .iter()
        .any(|slot| slot.events == DISCONNECT_INTEREST.bits() && is_stream(slot.fd))
}
