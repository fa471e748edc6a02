use libc::c_short;

bitflags::bitflags! {
    /// Interest and readiness bits, bit-exact with the native poll flags so
    /// the record table can be handed to the syscall unconverted.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EventMask: c_short {
        const READABLE = libc::POLLIN;
        const READABLE_NORMAL = libc::POLLRDNORM;
        const READABLE_BAND = libc::POLLRDBAND;
        const PRIORITY = libc::POLLPRI;
        const WRITABLE = libc::POLLOUT;
        const WRITABLE_NORMAL = libc::POLLWRNORM;
        const WRITABLE_BAND = libc::POLLWRBAND;
        const ERROR = libc::POLLERR;
        const HANGUP = libc::POLLHUP;
        const INVALID = libc::POLLNVAL;
    }
}

impl EventMask {
    /// Conventional interest mask for a newly registered descriptor.
    pub const DEFAULT: EventMask = EventMask::READABLE
        .union(EventMask::PRIORITY)
        .union(EventMask::WRITABLE);
}

impl Default for EventMask {
    fn default() -> Self {
        EventMask::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_match_native_flags() {
        assert_eq!(EventMask::READABLE.bits(), libc::POLLIN);
        assert_eq!(EventMask::PRIORITY.bits(), libc::POLLPRI);
        assert_eq!(EventMask::WRITABLE.bits(), libc::POLLOUT);
        assert_eq!(EventMask::ERROR.bits(), libc::POLLERR);
        assert_eq!(EventMask::HANGUP.bits(), libc::POLLHUP);
        assert_eq!(EventMask::INVALID.bits(), libc::POLLNVAL);
    }

    #[test]
    fn test_default_interest() {
        let mask = EventMask::default();
        assert_eq!(mask.bits(), libc::POLLIN | libc::POLLPRI | libc::POLLOUT);
    }

    #[test]
    fn test_returned_bits_survive_round_trip() {
        let returned = libc::POLLOUT | libc::POLLHUP;
        assert_eq!(EventMask::from_bits_retain(returned).bits(), returned);
    }
}
