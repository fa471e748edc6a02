use libc::{c_int, c_void, pollfd, socklen_t};
use std::io;
use std::mem;
use std::os::unix::io::RawFd;

use crate::common::constants::DEFAULT_ALLOCATION_GRANULARITY;

/// Seam over the batching readiness syscall so the poll loop can be driven
/// without a kernel underneath it.
pub trait ReadinessProbe {
    /// Wait for readiness on `records`, filling each returned mask in place.
    ///
    /// Returns the number of records whose returned mask is non-zero. A
    /// negative millisecond timeout blocks indefinitely; zero checks without
    /// blocking. `ErrorKind::Interrupted` is the only failure the caller
    /// retries.
    fn wait(&mut self, records: &mut [pollfd], timeout_ms: c_int) -> io::Result<usize>;
}

/// Production probe backed by `poll(2)`.
pub struct SysPoll;

impl ReadinessProbe for SysPoll {
    fn wait(&mut self, records: &mut [pollfd], timeout_ms: c_int) -> io::Result<usize> {
        let ret = unsafe {
            libc::poll(
                records.as_mut_ptr(),
                records.len() as libc::nfds_t,
                timeout_ms,
            )
        };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(ret as usize)
    }
}

/// Process-wide allocation granularity, queried once per poller construction.
pub(crate) fn allocation_granularity() -> usize {
    let page = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if page > 0 {
        page as usize
    } else {
        DEFAULT_ALLOCATION_GRANULARITY
    }
}

/// Whether `fd` refers to a stream-oriented socket. Non-sockets answer no.
pub(crate) fn is_stream_socket(fd: RawFd) -> bool {
    let mut sock_type: c_int = 0;
    let mut len = mem::size_of::<c_int>() as socklen_t;
    let ret = unsafe {
        libc::getsockopt(
            fd,
            libc::SOL_SOCKET,
            libc::SO_TYPE,
            &mut sock_type as *mut c_int as *mut c_void,
            &mut len,
        )
    };
    ret == 0 && sock_type == libc::SOCK_STREAM
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{TcpListener, UdpSocket};
    use std::os::unix::io::AsRawFd;

    #[test]
    fn test_allocation_granularity_is_positive() {
        assert!(allocation_granularity() > 0);
    }

    #[test]
    fn test_stream_socket_detection() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        assert!(is_stream_socket(listener.as_raw_fd()));

        let datagram = UdpSocket::bind("127.0.0.1:0").unwrap();
        assert!(!is_stream_socket(datagram.as_raw_fd()));
    }

    #[test]
    fn test_sys_poll_immediate_timeout_on_empty_set() {
        let mut probe = SysPoll;
        let ready = probe.wait(&mut [], 0).unwrap();
        assert_eq!(ready, 0);
    }
}
