use crate::common::error::{PollError, Result};
use std::fs::File;
use std::io;
use std::net::{TcpListener, TcpStream, UdpSocket};
use std::os::unix::io::{AsRawFd, RawFd};
use std::os::unix::net::{UnixListener, UnixStream};
use std::rc::Rc;
use std::sync::Arc;

/// A value that can yield the descriptor the poller should watch.
///
/// Keys stay owned by the poller's registry and are handed back verbatim in
/// poll results and on unregister; the poller never closes a descriptor it
/// did not open.
pub trait Pollable {
    fn poll_descriptor(&self) -> Result<RawFd>;
}

impl Pollable for RawFd {
    fn poll_descriptor(&self) -> Result<RawFd> {
        if *self < 0 {
            return Err(PollError::Descriptor(io::Error::from_raw_os_error(
                libc::EBADF,
            )));
        }
        Ok(*self)
    }
}

impl Pollable for TcpStream {
    fn poll_descriptor(&self) -> Result<RawFd> {
        Ok(self.as_raw_fd())
    }
}

impl Pollable for TcpListener {
    fn poll_descriptor(&self) -> Result<RawFd> {
        Ok(self.as_raw_fd())
    }
}

impl Pollable for UdpSocket {
    fn poll_descriptor(&self) -> Result<RawFd> {
        Ok(self.as_raw_fd())
    }
}

impl Pollable for UnixStream {
    fn poll_descriptor(&self) -> Result<RawFd> {
        Ok(self.as_raw_fd())
    }
}

impl Pollable for UnixListener {
    fn poll_descriptor(&self) -> Result<RawFd> {
        Ok(self.as_raw_fd())
    }
}

impl Pollable for File {
    fn poll_descriptor(&self) -> Result<RawFd> {
        Ok(self.as_raw_fd())
    }
}

impl<T: Pollable + ?Sized> Pollable for &T {
    fn poll_descriptor(&self) -> Result<RawFd> {
        (**self).poll_descriptor()
    }
}

impl<T: Pollable + ?Sized> Pollable for Box<T> {
    fn poll_descriptor(&self) -> Result<RawFd> {
        (**self).poll_descriptor()
    }
}

impl<T: Pollable + ?Sized> Pollable for Rc<T> {
    fn poll_descriptor(&self) -> Result<RawFd> {
        (**self).poll_descriptor()
    }
}

impl<T: Pollable + ?Sized> Pollable for Arc<T> {
    fn poll_descriptor(&self) -> Result<RawFd> {
        (**self).poll_descriptor()
    }
}

/// Raw descriptor handle that can optionally own (and close) the fd.
#[derive(Debug)]
pub struct PollFd {
    fd: RawFd,
    owned: bool,
}

impl PollFd {
    /// Wrap an fd owned elsewhere; dropping the handle leaves it open.
    pub fn borrowed(fd: RawFd) -> Self {
        Self { fd, owned: false }
    }

    /// Take ownership; the fd is closed on drop.
    pub fn owned(fd: RawFd) -> Self {
        Self { fd, owned: true }
    }

    pub fn set_non_blocking(&self) -> Result<()> {
        unsafe {
            let flags = libc::fcntl(self.fd, libc::F_GETFL);
            if flags < 0 {
                return Err(PollError::Descriptor(io::Error::last_os_error()));
            }

            if libc::fcntl(self.fd, libc::F_SETFL, flags | libc::O_NONBLOCK) < 0 {
                return Err(PollError::Descriptor(io::Error::last_os_error()));
            }
        }
        Ok(())
    }
}

impl AsRawFd for PollFd {
    fn as_raw_fd(&self) -> RawFd {
        self.fd
    }
}

impl Pollable for PollFd {
    fn poll_descriptor(&self) -> Result<RawFd> {
        self.fd.poll_descriptor()
    }
}

impl Drop for PollFd {
    fn drop(&mut self) {
        if self.owned && self.fd >= 0 {
            unsafe {
                libc::close(self.fd);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_pipe() -> (RawFd, RawFd) {
        let mut fds: [RawFd; 2] = [-1, -1];
        assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);
        (fds[0], fds[1])
    }

    #[test]
    fn test_negative_descriptor_fails_resolution() {
        let bad: RawFd = -1;
        assert!(matches!(
            bad.poll_descriptor(),
            Err(PollError::Descriptor(_))
        ));
    }

    #[test]
    fn test_owned_fd_closes_on_drop() {
        let (read_fd, write_fd) = raw_pipe();
        let read = PollFd::owned(read_fd);
        drop(PollFd::owned(write_fd));

        // Peer close is observable as end-of-file on the surviving end.
        let mut byte = 0_u8;
        let n = unsafe {
            libc::read(
                read.as_raw_fd(),
                &mut byte as *mut u8 as *mut libc::c_void,
                1,
            )
        };
        assert_eq!(n, 0);
    }

    #[test]
    fn test_borrowed_fd_stays_open() {
        let (read_fd, write_fd) = raw_pipe();
        drop(PollFd::borrowed(write_fd));

        // The fd was not closed by the wrapper, so writing still works.
        let data = 1_u8;
        let written = unsafe {
            libc::write(write_fd, &data as *const u8 as *const libc::c_void, 1)
        };
        assert_eq!(written, 1);
        unsafe {
            libc::close(read_fd);
            libc::close(write_fd);
        }
    }

    #[test]
    fn test_shared_keys_resolve_through_wrappers() {
        let (read_fd, write_fd) = raw_pipe();
        let shared = Rc::new(PollFd::owned(read_fd));
        assert_eq!(shared.poll_descriptor().unwrap(), read_fd);
        assert_eq!(Rc::clone(&shared).poll_descriptor().unwrap(), read_fd);
        unsafe {
            libc::close(write_fd);
        }
    }

    #[test]
    fn test_set_non_blocking() {
        let (read_fd, write_fd) = raw_pipe();
        let read = PollFd::owned(read_fd);
        let _write = PollFd::owned(write_fd);
        read.set_non_blocking().unwrap();
        let flags = unsafe { libc::fcntl(read_fd, libc::F_GETFL) };
        assert_ne!(flags & libc::O_NONBLOCK, 0);
    }
}
