// Shared fixtures for poller integration tests

use pollmux::PollFd;
use std::os::unix::io::{AsRawFd, RawFd};

/// Non-blocking pipe; both ends close on drop.
pub fn pipe_pair() -> (PollFd, PollFd) {
    let mut fds: [RawFd; 2] = [-1, -1];
    assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0, "pipe creation failed");
    let read = PollFd::owned(fds[0]);
    let write = PollFd::owned(fds[1]);
    read.set_non_blocking().unwrap();
    write.set_non_blocking().unwrap();
    (read, write)
}

/// Make the matching read end readable.
pub fn write_byte(fd: &PollFd) {
    let data = 1_u8;
    let written = unsafe {
        libc::write(
            fd.as_raw_fd(),
            &data as *const u8 as *const libc::c_void,
            1,
        )
    };
    assert_eq!(written, 1);
}

/// Stuff the pipe until its write end would block.
pub fn fill_pipe(fd: &PollFd) {
    let buf = [0_u8; 4096];
    loop {
        let written = unsafe {
            libc::write(
                fd.as_raw_fd(),
                buf.as_ptr() as *const libc::c_void,
                buf.len(),
            )
        };
        if written < 0 {
            break;
        }
    }
}
