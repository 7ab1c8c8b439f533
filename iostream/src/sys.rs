// SPDX-License-Identifier: Apache-2.0

//! Thin wrappers over the raw descriptor calls streams are built on. Each call
//! retries on `EINTR` and reports failures as [`io::Error`].

use std::ffi::CStr;
use std::io;
use std::os::fd::RawFd;
use std::os::raw::{c_int, c_short};

fn cvt(rc: isize) -> io::Result<usize> {
	if rc < 0 {
		Err(io::Error::last_os_error())
	} else {
		Ok(rc as usize)
	}
}

fn retry<T>(mut f: impl FnMut() -> io::Result<T>) -> io::Result<T> {
	loop {
		match f() {
			Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
			result => return result
		}
	}
}

/// Reads up to `buf.len()` bytes from `fd`. Returns `0` at end of stream.
pub fn read(fd: RawFd, buf: &mut [u8]) -> io::Result<usize> {
	retry(|| {
		// Safety: the pointer and length come from a live mutable slice.
		let rc = unsafe { libc::read(fd, buf.as_mut_ptr().cast(), buf.len()) };
		cvt(rc)
	})
}

/// Writes up to `buf.len()` bytes to `fd`, returning the number written.
pub fn write(fd: RawFd, buf: &[u8]) -> io::Result<usize> {
	retry(|| {
		// Safety: the pointer and length come from a live slice.
		let rc = unsafe { libc::write(fd, buf.as_ptr().cast(), buf.len()) };
		cvt(rc)
	})
}

/// Writes all of `buf` to `fd`, looping over short writes.
pub fn write_all(fd: RawFd, mut buf: &[u8]) -> io::Result<()> {
	while !buf.is_empty() {
		match write(fd, buf)? {
			0 => return Err(io::ErrorKind::WriteZero.into()),
			n => buf = &buf[n..]
		}
	}
	Ok(())
}

/// Repositions `fd`, returning the new offset from the start.
pub fn lseek(fd: RawFd, offset: i64, whence: c_int) -> io::Result<u64> {
	let offset = libc::off_t::try_from(offset).map_err(|_|
		io::Error::from(io::ErrorKind::InvalidInput)
	)?;
	// Safety: lseek has no memory-safety preconditions.
	let rc = unsafe { libc::lseek(fd, offset, whence) };
	if rc < 0 {
		Err(io::Error::last_os_error())
	} else {
		Ok(rc as u64)
	}
}

/// Closes `fd`. `EINTR` is not retried; the descriptor is released either way
/// on Linux.
pub fn close(fd: RawFd) -> io::Result<()> {
	// Safety: callers only close descriptors they own.
	let rc = unsafe { libc::close(fd) };
	cvt(rc as isize).map(drop)
}

/// Polls a single descriptor for `events`, waiting `timeout_ms` milliseconds,
/// or indefinitely if negative. Returns the reported events, `0` on timeout.
pub fn poll_one(fd: RawFd, events: c_short, timeout_ms: c_int) -> io::Result<c_short> {
	let mut pfd = libc::pollfd { fd, events, revents: 0 };
	retry(|| {
		// Safety: pfd outlives the call and nfds matches the single entry.
		let rc = unsafe { libc::poll(&mut pfd, 1, timeout_ms) };
		cvt(rc as isize)
	})?;
	Ok(pfd.revents)
}

/// Returns the OS description of error number `errnum`.
pub fn strerror(errnum: i32) -> String {
	let mut buf = [0 as libc::c_char; 256];
	// Safety: buf is writable for its full length; the XSI variant always
	// NUL-terminates on success.
	let rc = unsafe { libc::strerror_r(errnum, buf.as_mut_ptr(), buf.len()) };
	if rc != 0 {
		return format!("Unknown error {errnum}")
	}

	// Safety: strerror_r succeeded, leaving a NUL-terminated string in buf.
	unsafe { CStr::from_ptr(buf.as_ptr()) }
		.to_string_lossy()
		.into_owned()
}
