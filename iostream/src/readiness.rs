// SPDX-License-Identifier: Apache-2.0

//! Readiness checks over a single descriptor. Faults are reported as values,
//! not errors.

use std::os::fd::RawFd;
use amplify_derive::Display;
use tracing::warn;
use crate::sys;

const READ_EVENTS: libc::c_short = libc::POLLIN | libc::POLLPRI;
const FAULT_EVENTS: libc::c_short = libc::POLLERR | libc::POLLNVAL;
/// Pipes report only `POLLHUP` once the writer closes, with no `POLLIN`.
const HANGUP_READY: libc::c_short = READ_EVENTS | libc::POLLHUP;

/// The outcome of waiting on a descriptor.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Display)]
pub enum Readiness {
	/// Data, or end-of-stream, can be read without blocking.
	#[display("ready")]
	Ready,
	/// The OS reports the descriptor itself as faulted, or it couldn't be waited
	/// on at all.
	#[display("faulted")]
	Faulted,
}

impl Readiness {
	pub fn is_ready(&self) -> bool { matches!(self, Self::Ready) }
	pub fn is_faulted(&self) -> bool { matches!(self, Self::Faulted) }
}

/// Blocks until `fd` is readable or faulted. There is no timeout; use
/// [`poll_readable`] to avoid blocking.
///
/// A hung-up descriptor counts as readable: the next read reports the end of
/// the stream.
pub fn wait_ready(fd: RawFd) -> Readiness {
	loop {
		let revents = match sys::poll_one(fd, READ_EVENTS, -1) {
			Ok(revents) => revents,
			Err(err) => {
				warn!(fd, %err, "waiting on descriptor failed");
				return Readiness::Faulted
			}
		};

		if revents & FAULT_EVENTS != 0 {
			warn!(fd, revents, "descriptor reported an error state");
			return Readiness::Faulted
		}

		if revents & HANGUP_READY != 0 {
			return Readiness::Ready
		}
	}
}

/// Returns `true` if a read on `fd` wouldn't block right now. Never blocks, and
/// never consumes or peeks at bytes. A hung-up descriptor is readable, since the
/// next read reports the end of the stream; a faulted one is not.
pub fn poll_readable(fd: RawFd) -> bool {
	match sys::poll_one(fd, READ_EVENTS, 0) {
		Ok(revents) => revents & FAULT_EVENTS == 0 && revents & HANGUP_READY != 0,
		Err(_) => false
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn pipe_hang_up_is_readable() {
		let mut fds = [0; 2];
		// Safety: fds has room for both ends.
		assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);
		let [read_end, write_end] = fds;
		assert!(!poll_readable(read_end));
		// Safety: both ends were just opened here.
		unsafe { libc::close(write_end) };
		assert!(poll_readable(read_end));
		assert_eq!(wait_ready(read_end), Readiness::Ready);
		unsafe { libc::close(read_end) };
	}

	#[test]
	fn invalid_descriptor_faults() {
		// Nothing is open this high in a test process.
		assert_eq!(wait_ready(1 << 20), Readiness::Faulted);
		assert!(!poll_readable(1 << 20));
	}
}
