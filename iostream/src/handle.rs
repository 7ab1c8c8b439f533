// SPDX-License-Identifier: Apache-2.0

use std::os::fd::RawFd;
use amplify_derive::Display;

/// One of the three standard handles.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Display)]
pub enum StdHandle {
	#[display("stdin")]
	Input,
	#[display("stdout")]
	Output,
	#[display("stderr")]
	Error,
}

impl StdHandle {
	/// Returns the handle's descriptor number.
	pub const fn fd(self) -> RawFd {
		match self {
			Self::Input  => libc::STDIN_FILENO,
			Self::Output => libc::STDOUT_FILENO,
			Self::Error  => libc::STDERR_FILENO,
		}
	}
}

/// Returns the descriptor number of standard input.
pub const fn stdin_fd() -> RawFd { StdHandle::Input.fd() }
/// Returns the descriptor number of standard output.
pub const fn stdout_fd() -> RawFd { StdHandle::Output.fd() }
/// Returns the descriptor number of standard error.
pub const fn stderr_fd() -> RawFd { StdHandle::Error.fd() }

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn numbers() {
		assert_eq!(stdin_fd(), 0);
		assert_eq!(stdout_fd(), 1);
		assert_eq!(stderr_fd(), 2);
	}
}
