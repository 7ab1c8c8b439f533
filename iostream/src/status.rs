// SPDX-License-Identifier: Apache-2.0

//! Decoding of raw process wait-status words, following the glibc bit layout:
//! the low seven bits hold a terminating signal, `0x7f` marks a stopped child,
//! and the second byte holds an exit code or stop signal.

use amplify_derive::Display;

const SIGNAL_MASK: i32 = 0x7f;
const STOPPED: i32 = 0x7f;

/// A raw wait-status word, as filled in by `waitpid`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct WaitStatus(pub i32);

/// How a child process changed state.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Display)]
pub enum ProcessState {
	#[display("exited with status {0}")]
	Exited(i32),
	#[display("terminated by signal {0}")]
	Signaled(i32),
	#[display("stopped by signal {0}")]
	Stopped(i32),
	/// Any other status, such as a continued child.
	#[display("unknown status {0}")]
	Other(i32),
}

impl WaitStatus {
	/// Returns the raw status word.
	#[inline]
	pub const fn raw(self) -> i32 { self.0 }

	/// Returns `true` if the child terminated normally.
	#[inline]
	pub const fn exited(self) -> bool {
		self.0 & SIGNAL_MASK == 0
	}

	/// Returns `true` if the child was killed by a signal.
	#[inline]
	pub const fn signaled(self) -> bool {
		let low = self.0 & SIGNAL_MASK;
		low != 0 && low != STOPPED
	}

	/// Returns `true` if the child is stopped.
	#[inline]
	pub const fn stopped(self) -> bool {
		self.0 & 0xff == STOPPED
	}

	/// The exit code; meaningful only when [`exited`](Self::exited).
	#[inline]
	pub const fn exit_status(self) -> i32 {
		(self.0 >> 8) & 0xff
	}

	/// The terminating signal; meaningful only when [`signaled`](Self::signaled).
	#[inline]
	pub const fn term_signal(self) -> i32 {
		self.0 & SIGNAL_MASK
	}

	/// The stop signal; meaningful only when [`stopped`](Self::stopped).
	#[inline]
	pub const fn stop_signal(self) -> i32 {
		(self.0 >> 8) & 0xff
	}

	/// Classifies the status.
	pub const fn classify(self) -> ProcessState {
		if self.exited() {
			ProcessState::Exited(self.exit_status())
		} else if self.signaled() {
			ProcessState::Signaled(self.term_signal())
		} else if self.stopped() {
			ProcessState::Stopped(self.stop_signal())
		} else {
			ProcessState::Other(self.0)
		}
	}
}

impl From<i32> for WaitStatus {
	fn from(value: i32) -> Self { Self(value) }
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn matches_libc_macros() {
		for raw in [0, 42 << 8, 255 << 8, 9, 15 | 0x80, (19 << 8) | 0x7f, 0xffff] {
			let status = WaitStatus(raw);
			assert_eq!(status.exited(), libc::WIFEXITED(raw), "exited {raw:#x}");
			assert_eq!(status.signaled(), libc::WIFSIGNALED(raw), "signaled {raw:#x}");
			assert_eq!(status.stopped(), libc::WIFSTOPPED(raw), "stopped {raw:#x}");
			if status.exited() {
				assert_eq!(status.exit_status(), libc::WEXITSTATUS(raw));
			}
			if status.signaled() {
				assert_eq!(status.term_signal(), libc::WTERMSIG(raw));
			}
			if status.stopped() {
				assert_eq!(status.stop_signal(), libc::WSTOPSIG(raw));
			}
		}
	}

	#[test]
	fn classify() {
		assert_eq!(WaitStatus(42 << 8).classify(), ProcessState::Exited(42));
		assert_eq!(WaitStatus(9).classify(), ProcessState::Signaled(9));
		assert_eq!(WaitStatus((19 << 8) | 0x7f).classify(), ProcessState::Stopped(19));
		assert_eq!(WaitStatus(0xffff).classify(), ProcessState::Other(0xffff));
		assert_eq!(ProcessState::Exited(3).to_string(), "exited with status 3");
	}
}
