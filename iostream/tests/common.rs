// Copyright 2023 Strixpyrr
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![allow(dead_code, unused_macros)]

use std::fmt::{Arguments, Debug};
use std::os::fd::{IntoRawFd, RawFd};
use std::os::unix::net::UnixStream;
use iostream::{Stream, StreamOptions};

macro_rules! qc_assert_eq {
	($left:expr,$right:expr) => {{
		let left = $left;
		let right = $right;
		if left == right {
			TestResult::passed()
		} else {
			TestResult::error(
				common::format_qc_assert_error(&left, &right, None)
			)
		}
	}};
    ($left:expr,$right:expr,$($arg:tt)+) => {{
		let left = $left;
		let right = $right;
		if left == right {
			TestResult::passed()
		} else {
			TestResult::error(
				common::format_qc_assert_error(&left, &right, Some(format_args!($($arg)+)))
			)
		}
	}};
}

pub fn format_qc_assert_error<L: Debug, R: Debug>(left: &L, right: &R, msg: Option<Arguments>) -> String {
	if let Some(msg) = msg {
		format!(
			"assertion failed `(left == right)`: {msg}\n \
			left: `{left:?}`,\nright: `{right:?}`",
		)
	} else {
		format!(
			"assertion failed `(left == right)`:\n \
			left: `{left:?}`,\nright: `{right:?}`",
		)
	}
}

/// A connected pair of descriptors, each end owned by a stream that closes it.
pub fn socket_pair(options: StreamOptions) -> (Stream, Stream) {
	let (a, b) = UnixStream::pair().expect("socket pair should be created");
	let options = options.with_own_descriptor(true);
	(
		Stream::descriptor(a.into_raw_fd(), options),
		Stream::descriptor(b.into_raw_fd(), options),
	)
}

/// A pipe as `(read end, write end)`, both owned by the caller.
pub fn pipe() -> (RawFd, RawFd) {
	let mut fds = [0; 2];
	// Safety: fds has room for the two descriptors pipe fills in.
	let rc = unsafe { libc::pipe(fds.as_mut_ptr()) };
	assert_eq!(rc, 0, "pipe should be created");
	(fds[0], fds[1])
}

/// A connected pair of raw descriptors owned by the caller.
pub fn raw_pair() -> (RawFd, RawFd) {
	let (a, b) = UnixStream::pair().expect("socket pair should be created");
	(a.into_raw_fd(), b.into_raw_fd())
}
