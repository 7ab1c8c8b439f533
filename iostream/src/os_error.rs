// SPDX-License-Identifier: Apache-2.0

//! OS error number lookups.

use std::io;
use crate::sys;

/// Returns the calling thread's last recorded OS error number, or `0` if none.
pub fn last_os_error() -> i32 {
	io::Error::last_os_error()
		.raw_os_error()
		.unwrap_or(0)
}

/// Returns a human-readable description of OS error number `errnum`.
pub fn describe(errnum: i32) -> String {
	sys::strerror(errnum)
}
