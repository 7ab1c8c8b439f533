// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::mem;
use crate::error::Result;
use crate::stream::Stream;

/// Holds the stream default output goes to. There is no global instance: a
/// runtime creates one per session and passes it to whatever prints. The last
/// stream set wins; there's no history.
#[derive(Debug)]
pub struct OutputContext {
	current: Stream,
}

impl Default for OutputContext {
	/// Creates a context printing to standard output.
	fn default() -> Self { Self::new(Stream::stdout()) }
}

impl OutputContext {
	/// Creates a context printing to `stream`.
	pub fn new(stream: Stream) -> Self {
		Self { current: stream }
	}

	/// Returns the current output stream.
	pub fn current_output(&mut self) -> &mut Stream {
		&mut self.current
	}

	/// Makes `stream` the current output, returning the previous one.
	pub fn set_current_output(&mut self, stream: Stream) -> Stream {
		mem::replace(&mut self.current, stream)
	}

	/// Writes a string to the current output.
	pub fn print(&mut self, value: &str) -> Result {
		self.current.write_str(value)
	}

	/// Writes formatted text to the current output.
	pub fn print_fmt(&mut self, args: fmt::Arguments) -> Result {
		match args.as_str() {
			Some(str) => self.print(str),
			None => self.print(&args.to_string())
		}
	}

	/// Consumes the context, returning the current output stream.
	pub fn into_inner(self) -> Stream { self.current }
}
