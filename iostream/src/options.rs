// SPDX-License-Identifier: Apache-2.0

use std::fs::OpenOptions;

/// The default size of the buffering window for descriptor and file streams.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Options for tuning [`Stream`](crate::Stream)'s buffering behavior.
///
/// # Buffer size
///
/// The size of the window descriptor and file streams read ahead into, and the
/// amount of pending output they hold before handing it to the OS. Defaults to
/// `8KiB`. Reads and writes larger than this bypass the buffer once it's been
/// drained or flushed. Memory streams ignore this; their buffer holds the whole
/// medium.
///
/// # Descriptor ownership
///
/// Whether a descriptor stream closes its descriptor when it's closed or dropped.
/// Defaults to `false`: the descriptor belongs to whoever handed it over. File
/// streams always own their descriptor.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct StreamOptions {
	pub buffer_size: usize,
	pub own_descriptor: bool,
}

impl Default for StreamOptions {
	fn default() -> Self { Self::new() }
}

impl StreamOptions {
	/// Creates a new set of stream options.
	pub const fn new() -> Self {
		Self {
			buffer_size: DEFAULT_BUFFER_SIZE,
			own_descriptor: false,
		}
	}

	/// Returns the buffer size.
	#[inline]
	pub const fn buffer_size(&self) -> usize { self.buffer_size }

	/// Returns whether descriptors are closed with the stream.
	#[inline]
	pub const fn own_descriptor(&self) -> bool { self.own_descriptor }

	/// Sets the buffer size. A size of zero is treated as one byte.
	#[inline]
	pub const fn with_buffer_size(mut self, value: usize) -> Self {
		self.buffer_size = if value == 0 { 1 } else { value };
		self
	}

	/// Sets whether descriptors are closed with the stream.
	#[inline]
	pub const fn with_own_descriptor(mut self, value: bool) -> Self {
		self.own_descriptor = value;
		self
	}
}

/// The access and creation mode a file stream is opened with.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct FileMode {
	pub read: bool,
	pub write: bool,
	pub create: bool,
	pub truncate: bool,
	pub append: bool,
}

impl FileMode {
	/// Creates a mode from read, write, create, and truncate flags.
	pub const fn new(read: bool, write: bool, create: bool, truncate: bool) -> Self {
		Self { read, write, create, truncate, append: false }
	}

	/// Read-only access to an existing file.
	pub const fn read_only() -> Self { Self::new(true, false, false, false) }

	/// Write access, creating the file or truncating an existing one.
	pub const fn write_new() -> Self { Self::new(false, true, true, true) }

	/// Read and write access, creating the file if it doesn't exist.
	pub const fn read_write() -> Self { Self::new(true, true, true, false) }

	#[inline]
	pub const fn with_read(mut self, value: bool) -> Self {
		self.read = value;
		self
	}

	#[inline]
	pub const fn with_write(mut self, value: bool) -> Self {
		self.write = value;
		self
	}

	#[inline]
	pub const fn with_create(mut self, value: bool) -> Self {
		self.create = value;
		self
	}

	#[inline]
	pub const fn with_truncate(mut self, value: bool) -> Self {
		self.truncate = value;
		self
	}

	/// Sets append mode. Appending implies write access.
	#[inline]
	pub const fn with_append(mut self, value: bool) -> Self {
		self.append = value;
		self
	}

	/// Returns `true` if the mode allows writing.
	pub const fn is_writable(&self) -> bool { self.write || self.append }

	/// Converts into [`OpenOptions`]. A mode with neither read nor write access
	/// opens read-only, as the OS would with no access flags.
	pub fn to_open_options(&self) -> OpenOptions {
		let mut options = OpenOptions::new();
		options.read(self.read || !self.is_writable())
			   .write(self.write)
			   .append(self.append)
			   .create(self.create && self.is_writable())
			   .truncate(self.truncate && self.write);
		options
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn zero_buffer_size_is_clamped() {
		assert_eq!(StreamOptions::new().with_buffer_size(0).buffer_size(), 1);
	}

	#[test]
	fn mode_presets() {
		assert!(FileMode::write_new().is_writable());
		assert!(!FileMode::read_only().is_writable());
		assert!(FileMode::read_only().with_append(true).is_writable());
	}
}
