// SPDX-License-Identifier: Apache-2.0

mod decode;
mod read;
mod seeking;
mod write;

pub use decode::*;
pub use seeking::*;

use std::fmt::{Debug, Formatter};
use std::fs::File;
use std::os::fd::{AsRawFd, RawFd};
use std::path::{Path, PathBuf};
use std::{fmt, mem};
use amplify_derive::Display;
use tracing::{debug, warn};
use crate::error::{Error, OperationKind, Result, ResultContext};
use crate::handle::StdHandle;
use crate::options::{FileMode, StreamOptions};
use crate::readiness::{self, Readiness};
use crate::sys;

/// Wraps an already-open descriptor in a stream with default options. The
/// descriptor is not closed with the stream. Never fails; an invalid descriptor
/// surfaces as an error on first use.
pub fn open_descriptor(fd: RawFd) -> Stream {
	Stream::descriptor(fd, StreamOptions::default())
}

/// Opens or creates the file at `path` as a stream.
pub fn open_file(path: impl AsRef<Path>, mode: FileMode) -> Result<Stream> {
	Stream::file(path, mode, StreamOptions::default())
}

/// Creates an empty memory stream with room for at least `capacity` bytes.
pub fn open_memory(capacity: usize) -> Result<Stream> {
	Stream::memory(capacity)
}

/// The medium a stream is bound to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Display)]
pub enum Backend {
	#[display("descriptor")]
	Descriptor,
	#[display("file")]
	File,
	#[display("memory")]
	Memory,
}

enum Medium {
	Descriptor {
		fd: RawFd,
		owned: bool,
	},
	File {
		file: File,
		path: PathBuf,
	},
	Memory,
}

impl Medium {
	fn fd(&self) -> Option<RawFd> {
		match self {
			Self::Descriptor { fd, .. } => Some(*fd),
			Self::File { file, .. } => Some(file.as_raw_fd()),
			Self::Memory => None
		}
	}
}

/// What the buffer of a descriptor or file stream currently holds.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
enum Mode {
	/// Nothing pending in either direction.
	#[default]
	Idle,
	/// Read-ahead, unconsumed past the cursor.
	Reading,
	/// Output not yet handed to the OS.
	Writing,
}

/// A buffered byte stream over a descriptor, a file, or memory.
///
/// # Buffer
///
/// The stream holds a single owned buffer of `size` valid bytes and a cursor,
/// `bpos`, with `bpos <= size` at all times. For memory streams the buffer is
/// the whole medium: writes land at the cursor, overwriting then extending it.
/// For descriptor and file streams the buffer is a window: either read-ahead
/// pulled from the OS but not yet consumed, which is never read from the OS
/// again, or output waiting to be flushed.
///
/// # Ownership
///
/// Streams are exclusively owned; every operation takes `&mut self`. The only
/// way bytes leave the stream by ownership is [`take_buffer`], which moves the
/// buffer out and leaves a fresh, empty one behind.
///
/// [`take_buffer`]: Stream::take_buffer
pub struct Stream {
	backend: Backend,
	/// `None` once closed.
	medium: Option<Medium>,
	buf: Vec<u8>,
	bpos: usize,
	mode: Mode,
	eos: bool,
	options: StreamOptions,
}

impl Debug for Stream {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Stream")
			.field("backend", &self.backend)
			.field("fd", &self.fd())
			.field("size", &self.size())
			.field("bpos", &self.bpos)
			.field("mode", &self.mode)
			.field("closed", &self.is_closed())
			.finish_non_exhaustive()
	}
}

impl Stream {
	fn new(backend: Backend, medium: Medium, buf: Vec<u8>, options: StreamOptions) -> Self {
		Self {
			backend,
			medium: Some(medium),
			buf,
			bpos: 0,
			mode: Mode::Idle,
			eos: false,
			options,
		}
	}

	/// Wraps an already-open descriptor. The descriptor is closed with the stream
	/// only if [`StreamOptions::own_descriptor`] is set.
	pub fn descriptor(fd: RawFd, options: StreamOptions) -> Self {
		debug!(fd, owned = options.own_descriptor, "wrapped descriptor stream");
		Self::new(
			Backend::Descriptor,
			Medium::Descriptor { fd, owned: options.own_descriptor },
			Vec::new(),
			options
		)
	}

	/// Opens or creates the file at `path` with `mode`. The error message of a
	/// failed open names the path.
	pub fn file(path: impl AsRef<Path>, mode: FileMode, options: StreamOptions) -> Result<Self> {
		let path = path.as_ref();
		let file = mode.to_open_options()
					   .open(path)
					   .map_err(|err| Error::open(path, err))?;
		debug!(path = %path.display(), fd = file.as_raw_fd(), ?mode, "opened file stream");
		Ok(Self::new(
			Backend::File,
			Medium::File { file, path: path.to_path_buf() },
			Vec::new(),
			options
		))
	}

	/// Creates an empty memory stream with room reserved for at least `capacity`
	/// bytes. Fails only if the memory can't be reserved.
	pub fn memory(capacity: usize) -> Result<Self> {
		let mut buf = Vec::new();
		buf.try_reserve_exact(capacity)
		   .context(OperationKind::Allocate, None)?;
		Ok(Self::new(Backend::Memory, Medium::Memory, buf, StreamOptions::default()))
	}

	/// Creates a memory stream holding `bytes`, with the cursor at the start.
	pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
		Self::new(Backend::Memory, Medium::Memory, bytes.into(), StreamOptions::default())
	}

	/// Wraps standard input, without taking ownership of it.
	pub fn stdin() -> Self { Self::std(StdHandle::Input) }
	/// Wraps standard output, without taking ownership of it.
	pub fn stdout() -> Self { Self::std(StdHandle::Output) }
	/// Wraps standard error, without taking ownership of it.
	pub fn stderr() -> Self { Self::std(StdHandle::Error) }

	/// Wraps a standard handle, without taking ownership of it.
	pub fn std(handle: StdHandle) -> Self {
		Self::descriptor(handle.fd(), StreamOptions::default().with_own_descriptor(false))
	}

	/// Returns the backend the stream was created over.
	pub fn backend(&self) -> Backend { self.backend }

	/// Returns the options the stream was created with.
	pub fn options(&self) -> StreamOptions { self.options }

	/// Returns the descriptor of a descriptor or file stream, or `None` for memory
	/// streams and closed streams.
	pub fn fd(&self) -> Option<RawFd> {
		self.medium.as_ref()?.fd()
	}

	/// Returns the path of a file stream.
	pub fn path(&self) -> Option<&Path> {
		match self.medium {
			Some(Medium::File { ref path, .. }) => Some(path),
			_ => None
		}
	}

	/// Returns `true` if the stream has been closed.
	pub fn is_closed(&self) -> bool { self.medium.is_none() }

	/// Returns the number of valid bytes in the buffer.
	pub fn size(&self) -> usize { self.buf.len() }

	/// Returns the cursor position within the buffer.
	pub fn bpos(&self) -> usize { self.bpos }

	/// Returns the number of buffered bytes not yet consumed, `size - bpos`. Never
	/// performs IO.
	pub fn bytes_available(&self) -> usize {
		self.buf.len() - self.bpos
	}

	/// Returns `true` if the end of the stream was reached: the cursor is at the
	/// end of a memory stream, or the OS reported the end of a descriptor or file
	/// with no buffered bytes left.
	pub fn is_eos(&self) -> bool {
		match self.backend {
			Backend::Memory => self.bytes_available() == 0,
			_ => self.eos && self.bytes_available() == 0
		}
	}

	/// Moves the accumulated bytes, `0..size`, out of the stream, leaving a fresh
	/// empty buffer with `size` and `bpos` reset to zero. Taking from an empty or
	/// closed stream returns an empty vector.
	///
	/// Pending output of descriptor and file streams is handed to the OS before
	/// the bytes are returned. This never fails: a failed write is logged, and the
	/// bytes are still returned.
	pub fn take_buffer(&mut self) -> Vec<u8> {
		let bytes = mem::take(&mut self.buf);
		let mode = mem::take(&mut self.mode);
		self.bpos = 0;

		if mode == Mode::Writing && !bytes.is_empty() {
			if let Some(fd) = self.fd() {
				if let Err(err) = sys::write_all(fd, &bytes) {
					warn!(fd, %err, "flushing taken buffer failed");
				}
			}
		}

		bytes
	}

	/// Blocks until the stream is readable or faulted. Buffered bytes count as
	/// ready without touching the OS, as does a memory stream, which reports the
	/// end of the stream instead of blocking. Closed streams are faulted.
	pub fn wait_ready(&self) -> Readiness {
		if self.bytes_available() > 0 {
			return Readiness::Ready
		}

		match self.medium {
			None => Readiness::Faulted,
			Some(Medium::Memory) => Readiness::Ready,
			Some(Medium::Descriptor { fd, .. }) => readiness::wait_ready(fd),
			Some(Medium::File { ref file, .. }) => readiness::wait_ready(file.as_raw_fd())
		}
	}

	/// Returns `true` if a read would produce data without blocking. Buffered
	/// bytes count as readable; otherwise descriptor and file streams ask the OS
	/// without consuming anything.
	pub fn poll_readable(&self) -> bool {
		self.bytes_available() > 0 || self.fd().is_some_and(readiness::poll_readable)
	}

	/// Flushes pending output, releases the descriptor if owned, and empties the
	/// buffer. Closing is idempotent; closing a closed stream does nothing. The
	/// stream is closed even if flushing fails, in which case the flush error is
	/// returned.
	pub fn close(&mut self) -> Result {
		if self.is_closed() { return Ok(()) }

		let flushed = self.flush();
		let closed = match self.medium.take() {
			Some(Medium::Descriptor { fd, owned: true }) =>
				sys::close(fd).context(OperationKind::Close, Some(fd)),
			Some(Medium::File { file, path }) => {
				debug!(path = %path.display(), "closing file stream");
				drop(file);
				Ok(())
			}
			_ => Ok(())
		};

		self.buf = Vec::new();
		self.bpos = 0;
		self.mode = Mode::Idle;
		debug!(backend = %self.backend, "closed stream");
		flushed.and(closed)
	}

	fn check_open(&self, op: OperationKind) -> Result {
		if self.is_closed() {
			Err(Error::closed(op))
		} else {
			Ok(())
		}
	}
}

impl Drop for Stream {
	fn drop(&mut self) {
		if let Err(err) = self.close() {
			warn!(%err, "closing stream on drop failed");
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn memory_take_leaves_empty_stream() {
		let mut stream = Stream::from_bytes(&b"hello"[..]);
		assert_eq!(stream.bytes_available(), 5);
		assert_eq!(stream.take_buffer(), b"hello");
		assert_eq!(stream.size(), 0);
		assert_eq!(stream.bpos(), 0);
		assert!(stream.take_buffer().is_empty());
	}

	#[test]
	fn close_is_idempotent() {
		let mut stream = open_memory(16).unwrap();
		stream.close().unwrap();
		stream.close().unwrap();
		assert!(stream.is_closed());
		assert_eq!(stream.backend(), Backend::Memory);
		assert_eq!(stream.bytes_available(), 0);
		assert!(stream.take_buffer().is_empty());
		assert!(stream.wait_ready().is_faulted());
	}

	#[test]
	fn memory_reserves_capacity() {
		let stream = open_memory(100).unwrap();
		assert!(stream.buf.capacity() >= 100);
		assert_eq!(stream.size(), 0);
		assert!(stream.fd().is_none());
	}

	#[test]
	fn memory_reservation_overflow() {
		let error = open_memory(usize::MAX).unwrap_err();
		assert!(error.is_alloc());
	}
}
