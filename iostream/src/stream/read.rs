// SPDX-License-Identifier: Apache-2.0

use std::io;
use all_asserts::debug_assert_le;
use tracing::trace;
use crate::error::{Error, OperationKind::Read, Result, ResultContext};
use crate::sys;
use super::{Mode, Stream};

impl Stream {
	/// Pulls more bytes from the OS into the buffer, keeping unconsumed bytes.
	/// Consumed bytes are discarded first to make room. Returns the number of
	/// bytes added; `0` means the end of the stream, or a memory stream.
	pub(super) fn fill(&mut self) -> Result<usize> {
		self.check_open(Read)?;
		let Some(fd) = self.fd() else { return Ok(0) };

		if self.mode == Mode::Writing {
			self.flush()?;
		}

		if self.bpos > 0 {
			self.buf.drain(..self.bpos);
			self.bpos = 0;
		}

		let size = self.buf.len();
		let chunk = self.options.buffer_size.max(1);
		self.buf.try_reserve(chunk).context(Read, Some(fd))?;
		self.buf.resize(size + chunk, 0);
		let result = sys::read(fd, &mut self.buf[size..]);
		let count = *result.as_ref().unwrap_or(&0);
		self.buf.truncate(size + count);
		let count = result.context(Read, Some(fd))?;

		self.mode = if self.buf.is_empty() { Mode::Idle } else { Mode::Reading };
		self.eos = count == 0;
		trace!(fd, count, "filled stream buffer");
		Ok(count)
	}

	/// Reads up to `buf.len()` bytes into `buf`, returning the number read. Bytes
	/// already buffered are returned without touching the OS; otherwise at most
	/// one read is made. Returns `0` at the end of the stream.
	pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
		self.check_open(Read)?;
		if buf.is_empty() { return Ok(0) }

		if let (0, Some(fd)) = (self.bytes_available(), self.fd()) {
			if self.mode == Mode::Writing {
				self.flush()?;
			}

			// Large reads skip the buffer entirely.
			if buf.len() >= self.options.buffer_size {
				let count = sys::read(fd, buf).context(Read, Some(fd))?;
				self.eos = count == 0;
				return Ok(count)
			}

			if self.fill()? == 0 {
				return Ok(0)
			}
		}

		Ok(self.consume_into(buf))
	}

	/// Reads exactly `buf.len()` bytes, failing with an "unexpected end-of-file"
	/// IO error if the stream ends first. Bytes read before the end are consumed.
	pub fn read_exact(&mut self, mut buf: &mut [u8]) -> Result {
		while !buf.is_empty() {
			match self.read(buf)? {
				0 => return Err(
					Error::io(Read, self.fd(), io::ErrorKind::UnexpectedEof.into())
				),
				n => buf = &mut buf[n..]
			}
		}
		Ok(())
	}

	/// Reads all remaining bytes into `buf`, returning the number read.
	pub fn read_to_end(&mut self, buf: &mut Vec<u8>) -> Result<usize> {
		let start = buf.len();
		loop {
			let available = &self.buf[self.bpos..];
			buf.try_reserve(available.len()).context(Read, self.fd())?;
			buf.extend_from_slice(available);
			self.bpos = self.buf.len();

			if self.fill()? == 0 {
				return Ok(buf.len() - start)
			}
		}
	}

	/// Reads a single byte, or `None` at the end of the stream.
	pub fn read_byte(&mut self) -> Result<Option<u8>> {
		let byte = self.peek_byte()?;
		if byte.is_some() {
			self.bpos += 1;
		}
		Ok(byte)
	}

	/// Returns the next byte without consuming it, or `None` at the end of the
	/// stream. May fill the buffer.
	pub fn peek_byte(&mut self) -> Result<Option<u8>> {
		self.check_open(Read)?;
		if self.bytes_available() == 0 && self.fill()? == 0 {
			return Ok(None)
		}
		Ok(Some(self.buf[self.bpos]))
	}

	/// Reads bytes into `buf` up to and including `delim`, or to the end of the
	/// stream. Returns the number of bytes read.
	pub fn read_until(&mut self, delim: u8, buf: &mut Vec<u8>) -> Result<usize> {
		self.check_open(Read)?;
		let mut read = 0;
		loop {
			let available = &self.buf[self.bpos..];
			let (len, found) = match available.iter().position(|&b| b == delim) {
				Some(i) => (i + 1, true),
				None => (available.len(), false)
			};
			buf.try_reserve(len).context(Read, self.fd())?;
			buf.extend_from_slice(&available[..len]);
			self.bpos += len;
			read += len;

			if found || self.fill()? == 0 {
				return Ok(read)
			}
		}
	}

	/// Skips up to `count` buffered or unbuffered bytes, returning the number
	/// skipped.
	pub fn skip(&mut self, mut count: usize) -> Result<usize> {
		self.check_open(Read)?;
		let mut skipped = 0;
		while count > 0 {
			if self.bytes_available() == 0 && self.fill()? == 0 {
				break
			}

			let n = count.min(self.bytes_available());
			self.bpos += n;
			skipped += n;
			count -= n;
		}
		Ok(skipped)
	}

	/// Copies buffered bytes into `buf`, advancing the cursor.
	fn consume_into(&mut self, buf: &mut [u8]) -> usize {
		let available = &self.buf[self.bpos..];
		let n = available.len().min(buf.len());
		buf[..n].copy_from_slice(&available[..n]);
		self.bpos += n;
		{
			use all_asserts::assert_le;
			debug_assert_le!(self.bpos, self.buf.len());
		}
		n
	}
}

impl io::Read for Stream {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		Stream::read(self, buf).map_err(Into::into)
	}
}
