// SPDX-License-Identifier: Apache-2.0

use std::io;
use std::os::fd::RawFd;
use all_asserts::debug_assert_le;
use tracing::trace;
use crate::error::{Error, OperationKind::{Flush, Write}, Result, ResultContext};
use crate::sys;
use super::{Mode, Stream};

impl Stream {
	/// Writes `data`, returning the number of bytes written, which is always all
	/// of them unless an error occurs.
	///
	/// Memory streams write at the cursor, overwriting existing bytes then
	/// extending the buffer. Descriptor and file streams queue the bytes as
	/// pending output, flushing once the buffer size would be exceeded; data at
	/// least as large as the buffer is written straight through.
	pub fn write(&mut self, data: &[u8]) -> Result<usize> {
		self.check_open(Write)?;
		if data.is_empty() { return Ok(0) }

		let Some(fd) = self.fd() else {
			self.write_memory(data)?;
			return Ok(data.len())
		};

		if self.mode == Mode::Reading && !self.leave_reading(fd)? {
			// The medium can't seek back over read-ahead, so bypass the buffer to
			// keep it intact.
			sys::write_all(fd, data).context(Write, Some(fd))?;
			return Ok(data.len())
		}

		if self.buf.len() + data.len() > self.options.buffer_size {
			self.flush()?;
		}

		if data.len() >= self.options.buffer_size {
			sys::write_all(fd, data).context(Write, Some(fd))?;
		} else {
			self.buf.try_reserve(data.len()).context(Write, Some(fd))?;
			self.buf.extend_from_slice(data);
			self.bpos = self.buf.len();
			self.mode = Mode::Writing;
		}
		Ok(data.len())
	}

	/// Writes all of `data`.
	#[inline]
	pub fn write_all(&mut self, data: &[u8]) -> Result {
		self.write(data).map(drop)
	}

	/// Writes a string as UTF-8.
	#[inline]
	pub fn write_str(&mut self, value: &str) -> Result {
		self.write_all(value.as_bytes())
	}

	/// Writes a single character as UTF-8, returning its encoded length.
	pub fn write_char(&mut self, value: char) -> Result<usize> {
		let mut buf = [0; 4];
		self.write(value.encode_utf8(&mut buf).as_bytes())
	}

	/// Writes a single byte.
	#[inline]
	pub fn write_byte(&mut self, value: u8) -> Result {
		self.write_all(&[value])
	}

	/// Hands pending output to the OS. Does nothing for memory streams. If the OS
	/// accepts only part of the output before failing, the written part is
	/// dropped from the buffer and the rest stays pending.
	pub fn flush(&mut self) -> Result {
		self.check_open(Flush)?;
		if self.mode != Mode::Writing { return Ok(()) }
		let Some(fd) = self.fd() else { return Ok(()) };

		let mut written = 0;
		let result = loop {
			if written == self.buf.len() {
				break Ok(())
			}

			match sys::write(fd, &self.buf[written..]) {
				Ok(0) => break Err(io::ErrorKind::WriteZero.into()),
				Ok(n) => written += n,
				Err(err) => break Err(err)
			}
		};

		trace!(fd, written, "flushed stream buffer");
		self.buf.drain(..written);
		self.bpos = self.buf.len();
		if self.buf.is_empty() {
			self.mode = Mode::Idle;
		}
		result.context(Flush, Some(fd))
	}

	fn write_memory(&mut self, data: &[u8]) -> Result {
		let Self { buf, bpos, .. } = self;
		let overlap = data.len().min(buf.len() - *bpos);
		let (overwrite, extend) = data.split_at(overlap);
		buf[*bpos..*bpos + overlap].copy_from_slice(overwrite);
		buf.try_reserve(extend.len()).context(Write, None)?;
		buf.extend_from_slice(extend);
		*bpos += data.len();
		{
			use all_asserts::assert_le;
			debug_assert_le!(*bpos, buf.len());
		}
		Ok(())
	}

	/// Drops read-ahead before writing, moving the OS position back over any
	/// unconsumed bytes so the write lands at the logical position. Returns
	/// `false` if the medium can't seek, leaving the read-ahead in place.
	fn leave_reading(&mut self, fd: RawFd) -> Result<bool> {
		let unread = self.bytes_available();
		if unread > 0 {
			match sys::lseek(fd, -(unread as i64), libc::SEEK_CUR) {
				Ok(_) => { }
				Err(err) if err.raw_os_error() == Some(libc::ESPIPE) => return Ok(false),
				Err(err) => return Err(Error::io(Write, Some(fd), err))
			}
		}

		self.buf.clear();
		self.bpos = 0;
		self.mode = Mode::Idle;
		self.eos = false;
		Ok(true)
	}
}

impl io::Write for Stream {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		Stream::write(self, buf).map_err(Into::into)
	}

	fn flush(&mut self) -> io::Result<()> {
		Stream::flush(self).map_err(Into::into)
	}
}
