// SPDX-License-Identifier: Apache-2.0

use std::io;
use std::io::SeekFrom;
use crate::error::{Error, OperationKind::Seek, Result, ResultContext};
use crate::sys;
use super::{Mode, Stream};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SeekOffset {
	/// Reset the stream to the start. Equivalent to `FromStart(0)`.
	Reset,
	/// Move forward by an offset.
	Forward(usize),
	/// Move back by an offset.
	Back(usize),
	/// Seek a position from the start of the stream.
	FromStart(usize),
	/// Seek a position from the end of the stream. A positive position will seek
	/// beyond the stream, the behavior of which is backend-dependent.
	FromEnd(isize),
}

impl SeekOffset {
	/// Converts to a start-based position given a current `pos` and `len`.
	pub fn to_pos(self, pos: usize, len: usize) -> usize {
		match self {
			SeekOffset::Reset => 0,
			SeekOffset::Forward(off) => pos.saturating_add(off),
			SeekOffset::Back   (off) => pos.saturating_sub(off),
			SeekOffset::FromStart(pos) => pos,
			SeekOffset::FromEnd(off) => len.saturating_add_signed(off)
		}
	}

	/// Converts to an `lseek` offset and whence pair, with relative offsets shifted
	/// by `adjust` to account for buffered bytes.
	fn to_raw(self, adjust: i64) -> io::Result<(i64, libc::c_int)> {
		fn conv(off: usize) -> io::Result<i64> {
			off.try_into().map_err(|_| io::ErrorKind::InvalidInput.into())
		}

		Ok(match self {
			SeekOffset::Reset          => (0, libc::SEEK_SET),
			SeekOffset::Forward  (off) => (
				conv(off)?.checked_add(adjust).ok_or(io::ErrorKind::InvalidInput)?,
				libc::SEEK_CUR
			),
			SeekOffset::Back     (off) => (
				adjust.checked_sub(conv(off)?).ok_or(io::ErrorKind::InvalidInput)?,
				libc::SEEK_CUR
			),
			SeekOffset::FromStart(pos) => (conv(pos)?, libc::SEEK_SET),
			SeekOffset::FromEnd  (off) => (off as i64, libc::SEEK_END)
		})
	}
}

impl From<SeekFrom> for SeekOffset {
	/// Offsets beyond the range of `usize` or `isize` saturate.
	fn from(value: SeekFrom) -> Self {
		fn sat(off: u64) -> usize {
			off.try_into().unwrap_or(usize::MAX)
		}

		match value {
			SeekFrom::Start  (pos)       => SeekOffset::FromStart(sat(pos)),
			SeekFrom::End    (pos)       => SeekOffset::FromEnd(
				pos.try_into().unwrap_or(if pos < 0 { isize::MIN } else { isize::MAX })
			),
			SeekFrom::Current(off @ 0..) => SeekOffset::Forward(sat(off as u64)),
			SeekFrom::Current(off      ) => SeekOffset::Back(sat(off.unsigned_abs()))
		}
	}
}

impl Stream {
	/// Seeks to `offset`, returning the new position from the start of the stream.
	///
	/// Memory streams move the cursor, clamped to the end of the buffer. Descriptor
	/// and file streams flush pending output, drop read-ahead, and reposition the
	/// descriptor; relative offsets are taken from the logical position, not the
	/// OS position past the read-ahead. Non-seekable descriptors fail with an IO
	/// error.
	pub fn seek(&mut self, offset: SeekOffset) -> Result<usize> {
		self.check_open(Seek)?;
		let Some(fd) = self.fd() else {
			self.bpos = offset.to_pos(self.bpos, self.buf.len()).min(self.buf.len());
			return Ok(self.bpos)
		};

		self.flush()?;
		let unread = if self.mode == Mode::Reading {
			self.bytes_available() as i64
		} else {
			0
		};
		let (off, whence) = offset.to_raw(-unread).context(Seek, Some(fd))?;
		let pos = sys::lseek(fd, off, whence).context(Seek, Some(fd))?;

		self.buf.clear();
		self.bpos = 0;
		self.mode = Mode::Idle;
		self.eos = false;
		usize::try_from(pos).map_err(|_|
			Error::io(Seek, Some(fd), io::ErrorKind::InvalidData.into())
		)
	}

	/// Returns the logical position from the start of the stream, accounting for
	/// read-ahead and pending output. Non-seekable descriptors fail with an IO
	/// error.
	pub fn position(&mut self) -> Result<usize> {
		self.check_open(Seek)?;
		let Some(fd) = self.fd() else { return Ok(self.bpos) };

		let pos = sys::lseek(fd, 0, libc::SEEK_CUR).context(Seek, Some(fd))?;
		let pos = usize::try_from(pos).ok().and_then(|pos|
			match self.mode {
				// Another handle on the descriptor may have moved it behind the
				// read-ahead.
				Mode::Reading => pos.checked_sub(self.bytes_available()),
				Mode::Writing => pos.checked_add(self.buf.len()),
				Mode::Idle => Some(pos)
			}
		);
		pos.ok_or_else(|| Error::io(Seek, Some(fd), io::ErrorKind::InvalidData.into()))
	}
}

impl io::Seek for Stream {
	fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
		Stream::seek(self, pos.into())
			.map(|pos| pos as u64)
			.map_err(Into::into)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn to_pos() {
		assert_eq!(SeekOffset::Forward(3).to_pos(2, 10), 5);
		assert_eq!(SeekOffset::Back(3).to_pos(2, 10), 0);
		assert_eq!(SeekOffset::FromEnd(-4).to_pos(2, 10), 6);
		assert_eq!(SeekOffset::Reset.to_pos(7, 10), 0);
	}

	#[test]
	fn relative_overflow_is_invalid_input() {
		let back = SeekOffset::Back(i64::MAX as usize).to_raw(-2).unwrap_err();
		assert_eq!(back.kind(), io::ErrorKind::InvalidInput);
		let forward = SeekOffset::Forward(i64::MAX as usize).to_raw(2).unwrap_err();
		assert_eq!(forward.kind(), io::ErrorKind::InvalidInput);
		assert_eq!(SeekOffset::Back(3).to_raw(-2).unwrap(), (-5, libc::SEEK_CUR));
	}

	#[test]
	fn from_seek_from_saturates() {
		assert_eq!(SeekOffset::from(SeekFrom::Start(u64::MAX)), SeekOffset::FromStart(usize::MAX));
		assert_eq!(SeekOffset::from(SeekFrom::Current(-3)), SeekOffset::Back(3));
		assert_eq!(
			SeekOffset::from(SeekFrom::Current(i64::MIN)),
			SeekOffset::Back(usize::try_from(i64::MIN.unsigned_abs()).unwrap_or(usize::MAX))
		);
	}

	#[test]
	fn memory_seek_clamps() {
		let mut stream = Stream::from_bytes(&b"0123456789"[..]);
		assert_eq!(stream.seek(SeekOffset::FromEnd(5)).unwrap(), 10);
		assert_eq!(stream.seek(SeekOffset::Back(4)).unwrap(), 6);
		assert_eq!(stream.bytes_available(), 4);
		assert_eq!(stream.position().unwrap(), 6);
	}
}
