// SPDX-License-Identifier: Apache-2.0

use amplify_derive::Display;
use crate::error::{OperationKind, Result, Utf8Error};
use crate::util::utf8::{decode_char, Decoded};
use super::Stream;

/// The codepoint value reported in place of a malformed or truncated sequence.
pub const REPLACEMENT: u32 = char::REPLACEMENT_CHARACTER as u32;
/// The codepoint value reported at the end of a stream.
pub const EOS: u32 = u32::MAX;

/// A single decoding result from [`Stream::next_codepoint`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Display)]
pub enum Codepoint {
	/// A Unicode scalar value.
	#[display("{0}")]
	Scalar(char),
	/// A malformed sequence. The cursor was moved past it.
	#[display("{0}")]
	Invalid(Utf8Error),
	/// A sequence cut off by the end of the data. The cursor was not moved.
	#[display("{0}")]
	Incomplete(Utf8Error),
	/// The end of the stream.
	#[display("end of stream")]
	Eos,
}

impl Codepoint {
	/// Returns the numeric codepoint: the scalar value, [`REPLACEMENT`] for
	/// decode anomalies, or [`EOS`] at the end of the stream.
	pub fn value(&self) -> u32 {
		match self {
			Self::Scalar(char) => *char as u32,
			Self::Invalid(_) | Self::Incomplete(_) => REPLACEMENT,
			Self::Eos => EOS
		}
	}

	/// Returns the scalar value, if any.
	pub fn char(&self) -> Option<char> {
		match self {
			Self::Scalar(char) => Some(*char),
			_ => None
		}
	}

	/// Returns the decode anomaly, if any.
	pub fn anomaly(&self) -> Option<&Utf8Error> {
		match self {
			Self::Invalid(err) | Self::Incomplete(err) => Some(err),
			_ => None
		}
	}

	pub fn is_eos(&self) -> bool { matches!(self, Self::Eos) }
}

impl Stream {
	/// Decodes one UTF-8 scalar value at the cursor, advancing it by the encoded
	/// length. Descriptor and file streams pull more bytes from the OS when the
	/// buffer runs out mid-sequence.
	///
	/// Decoding never reads past the valid bytes of the buffer. A malformed
	/// sequence moves the cursor past its invalid prefix, at least one byte, so
	/// repeated calls always make progress. A sequence truncated by the end of the
	/// data leaves the cursor where it was.
	pub fn next_codepoint(&mut self) -> Result<Codepoint> {
		self.check_open(OperationKind::Read)?;
		loop {
			if self.bytes_available() == 0 && self.fill()? == 0 {
				return Ok(Codepoint::Eos)
			}

			let start = self.bpos;
			let bytes = &self.buf[start..];
			match decode_char(bytes) {
				Decoded::Char(char, len) => {
					self.bpos += len;
					return Ok(Codepoint::Scalar(char))
				}
				Decoded::Invalid(len) => {
					let error = Utf8Error::invalid_seq(start, &bytes[..len]);
					self.bpos += len;
					return Ok(Codepoint::Invalid(error))
				}
				Decoded::Incomplete => {
					// Filling may compact the buffer, so take the position after.
					if self.fill()? == 0 {
						let error = Utf8Error::incomplete_char(self.bpos, &self.buf[self.bpos..]);
						return Ok(Codepoint::Incomplete(error))
					}
				}
			}
		}
	}
}
