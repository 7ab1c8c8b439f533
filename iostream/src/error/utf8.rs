// SPDX-License-Identifier: Apache-2.0

use amplify_derive::Display;
use thiserror::Error;

/// A UTF-8 decode anomaly found while decoding a codepoint from a stream.
/// Anomalies are not fatal to the stream.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
#[error(
	"{kind} UTF-8 byte sequence ({:X?}) at buffer position {position}",
	self.bytes()
)]
pub struct Utf8Error {
	/// The buffer position the sequence started at when it was decoded.
	pub position: usize,
	/// The invalid or incomplete byte sequence, padded with zeros.
	pub bytes: [u8; 4],
	/// The number the bytes in the invalid or incomplete byte sequence.
	pub count: usize,
	/// The error kind.
	pub kind: Utf8ErrorKind
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Display)]
pub enum Utf8ErrorKind {
	/// An invalid byte sequence.
	#[display("invalid")]
	InvalidSequence,
	/// An incomplete character byte sequence, cut off by the end of data.
	#[display("incomplete")]
	IncompleteChar
}

impl Utf8Error {
	pub(crate) fn invalid_seq(position: usize, bytes: &[u8]) -> Self {
		Self::new(position, bytes, Utf8ErrorKind::InvalidSequence)
	}

	pub(crate) fn incomplete_char(position: usize, bytes: &[u8]) -> Self {
		Self::new(position, bytes, Utf8ErrorKind::IncompleteChar)
	}

	fn new(position: usize, bytes: &[u8], kind: Utf8ErrorKind) -> Self {
		let count = bytes.len().min(4);
		let mut buf = [0; 4];
		buf[..count].copy_from_slice(&bytes[..count]);
		Self { position, bytes: buf, count, kind }
	}

	/// The invalid or incomplete byte sequence.
	pub fn bytes(&self) -> &[u8] {
		&self.bytes[..self.count]
	}
}

impl Utf8ErrorKind {
	pub fn is_invalid_sequence(&self) -> bool {
		matches!(self, Self::InvalidSequence)
	}

	pub fn is_incomplete_char(&self) -> bool {
		matches!(self, Self::IncompleteChar)
	}
}
