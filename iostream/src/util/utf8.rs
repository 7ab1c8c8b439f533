// SPDX-License-Identifier: Apache-2.0

//! Single-codepoint UTF-8 decoding over a byte window.

use simdutf8::compat::from_utf8;

// Char width copied from std

// https://tools.ietf.org/html/rfc3629
const UTF8_CHAR_WIDTH: &[u8; 256] = &[
	// 1  2  3  4  5  6  7  8  9  A  B  C  D  E  F
	1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, // 0
	1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, // 1
	1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, // 2
	1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, // 3
	1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, // 4
	1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, // 5
	1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, // 6
	1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, // 7
	0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // 8
	0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // 9
	0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // A
	0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // B
	0, 0, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, // C
	2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, // D
	3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, // E
	4, 4, 4, 4, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // F
];

/// Returns the encoded width of a character starting with `b`, or `0` if `b`
/// can't start a character.
#[inline]
pub const fn utf8_char_width(b: u8) -> usize {
	UTF8_CHAR_WIDTH[b as usize] as usize
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Decoded {
	/// A complete character of the given encoded length.
	Char(char, usize),
	/// An invalid sequence of the given length, at least one byte.
	Invalid(usize),
	/// A valid but incomplete prefix; more bytes are needed.
	Incomplete,
}

/// Decodes the first character in `bytes`, which must not be empty.
pub fn decode_char(bytes: &[u8]) -> Decoded {
	let width = utf8_char_width(bytes[0]);
	if width == 0 {
		return Decoded::Invalid(1)
	}

	let candidate = &bytes[..width.min(bytes.len())];
	match from_utf8(candidate) {
		Ok(str) if candidate.len() == width => match str.chars().next() {
			Some(char) => Decoded::Char(char, width),
			None => Decoded::Invalid(1)
		}
		Ok(_) => Decoded::Incomplete,
		Err(err) => match err.error_len() {
			Some(len) => Decoded::Invalid(len),
			None if candidate.len() < width => Decoded::Incomplete,
			None => Decoded::Invalid(1),
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn ascii() {
		assert_eq!(decode_char(b"hi"), Decoded::Char('h', 1));
	}

	#[test]
	fn multi_byte() {
		assert_eq!(decode_char("€uro".as_bytes()), Decoded::Char('€', 3));
		assert_eq!(decode_char("🦀".as_bytes()), Decoded::Char('🦀', 4));
	}

	#[test]
	fn truncated() {
		let euro = "€".as_bytes();
		assert_eq!(decode_char(&euro[..1]), Decoded::Incomplete);
		assert_eq!(decode_char(&euro[..2]), Decoded::Incomplete);
	}

	#[test]
	fn invalid() {
		// Lone continuation byte
		assert_eq!(decode_char(&[0x80, b'a']), Decoded::Invalid(1));
		// Lead byte followed by a non-continuation byte
		assert_eq!(decode_char(&[0xE2, b'a', b'b']), Decoded::Invalid(1));
		// Overlong encoding prefix
		assert_eq!(decode_char(&[0xC0, 0x80]), Decoded::Invalid(1));
	}
}
