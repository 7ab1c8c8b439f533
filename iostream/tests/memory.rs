// SPDX-License-Identifier: Apache-2.0

use pretty_assertions::assert_eq;
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use iostream::{open_memory, Backend, Codepoint, SeekOffset, Stream};

#[macro_use]
mod common;

#[test]
fn take_written() -> iostream::Result {
	let mut stream = open_memory(0)?;
	stream.write_str("hi")?;
	assert_eq!(stream.take_buffer(), b"hi");
	assert_eq!(stream.bytes_available(), 0);
	assert!(stream.take_buffer().is_empty());
	assert_eq!(stream.backend(), Backend::Memory);
	Ok(())
}

#[test]
fn take_returns_whole_content_not_remainder() -> iostream::Result {
	let mut stream = Stream::from_bytes(&b"abcdef"[..]);
	let mut head = [0; 4];
	stream.read_exact(&mut head)?;
	assert_eq!(&head, b"abcd");
	assert_eq!(stream.bytes_available(), 2);
	assert_eq!(stream.take_buffer(), b"abcdef");
	Ok(())
}

#[test]
fn reuse_after_take() -> iostream::Result {
	let mut stream = open_memory(4)?;
	stream.write_str("first")?;
	assert_eq!(stream.take_buffer(), b"first");
	stream.write_str("second")?;
	assert_eq!(stream.take_buffer(), b"second");
	Ok(())
}

#[test]
fn write_overwrites_at_cursor() -> iostream::Result {
	let mut stream = Stream::from_bytes(&b"hello world"[..]);
	stream.seek(SeekOffset::FromStart(6))?;
	stream.write_str("there!")?;
	assert_eq!(stream.size(), 12);
	assert_eq!(stream.take_buffer(), b"hello there!");
	Ok(())
}

#[test]
fn read_until_delimiter() -> iostream::Result {
	let mut stream = Stream::from_bytes(&b"one\ntwo"[..]);
	let mut line = Vec::new();
	assert_eq!(stream.read_until(b'\n', &mut line)?, 4);
	assert_eq!(line, b"one\n");
	line.clear();
	assert_eq!(stream.read_until(b'\n', &mut line)?, 3);
	assert_eq!(line, b"two");
	assert!(stream.is_eos());
	Ok(())
}

#[test]
fn decode_three_byte_sequence() -> iostream::Result {
	let mut stream = Stream::from_bytes("€".as_bytes());
	let before = stream.bpos();
	let codepoint = stream.next_codepoint()?;
	assert_eq!(codepoint, Codepoint::Scalar('€'));
	assert_eq!(codepoint.value(), 0x20AC);
	assert_eq!(stream.bpos() - before, 3);
	Ok(())
}

#[test]
fn decode_truncated_prefix() -> iostream::Result {
	let mut stream = Stream::from_bytes(&"€".as_bytes()[..1]);
	let codepoint = stream.next_codepoint()?;
	assert!(matches!(codepoint, Codepoint::Incomplete(_)));
	assert!(stream.bpos() <= stream.size());
	assert_eq!(stream.bpos(), 0);
	Ok(())
}

#[test]
fn closed_stream_rejects_io() -> iostream::Result {
	let mut stream = open_memory(0)?;
	stream.write_str("data")?;
	stream.close()?;
	assert!(stream.write_str("more").unwrap_err().is_closed());
	assert!(stream.next_codepoint().unwrap_err().is_closed());
	assert!(stream.read(&mut [0; 4]).unwrap_err().is_closed());
	assert_eq!(stream.bytes_available(), 0);
	assert!(stream.take_buffer().is_empty());
	Ok(())
}

#[quickcheck]
fn take_round_trip(data: Vec<u8>) -> TestResult {
	let mut stream = open_memory(0).unwrap();
	stream.write_all(&data).unwrap();
	qc_assert_eq!(stream.take_buffer(), data)
}

#[quickcheck]
fn decode_keeps_available_invariant(data: Vec<u8>) -> TestResult {
	let mut stream = Stream::from_bytes(data);
	loop {
		if stream.bytes_available() != stream.size() - stream.bpos() {
			return TestResult::failed()
		}

		let before = stream.bpos();
		match stream.next_codepoint().unwrap() {
			Codepoint::Eos => return TestResult::passed(),
			// Nothing more can be decoded after a truncated tail.
			Codepoint::Incomplete(_) => return qc_assert_eq!(stream.bpos(), before),
			_ if stream.bpos() <= before || stream.bpos() > stream.size() =>
				return TestResult::failed(),
			_ => { }
		}
	}
}

#[quickcheck]
fn decode_matches_std(text: String) -> TestResult {
	let mut stream = Stream::from_bytes(text.as_bytes());
	let mut decoded = String::with_capacity(text.len());
	while let Some(char) = stream.next_codepoint().unwrap().char() {
		decoded.push(char);
	}
	qc_assert_eq!(decoded, text)
}
