// Copyright 2023 Strixpyrr
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

mod utf8;

pub use utf8::*;

use std::{fmt, io, result};
use std::collections::TryReserveError;
use std::error::Error as StdError;
use std::fmt::{Display, Formatter};
use std::os::fd::RawFd;
use std::path::{Path, PathBuf};
use amplify_derive::Display;

pub type ErrorBox = Box<dyn StdError + Send + Sync>;
pub type Result<T = ()> = result::Result<T, Error>;

/// The stream operation that failed.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Display)]
pub enum OperationKind {
	#[default]
	#[display("unknown operation")]
	Unknown,
	#[display("open")]
	Open,
	#[display("allocate buffer")]
	Allocate,
	#[display("read")]
	Read,
	#[display("write")]
	Write,
	#[display("flush")]
	Flush,
	#[display("seek")]
	Seek,
	#[display("close")]
	Close,
	#[display("{0}")]
	Other(&'static str)
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Display)]
pub enum ErrorKind {
	/// The medium could not be bound to a stream.
	#[display("could not open")]
	Open,
	/// Buffer memory could not be reserved.
	#[display("allocation failed")]
	Alloc,
	#[display("IO error")]
	Io,
	#[display("stream closed")]
	Closed,
	#[display("{0}")]
	Other(&'static str),
}

/// The medium an error refers to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Target {
	File(PathBuf),
	Descriptor(RawFd),
}

impl Display for Target {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Self::File(path) => write!(f, "file {}", path.display()),
			Self::Descriptor(fd) => write!(f, "descriptor {fd}"),
		}
	}
}

#[derive(Debug)]
pub struct Error {
	op: OperationKind,
	kind: ErrorKind,
	target: Option<Target>,
	source: Option<ErrorBox>,
}

impl Display for Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let Self { op, kind, target, source } = self;
		match kind {
			ErrorKind::Open => {
				match target {
					Some(Target::File(path)) => write!(f, "could not open file {}", path.display())?,
					Some(target) => write!(f, "could not open {target}")?,
					None => write!(f, "{op} failed; {kind}")?,
				}
			}
			_ => {
				write!(f, "{op} ")?;
				if let Some(target) = target {
					write!(f, "on {target} ")?;
				}
				write!(f, "failed; {kind}")?;
			}
		}

		if let Some(source) = source {
			write!(f, " ({source})")
		} else {
			Ok(())
		}
	}
}

impl StdError for Error {
	fn source(&self) -> Option<&(dyn StdError + 'static)> {
		if let Some(ref source) = self.source {
			Some(source.as_ref())
		} else {
			None
		}
	}
}

impl Error {
	pub(crate) fn new(
		op: OperationKind,
		kind: ErrorKind,
		target: Option<Target>,
		source: Option<ErrorBox>
	) -> Self {
		Self { op, kind, target, source }
	}

	/// Creates a new error with a custom message.
	pub fn other(
		op: OperationKind,
		message: &'static str,
		source: Option<ErrorBox>
	) -> Self {
		Self::new(op, ErrorKind::Other(message), None, source)
	}

	/// Creates a new "could not open" error for a file `path`.
	pub fn open(path: impl AsRef<Path>, error: io::Error) -> Self {
		Self::new(
			OperationKind::Open,
			ErrorKind::Open,
			Some(Target::File(path.as_ref().to_path_buf())),
			Some(error.into())
		)
	}

	/// Creates a new allocation error.
	pub fn alloc(op: OperationKind, error: TryReserveError) -> Self {
		Self::new(op, ErrorKind::Alloc, None, Some(error.into()))
	}

	/// Creates a new IO error on descriptor `fd`.
	pub fn io(op: OperationKind, fd: Option<RawFd>, error: io::Error) -> Self {
		Self::new(op, ErrorKind::Io, fd.map(Target::Descriptor), Some(error.into()))
	}

	/// Creates a new "closed" error.
	pub fn closed(op: OperationKind) -> Self {
		Self::new(op, ErrorKind::Closed, None, None)
	}

	/// Returns the operation kind.
	pub fn operation(&self) -> OperationKind { self.op }

	/// Sets the operation kind.
	pub fn with_operation(mut self, op: OperationKind) -> Self {
		self.op = op;
		self
	}

	/// Returns the error kind.
	pub fn kind(&self) -> ErrorKind { self.kind }

	/// Returns the file or descriptor the error refers to, if any.
	pub fn target(&self) -> Option<&Target> { self.target.as_ref() }

	/// Returns the path of the file that failed to open, if any.
	pub fn path(&self) -> Option<&Path> {
		match self.target {
			Some(Target::File(ref path)) => Some(path),
			_ => None
		}
	}

	/// Returns the source downcast into an IO Error, if possible.
	pub fn io_source(&self) -> Option<&io::Error> {
		self.source()?.downcast_ref()
	}

	/// Returns the raw OS error number behind this error, if any.
	pub fn raw_os_error(&self) -> Option<i32> {
		self.io_source()?.raw_os_error()
	}

	pub fn is_open(&self) -> bool { matches!(self.kind, ErrorKind::Open) }
	pub fn is_alloc(&self) -> bool { matches!(self.kind, ErrorKind::Alloc) }
	pub fn is_closed(&self) -> bool { matches!(self.kind, ErrorKind::Closed) }
}

impl From<Error> for io::Error {
	fn from(value: Error) -> Self {
		let kind = match value.io_source() {
			Some(source) => source.kind(),
			None if value.is_closed() => io::ErrorKind::BrokenPipe,
			None if value.is_alloc() => io::ErrorKind::OutOfMemory,
			None => io::ErrorKind::Other,
		};
		io::Error::new(kind, value)
	}
}

/// Attaches stream context to IO results.
pub(crate) trait ResultContext<T> {
	fn context(self, op: OperationKind, fd: Option<RawFd>) -> Result<T>;
}

impl<T> ResultContext<T> for io::Result<T> {
	fn context(self, op: OperationKind, fd: Option<RawFd>) -> Result<T> {
		self.map_err(|err| Error::io(op, fd, err))
	}
}

impl<T> ResultContext<T> for result::Result<T, TryReserveError> {
	fn context(self, op: OperationKind, _: Option<RawFd>) -> Result<T> {
		self.map_err(|err| Error::alloc(op, err))
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn open_message_names_path() {
		let error = Error::open("/nonexistent/dir/x", io::Error::from_raw_os_error(libc::ENOENT));
		let message = error.to_string();
		assert!(message.starts_with("could not open file /nonexistent/dir/x"), "{message}");
		assert_eq!(error.path(), Some(Path::new("/nonexistent/dir/x")));
		assert_eq!(error.raw_os_error(), Some(libc::ENOENT));
	}

	#[test]
	fn io_message_names_descriptor() {
		let error = Error::io(OperationKind::Read, Some(7), io::Error::from_raw_os_error(libc::EBADF));
		assert!(error.to_string().starts_with("read on descriptor 7 failed; IO error"));
	}

	#[test]
	fn closed_message() {
		assert_eq!(Error::closed(OperationKind::Write).to_string(), "write failed; stream closed");
	}
}
