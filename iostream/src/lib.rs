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

//! ## How it works
//!
//! A [`Stream`] binds one owned byte buffer to one of three media: a descriptor
//! handed over by the caller, a file opened by path, or memory. Everything else,
//! decoding, extraction and polling, works on the stream without caring which
//! medium is behind it.
//!
//! ### Buffer
//!
//! The buffer holds `size` valid bytes and a cursor, `bpos`. Memory streams keep
//! the whole medium in the buffer; reads and writes both happen at the cursor.
//! Descriptor and file streams keep a window instead, which is either read-ahead
//! waiting to be consumed or output waiting to be flushed. Read-ahead is never
//! pulled from the OS twice. Switching from reading to writing moves the OS
//! position back over unread bytes where the medium allows seeking.
//!
//! ### Extraction
//!
//! [`Stream::take_buffer`] moves the accumulated bytes out as a `Vec<u8>`, leaving
//! a fresh empty buffer behind. Nothing in the stream aliases the returned bytes.
//!
//! ### Readiness
//!
//! [`wait_ready`] blocks on a single descriptor until it's readable or faulted;
//! [`poll_readable`] asks the same question without waiting. Faults come back as
//! values rather than errors.

mod context;
mod error;
mod handle;
mod options;
mod readiness;
mod stream;
mod sys;
mod util;
pub mod os_error;
pub mod status;

pub use context::*;
pub use error::*;
pub use handle::*;
pub use options::*;
pub use readiness::*;
pub use stream::*;
