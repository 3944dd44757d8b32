//! A streaming, pull-style UTF-8 JSON reader with byte-exact passthrough.
//!
//! [`JsonReader`] tokenizes a byte stream into JSON structural events and
//! primitive values while preserving the exact original byte representation
//! of any sub-value it passes through ([`JsonReader::stream_value`]). It
//! supports structured decoding (`begin_object`/`next_string`/`next_long`/…),
//! passthrough streaming of whole values, and unescaping a double-quoted
//! string while keeping its surrounding quotes
//! ([`JsonReader::stream_double_quoted_string_unescape`]).
//!
//! The core is `no_std` + `alloc`; concrete byte-source adapters
//! ([`buffered::SliceSource`], [`buffered::IoSource`]) live behind the
//! `buffered`/`std` Cargo features so that bindings which supply their own
//! transport can depend on the core alone.

#![no_std]
#![allow(clippy::module_name_repetitions)]

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod byte_source;
mod error;
mod escape;
mod literal;
mod options;
mod passthrough;
mod path;
mod peek;
mod reader;
mod scanner;
mod value_source;

#[cfg(feature = "buffered")]
pub mod buffered;

pub use byte_source::{ByteSource, SourceError};
pub use error::{DataError, ErrorKind, JsonError, Result, StateError, SyntaxError};
pub use options::ReaderOptions;
pub use passthrough::{ValueSink, ValueWriter};
pub use path::Path;
pub use peek::TokenKind;
pub use reader::{DryRunKind, JsonReader};
pub use value_source::ValueSource;

#[cfg(feature = "buffered")]
pub use buffered::SliceSource;

#[cfg(feature = "std")]
pub use buffered::IoSource;
