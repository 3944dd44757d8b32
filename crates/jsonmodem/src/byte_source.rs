//! The minimal interface the reader requires from any refillable buffered
//! byte stream, plus the dual-sink discipline the scanner routes skipped
//! bytes through.
//!
//! This is deliberately a thin, synchronous, pull-based port; the concrete
//! buffered byte source is treated as an external collaborator, out of
//! scope for the core. Concrete adapters (`SliceSource`, `IoSource`) live in
//! [`crate::buffered`], gated behind the `buffered`/`std` Cargo features so
//! bindings that supply their own transport can depend on the core alone.

use alloc::string::String;
use alloc::vec::Vec;

/// A small bitmask over the ASCII byte range, used by
/// [`ByteSource::index_of_element`] for the few structural byte-sets the
/// scanner needs to search for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ByteSet(u128);

impl ByteSet {
    pub(crate) const fn new() -> Self {
        Self(0)
    }

    pub(crate) const fn with(mut self, byte: u8) -> Self {
        debug_assert!(byte < 128, "ByteSet only covers ASCII");
        self.0 |= 1 << byte;
        self
    }

    pub(crate) fn from_bytes(bytes: &[u8]) -> Self {
        let mut set = Self::new();
        for &b in bytes {
            set = set.with(b);
        }
        set
    }

    pub(crate) const fn contains(self, byte: u8) -> bool {
        byte < 128 && (self.0 & (1 << byte)) != 0
    }
}

/// Where skipped bytes go while scanning. The no-op blackhole variant is used whenever passthrough is
/// not in effect so the core scanner logic never needs two code paths.
pub(crate) trait Sink {
    fn write(&mut self, bytes: &[u8]);
}

/// Discards everything written to it.
pub(crate) struct Blackhole;

impl Sink for Blackhole {
    fn write(&mut self, _bytes: &[u8]) {}
}

impl Sink for Vec<u8> {
    fn write(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

impl Sink for String {
    fn write(&mut self, bytes: &[u8]) {
        // Passthrough only ever writes byte runs that came from validated
        // UTF-8 JSON input, so this cannot fail in practice; debug-assert
        // rather than pay for validation on every call in release builds.
        debug_assert!(core::str::from_utf8(bytes).is_ok());
        self.push_str(unsafe { core::str::from_utf8_unchecked(bytes) });
    }
}

/// Byte-level failure from the underlying source (e.g. an I/O error).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError(pub(crate) alloc::string::String);

impl core::fmt::Display for SourceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl core::error::Error for SourceError {}

/// The refillable buffered byte queue the reader requires.
///
/// Implementations own a growable buffer of "currently available" bytes;
/// `request` ensures at least `n` of them are materialized (refilling from
/// the underlying transport as needed), and the `get`/`read`/`skip`/`index_*`
/// family operate only on that buffered prefix — they never block past what
/// `request` has already pulled in.
pub trait ByteSource {
    /// Ensures at least `n` bytes are buffered. Returns `false` at EOF if
    /// fewer than `n` bytes are available in total.
    fn request(&mut self, n: usize) -> Result<bool, SourceError>;

    /// The `i`-th buffered byte. Panics if `i >= buffered_len()`; callers
    /// must `request` first.
    fn get(&self, i: usize) -> u8;

    /// How many bytes are currently buffered and available without a
    /// further `request`.
    fn buffered_len(&self) -> usize;

    /// Consumes and returns the first buffered byte.
    fn read_byte(&mut self) -> Result<u8, SourceError>;

    /// Consumes exactly `n` buffered bytes as UTF-8 text.
    fn read_utf8(&mut self, n: usize) -> Result<alloc::string::String, SourceError>;

    /// Discards the first `n` buffered bytes.
    fn skip(&mut self, n: usize) -> Result<(), SourceError>;

    /// Index of the first buffered byte in `set`, requesting more input as
    /// needed, or `None` at EOF without a match.
    fn index_of_element(&mut self, set: ByteSet) -> Result<Option<usize>, SourceError>;

    /// Index of the first occurrence of the byte sequence `seq`, requesting
    /// more input as needed, or `None` at EOF without a match.
    fn index_of(&mut self, seq: &[u8]) -> Result<Option<usize>, SourceError>;

    /// Atomically matches the longest of `options` against the buffered
    /// bytes and consumes it, or returns `None` without consuming anything
    ///. Each option is expected
    /// to include its own terminator byte (e.g. a trailing `"`).
    fn select(&mut self, options: &[&[u8]]) -> Result<Option<usize>, SourceError>;

    /// An independent view sharing the already-buffered bytes but not this
    /// source's position — used by `peekJson()`.
    fn fork(&self) -> Self
    where
        Self: Sized;

    /// Releases any resources the source holds.
    fn close(&mut self) -> Result<(), SourceError> {
        Ok(())
    }
}
