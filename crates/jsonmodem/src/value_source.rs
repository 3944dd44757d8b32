//! Value Sub-Source — `nextSource()` hands the caller an
//! independent byte stream over the next value's raw text, without the
//! reader decoding it.
//!
//! The state machine (prefix buffer, depth counter, quote state) lives on
//! [`JsonReader`] itself rather than on [`ValueSource`], so the Rust borrow
//! checker's normal rules already give the "reader is suspended until the
//! sub-source finishes" guarantee for free: while a `ValueSource` borrows
//! the reader mutably, no other reader method can be called at all; once it
//! is dropped without having been read to completion, the next reader
//! operation (`ensure_peeked`/`close`) drains the rest through
//! `finish_value_source` before proceeding.

use alloc::vec::Vec;

use crate::byte_source::ByteSource;
use crate::error::{Result, SyntaxError};
use crate::path::Scope;
use crate::peek::Peeked;
use crate::reader::JsonReader;

/// Spec §4.G's 4-case state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VsState {
    Json,
    DoubleQuoted,
    SingleQuoted,
    EndOfJson,
}

impl<S: ByteSource> JsonReader<S> {
    /// Hands out a [`ValueSource`] over the next value's raw bytes instead
    /// of decoding it. Errors with [`crate::error::StateError::NotAValue`]
    /// if the next token isn't a value.
    pub fn next_source(&mut self) -> Result<ValueSource<'_, S>> {
        let peeked = self.ensure_peeked()?;
        self.vs_prefix.clear();
        self.vs_prefix_pos = 0;
        self.vs_pending = None;
        match peeked {
            Peeked::BeginObject => {
                self.vs_prefix.push(b'{');
                self.vs_state = VsState::Json;
                self.vs_depth = 1;
            }
            Peeked::BeginArray => {
                self.vs_prefix.push(b'[');
                self.vs_state = VsState::Json;
                self.vs_depth = 1;
            }
            Peeked::DoubleQuoted => {
                self.vs_prefix.push(b'"');
                self.vs_state = VsState::DoubleQuoted;
                self.vs_return_to_json = false;
            }
            Peeked::SingleQuoted => {
                self.vs_prefix.push(b'\'');
                self.vs_state = VsState::SingleQuoted;
                self.vs_return_to_json = false;
            }
            Peeked::True | Peeked::False | Peeked::Null => {
                let bytes = self.ancillary.raw_keyword.take().unwrap_or_else(|| {
                    Vec::from(match peeked {
                        Peeked::True => b"true".as_slice(),
                        Peeked::False => b"false".as_slice(),
                        _ => b"null".as_slice(),
                    })
                });
                self.vs_prefix = bytes;
                self.vs_state = VsState::EndOfJson;
            }
            Peeked::Long | Peeked::Number | Peeked::Unquoted | Peeked::Buffered => {
                let mut raw = Vec::new();
                self.copy_scalar_raw(peeked, &mut raw)?;
                self.vs_prefix = raw;
                self.vs_state = VsState::EndOfJson;
            }
            _ => return Err(self.err(crate::error::StateError::NotAValue)),
        }
        self.peeked = Peeked::None;
        self.scopes.push(Scope::StreamingValue)?;
        self.pending_value_source = true;
        Ok(ValueSource { reader: self })
    }

    /// Reads the next full value's raw bytes into a freshly allocated
    /// buffer, draining the sub-source to completion in one call. A
    /// convenience built on [`Self::next_source`] for callers that don't
    /// need incremental reads.
    pub fn next_source_bytes(&mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut source = self.next_source()?;
        let mut buf = [0_u8; 1024];
        loop {
            let n = source.read(&mut buf)?;
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        Ok(out)
    }

    /// Forces an outstanding sub-source to completion. Called from [`Self::drain_pending_value_source`] and from
    /// [`Self::close`]'s callers before either may proceed.
    pub(crate) fn finish_value_source(&mut self) -> Result<()> {
        let mut buf = [0_u8; 1024];
        loop {
            let n = self.read_value_source_chunk(&mut buf)?;
            if n == 0 {
                break;
            }
        }
        self.scopes.pop();
        self.pending_value_source = false;
        self.after_value_consumed();
        Ok(())
    }

    /// Shared read loop used by both [`ValueSource::read`] and the implicit
    /// drain. Drains the prefix buffer first, then advances the state
    /// machine one source byte at a time.
    fn read_value_source_chunk(&mut self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let mut written = 0;

        if let Some(pending) = self.vs_pending.take() {
            buf[written] = pending;
            written += 1;
        }

        if self.vs_prefix_pos < self.vs_prefix.len() {
            let available = &self.vs_prefix[self.vs_prefix_pos..];
            let n = available.len().min(buf.len() - written);
            buf[written..written + n].copy_from_slice(&available[..n]);
            self.vs_prefix_pos += n;
            written += n;
        }

        while written < buf.len() && self.vs_state != VsState::EndOfJson {
            let b = self.read_one_vs_byte()?;
            buf[written] = b;
            written += 1;
            match self.vs_state {
                VsState::Json => match b {
                    b'{' | b'[' => self.vs_depth += 1,
                    b'}' | b']' => {
                        self.vs_depth -= 1;
                        if self.vs_depth == 0 {
                            self.vs_state = VsState::EndOfJson;
                        }
                    }
                    b'"' => {
                        self.vs_state = VsState::DoubleQuoted;
                        self.vs_return_to_json = true;
                    }
                    b'\'' => {
                        self.vs_state = VsState::SingleQuoted;
                        self.vs_return_to_json = true;
                    }
                    _ => {}
                },
                VsState::DoubleQuoted | VsState::SingleQuoted => {
                    let quote = if self.vs_state == VsState::DoubleQuoted {
                        b'"'
                    } else {
                        b'\''
                    };
                    if b == b'\\' {
                        if written < buf.len() {
                            buf[written] = self.read_one_vs_byte()?;
                            written += 1;
                        } else {
                            self.vs_pending = Some(self.read_one_vs_byte()?);
                        }
                    } else if b == quote {
                        self.vs_state = if self.vs_return_to_json {
                            VsState::Json
                        } else {
                            VsState::EndOfJson
                        };
                    }
                }
                VsState::EndOfJson => unreachable!("loop condition excludes this state"),
            }
        }
        Ok(written)
    }

    fn read_one_vs_byte(&mut self) -> Result<u8> {
        if !self.source.request(1).map_err(|e| self.source_err(e))? {
            return Err(self.err(SyntaxError::UnexpectedEndOfInput));
        }
        self.source.read_byte().map_err(|e| self.source_err(e))
    }
}

/// A byte stream over the raw text of the value `nextSource()` was called
/// on. Borrows the reader for its lifetime — no other reader
/// operation is callable until this is dropped, and even then the bytes it
/// didn't read are drained automatically before the next one proceeds.
#[derive(Debug)]
pub struct ValueSource<'r, S: ByteSource> {
    reader: &'r mut JsonReader<S>,
}

impl<S: ByteSource> ValueSource<'_, S> {
    /// Reads up to `buf.len()` raw bytes, returning `0` once the value has
    /// been fully read.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.reader.read_value_source_chunk(buf)
    }
}

#[cfg(feature = "std")]
impl<S: ByteSource> std::io::Read for ValueSource<'_, S> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        ValueSource::read(self, buf).map_err(|e| std::io::Error::other(alloc::format!("{e}")))
    }
}
