//! A [`ByteSource`] over any [`std::io::Read`], gated behind the `std`
//! feature.
//!
//! Keeps a `VecDeque`-backed ring of already-read data and refills it from
//! the underlying transport on demand. The ring holds raw bytes rather than
//! `char`s, and is shared via `Rc<RefCell<_>>` so that `fork()` can hand out
//! an independent cursor over the same bytes, as `peek_json()` requires.
//!
//! Simplification (recorded in DESIGN.md): bytes are never evicted from the
//! shared ring once read, so a long-lived `IoSource` that is forked
//! repeatedly will retain the entire stream in memory. Real deployments are
//! expected to read a bounded value at a time and drop the reader; adding a
//! low-water-mark eviction scheme keyed on the oldest live fork would be a
//! natural follow-up.

use alloc::{
    format,
    rc::Rc,
    string::String,
    vec::Vec,
};
use core::cell::RefCell;
use std::io::Read;

use bstr::ByteSlice;

use crate::byte_source::{ByteSet, ByteSource, SourceError};

const REFILL_CHUNK: usize = 4096;

struct Shared<R> {
    reader: R,
    buf: Vec<u8>,
    eof: bool,
}

/// A [`ByteSource`] that pulls from a [`std::io::Read`] implementation,
/// refilling an internal buffer on demand.
pub struct IoSource<R: Read> {
    shared: Rc<RefCell<Shared<R>>>,
    pos: usize,
}

impl<R: Read> IoSource<R> {
    /// Wraps `reader` for reading.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            shared: Rc::new(RefCell::new(Shared {
                reader,
                buf: Vec::new(),
                eof: false,
            })),
            pos: 0,
        }
    }

    fn fill_to(&self, n: usize) -> Result<bool, SourceError> {
        let mut shared = self.shared.borrow_mut();
        while shared.buf.len() - self.pos < n && !shared.eof {
            let mut chunk = [0_u8; REFILL_CHUNK];
            let read = shared
                .reader
                .read(&mut chunk)
                .map_err(|e| SourceError(format!("i/o error: {e}")))?;
            if read == 0 {
                shared.eof = true;
            } else {
                shared.buf.extend_from_slice(&chunk[..read]);
            }
        }
        Ok(shared.buf.len() - self.pos >= n)
    }
}

impl<R: Read> ByteSource for IoSource<R> {
    fn request(&mut self, n: usize) -> Result<bool, SourceError> {
        self.fill_to(n)
    }

    fn get(&self, i: usize) -> u8 {
        self.shared.borrow().buf[self.pos + i]
    }

    fn buffered_len(&self) -> usize {
        self.shared.borrow().buf.len() - self.pos
    }

    fn read_byte(&mut self) -> Result<u8, SourceError> {
        self.fill_to(1)?;
        let shared = self.shared.borrow();
        let b = *shared
            .buf
            .get(self.pos)
            .ok_or_else(|| SourceError(String::from("unexpected end of input")))?;
        drop(shared);
        self.pos += 1;
        Ok(b)
    }

    fn read_utf8(&mut self, n: usize) -> Result<String, SourceError> {
        self.fill_to(n)?;
        let shared = self.shared.borrow();
        if shared.buf.len() - self.pos < n {
            return Err(SourceError(String::from("unexpected end of input")));
        }
        let s = core::str::from_utf8(&shared.buf[self.pos..self.pos + n])
            .map_err(|e| SourceError(format!("invalid utf-8: {e}")))?;
        let owned = String::from(s);
        drop(shared);
        self.pos += n;
        Ok(owned)
    }

    fn skip(&mut self, n: usize) -> Result<(), SourceError> {
        self.fill_to(n)?;
        self.pos += n;
        Ok(())
    }

    fn index_of_element(&mut self, set: ByteSet) -> Result<Option<usize>, SourceError> {
        let mut window = REFILL_CHUNK;
        loop {
            let have = self.fill_to(window)?;
            let shared = self.shared.borrow();
            if let Some(rel) = shared.buf[self.pos..].iter().position(|&b| set.contains(b)) {
                return Ok(Some(rel));
            }
            if !have {
                return Ok(None);
            }
            drop(shared);
            window += REFILL_CHUNK;
        }
    }

    fn index_of(&mut self, seq: &[u8]) -> Result<Option<usize>, SourceError> {
        let mut window = REFILL_CHUNK.max(seq.len());
        loop {
            let have = self.fill_to(window)?;
            let shared = self.shared.borrow();
            if let Some(rel) = shared.buf[self.pos..].find(seq) {
                return Ok(Some(rel));
            }
            if !have {
                return Ok(None);
            }
            drop(shared);
            window += REFILL_CHUNK;
        }
    }

    fn select(&mut self, options: &[&[u8]]) -> Result<Option<usize>, SourceError> {
        let max_len = options.iter().map(|o| o.len()).max().unwrap_or(0);
        self.fill_to(max_len)?;
        let shared = self.shared.borrow();
        let remaining = &shared.buf[self.pos..];
        let mut best: Option<(usize, usize)> = None;
        for (idx, opt) in options.iter().enumerate() {
            if remaining.starts_with(opt) && best.map_or(true, |(_, len)| opt.len() > len) {
                best = Some((idx, opt.len()));
            }
        }
        drop(shared);
        if let Some((idx, len)) = best {
            self.pos += len;
            Ok(Some(idx))
        } else {
            Ok(None)
        }
    }

    fn fork(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
            pos: self.pos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_from_an_io_reader() {
        let mut src = IoSource::new(b"true".as_slice());
        assert!(src.request(4).unwrap());
        assert_eq!(src.get(0), b't');
        assert_eq!(src.read_utf8(4).unwrap(), "true");
    }

    #[test]
    fn fork_shares_already_buffered_bytes() {
        let mut src = IoSource::new(b"{\"a\":1}".as_slice());
        src.request(7).unwrap();
        let forked = src.fork();
        assert_eq!(forked.buffered_len(), 7);
        assert_eq!(forked.get(1), b'"');
    }
}
