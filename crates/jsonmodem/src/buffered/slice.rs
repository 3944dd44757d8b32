//! A zero-copy [`ByteSource`] over an in-memory byte slice.

use alloc::{rc::Rc, string::String};

use bstr::ByteSlice;

use crate::byte_source::{ByteSet, ByteSource, SourceError};

/// A [`ByteSource`] backed by bytes already fully resident in memory.
///
/// Cheap to `fork()`: the underlying bytes are shared via an [`Rc`], and
/// each fork tracks only its own cursor, so `peek_json()`'s forked source
/// shares the original's buffered prefix without copying it.
#[derive(Debug, Clone)]
pub struct SliceSource {
    data: Rc<[u8]>,
    pos: usize,
}

impl SliceSource {
    /// Wraps `data` for reading.
    #[must_use]
    pub fn new(data: impl Into<alloc::vec::Vec<u8>>) -> Self {
        Self {
            data: Rc::from(data.into()),
            pos: 0,
        }
    }
}

impl ByteSource for SliceSource {
    fn request(&mut self, n: usize) -> Result<bool, SourceError> {
        Ok(self.data.len() - self.pos >= n)
    }

    fn get(&self, i: usize) -> u8 {
        self.data[self.pos + i]
    }

    fn buffered_len(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_byte(&mut self) -> Result<u8, SourceError> {
        if self.pos >= self.data.len() {
            return Err(SourceError(alloc::string::String::from(
                "unexpected end of input",
            )));
        }
        let b = self.data[self.pos];
        self.pos += 1;
        Ok(b)
    }

    fn read_utf8(&mut self, n: usize) -> Result<String, SourceError> {
        if self.data.len() - self.pos < n {
            return Err(SourceError(alloc::string::String::from(
                "unexpected end of input",
            )));
        }
        let s = core::str::from_utf8(&self.data[self.pos..self.pos + n])
            .map_err(|e| SourceError(alloc::format!("invalid utf-8: {e}")))?;
        let owned = String::from(s);
        self.pos += n;
        Ok(owned)
    }

    fn skip(&mut self, n: usize) -> Result<(), SourceError> {
        self.pos = (self.pos + n).min(self.data.len());
        Ok(())
    }

    fn index_of_element(&mut self, set: ByteSet) -> Result<Option<usize>, SourceError> {
        Ok(self.data[self.pos..]
            .iter()
            .position(|&b| set.contains(b)))
    }

    fn index_of(&mut self, seq: &[u8]) -> Result<Option<usize>, SourceError> {
        Ok(self.data[self.pos..].find(seq))
    }

    fn select(&mut self, options: &[&[u8]]) -> Result<Option<usize>, SourceError> {
        let remaining = &self.data[self.pos..];
        let mut best: Option<(usize, usize)> = None; // (option index, length)
        for (idx, opt) in options.iter().enumerate() {
            if remaining.starts_with(opt) && best.map_or(true, |(_, len)| opt.len() > len) {
                best = Some((idx, opt.len()));
            }
        }
        if let Some((idx, len)) = best {
            self.pos += len;
            Ok(Some(idx))
        } else {
            Ok(None)
        }
    }

    fn fork(&self) -> Self {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_prefers_longest_match() {
        let mut src = SliceSource::new(*b"abc\"");
        let idx = src
            .select(&[b"a", b"abc\""])
            .unwrap()
            .expect("should match");
        assert_eq!(idx, 1);
        assert_eq!(src.buffered_len(), 0);
    }

    #[test]
    fn fork_shares_bytes_independent_cursor() {
        let mut src = SliceSource::new(*b"abcd");
        src.read_byte().unwrap();
        let mut forked = src.fork();
        forked.read_byte().unwrap();
        assert_eq!(src.get(0), b'b');
        assert_eq!(forked.get(0), b'c');
    }
}
