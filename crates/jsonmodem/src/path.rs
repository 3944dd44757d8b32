//! Scope stack and path tracking.
//!
//! A [`JsonReader`](crate::reader::JsonReader) holds a stack of [`Scope`]
//! frames, one per nesting level, each carrying the path component
//! ([`PathSlot`]) that a completed sibling at that depth contributed. The
//! path slot lives directly on the scope frame rather than in a parallel
//! structure, since the two always share the same lifetime.

use alloc::{string::String, sync::Arc, vec::Vec};
use core::fmt::{self, Write as _};

/// The hard ceiling on nesting depth.
pub const MAX_DEPTH: usize = 256;

/// A single frame on the reader's nesting stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    EmptyDocument,
    NonemptyDocument,
    EmptyObject,
    NonemptyObject,
    DanglingName,
    EmptyArray,
    NonemptyArray,
    StreamingValue,
    Closed,
}

/// The path contribution of one stack frame.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSlot {
    /// Top-level document frame; contributes nothing to the rendered path.
    None,
    /// Object frame: `Some(name)` once a name has been read, `None` before
    /// the first name or after `skipName` (rendered as `.null`).
    Name(Option<Arc<str>>),
    /// Array frame: the number of completed elements so far.
    Index(usize),
}

/// One nesting frame: a [`Scope`] paired with its [`PathSlot`].
#[derive(Debug, Clone)]
struct Frame {
    scope: Scope,
    slot: PathSlot,
}

/// The reader's nesting stack, doubling as the path-tracking structure.
#[derive(Debug, Clone)]
pub(crate) struct ScopeStack {
    frames: Vec<Frame>,
}

impl ScopeStack {
    pub(crate) fn new() -> Self {
        Self {
            frames: alloc::vec![Frame {
                scope: Scope::EmptyDocument,
                slot: PathSlot::None,
            }],
        }
    }

    pub(crate) fn top(&self) -> Scope {
        self.frames
            .last()
            .map_or(Scope::Closed, |frame| frame.scope)
    }

    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn set_top(&mut self, scope: Scope) {
        if let Some(frame) = self.frames.last_mut() {
            frame.scope = scope;
        }
    }

    pub(crate) fn push(&mut self, scope: Scope) -> crate::error::Result<()> {
        if self.frames.len() >= MAX_DEPTH {
            return Err(crate::error::JsonError::new(
                crate::error::ErrorKind::Syntax(crate::error::SyntaxError::NestingTooDeep(
                    MAX_DEPTH,
                )),
                &self.render_path(),
            ));
        }
        let slot = match scope {
            Scope::EmptyObject | Scope::NonemptyObject | Scope::DanglingName => {
                PathSlot::Name(None)
            }
            Scope::EmptyArray | Scope::NonemptyArray => PathSlot::Index(0),
            _ => PathSlot::None,
        };
        self.frames.push(Frame { scope, slot });
        Ok(())
    }

    pub(crate) fn pop(&mut self) {
        self.frames.pop();
    }

    /// Records that the current object frame just consumed a name.
    pub(crate) fn set_name(&mut self, name: Arc<str>) {
        if let Some(frame) = self.frames.last_mut() {
            frame.slot = PathSlot::Name(Some(name));
        }
    }

    /// `skipName` stamps the literal string `"null"` as the path component
    ///.
    pub(crate) fn stamp_null_name(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.slot = PathSlot::Name(None);
        }
    }

    /// Increments the current array frame's index after a completed element.
    pub(crate) fn increment_index(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            if let PathSlot::Index(ref mut i) = frame.slot {
                *i += 1;
            }
        }
    }

    pub(crate) fn current_index(&self) -> Option<usize> {
        self.frames.last().and_then(|frame| match frame.slot {
            PathSlot::Index(i) => Some(i),
            _ => None,
        })
    }

    pub(crate) fn render_path(&self) -> Path {
        let mut out = String::from("$");
        for frame in &self.frames {
            match &frame.slot {
                PathSlot::None => {}
                PathSlot::Name(Some(name)) => {
                    let _ = write!(out, ".{name}");
                }
                PathSlot::Name(None) => {
                    out.push_str(".null");
                }
                PathSlot::Index(i) => {
                    let _ = write!(out, "[{i}]");
                }
            }
        }
        Path(out)
    }
}

/// A rendered JSONPath-like position string, e.g. `$.user.addresses[2].city`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path(String);

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Path {
    /// Borrow the rendered path as a plain string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_path_is_dollar() {
        let stack = ScopeStack::new();
        assert_eq!(stack.render_path().as_str(), "$");
    }

    #[test]
    fn array_then_object_path() {
        let mut stack = ScopeStack::new();
        stack.push(Scope::EmptyArray).unwrap();
        stack.push(Scope::EmptyObject).unwrap();
        stack.set_name(Arc::from("city"));
        assert_eq!(stack.render_path().as_str(), "$[0].city");
    }

    #[test]
    fn skip_name_renders_null() {
        let mut stack = ScopeStack::new();
        stack.push(Scope::EmptyObject).unwrap();
        stack.stamp_null_name();
        assert_eq!(stack.render_path().as_str(), "$.null");
    }

    #[test]
    fn nesting_ceiling_is_enforced() {
        let mut stack = ScopeStack::new();
        for _ in 0..MAX_DEPTH - 1 {
            stack.push(Scope::EmptyArray).unwrap();
        }
        assert!(stack.push(Scope::EmptyArray).is_err());
    }
}
