//! Concrete [`ByteSource`](crate::byte_source::ByteSource) adapters.
//!
//! The buffered byte source is treated as an external collaborator, out of
//! scope for the core; this module supplies the two adapters most callers
//! need so the crate is usable out of the box, gated behind the `buffered`
//! Cargo feature, which separates "core" from "concrete adapters built on
//! the core".

mod slice;

pub use slice::SliceSource;

#[cfg(feature = "std")]
mod io;

#[cfg(feature = "std")]
pub use io::IoSource;
