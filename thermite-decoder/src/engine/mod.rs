//! Engine boundary for thermite log access
//!
//! The engine is the component that performs the actual binary decode given
//! a file path and a signal name. It exposes four operations with C-style
//! signed returns: a non-negative value is a count of entries, a negative
//! value is an error code (see [`codes`]).
//!
//! Two implementations exist behind the same trait:
//! - [`FileEngine`]: pure Rust parser for the container layout in
//!   [`format`]
//! - `DynamicEngine` (feature `dynamic-engine`): shim that forwards the
//!   four calls to an existing native `libthermite` shared library

use std::path::Path;

pub mod format;

pub mod file;
#[cfg(feature = "dynamic-engine")]
pub mod dynamic;

pub use file::FileEngine;
#[cfg(feature = "dynamic-engine")]
pub use dynamic::DynamicEngine;

use format::{RawHeader, RawSample};

/// Engine error codes returned as negative values from [`LogEngine`]
/// operations
pub mod codes {
    /// File could not be opened
    pub const OPEN_FAILED: i64 = -1;
    /// Read past end of file (truncated record or block)
    pub const TRUNCATED: i64 = -2;
    /// Magic bytes did not match
    pub const BAD_MAGIC: i64 = -3;
    /// Container format version not supported
    pub const BAD_VERSION: i64 = -4;
    /// Signal name not present in the header catalog
    pub const UNKNOWN_SIGNAL: i64 = -5;
    /// Generic read failure
    pub const READ_FAILED: i64 = -6;
}

/// The four engine operations against a log file
///
/// Out-buffers are caller-allocated slices; the slice length is the
/// requested entry count. On success an operation returns the number of
/// entries populated (non-negative); on failure a negative code from
/// [`codes`].
pub trait LogEngine {
    /// Number of header records in the log
    fn header_count(&self, path: &Path) -> i64;

    /// Populate `out` with the first `out.len()` header records, in file
    /// order
    fn headers(&self, path: &Path, out: &mut [RawHeader]) -> i64;

    /// Number of sample records in the named signal's data block
    fn data_count(&self, path: &Path, name: &str) -> i64;

    /// Populate `out` with the first `out.len()` sample records of the
    /// named signal, in file order
    fn data(&self, path: &Path, name: &str, out: &mut [RawSample]) -> i64;
}
