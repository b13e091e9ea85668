//! Thermite Log Decoder Library
//!
//! A small, synchronous library for reading thermite time-series logs:
//! immutable binary files holding a fixed catalog of named signals, each
//! an ordered sequence of (timestamp, value) samples.
//!
//! # Architecture
//!
//! This library is intentionally minimal and focused on reading:
//! - Loads the header catalog once per opened log
//! - Materializes signal data lazily and caches it per handle
//! - Joins signals into a time-aligned table (outer union, optional
//!   forward fill, optional relative time axis)
//! - Abstracts the binary decode behind an engine trait, with a pure
//!   Rust parser as the default and an optional native-library shim
//!
//! The library does NOT:
//! - Write or append to logs (the format is read-only here)
//! - Decompress anything (the format carries none)
//! - Share caches across handles or threads
//!
//! # Example Usage
//!
//! ```no_run
//! use thermite_decoder::{TableOptions, ThermiteLog};
//!
//! let mut log = ThermiteLog::open("flight.thermite").unwrap();
//!
//! // Enumerate the catalog in file order
//! for name in log.signal_names() {
//!     println!("{}", name);
//! }
//!
//! // Fetch one signal (cached after the first access)
//! let rpm = log.signal("engine_rpm").unwrap();
//! println!("{} samples", rpm.len());
//!
//! // Align several signals on one time axis
//! let options = TableOptions::new()
//!     .with_ffill(true)
//!     .with_relative_timestamp(true);
//! let table = log
//!     .build_table(&["engine_rpm", "coolant_temp"], &options)
//!     .unwrap();
//! println!("{} rows x {} columns", table.num_rows(), table.num_columns());
//! ```

// Public modules
pub mod engine;
pub mod table;
pub mod types;

// Re-export main types for convenience
pub use engine::{FileEngine, LogEngine};
pub use reader::ThermiteLog;
pub use table::{AlignedTable, TableOptions};
pub use types::{HeaderEntry, Result, Sample, ThermiteError};

#[cfg(feature = "dynamic-engine")]
pub use engine::DynamicEngine;

// Internal modules (not exposed in the public API)
mod headers;
mod reader;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::MockEngine;

    #[test]
    fn test_library_basics() {
        // Smoke test: open a handle over an in-memory engine
        let log = ThermiteLog::with_engine(
            "smoke.thermite",
            MockEngine::new(vec![("a", vec![(0, 1.0)])]),
        )
        .unwrap();
        assert_eq!(log.signal_names(), vec!["a"]);
    }
}
