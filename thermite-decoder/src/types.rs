//! Core types for the thermite decoder library
//!
//! This module defines the fundamental types shared across the decoder:
//! samples, header catalog entries, and the error taxonomy. The decoder
//! reads logs as-is - samples are never re-sorted, deduplicated or unit
//! converted.

use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, ThermiteError>;

/// One (timestamp, value) observation within a signal
///
/// Signals are assumed to be ordered ascending by timestamp, but the
/// decoder treats the ordering as opaque payload and never enforces it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Microseconds since Unix epoch (Jan 1, 1970)
    pub timestamp_us: i64,
    /// Recorded value
    pub value: f64,
}

impl Sample {
    /// Convert the timestamp from microseconds to DateTime<Utc>
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_micros(self.timestamp_us).unwrap_or_else(Utc::now)
    }

    /// Timestamp in seconds since Unix epoch
    pub fn seconds(&self) -> f64 {
        self.timestamp_us as f64 / 1e6
    }
}

/// One entry of the header catalog
///
/// The catalog is read once per log handle and its file order is
/// authoritative for signal enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderEntry {
    /// Signal name decoded from the fixed-width name field
    pub name: String,
    /// Absolute offset of the signal's data block. Opaque to callers -
    /// only the engine interprets it.
    pub start_offset: u64,
}

/// Errors that can occur while reading a thermite log
///
/// Every variant carries the negative code returned by the engine so the
/// failure site stays diagnosable. An unknown signal name is NOT an error
/// and is reported as an empty sample sequence instead.
#[derive(Debug, thiserror::Error)]
pub enum ThermiteError {
    #[error("Failed to query header count for {path:?}: engine code {code}")]
    HeaderCount { path: PathBuf, code: i64 },

    #[error("Failed to read headers from {path:?}: engine code {code}")]
    HeaderRead { path: PathBuf, code: i64 },

    #[error("Failed to query sample count for signal '{name}': engine code {code}")]
    DataCount { name: String, code: i64 },

    #[error("Failed to read samples for signal '{name}': engine code {code}")]
    DataRead { name: String, code: i64 },
}
