//! Header index reader
//!
//! Loads the signal name catalog once per log handle. The file order of
//! the catalog is authoritative for enumeration; start offsets are carried
//! along but stay opaque to callers.

use crate::engine::format::RawHeader;
use crate::engine::LogEngine;
use crate::types::{HeaderEntry, Result, ThermiteError};
use std::path::Path;

/// Load the full header catalog for a log file
///
/// Queries the engine for the header count, allocates a buffer of exactly
/// that size and asks the engine to populate it in one call. The count
/// query and the populate query are distinguishable failure sites.
pub fn load_headers<E: LogEngine>(engine: &E, path: &Path) -> Result<Vec<HeaderEntry>> {
    let count = engine.header_count(path);
    if count < 0 {
        return Err(ThermiteError::HeaderCount {
            path: path.to_path_buf(),
            code: count,
        });
    }

    let mut buffer = vec![RawHeader::default(); count as usize];
    let populated = engine.headers(path, &mut buffer);
    if populated < 0 {
        return Err(ThermiteError::HeaderRead {
            path: path.to_path_buf(),
            code: populated,
        });
    }

    let entries = buffer
        .iter()
        .map(|raw| HeaderEntry {
            name: raw.decoded_name(),
            start_offset: raw.start,
        })
        .collect();

    log::debug!("Loaded {} headers from {:?}", count, path);
    Ok(entries)
}
