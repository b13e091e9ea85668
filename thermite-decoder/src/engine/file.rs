//! Pure Rust engine: direct parsing of the thermite container
//!
//! Replaces the native reference engine with a stdlib + `byteorder`
//! implementation of the same four operations. Every call opens the file,
//! decodes what it needs and returns; the caller side (the log handle)
//! is responsible for caching.

use byteorder::{LittleEndian, ReadBytesExt};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use super::codes;
use super::format::{self, RawHeader, RawSample};
use super::LogEngine;

/// Engine backed by direct binary parsing
///
/// Stateless: the per-handle cache lives on the log handle, not here.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileEngine;

impl FileEngine {
    /// Create a new file engine
    pub fn new() -> Self {
        Self
    }

    fn open(path: &Path) -> Result<BufReader<File>, i64> {
        match File::open(path) {
            Ok(file) => Ok(BufReader::new(file)),
            Err(e) => {
                log::warn!("Failed to open thermite log {:?}: {}", path, e);
                Err(codes::OPEN_FAILED)
            }
        }
    }

    /// Validate magic and version, then return the header count
    fn read_preamble(reader: &mut BufReader<File>) -> Result<u64, i64> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic).map_err(|_| codes::TRUNCATED)?;
        if magic != format::MAGIC {
            return Err(codes::BAD_MAGIC);
        }
        let version = reader
            .read_u32::<LittleEndian>()
            .map_err(|_| codes::TRUNCATED)?;
        if version != format::FORMAT_VERSION {
            log::warn!("Unsupported thermite container version {}", version);
            return Err(codes::BAD_VERSION);
        }
        reader.read_u64::<LittleEndian>().map_err(|_| codes::TRUNCATED)
    }

    fn read_header(reader: &mut BufReader<File>) -> Result<RawHeader, i64> {
        let mut header = RawHeader::default();
        reader
            .read_exact(&mut header.name)
            .map_err(|_| codes::TRUNCATED)?;
        header.start = reader
            .read_u64::<LittleEndian>()
            .map_err(|_| codes::TRUNCATED)?;
        Ok(header)
    }

    fn read_sample(reader: &mut BufReader<File>) -> Result<RawSample, i64> {
        let timestamp_us = reader
            .read_i64::<LittleEndian>()
            .map_err(|_| codes::TRUNCATED)?;
        let value = reader
            .read_f64::<LittleEndian>()
            .map_err(|_| codes::TRUNCATED)?;
        Ok(RawSample {
            timestamp_us,
            value,
        })
    }

    /// Locate the named signal's data block and return a reader positioned
    /// past its sample count, plus that count
    ///
    /// Duplicate names resolve to the first matching header.
    fn seek_data_block(
        path: &Path,
        name: &str,
    ) -> Result<(BufReader<File>, u64), i64> {
        let mut reader = Self::open(path)?;
        let header_count = Self::read_preamble(&mut reader)?;

        let mut start = None;
        for _ in 0..header_count {
            let header = Self::read_header(&mut reader)?;
            if header.decoded_name() == name {
                start = Some(header.start);
                break;
            }
        }
        let start = start.ok_or(codes::UNKNOWN_SIGNAL)?;

        reader
            .seek(SeekFrom::Start(start))
            .map_err(|_| codes::READ_FAILED)?;
        let sample_count = reader
            .read_u64::<LittleEndian>()
            .map_err(|_| codes::TRUNCATED)?;
        Ok((reader, sample_count))
    }
}

fn count_to_i64(count: u64) -> i64 {
    if count > i64::MAX as u64 {
        codes::READ_FAILED
    } else {
        count as i64
    }
}

impl LogEngine for FileEngine {
    fn header_count(&self, path: &Path) -> i64 {
        let mut reader = match Self::open(path) {
            Ok(reader) => reader,
            Err(code) => return code,
        };
        match Self::read_preamble(&mut reader) {
            Ok(count) => count_to_i64(count),
            Err(code) => code,
        }
    }

    fn headers(&self, path: &Path, out: &mut [RawHeader]) -> i64 {
        let mut reader = match Self::open(path) {
            Ok(reader) => reader,
            Err(code) => return code,
        };
        let available = match Self::read_preamble(&mut reader) {
            Ok(count) => count,
            Err(code) => return code,
        };
        if (out.len() as u64) > available {
            return codes::READ_FAILED;
        }
        for slot in out.iter_mut() {
            match Self::read_header(&mut reader) {
                Ok(header) => *slot = header,
                Err(code) => return code,
            }
        }
        out.len() as i64
    }

    fn data_count(&self, path: &Path, name: &str) -> i64 {
        match Self::seek_data_block(path, name) {
            Ok((_, count)) => count_to_i64(count),
            Err(code) => code,
        }
    }

    fn data(&self, path: &Path, name: &str, out: &mut [RawSample]) -> i64 {
        let (mut reader, available) = match Self::seek_data_block(path, name) {
            Ok(found) => found,
            Err(code) => return code,
        };
        if (out.len() as u64) > available {
            return codes::READ_FAILED;
        }
        for slot in out.iter_mut() {
            match Self::read_sample(&mut reader) {
                Ok(sample) => *slot = sample,
                Err(code) => return code,
            }
        }
        out.len() as i64
    }
}
