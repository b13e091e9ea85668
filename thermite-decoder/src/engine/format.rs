//! Binary layout of a thermite log
//!
//! A log file is a single immutable container:
//!
//! ```text
//! +----------------+----------------+---------------------+
//! | magic "THRM"   | version (u32)  | header count (u64)  |
//! +----------------+----------------+---------------------+
//! | header records (56 bytes each)                        |
//! +-------------------------------------------------------+
//! | data blocks: sample count (u64) + sample records      |
//! +-------------------------------------------------------+
//! ```
//!
//! Each header's start offset is the absolute file offset of that signal's
//! data block. All integers are little-endian. Record shapes are bit-exact
//! with the reference engine: 48-byte NUL-padded name + u64 offset for a
//! header, i64 microsecond timestamp + IEEE-754 f64 value for a sample.

/// Magic bytes at offset zero
pub const MAGIC: [u8; 4] = *b"THRM";

/// Container format version understood by [`FileEngine`](super::FileEngine)
pub const FORMAT_VERSION: u32 = 1;

/// Fixed width of the header name field in bytes
pub const NAME_LEN: usize = 48;

/// Size of one header record on disk
pub const HEADER_RECORD_LEN: usize = NAME_LEN + 8;

/// Size of one sample record on disk
pub const SAMPLE_RECORD_LEN: usize = 16;

/// Raw header record as stored on disk
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawHeader {
    /// Fixed-width signal name, NUL-padded
    pub name: [u8; NAME_LEN],
    /// Absolute file offset of the signal's data block
    pub start: u64,
}

impl Default for RawHeader {
    fn default() -> Self {
        Self {
            name: [0; NAME_LEN],
            start: 0,
        }
    }
}

impl RawHeader {
    /// Decode the fixed-width name field into text
    ///
    /// Reads up to the first NUL byte, or all 48 bytes when the field is
    /// fully used. Non-UTF8 bytes are decoded best-effort (lossy), matching
    /// the text encoding already present in the format.
    pub fn decoded_name(&self) -> String {
        let end = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(NAME_LEN);
        String::from_utf8_lossy(&self.name[..end]).into_owned()
    }
}

/// Raw sample record as stored on disk
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawSample {
    /// Microseconds since Unix epoch
    pub timestamp_us: i64,
    /// Recorded value
    pub value: f64,
}
