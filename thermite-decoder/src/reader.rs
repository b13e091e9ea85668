//! Log handle: signal data reader and per-handle cache
//!
//! [`ThermiteLog`] represents one opened log file. Construction loads the
//! header catalog exactly once; a construction failure means no handle
//! exists, so no query can run against a half-initialized log. Signal
//! data is materialized lazily on first access and memoized in a cache
//! private to the handle.

use crate::engine::format::RawSample;
use crate::engine::{FileEngine, LogEngine};
use crate::headers::load_headers;
use crate::table::{build_aligned, AlignedTable, TableOptions};
use crate::types::{HeaderEntry, Result, Sample, ThermiteError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// One opened thermite log
///
/// Owns the file path, the loaded header catalog and the signal cache.
/// All cache mutation goes through `&mut self`, so a handle is exclusive
/// to its calling thread by construction; callers needing cross-thread
/// access must serialize externally.
#[derive(Debug)]
pub struct ThermiteLog<E: LogEngine = FileEngine> {
    path: PathBuf,
    engine: E,
    headers: Vec<HeaderEntry>,
    cache: HashMap<String, Vec<Sample>>,
}

impl ThermiteLog<FileEngine> {
    /// Open a thermite log with the built-in file engine
    ///
    /// # Example
    /// ```no_run
    /// use thermite_decoder::ThermiteLog;
    ///
    /// let mut log = ThermiteLog::open("flight.thermite").unwrap();
    /// for name in log.signal_names() {
    ///     println!("{}", name);
    /// }
    /// ```
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_engine(path, FileEngine::new())
    }
}

impl<E: LogEngine> ThermiteLog<E> {
    /// Open a thermite log backed by a caller-supplied engine
    ///
    /// Loads the header catalog before returning. On failure the handle
    /// is never constructed.
    pub fn with_engine(path: impl Into<PathBuf>, engine: E) -> Result<Self> {
        let path = path.into();
        let headers = load_headers(&engine, &path)?;
        log::info!(
            "Opened thermite log {:?} with {} signals",
            path,
            headers.len()
        );
        Ok(Self {
            path,
            engine,
            headers,
            cache: HashMap::new(),
        })
    }

    /// Path of the underlying log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The loaded header catalog, in file order
    pub fn headers(&self) -> &[HeaderEntry] {
        &self.headers
    }

    /// Signal names in file order
    pub fn signal_names(&self) -> Vec<&str> {
        self.headers.iter().map(|h| h.name.as_str()).collect()
    }

    /// Membership test against the header catalog
    pub fn contains(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h.name == name)
    }

    /// Fetch a signal's full sample sequence, loading it on first access
    ///
    /// A name absent from the header catalog yields an empty slice, not an
    /// error; the empty result is cached too, so repeated lookups of an
    /// unknown name never touch the engine. An engine failure on a known
    /// signal is surfaced and not cached.
    pub fn signal(&mut self, name: &str) -> Result<&[Sample]> {
        if !self.cache.contains_key(name) {
            let samples = self.load_signal(name)?;
            log::debug!(
                "Loaded signal '{}' from {:?}: {} samples",
                name,
                self.path,
                samples.len()
            );
            self.cache.insert(name.to_string(), samples);
        }
        Ok(self.cache.get(name).map(Vec::as_slice).unwrap_or(&[]))
    }

    /// Discard every cached signal
    ///
    /// The next access for any name re-queries the engine. There is no
    /// partial eviction.
    pub fn clear_cache(&mut self) {
        log::debug!("Clearing signal cache for {:?}", self.path);
        self.cache.clear();
    }

    /// Build an aligned table across the named signals
    ///
    /// The order of `names` defines column order. Names absent from the
    /// catalog and signals without samples contribute nothing; if nothing
    /// remains the result is the empty table.
    pub fn build_table<S: AsRef<str>>(
        &mut self,
        names: &[S],
        options: &TableOptions,
    ) -> Result<AlignedTable> {
        let mut series = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let samples = self.signal(name)?.to_vec();
            series.push((name.to_string(), samples));
        }
        Ok(build_aligned(series, options))
    }

    /// Load one signal's samples from the engine
    fn load_signal(&self, name: &str) -> Result<Vec<Sample>> {
        if !self.contains(name) {
            log::debug!(
                "Signal '{}' not in header catalog of {:?}",
                name,
                self.path
            );
            return Ok(Vec::new());
        }

        let count = self.engine.data_count(&self.path, name);
        if count < 0 {
            return Err(ThermiteError::DataCount {
                name: name.to_string(),
                code: count,
            });
        }

        let mut buffer = vec![RawSample::default(); count as usize];
        let populated = self.engine.data(&self.path, name, &mut buffer);
        if populated < 0 {
            return Err(ThermiteError::DataRead {
                name: name.to_string(),
                code: populated,
            });
        }

        Ok(buffer
            .iter()
            .map(|raw| Sample {
                timestamp_us: raw.timestamp_us,
                value: raw.value,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::codes;
    use crate::engine::testing::MockEngine;

    fn open_mock(engine: MockEngine) -> ThermiteLog<MockEngine> {
        ThermiteLog::with_engine("test.thermite", engine).unwrap()
    }

    fn rpm_engine() -> MockEngine {
        MockEngine::new(vec![
            ("engine_rpm", vec![(0, 800.0), (1_000_000, 2400.0)]),
            ("coolant_temp", vec![(500_000, 71.5)]),
        ])
    }

    #[test]
    fn test_construction_failure_yields_no_handle() {
        let mut engine = MockEngine::new(vec![]);
        engine.fail_header_count = Some(codes::OPEN_FAILED);
        assert!(ThermiteLog::with_engine("bad.thermite", engine).is_err());
    }

    #[test]
    fn test_signal_values_verbatim() {
        let mut log = open_mock(rpm_engine());
        let samples = log.signal("engine_rpm").unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].timestamp_us, 0);
        assert_eq!(samples[0].value, 800.0);
        assert_eq!(samples[1].timestamp_us, 1_000_000);
        assert_eq!(samples[1].value, 2400.0);
    }

    #[test]
    fn test_cache_is_idempotent() {
        let mut log = open_mock(rpm_engine());

        let first = log.signal("engine_rpm").unwrap().to_vec();
        let second = log.signal("engine_rpm").unwrap().to_vec();
        assert_eq!(first, second);

        // One engine round-trip total, not two
        assert_eq!(log.engine.data_count_calls.get(), 1);
        assert_eq!(log.engine.data_calls.get(), 1);
    }

    #[test]
    fn test_clear_cache_requeries_engine() {
        let mut log = open_mock(rpm_engine());

        log.signal("engine_rpm").unwrap();
        log.clear_cache();
        log.signal("engine_rpm").unwrap();

        assert_eq!(log.engine.data_count_calls.get(), 2);
        assert_eq!(log.engine.data_calls.get(), 2);
    }

    #[test]
    fn test_unknown_name_is_empty_and_engine_untouched() {
        let mut log = open_mock(rpm_engine());

        assert!(log.signal("boost_pressure").unwrap().is_empty());
        // Cached-empty: the second lookup is also engine-free
        assert!(log.signal("boost_pressure").unwrap().is_empty());
        assert_eq!(log.engine.data_count_calls.get(), 0);
        assert_eq!(log.engine.data_calls.get(), 0);
    }

    #[test]
    fn test_engine_failure_is_not_cached() {
        let mut engine = rpm_engine();
        engine.fail_data_count = Some(codes::TRUNCATED);
        let mut log = open_mock(engine);

        assert!(log.signal("engine_rpm").is_err());
        assert!(log.signal("engine_rpm").is_err());
        // Both attempts reached the engine: the failure did not poison
        // the cache entry
        assert_eq!(log.engine.data_count_calls.get(), 2);
    }

    #[test]
    fn test_failure_does_not_poison_other_signals() {
        let mut engine = rpm_engine();
        engine.fail_data = Some(codes::READ_FAILED);
        let mut log = open_mock(engine);

        let err = log.signal("engine_rpm").unwrap_err();
        match err {
            ThermiteError::DataRead { name, code } => {
                assert_eq!(name, "engine_rpm");
                assert_eq!(code, codes::READ_FAILED);
            }
            other => panic!("expected DataRead, got {:?}", other),
        }

        // Unknown names still resolve to empty after the failure
        assert!(log.signal("boost_pressure").unwrap().is_empty());
    }

    #[test]
    fn test_contains_and_enumeration() {
        let log = open_mock(rpm_engine());
        assert!(log.contains("engine_rpm"));
        assert!(log.contains("coolant_temp"));
        assert!(!log.contains("engine_rpm "));
        assert_eq!(log.signal_names(), vec!["engine_rpm", "coolant_temp"]);
    }

    #[test]
    fn test_build_table_empty_cases() {
        let mut log = open_mock(rpm_engine());
        let options = TableOptions::new().with_relative_timestamp(true);

        let names: Vec<String> = Vec::new();
        assert!(log.build_table(&names, &options).unwrap().is_empty());
        assert!(log
            .build_table(&["nonexistent"], &options)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_build_table_joins_signals() {
        let mut log = open_mock(rpm_engine());
        let table = log
            .build_table(&["engine_rpm", "coolant_temp"], &TableOptions::new())
            .unwrap();

        assert_eq!(table.timestamps(), &[0.0, 0.5, 1.0]);
        assert_eq!(
            table.column("engine_rpm").unwrap(),
            &[Some(800.0), None, Some(2400.0)]
        );
        assert_eq!(
            table.column("coolant_temp").unwrap(),
            &[None, Some(71.5), None]
        );
    }
}
