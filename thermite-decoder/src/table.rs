//! Multi-signal alignment
//!
//! Joins independent signals into a single table sharing one time axis.
//! The row set is the outer union of every timestamp appearing in any
//! included signal, matched on exact floating-point equality after the
//! microsecond-to-second conversion. Two independent toggles post-process
//! the joined table: shifting the axis to start at the first observed
//! value, and per-column forward fill.

use crate::types::Sample;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Options for building an aligned table
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TableOptions {
    /// Replace each missing cell with the most recent preceding value in
    /// its column. Leading cells stay missing until the column's first
    /// observed value.
    #[serde(default)]
    pub ffill: bool,

    /// Shift every row timestamp so the axis starts at the first
    /// timestamp where at least one column has a value
    #[serde(default)]
    pub relative_timestamp: bool,
}

impl TableOptions {
    /// Create options with both toggles off
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: enable or disable forward fill
    pub fn with_ffill(mut self, enabled: bool) -> Self {
        self.ffill = enabled;
        self
    }

    /// Builder method: enable or disable the relative time axis
    pub fn with_relative_timestamp(mut self, enabled: bool) -> Self {
        self.relative_timestamp = enabled;
        self
    }
}

/// Outer-joined view across signals sharing one time axis
///
/// Column order follows the requested signal order; signals with no
/// samples contribute no column. Timestamps are seconds since epoch
/// (or since the first observed value with the relative option).
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedTable {
    columns: Vec<String>,
    timestamps: Vec<f64>,
    /// Column-major cells: values[column][row]
    values: Vec<Vec<Option<f64>>>,
}

impl AlignedTable {
    /// Assemble a table from parts
    ///
    /// Every inner vector of `values` must have the same length as
    /// `timestamps`, and `values` must have one entry per column.
    pub fn from_parts(
        columns: Vec<String>,
        timestamps: Vec<f64>,
        values: Vec<Vec<Option<f64>>>,
    ) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        debug_assert!(values.iter().all(|col| col.len() == timestamps.len()));
        Self {
            columns,
            timestamps,
            values,
        }
    }

    /// The empty table: no columns, no rows
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            timestamps: Vec::new(),
            values: Vec::new(),
        }
    }

    /// True if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.timestamps.len()
    }

    /// Number of columns
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column names in requested order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Row timestamps in seconds, ascending
    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    /// Cells of the column at `index`, one per row
    pub fn column_values(&self, index: usize) -> Option<&[Option<f64>]> {
        self.values.get(index).map(Vec::as_slice)
    }

    /// Cells of the first column with the given name
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .position(|c| c == name)
            .and_then(|index| self.column_values(index))
    }

    /// Single cell lookup
    pub fn value(&self, column: usize, row: usize) -> Option<f64> {
        self.values.get(column).and_then(|col| col.get(row)).copied().flatten()
    }

    fn shift_to_first_valid(&mut self) {
        let origin = (0..self.timestamps.len())
            .find(|&row| self.values.iter().any(|col| col[row].is_some()))
            .map(|row| self.timestamps[row]);
        if let Some(origin) = origin {
            for timestamp in &mut self.timestamps {
                *timestamp -= origin;
            }
        }
    }

    fn forward_fill(&mut self) {
        for column in &mut self.values {
            let mut last = None;
            for cell in column.iter_mut() {
                match cell {
                    Some(value) => last = Some(*value),
                    None => *cell = last,
                }
            }
        }
    }
}

/// Join named sample sequences into an aligned table
///
/// Series order defines column order. Empty series are skipped entirely:
/// they contribute neither a column nor row timestamps. A zero-row result
/// is the empty table, not an error.
pub(crate) fn build_aligned(
    series: Vec<(String, Vec<Sample>)>,
    options: &TableOptions,
) -> AlignedTable {
    let mut included: Vec<(String, Vec<(f64, f64)>)> = Vec::new();
    for (name, samples) in series {
        if samples.is_empty() {
            continue;
        }
        let points = samples
            .iter()
            .map(|sample| (sample.seconds(), sample.value))
            .collect();
        included.push((name, points));
    }
    if included.is_empty() {
        return AlignedTable::empty();
    }

    // Sorted union of every timestamp appearing in any included signal.
    // Exact equality decides row identity, so the f64 bit patterns double
    // as lookup keys below.
    let mut timestamps: Vec<f64> = included
        .iter()
        .flat_map(|(_, points)| points.iter().map(|&(time, _)| time))
        .collect();
    timestamps.sort_by(f64::total_cmp);
    timestamps.dedup();

    let mut columns = Vec::with_capacity(included.len());
    let mut values = Vec::with_capacity(included.len());
    for (name, points) in included {
        // Duplicate timestamps within one signal: the last sample wins
        let by_time: HashMap<u64, f64> = points
            .iter()
            .map(|&(time, value)| (time.to_bits(), value))
            .collect();
        let cells = timestamps
            .iter()
            .map(|time| by_time.get(&time.to_bits()).copied())
            .collect();
        columns.push(name);
        values.push(cells);
    }

    let mut table = AlignedTable {
        columns,
        timestamps,
        values,
    };
    // Union first, then shift, then fill. The shift runs before the fill
    // but does not change fill semantics: filling depends only on row
    // order, not on absolute timestamps.
    if options.relative_timestamp {
        table.shift_to_first_valid();
    }
    if options.ffill {
        table.forward_fill();
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(timestamp_us: i64, value: f64) -> Sample {
        Sample {
            timestamp_us,
            value,
        }
    }

    fn two_signals() -> Vec<(String, Vec<Sample>)> {
        vec![
            (
                "A".to_string(),
                vec![sample(0, 1.0), sample(2_000_000, 2.0)],
            ),
            ("B".to_string(), vec![sample(1_000_000, 9.0)]),
        ]
    }

    #[test]
    fn test_outer_join() {
        let table = build_aligned(two_signals(), &TableOptions::new());

        assert_eq!(table.timestamps(), &[0.0, 1.0, 2.0]);
        assert_eq!(table.columns(), &["A".to_string(), "B".to_string()]);
        assert_eq!(table.column("A").unwrap(), &[Some(1.0), None, Some(2.0)]);
        assert_eq!(table.column("B").unwrap(), &[None, Some(9.0), None]);
    }

    #[test]
    fn test_forward_fill() {
        let options = TableOptions::new().with_ffill(true);
        let table = build_aligned(two_signals(), &options);

        assert_eq!(
            table.column("A").unwrap(),
            &[Some(1.0), Some(1.0), Some(2.0)]
        );
        // B's first row stays missing: no value observed yet
        assert_eq!(table.column("B").unwrap(), &[None, Some(9.0), Some(9.0)]);
    }

    #[test]
    fn test_relative_timestamp_noop_when_first_row_valid() {
        let options = TableOptions::new().with_relative_timestamp(true);
        let table = build_aligned(two_signals(), &options);
        assert_eq!(table.timestamps(), &[0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_relative_timestamp_shifts_late_start() {
        let series = vec![
            ("A".to_string(), vec![sample(5_000_000, 1.0)]),
            ("B".to_string(), vec![sample(7_500_000, 2.0)]),
        ];
        let options = TableOptions::new().with_relative_timestamp(true);
        let table = build_aligned(series, &options);
        assert_eq!(table.timestamps(), &[0.0, 2.5]);
    }

    #[test]
    fn test_shift_and_fill_combine() {
        let options = TableOptions::new()
            .with_ffill(true)
            .with_relative_timestamp(true);
        let table = build_aligned(two_signals(), &options);

        assert_eq!(table.timestamps(), &[0.0, 1.0, 2.0]);
        assert_eq!(table.column("B").unwrap(), &[None, Some(9.0), Some(9.0)]);
    }

    #[test]
    fn test_empty_inputs_give_empty_table() {
        let table = build_aligned(Vec::new(), &TableOptions::new());
        assert!(table.is_empty());
        assert_eq!(table.num_columns(), 0);

        let all_empty = vec![("A".to_string(), Vec::new())];
        let table = build_aligned(all_empty, &TableOptions::new());
        assert!(table.is_empty());
    }

    #[test]
    fn test_empty_signal_contributes_nothing() {
        let series = vec![
            ("A".to_string(), vec![sample(0, 1.0)]),
            ("hollow".to_string(), Vec::new()),
        ];
        let table = build_aligned(series, &TableOptions::new());
        assert_eq!(table.num_columns(), 1);
        assert_eq!(table.columns(), &["A".to_string()]);
    }

    #[test]
    fn test_duplicate_name_gives_duplicate_columns() {
        let samples = vec![sample(0, 1.0), sample(1_000_000, 2.0)];
        let series = vec![
            ("A".to_string(), samples.clone()),
            ("A".to_string(), samples),
        ];
        let table = build_aligned(series, &TableOptions::new());
        assert_eq!(table.num_columns(), 2);
        assert_eq!(table.column_values(0), table.column_values(1));
    }

    #[test]
    fn test_unsorted_input_still_yields_sorted_union() {
        // Ordering violations are opaque payload: no crash, union stays sorted
        let series = vec![(
            "A".to_string(),
            vec![sample(3_000_000, 3.0), sample(1_000_000, 1.0)],
        )];
        let table = build_aligned(series, &TableOptions::new());
        assert_eq!(table.timestamps(), &[1.0, 3.0]);
    }

    #[test]
    fn test_negative_timestamps() {
        let series = vec![(
            "A".to_string(),
            vec![sample(-2_000_000, 1.0), sample(0, 2.0)],
        )];
        let table = build_aligned(series, &TableOptions::new());
        assert_eq!(table.timestamps(), &[-2.0, 0.0]);

        let options = TableOptions::new().with_relative_timestamp(true);
        let series = vec![(
            "A".to_string(),
            vec![sample(-2_000_000, 1.0), sample(0, 2.0)],
        )];
        let table = build_aligned(series, &options);
        assert_eq!(table.timestamps(), &[0.0, 2.0]);
    }
}
