//! Aligned table rendering (CSV / JSON)

use anyhow::Result;
use clap::ValueEnum;
use serde_json::{json, Value};
use std::io::Write;
use thermite_decoder::AlignedTable;

/// Supported table output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

/// Render a table in the requested format
pub fn write_table(
    table: &AlignedTable,
    format: ExportFormat,
    out: &mut dyn Write,
) -> Result<()> {
    match format {
        ExportFormat::Csv => write_csv(table, out),
        ExportFormat::Json => write_json(table, out),
    }
}

fn csv_field(text: &str) -> String {
    if text.contains(',') || text.contains('"') {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

fn write_csv(table: &AlignedTable, out: &mut dyn Write) -> Result<()> {
    let mut header = String::from("time");
    for column in table.columns() {
        header.push(',');
        header.push_str(&csv_field(column));
    }
    writeln!(out, "{}", header)?;

    for (row, timestamp) in table.timestamps().iter().enumerate() {
        let mut line = timestamp.to_string();
        for column in 0..table.num_columns() {
            line.push(',');
            if let Some(value) = table.value(column, row) {
                line.push_str(&value.to_string());
            }
            // Missing cells stay empty
        }
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

fn write_json(table: &AlignedTable, out: &mut dyn Write) -> Result<()> {
    let rows: Vec<Value> = table
        .timestamps()
        .iter()
        .enumerate()
        .map(|(row, timestamp)| {
            let values: Vec<Value> = (0..table.num_columns())
                .map(|column| match table.value(column, row) {
                    Some(value) => json!(value),
                    None => Value::Null,
                })
                .collect();
            json!({ "time": timestamp, "values": values })
        })
        .collect();

    let document = json!({
        "columns": table.columns(),
        "rows": rows,
    });
    serde_json::to_writer_pretty(&mut *out, &document)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_table() -> AlignedTable {
        AlignedTable::from_parts(
            vec!["engine_rpm".to_string(), "coolant_temp".to_string()],
            vec![0.0, 0.5, 1.0],
            vec![
                vec![Some(800.0), None, Some(2400.0)],
                vec![None, Some(71.5), None],
            ],
        )
    }

    #[test]
    fn test_csv_rendering() {
        let mut out = Vec::new();
        write_csv(&small_table(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "time,engine_rpm,coolant_temp");
        assert_eq!(lines[1], "0,800,");
        assert_eq!(lines[2], "0.5,,71.5");
        assert_eq!(lines[3], "1,2400,");
    }

    #[test]
    fn test_csv_quotes_awkward_names() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_json_rendering() {
        let mut out = Vec::new();
        write_json(&small_table(), &mut out).unwrap();

        let doc: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(doc["columns"][0], "engine_rpm");
        assert_eq!(doc["rows"][0]["time"], 0.0);
        assert_eq!(doc["rows"][0]["values"][0], 800.0);
        assert!(doc["rows"][0]["values"][1].is_null());
        assert_eq!(doc["rows"][1]["values"][1], 71.5);
    }

    #[test]
    fn test_empty_table_renders_header_only() {
        let mut out = Vec::new();
        write_csv(&AlignedTable::empty(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "time\n");
    }
}
