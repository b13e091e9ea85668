//! Thermite Log CLI Application
//!
//! Command-line interface over the thermite-decoder library. It adds:
//! - Signal catalog enumeration (file order)
//! - Single-signal sample dumps
//! - Aligned multi-signal table export (CSV/JSON)
//! - Reusable table presets loaded from TOML

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use thermite_decoder::{LogEngine, TableOptions, ThermiteLog};

mod config;
mod export;

use export::ExportFormat;

/// Thermite Log Reader - inspect and export thermite time-series logs
#[derive(Parser, Debug)]
#[command(name = "thermite-cli")]
#[command(about = "Inspect and export thermite time-series logs", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the thermite log file
    #[arg(value_name = "LOG")]
    log: PathBuf,

    /// List signal names in file order and exit
    #[arg(long)]
    list: bool,

    /// Dump one signal's samples and exit
    #[arg(long, value_name = "NAME")]
    dump: Option<String>,

    /// Signal to include in the aligned table (can be repeated)
    #[arg(short, long, value_name = "NAME")]
    signal: Vec<String>,

    /// Forward-fill missing cells in the table
    #[arg(long)]
    ffill: bool,

    /// Shift the time axis to start at the first observed value
    #[arg(long)]
    relative: bool,

    /// Table output format
    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    format: ExportFormat,

    /// Output file for the table (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Preset file (presets.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Preset to apply from the preset file
    #[arg(long, value_name = "NAME")]
    preset: Option<String>,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Thermite CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using decoder library v{}", thermite_decoder::VERSION);

    let mut log_file = ThermiteLog::open(&args.log)
        .with_context(|| format!("Failed to open thermite log {:?}", args.log))?;

    if args.list {
        for name in log_file.signal_names() {
            println!("{}", name);
        }
        return Ok(());
    }

    if let Some(name) = &args.dump {
        return dump_signal(&mut log_file, name);
    }

    let (signals, options) = resolve_table_request(&args)?;
    if signals.is_empty() {
        println!("Thermite Log Reader - no signals requested");
        println!("\nQuick Start:");
        println!("  thermite-cli flight.thermite --list");
        println!("  thermite-cli flight.thermite --dump engine_rpm");
        println!("  thermite-cli flight.thermite -s engine_rpm -s coolant_temp --ffill");
        println!("\nFor reusable signal sets:");
        println!("  thermite-cli flight.thermite --config presets.toml --preset powertrain");
        println!("\nUse --help for more options");
        return Ok(());
    }

    export_table(&mut log_file, &signals, &options, &args)
}

/// Fetch the requested signals and write the aligned table
fn export_table<E: LogEngine>(
    log_file: &mut ThermiteLog<E>,
    signals: &[String],
    options: &TableOptions,
    args: &Args,
) -> Result<()> {
    let table = log_file.build_table(signals, options)?;
    if table.is_empty() {
        log::warn!("Aligned table is empty: no requested signal had samples");
    }

    match &args.output {
        Some(path) => {
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file {:?}", path))?;
            export::write_table(&table, args.format, &mut file)?;
            log::info!(
                "Wrote {} rows x {} columns to {:?}",
                table.num_rows(),
                table.num_columns(),
                path
            );
        }
        None => {
            let stdout = std::io::stdout();
            export::write_table(&table, args.format, &mut stdout.lock())?;
        }
    }
    Ok(())
}

/// Combine command-line signals/toggles with an optional preset
fn resolve_table_request(args: &Args) -> Result<(Vec<String>, TableOptions)> {
    let mut signals = args.signal.clone();
    let mut options = TableOptions::new()
        .with_ffill(args.ffill)
        .with_relative_timestamp(args.relative);

    if let Some(preset_name) = &args.preset {
        let Some(config_path) = &args.config else {
            bail!("--preset requires --config <FILE>");
        };
        let presets = config::load_presets(config_path)?;
        let preset = presets.find(preset_name).with_context(|| {
            format!("Preset '{}' not found in {:?}", preset_name, config_path)
        })?;
        log::debug!(
            "Applying preset '{}' with {} signals",
            preset.name,
            preset.signals.len()
        );
        signals.extend(preset.signals.iter().cloned());
        options.ffill |= preset.options.ffill;
        options.relative_timestamp |= preset.options.relative_timestamp;
    }

    Ok((signals, options))
}

/// Print one signal's samples as "micros  iso-utc  value" lines
fn dump_signal<E: LogEngine>(log_file: &mut ThermiteLog<E>, name: &str) -> Result<()> {
    let samples = log_file.signal(name)?;
    if samples.is_empty() {
        println!("(no samples: '{}' is empty or not in this log)", name);
        return Ok(());
    }
    for sample in samples {
        println!(
            "{} {} {}",
            sample.timestamp_us,
            sample.datetime().format("%Y-%m-%dT%H:%M:%S%.6fZ"),
            sample.value
        );
    }
    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_preset_requires_config() {
        let args = Args::parse_from(["thermite-cli", "flight.thermite", "--preset", "p"]);
        assert!(resolve_table_request(&args).is_err());
    }

    #[test]
    fn test_flags_map_to_table_options() {
        let args = Args::parse_from([
            "thermite-cli",
            "flight.thermite",
            "-s",
            "engine_rpm",
            "--ffill",
        ]);
        let (signals, options) = resolve_table_request(&args).unwrap();
        assert_eq!(signals, vec!["engine_rpm".to_string()]);
        assert!(options.ffill);
        assert!(!options.relative_timestamp);
    }
}
