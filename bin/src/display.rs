//! Output formatting for the candela CLI.

use anyhow::Result;
use candela_lib::prelude::*;
use clap::ValueEnum;
use std::io::Write;

/// Output format for bar sequences.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum Format {
    Csv,
    Json,
    Ndjson,
}

/// Writes a full bar sequence in the given format.
pub(crate) fn write_bars(out: &mut impl Write, bars: &[Bar], format: Format) -> Result<()> {
    match format {
        Format::Csv => {
            writeln!(out, "bucket_start,open,high,low,close")?;
            for bar in bars {
                write_csv_row(out, bar)?;
            }
        }
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, bars)?;
            writeln!(out)?;
        }
        Format::Ndjson => {
            for bar in bars {
                serde_json::to_writer(&mut *out, bar)?;
                writeln!(out)?;
            }
        }
    }
    Ok(())
}

/// Writes a single bar, used when streaming finalized bars.
pub(crate) fn write_bar(out: &mut impl Write, bar: &Bar, format: Format) -> Result<()> {
    match format {
        Format::Csv => write_csv_row(out, bar)?,
        Format::Json | Format::Ndjson => {
            serde_json::to_writer(&mut *out, bar)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn write_csv_row(out: &mut impl Write, bar: &Bar) -> Result<()> {
    writeln!(
        out,
        "{},{},{},{},{}",
        bar.bucket_start, bar.open, bar.high, bar.low, bar.close
    )?;
    Ok(())
}
