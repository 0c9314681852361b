//! CSV input and output for bars, indicator runs and feature frames.
//!
//! Input columns: `open, high, low, close`, optionally `volume` and
//! `timestamp` (ISO 8601, e.g. `2024-01-01T00:05:00`). Extra columns are
//! ignored.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use laguerre_core::domain::Bar;
use laguerre_core::engine::{IntermediateValues, LaguerreOutput};
use laguerre_core::features::FeatureFrame;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn read_bars(path: &Path) -> Result<Vec<Bar>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    read_bars_from(file).with_context(|| format!("failed to read bars from {}", path.display()))
}

pub fn read_bars_from<R: Read>(reader: R) -> Result<Vec<Bar>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut bars = Vec::new();
    for (i, record) in rdr.deserialize::<Bar>().enumerate() {
        // header is line 1
        bars.push(record.with_context(|| format!("bad row on line {}", i + 2))?);
    }
    Ok(bars)
}

/// Write bars as OHLCV CSV, readable by [`read_bars_from`].
pub fn write_bars<W: Write>(writer: W, bars: &[Bar]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["timestamp", "open", "high", "low", "close", "volume"])?;
    for bar in bars {
        wtr.write_record([
            timestamp(bar),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
        ])?;
    }
    wtr.flush().context("failed to flush CSV writer")?;
    Ok(())
}

/// One row per bar: timestamp, rsi, warm flag, then the intermediate columns.
pub fn write_indicator<W: Write>(writer: W, bars: &[Bar], out: &LaguerreOutput) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut header = vec!["timestamp", "rsi", "warm"];
    header.extend(IntermediateValues::COLUMNS);
    wtr.write_record(&header)?;

    for (i, bar) in bars.iter().enumerate() {
        let mut row = vec![
            timestamp(bar),
            out.rsi[i].to_string(),
            u8::from(out.is_warm(i)).to_string(),
        ];
        if let Some(values) = out.intermediates.row(i) {
            row.extend(values.iter().map(f64::to_string));
        }
        wtr.write_record(&row)?;
    }
    wtr.flush().context("failed to flush CSV writer")?;
    Ok(())
}

/// One row per bar: timestamp, then every feature column.
pub fn write_features<W: Write>(writer: W, bars: &[Bar], frame: &FeatureFrame) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut header = vec!["timestamp"];
    header.extend(frame.column_names());
    wtr.write_record(&header)?;

    for (i, bar) in bars.iter().enumerate() {
        let mut row = vec![timestamp(bar)];
        if let Some(values) = frame.row(i) {
            row.extend(values.iter().map(f64::to_string));
        }
        wtr.write_record(&row)?;
    }
    wtr.flush().context("failed to flush CSV writer")?;
    Ok(())
}

/// `<dir>/<input stem>.laguerre.csv`
pub fn output_path(dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "bars".to_string());
    dir.join(format!("{stem}.laguerre.csv"))
}

fn timestamp(bar: &Bar) -> String {
    bar.timestamp
        .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default()
}
