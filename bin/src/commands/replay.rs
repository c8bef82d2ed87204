//! The `replay` subcommand: pipe feed frames through the aggregator.
//!
//! Input is one JSON feed frame per line, either from a file or from
//! stdin (e.g. piped from a websocket client). Each ticker frame is
//! stamped at arrival, matching the live bucketing semantics.

use anyhow::{Context, Result};
use candela_lib::prelude::*;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::display::{self, Format};

pub(crate) fn run(
    symbol: String,
    interval: &str,
    candles: Option<PathBuf>,
    ticks: Option<PathBuf>,
    follow: bool,
    format: Format,
) -> Result<()> {
    let interval: Interval = interval.parse()?;
    let mut aggregator = Aggregator::new(symbol, interval);

    if let Some(path) = candles {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("reading candle file {}", path.display()))?;
        let batch = decode_history(&raw)?;
        if batch.had_errors() {
            warn!(dropped = batch.errors.len(), "malformed historical records");
        }
        info!(bars = batch.len(), "seeded from historical candles");
        aggregator.on_historical_batch(batch.bars);
    }

    let reader: Box<dyn BufRead> = match ticks {
        Some(path) => {
            let file =
                File::open(&path).with_context(|| format!("opening tick file {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };

    let mut stdout = io::stdout().lock();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        process_frame(&mut aggregator, &line, follow, format, &mut stdout)?;
    }

    if !follow {
        display::write_bars(&mut stdout, &aggregator.snapshot(), format)?;
    }
    Ok(())
}

/// Handles one feed frame; undecodable or rejected frames are logged and
/// skipped, never fatal.
fn process_frame(
    aggregator: &mut Aggregator,
    line: &str,
    follow: bool,
    format: Format,
    out: &mut impl Write,
) -> Result<()> {
    let ticker = match FeedMessage::decode(line) {
        Ok(FeedMessage::Ticker(ticker)) => ticker,
        Ok(FeedMessage::Error { message }) => {
            warn!(%message, "feed reported an error");
            return Ok(());
        }
        Ok(_) => return Ok(()),
        Err(err) => {
            warn!(%err, "skipping undecodable frame");
            return Ok(());
        }
    };

    let tick = match ticker.tick_now() {
        Ok(tick) => tick,
        Err(err) => {
            warn!(%err, "skipping ticker with bad price");
            return Ok(());
        }
    };

    match aggregator.on_tick(&tick) {
        Ok(Some(finalized)) if follow => display::write_bar(out, &finalized, format)?,
        Ok(_) => {}
        Err(err) => warn!(%err, "tick rejected"),
    }
    Ok(())
}
