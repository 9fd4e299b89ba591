#![doc = include_str!("../README.md")]

mod config;
mod telemetry;

use std::io::{self, BufWriter, Write};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use config::{CliArgs, Command, Config, Format, Strategy};
use flakeid::{
    AtomicSnowflakeGenerator, IdGenerator, LockSnowflakeGenerator, NoJitter, ProcessWorkerId,
    SnowflakeId, SystemClock, ThreadRandom, WorkerIdProvider,
};
use serde::Serialize;
use telemetry::init_telemetry;

/// An id split into its fields, as printed by `decode` and `generate --format
/// json`.
#[derive(Serialize)]
struct Decoded {
    #[serde(with = "flakeid::as_string_snow")]
    id: SnowflakeId,
    timestamp: u64,
    unix_ms: u64,
    worker_id: u16,
    sequence: u16,
}

impl Decoded {
    fn new(id: SnowflakeId, epoch: Duration) -> Self {
        Self {
            id,
            timestamp: id.timestamp(),
            unix_ms: id.unix_millis(epoch),
            worker_id: id.worker_id(),
            sequence: id.sequence(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = Config::try_from(args)?;

    init_telemetry()?;
    tracing::debug!(?config, "starting");

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match &config.command {
        Command::Generate { count, format } => {
            let generator = build_generator(&config)?;
            generate(generator.as_ref(), *count, *format, config.epoch, &mut out)?;
        }
        Command::Decode { ids, json } => decode(ids, *json, config.epoch, &mut out)?,
    }
    out.flush()?;
    Ok(())
}

fn build_generator(config: &Config) -> anyhow::Result<Box<dyn IdGenerator>> {
    let worker_id = match config.worker_id {
        Some(id) => id,
        None => ProcessWorkerId::<ThreadRandom>::default().worker_id()?,
    };
    let clock = SystemClock::with_epoch(config.epoch);

    let generator: Box<dyn IdGenerator> = match (config.strategy, config.jitter) {
        (Strategy::Atomic, true) => Box::new(AtomicSnowflakeGenerator::with_parts(
            worker_id,
            clock,
            ThreadRandom,
        )?),
        (Strategy::Atomic, false) => Box::new(AtomicSnowflakeGenerator::with_parts(
            worker_id, clock, NoJitter,
        )?),
        (Strategy::Lock, true) => Box::new(LockSnowflakeGenerator::with_parts(
            worker_id,
            clock,
            ThreadRandom,
        )?),
        (Strategy::Lock, false) => Box::new(LockSnowflakeGenerator::with_parts(
            worker_id, clock, NoJitter,
        )?),
    };
    Ok(generator)
}

fn generate(
    generator: &dyn IdGenerator,
    count: usize,
    format: Format,
    epoch: Duration,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    for _ in 0..count {
        let id = generator.next_snowflake()?;
        match format {
            Format::Decimal => writeln!(out, "{id}")?,
            Format::Padded => writeln!(out, "{}", id.to_padded_string())?,
            Format::Json => {
                serde_json::to_writer(&mut *out, &Decoded::new(id, epoch))?;
                writeln!(out)?;
            }
        }
    }
    Ok(())
}

fn decode(ids: &[String], json: bool, epoch: Duration, out: &mut impl Write) -> anyhow::Result<()> {
    for raw in ids {
        let id: SnowflakeId = raw
            .trim()
            .parse()
            .with_context(|| format!("`{raw}` is not a snowflake id"))?;
        let decoded = Decoded::new(id, epoch);
        if json {
            serde_json::to_writer(&mut *out, &decoded)?;
            writeln!(out)?;
        } else {
            writeln!(
                out,
                "{}\ttimestamp={}\tunix_ms={}\tworker_id={}\tsequence={}",
                decoded.id,
                decoded.timestamp,
                decoded.unix_ms,
                decoded.worker_id,
                decoded.sequence
            )?;
        }
    }
    Ok(())
}
