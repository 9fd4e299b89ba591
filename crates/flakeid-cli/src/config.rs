use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::bail;
use clap::{Parser, Subcommand, ValueEnum};
use flakeid::{DEFAULT_EPOCH, MAX_WORKER_ID, WORKER_ID_ENV};

/// Runtime configuration for the `flakeid` binary.
///
/// Every option can also be supplied through the environment (or a `.env`
/// file in the working directory), which is how deployments usually pin the
/// worker id.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "flakeid",
    version,
    about = "Generate and decode time-ordered 64-bit Snowflake ids"
)]
pub struct CliArgs {
    /// Worker id encoded into every generated id, in `0..=1023`.
    ///
    /// Must be unique among all instances that generate concurrently. When
    /// omitted, an id is derived from the process id, which is only safe for
    /// local use.
    ///
    /// Environment variable: `FLAKEID_WORKER_ID`
    #[arg(long, env = WORKER_ID_ENV)]
    pub worker_id: Option<u64>,

    /// Epoch in Unix milliseconds that timestamps are measured from.
    ///
    /// Must match every other generator sharing the id space.
    ///
    /// Environment variable: `FLAKEID_EPOCH_MS`
    #[arg(long, env = "FLAKEID_EPOCH_MS", default_value_t = DEFAULT_EPOCH.as_millis() as u64)]
    pub epoch_ms: u64,

    /// Concurrency strategy used by the generator.
    #[arg(long, value_enum, default_value_t = Strategy::Atomic)]
    pub strategy: Strategy,

    /// Start every millisecond's sequence at zero instead of a small random
    /// offset.
    #[arg(long, default_value_t = false)]
    pub no_jitter: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Generate new ids and print one per line.
    Generate {
        /// Number of ids to generate.
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = Format::Decimal)]
        format: Format,
    },
    /// Split existing ids into their timestamp, worker id and sequence.
    Decode {
        /// Decimal ids to decode.
        #[arg(required = true)]
        ids: Vec<String>,

        /// Print one JSON object per id.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Lock-free compare-and-swap loop.
    Atomic,
    /// Mutex-guarded state.
    Lock,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Plain decimal integer.
    Decimal,
    /// Decimal zero-padded to 20 digits, so lexical order matches numeric
    /// order.
    Padded,
    /// One JSON object per id with its decoded fields.
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `None` means derive one from the process.
    pub worker_id: Option<u16>,
    pub epoch: Duration,
    pub strategy: Strategy,
    pub jitter: bool,
    pub command: Command,
}

impl TryFrom<CliArgs> for Config {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let worker_id = match args.worker_id {
            Some(id) if id > u64::from(MAX_WORKER_ID) => {
                bail!("FLAKEID_WORKER_ID ({id}) exceeds the maximum worker id ({MAX_WORKER_ID})")
            }
            Some(id) => Some(id as u16),
            None => None,
        };

        let epoch = Duration::from_millis(args.epoch_ms);
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?;
        if epoch > now {
            bail!(
                "FLAKEID_EPOCH_MS ({}) lies in the future; ids would carry a zero timestamp",
                args.epoch_ms
            );
        }

        if let Command::Generate { count: 0, .. } = args.command {
            bail!("--count must be greater than 0");
        }

        Ok(Self {
            worker_id,
            epoch,
            strategy: args.strategy,
            jitter: !args.no_jitter,
            command: args.command,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> anyhow::Result<Config> {
        let args = CliArgs::try_parse_from(argv)?;
        Config::try_from(args)
    }

    #[test]
    fn defaults() {
        let config = parse(&["flakeid", "--worker-id", "7", "generate"]).unwrap();
        assert_eq!(config.worker_id, Some(7));
        assert_eq!(config.epoch, DEFAULT_EPOCH);
        assert_eq!(config.strategy, Strategy::Atomic);
        assert!(config.jitter);
        assert_eq!(
            config.command,
            Command::Generate {
                count: 1,
                format: Format::Decimal
            }
        );
    }

    #[test]
    fn all_options() {
        let config = parse(&[
            "flakeid",
            "--worker-id",
            "1023",
            "--epoch-ms",
            "0",
            "--strategy",
            "lock",
            "--no-jitter",
            "generate",
            "-n",
            "5",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(config.worker_id, Some(1023));
        assert_eq!(config.epoch, Duration::ZERO);
        assert_eq!(config.strategy, Strategy::Lock);
        assert!(!config.jitter);
        assert_eq!(
            config.command,
            Command::Generate {
                count: 5,
                format: Format::Json
            }
        );
    }

    #[test]
    fn rejects_worker_id_out_of_range() {
        let err = parse(&["flakeid", "--worker-id", "1024", "generate"]).unwrap_err();
        assert!(err.to_string().contains("1024"), "{err}");
    }

    #[test]
    fn rejects_future_epoch() {
        let err = parse(&[
            "flakeid",
            "--worker-id",
            "1",
            "--epoch-ms",
            "99999999999999",
            "generate",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("future"), "{err}");
    }

    #[test]
    fn rejects_zero_count() {
        assert!(parse(&["flakeid", "--worker-id", "1", "generate", "-n", "0"]).is_err());
    }

    #[test]
    fn decode_requires_ids() {
        assert!(CliArgs::try_parse_from(["flakeid", "--worker-id", "1", "decode"]).is_err());
        let config = parse(&["flakeid", "--worker-id", "1", "decode", "1", "2", "--json"]).unwrap();
        assert_eq!(
            config.command,
            Command::Decode {
                ids: vec!["1".into(), "2".into()],
                json: true
            }
        );
    }
}
