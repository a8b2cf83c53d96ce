//! Command-line and environment settings.

use candela_lib::url::{DEFAULT_GENERATOR_URL, DEFAULT_HISTORY_URL};
use candela_lib::{CurrencyPair, PipelineConfig, Timeframe, TimeframeParseError};
use clap::Parser;
use std::time::Duration;

/// Every setting can also be given through its `RATE_ANALYZER_*`
/// environment variable; flags take precedence.
#[derive(Debug, Parser)]
#[command(name = "candela")]
#[command(about = "Builds OHLC candles from live forex ticks", long_about = None)]
#[command(version)]
pub(crate) struct Cli {
    /// Currency pairs to analyze (comma separated, e.g. EURUSD,USDJPY)
    #[arg(long, env = "RATE_ANALYZER_CURRENCY_PAIRS", value_delimiter = ',', required = true)]
    pub(crate) currency_pairs: Vec<CurrencyPair>,

    /// Candle time frames (comma separated, e.g. 1m,5m,1h)
    #[arg(long, env = "RATE_ANALYZER_TIME_FRAMES", value_delimiter = ',', required = true)]
    pub(crate) time_frames: Vec<Timeframe>,

    /// Interval between live feed polls
    #[arg(long, env = "RATE_ANALYZER_POLL_PERIOD", default_value = "1s", value_parser = parse_duration)]
    pub(crate) poll_period: Duration,

    /// Lifetime of a cycle before every pipeline is rebuilt
    #[arg(long, env = "RATE_ANALYZER_RESTART_AFTER", default_value = "24h", value_parser = parse_duration)]
    pub(crate) restart_after: Duration,

    /// Longest time a non-empty candle batch waits before being stored
    #[arg(long, env = "RATE_ANALYZER_BATCH_PERIOD", default_value = "5s", value_parser = parse_duration)]
    pub(crate) batch_period: Duration,

    /// Number of candles that triggers an immediate store
    #[arg(long, env = "RATE_ANALYZER_BATCH_SIZE", default_value = "50")]
    pub(crate) batch_size: usize,

    /// Base URL of the generator service
    #[arg(long, env = "RATE_ANALYZER_GENERATOR_URL", default_value = DEFAULT_GENERATOR_URL)]
    pub(crate) generator_url: String,

    /// Base URL of the history service
    #[arg(long, env = "RATE_ANALYZER_HISTORY_URL", default_value = DEFAULT_HISTORY_URL)]
    pub(crate) history_url: String,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "RATE_ANALYZER_LOG_LEVEL", default_value = "info")]
    pub(crate) log_level: String,

    /// Candles kept per series when storage is reset (0 clears everything)
    #[arg(long, env = "RATE_ANALYZER_REPO_RETAIN", default_value = "0")]
    pub(crate) repo_retain: usize,
}

impl Cli {
    /// Returns the pipeline parameters. Validation happens when the
    /// orchestrator is built.
    pub(crate) fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            currency_pairs: self.currency_pairs.clone(),
            timeframes: self.time_frames.clone(),
            poll_period: self.poll_period,
            reset_period: self.restart_after,
            batch_period: self.batch_period,
            batch_size: self.batch_size,
        }
    }
}

/// Parses durations written like time frames (`500ms`, `5s`, `1h30m`).
fn parse_duration(s: &str) -> Result<Duration, TimeframeParseError> {
    s.parse::<Timeframe>().map(|tf| tf.as_duration())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["candela"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["--currency-pairs", "eurusd", "--time-frames", "1m"]);
        let config = cli.pipeline_config();

        assert_eq!(config.currency_pairs, vec!["EURUSD".parse().unwrap()]);
        assert_eq!(config.timeframes, vec![Timeframe::from_secs(60)]);
        assert_eq!(config.poll_period, Duration::from_secs(1));
        assert_eq!(config.reset_period, Duration::from_secs(24 * 3600));
        assert_eq!(config.batch_period, Duration::from_secs(5));
        assert_eq!(config.batch_size, 50);
        assert_eq!(cli.repo_retain, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_comma_separated_lists() {
        let cli = parse(&[
            "--currency-pairs",
            "EURUSD,usdjpy",
            "--time-frames",
            "5s,1m,1h",
            "--restart-after",
            "12h",
            "--batch-size",
            "10",
        ]);

        assert_eq!(cli.currency_pairs.len(), 2);
        assert_eq!(cli.currency_pairs[1].as_str(), "USDJPY");
        assert_eq!(
            cli.time_frames,
            vec![
                Timeframe::from_secs(5),
                Timeframe::from_secs(60),
                Timeframe::from_secs(3600)
            ]
        );
        assert_eq!(cli.restart_after, Duration::from_secs(12 * 3600));
        assert_eq!(cli.batch_size, 10);
    }

    #[test]
    fn test_rejects_bad_durations() {
        let result = Cli::try_parse_from([
            "candela",
            "--currency-pairs",
            "EURUSD",
            "--time-frames",
            "1m",
            "--poll-period",
            "soon",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert!(parse_duration("0s").is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
