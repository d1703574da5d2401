use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::Parser;
use url::Url;

pub const DEFAULT_DURATION_MINUTES: u64 = 20;
pub const DEFAULT_INTERVAL_SECONDS: u64 = 10;
pub const DEFAULT_CACHE_HEADER: &str = "x-nextjs-cache";

/// Run parameters, taken straight from the command line. Validation happens
/// once, before the schedule loop starts; everything after that treats the
/// config as read-only.
#[derive(Debug, Clone, Parser)]
#[command(name = "ttfb-monitor", version, about = "Probe a URL on a fixed cadence, measure TTFB and cache status, and summarize the run")]
pub struct RunConfig {
    /// Target URL, including the http:// or https:// scheme
    pub url: String,

    /// Observation window in minutes
    #[arg(short, long, default_value_t = DEFAULT_DURATION_MINUTES)]
    pub duration: u64,

    /// Seconds between probe starts
    #[arg(short, long, default_value_t = DEFAULT_INTERVAL_SECONDS)]
    pub interval: u64,

    /// Response header read as the cache classification label
    #[arg(long, default_value = DEFAULT_CACHE_HEADER)]
    pub cache_header: String,

    /// Path of the JSON results file
    #[arg(short, long, default_value = "ttfb-results.json")]
    pub output: PathBuf,

    /// Path of the HTML report
    #[arg(long, default_value = "ttfb-report.html")]
    pub report: PathBuf,

    /// Skip writing the HTML report
    #[arg(long)]
    pub no_report: bool,

    /// Log per-probe diagnostics
    #[arg(short, long)]
    pub verbose: bool,
}

impl RunConfig {
    pub fn validate(&self) -> Result<()> {
        let parsed = match Url::parse(&self.url) {
            Ok(parsed) => parsed,
            Err(e) => bail!("invalid URL {:?}: {}", self.url, e),
        };
        match parsed.scheme() {
            "http" | "https" => {}
            other => bail!("unsupported URL scheme {:?}: expected http or https", other),
        }
        if self.duration == 0 {
            bail!("duration must be at least 1 minute");
        }
        if self.interval == 0 {
            bail!("interval must be at least 1 second");
        }
        Ok(())
    }

    pub fn run_duration(&self) -> Duration {
        Duration::from_secs(self.duration * 60)
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    /// Sample count if every probe resolved instantly. The actual count is
    /// driven by the wall-clock deadline, so slow probes land below this;
    /// the console uses it as a progress denominator only.
    pub fn expected_samples(&self) -> u64 {
        self.duration * 60 / self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> RunConfig {
        RunConfig::try_parse_from(args).expect("arguments should parse")
    }

    #[test]
    fn defaults_match_the_documented_cadence() {
        let config = parse(&["ttfb-monitor", "https://example.com/"]);
        assert_eq!(config.duration, 20);
        assert_eq!(config.interval, 10);
        assert_eq!(config.cache_header, "x-nextjs-cache");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn non_numeric_duration_is_rejected_at_parse_time() {
        let result = RunConfig::try_parse_from(["ttfb-monitor", "https://example.com/", "--duration", "soon"]);
        assert!(result.is_err());
    }

    #[test]
    fn url_must_be_absolute_http_or_https() {
        assert!(parse(&["ttfb-monitor", "ftp://example.com/"]).validate().is_err());
        assert!(parse(&["ttfb-monitor", "example.com/page"]).validate().is_err());
        assert!(parse(&["ttfb-monitor", "http://example.com/page"]).validate().is_ok());
    }

    #[test]
    fn zero_cadence_values_are_rejected() {
        assert!(parse(&["ttfb-monitor", "https://example.com/", "--duration", "0"]).validate().is_err());
        assert!(parse(&["ttfb-monitor", "https://example.com/", "--interval", "0"]).validate().is_err());
    }

    #[test]
    fn expected_samples_floors_the_window_over_the_interval() {
        let config = parse(&["ttfb-monitor", "https://example.com/", "--duration", "1", "--interval", "10"]);
        assert_eq!(config.expected_samples(), 6);
        let config = parse(&["ttfb-monitor", "https://example.com/", "--duration", "1", "--interval", "7"]);
        assert_eq!(config.expected_samples(), 8);
    }
}
