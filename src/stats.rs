use serde::{Deserialize, Serialize};

use crate::prober::Sample;

/// Aggregate latency figures for one run, derived in full from the sample
/// sequence after the loop has finished. The latency fields cover successful
/// probes only; `count` and `success_rate` cover everything.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub average: f64,
    pub median: f64,
    pub p95: f64,
    pub success_rate: f64,
}

/// Round to two decimals, ties away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Pure and deterministic: equal input sequences produce bit-identical
/// stats. With zero successful samples every field except `count` is zero.
pub fn summarize(samples: &[Sample]) -> SummaryStats {
    let count = samples.len() as u64;
    let mut ttfbs: Vec<f64> = samples.iter().filter_map(|s| s.ttfb).collect();
    if ttfbs.is_empty() {
        return SummaryStats {
            count,
            ..SummaryStats::default()
        };
    }

    // One ascending sort is authoritative for min, max, median and p95.
    ttfbs.sort_by(|a, b| a.total_cmp(b));
    let n = ttfbs.len();

    let median = if n % 2 == 1 {
        ttfbs[n / 2]
    } else {
        (ttfbs[n / 2 - 1] + ttfbs[n / 2]) / 2.0
    };
    // Nearest-rank percentile: an existing sample, no interpolation.
    let p95 = ttfbs[((n as f64) * 0.95).ceil() as usize - 1];
    let average = ttfbs.iter().sum::<f64>() / n as f64;

    SummaryStats {
        count,
        min: round2(ttfbs[0]),
        max: round2(ttfbs[n - 1]),
        average: round2(average),
        median: round2(median),
        p95: round2(p95),
        success_rate: round2(n as f64 / count as f64 * 100.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn success(ttfb: f64) -> Sample {
        Sample::success(Utc::now(), ttfb, 200, None)
    }

    fn failure() -> Sample {
        Sample::failure(Utc::now(), "connection refused")
    }

    #[test]
    fn summarize_is_deterministic() {
        let samples = vec![success(120.5), failure(), success(80.25), success(301.0)];
        assert_eq!(summarize(&samples), summarize(&samples));
    }

    #[test]
    fn count_covers_failures_and_latency_fields_do_not() {
        let samples = vec![success(100.0), success(200.0), failure(), failure()];
        let stats = summarize(&samples);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.min, 100.0);
        assert_eq!(stats.max, 200.0);
        assert_eq!(stats.average, 150.0);
        assert_eq!(stats.success_rate, 50.0);
    }

    #[test]
    fn all_failures_zero_everything_but_count() {
        let samples = vec![failure(), failure(), failure()];
        let stats = summarize(&samples);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 0.0);
        assert_eq!(stats.average, 0.0);
        assert_eq!(stats.median, 0.0);
        assert_eq!(stats.p95, 0.0);
        assert_eq!(stats.success_rate, 0.0);
    }

    #[test]
    fn empty_sequence_is_all_zero() {
        let stats = summarize(&[]);
        assert_eq!(stats, SummaryStats::default());
    }

    #[test]
    fn median_takes_the_middle_element_for_odd_counts() {
        let samples = vec![success(300.0), success(100.0), success(200.0)];
        assert_eq!(summarize(&samples).median, 200.0);
    }

    #[test]
    fn median_averages_the_two_middle_elements_for_even_counts() {
        let samples = vec![success(400.0), success(100.0), success(300.0), success(200.0)];
        assert_eq!(summarize(&samples).median, 250.0);
    }

    #[test]
    fn p95_uses_the_nearest_rank_not_interpolation() {
        // 20 values 1..=20: ceil(20 * 0.95) - 1 = 18 (0-based), value 19.
        let samples: Vec<Sample> = (1..=20).map(|ms| success(ms as f64)).collect();
        assert_eq!(summarize(&samples).p95, 19.0);
    }

    #[test]
    fn p95_of_a_single_sample_is_that_sample() {
        let samples = vec![success(42.0)];
        assert_eq!(summarize(&samples).p95, 42.0);
    }

    #[test]
    fn stats_are_rounded_to_two_decimals_half_up() {
        assert_eq!(round2(123.456), 123.46);
        assert_eq!(round2(0.005), 0.01);
        let samples = vec![success(123.456)];
        let stats = summarize(&samples);
        assert_eq!(stats.min, 123.46);
        assert_eq!(stats.average, 123.46);
    }

    #[test]
    fn success_rate_stays_within_bounds() {
        let samples = vec![success(10.0), success(20.0), success(30.0), failure()];
        let stats = summarize(&samples);
        assert_eq!(stats.success_rate, 75.0);
        assert!(stats.success_rate >= 0.0 && stats.success_rate <= 100.0);
    }
}
