use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs;

use super::RunResult;
use crate::prober::Sample;
use crate::stats::round2;

/// Display bucket for samples that produced no response.
const ERROR_LABEL: &str = "ERROR";
/// Display bucket for successful samples without the cache-status header.
const UNLABELED: &str = "none";

pub async fn write_html(path: &Path, result: &RunResult) -> Result<()> {
    fs::write(path, render(result))
        .await
        .with_context(|| format!("writing report to {}", path.display()))
}

fn display_label(sample: &Sample) -> &str {
    if sample.is_success() {
        sample.cache_status.as_deref().unwrap_or(UNLABELED)
    } else {
        ERROR_LABEL
    }
}

/// Colors are display-only; labels stay opaque everywhere else.
fn label_color(label: &str) -> &'static str {
    match label {
        "HIT" => "#2f9e44",
        "STALE" => "#e8890c",
        "MISS" => "#d6336c",
        ERROR_LABEL => "#868e96",
        _ => "#4dabf7",
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Per-label slice of the run: count, share of all samples, and the average
/// TTFB of that label's successful probes.
fn breakdown_rows(result: &RunResult) -> String {
    let mut buckets: BTreeMap<&str, (usize, f64, usize)> = BTreeMap::new();
    for sample in &result.samples {
        let bucket = buckets.entry(display_label(sample)).or_default();
        bucket.0 += 1;
        if let Some(ttfb) = sample.ttfb {
            bucket.1 += ttfb;
            bucket.2 += 1;
        }
    }

    let total = result.samples.len().max(1);
    let mut rows = String::new();
    for (label, (count, ttfb_sum, successes)) in buckets {
        let share = round2(count as f64 / total as f64 * 100.0);
        let avg = if successes > 0 {
            format!("{:.2} ms", round2(ttfb_sum / successes as f64))
        } else {
            "\u{2013}".to_string()
        };
        let _ = writeln!(
            rows,
            "<tr><td><span class=\"dot\" style=\"background:{}\"></span>{}</td><td>{}</td><td>{:.2}%</td><td>{}</td></tr>",
            label_color(label),
            escape(label),
            count,
            share,
            avg,
        );
    }
    rows
}

fn summary_rows(result: &RunResult) -> String {
    let stats = &result.stats;
    let mut rows = String::new();
    let _ = writeln!(rows, "<tr><th>Samples</th><td>{}</td></tr>", stats.count);
    let _ = writeln!(rows, "<tr><th>Success rate</th><td>{:.2}%</td></tr>", stats.success_rate);
    for (name, value) in [
        ("Min", stats.min),
        ("Average", stats.average),
        ("Median", stats.median),
        ("P95", stats.p95),
        ("Max", stats.max),
    ] {
        let _ = writeln!(rows, "<tr><th>{name} TTFB</th><td>{value:.2} ms</td></tr>");
    }
    rows
}

pub fn render(result: &RunResult) -> String {
    let labels: Vec<String> = result
        .samples
        .iter()
        .map(|s| s.timestamp.format("%H:%M:%S").to_string())
        .collect();
    // Failed probes chart as gaps, not zeros.
    let values: Vec<Option<f64>> = result.samples.iter().map(|s| s.ttfb).collect();
    let colors: Vec<&str> = result
        .samples
        .iter()
        .map(|s| label_color(display_label(s)))
        .collect();

    PAGE_TEMPLATE
        .replace("{{URL}}", &escape(&result.url))
        .replace("{{START}}", &result.start_time.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .replace("{{END}}", &result.end_time.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .replace("{{DURATION}}", &result.duration_minutes.to_string())
        .replace("{{INTERVAL}}", &result.interval_seconds.to_string())
        .replace("{{SUMMARY_ROWS}}", &summary_rows(result))
        .replace("{{BREAKDOWN_ROWS}}", &breakdown_rows(result))
        .replace("{{CHART_LABELS}}", &serde_json::to_string(&labels).unwrap_or_default())
        .replace("{{CHART_VALUES}}", &serde_json::to_string(&values).unwrap_or_default())
        .replace("{{CHART_COLORS}}", &serde_json::to_string(&colors).unwrap_or_default())
}

const PAGE_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>TTFB report &mdash; {{URL}}</title>
<script src="https://cdn.jsdelivr.net/npm/chart.js@4"></script>
<style>
body { font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 960px; color: #212529; }
h1 { margin-bottom: 0.25rem; }
p.meta { color: #868e96; margin-top: 0; }
table { border-collapse: collapse; margin: 1rem 0; }
th, td { border: 1px solid #dee2e6; padding: 0.35rem 0.75rem; text-align: left; }
span.dot { display: inline-block; width: 0.6em; height: 0.6em; border-radius: 50%; margin-right: 0.4em; }
</style>
</head>
<body>
<h1>TTFB report</h1>
<p class="meta">{{URL}} &middot; {{START}} &rarr; {{END}} &middot; {{DURATION}} min window, {{INTERVAL}}s interval</p>

<h2>Summary</h2>
<table>
{{SUMMARY_ROWS}}</table>

<h2>Cache status</h2>
<table>
<tr><th>Label</th><th>Samples</th><th>Share</th><th>Avg TTFB</th></tr>
{{BREAKDOWN_ROWS}}</table>

<h2>TTFB over time</h2>
<canvas id="ttfb-chart"></canvas>
<script>
new Chart(document.getElementById('ttfb-chart'), {
  type: 'line',
  data: {
    labels: {{CHART_LABELS}},
    datasets: [{
      label: 'TTFB (ms)',
      data: {{CHART_VALUES}},
      pointBackgroundColor: {{CHART_COLORS}},
      borderColor: '#ced4da',
      spanGaps: false,
      tension: 0.2,
    }],
  },
  options: {
    scales: { y: { beginAtZero: true, title: { display: true, text: 'ms' } } },
    plugins: { legend: { display: false } },
  },
});
</script>
</body>
</html>
"#;
