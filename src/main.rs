use ttfb_monitor::config::RunConfig;
use ttfb_monitor::console;
use ttfb_monitor::events::EventSink;
use ttfb_monitor::prober::http::HttpProber;
use ttfb_monitor::report::{RunResult, html, json};
use ttfb_monitor::scheduler::ScheduleLoop;
use ttfb_monitor::stats;

use chrono::Utc;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::info;

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() -> anyhow::Result<()> {
    let config = RunConfig::parse();
    config.validate()?;

    let level = if config.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("ttfb_monitor={level}").parse()?),
        )
        .init();

    println!(
        "Probing {} every {}s for {} minute(s), cache header {:?}",
        config.url, config.interval, config.duration, config.cache_header
    );

    let (tx, rx) = mpsc::unbounded_channel();
    let progress = tokio::spawn(console::render_progress(rx, config.expected_samples()));

    let prober = HttpProber::new(&config.cache_header)?;
    let schedule = ScheduleLoop::new(config.clone(), prober);

    let start_time = Utc::now();
    let samples = schedule.run(EventSink::new(tx)).await;
    let end_time = Utc::now();
    progress.await?;

    let stats = stats::summarize(&samples);
    let result = RunResult {
        url: config.url.clone(),
        start_time,
        end_time,
        duration_minutes: config.duration,
        interval_seconds: config.interval,
        samples,
        stats,
    };

    json::write_json(&config.output, &result).await?;
    info!("results written to {}", config.output.display());
    if !config.no_report {
        html::write_html(&config.report, &result).await?;
        info!("report written to {}", config.report.display());
    }

    console::print_summary(&result);
    Ok(())
}
