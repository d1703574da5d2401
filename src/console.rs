use tokio::sync::mpsc::UnboundedReceiver;

use crate::events::RunEvent;
use crate::prober::Sample;
use crate::report::RunResult;

/// Prints one line per completed sample as events arrive from the loop.
/// Runs until the sending side hangs up.
pub async fn render_progress(mut rx: UnboundedReceiver<RunEvent>, expected: u64) {
    while let Some(event) = rx.recv().await {
        match event {
            RunEvent::SampleCompleted { index, sample } => {
                println!("{}", progress_line(index, expected, &sample));
            }
            RunEvent::RunFinished { total } => {
                println!("Run complete: {total} samples collected");
            }
        }
    }
}

fn progress_line(index: usize, expected: u64, sample: &Sample) -> String {
    let time = sample.timestamp.format("%H:%M:%S");
    let prefix = format!("[{:>3}/{}] {}", index + 1, expected, time);
    if let Some(ttfb) = sample.ttfb {
        let status = sample
            .status_code
            .map_or_else(|| "-".to_string(), |s| s.to_string());
        let label = sample.cache_status.as_deref().unwrap_or("-");
        format!("{prefix} {status} {label:<6} {ttfb:>9.2} ms")
    } else {
        let error = sample.error.as_deref().unwrap_or("unknown failure");
        format!("{prefix} ERROR  {error}")
    }
}

pub fn print_summary(result: &RunResult) {
    let stats = &result.stats;
    println!();
    println!("Summary for {}", result.url);
    println!("  samples       {}", stats.count);
    println!("  success rate  {:.2}%", stats.success_rate);
    println!("  ttfb min      {:.2} ms", stats.min);
    println!("  ttfb average  {:.2} ms", stats.average);
    println!("  ttfb median   {:.2} ms", stats.median);
    println!("  ttfb p95      {:.2} ms", stats.p95);
    println!("  ttfb max      {:.2} ms", stats.max);
}
