use tokio::time::{Instant, sleep};
use tracing::info;

use crate::config::RunConfig;
use crate::events::{EventSink, RunEvent};
use crate::prober::{Prober, Sample};

/// Drives a prober at a fixed cadence until the wall-clock deadline passes.
///
/// Probing is strictly sequential: at most one probe in flight, and a slow
/// probe pushes the next one back rather than overlapping it. The loop
/// checks the deadline rather than counting iterations, so slow probes
/// shrink the total sample count for the run.
pub struct ScheduleLoop<P> {
    config: RunConfig,
    prober: P,
}

impl<P: Prober> ScheduleLoop<P> {
    pub fn new(config: RunConfig, prober: P) -> Self {
        Self { config, prober }
    }

    /// Runs the full observation window and returns the samples in the
    /// order the probes were issued. Individual probe failures never end
    /// the run; each completed sample is also pushed through `sink`.
    pub async fn run(&self, sink: EventSink) -> Vec<Sample> {
        let deadline = Instant::now() + self.config.run_duration();
        let interval = self.config.probe_interval();
        let mut samples: Vec<Sample> = Vec::new();

        while Instant::now() < deadline {
            let sample = self.prober.probe(&self.config.url).await;
            sink.send(RunEvent::SampleCompleted {
                index: samples.len(),
                sample: sample.clone(),
            });
            samples.push(sample);

            // No sleep after the final probe; no probe after the deadline.
            if Instant::now() >= deadline {
                break;
            }
            sleep(interval).await;
        }

        info!("run finished with {} samples", samples.len());
        sink.send(RunEvent::RunFinished {
            total: samples.len(),
        });
        samples
    }
}
