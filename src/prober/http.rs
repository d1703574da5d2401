use chrono::Utc;
use reqwest::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use tokio::time::{Duration, Instant, timeout};
use tracing::{debug, warn};

use super::{Prober, Sample};
use crate::stats::round2;

/// Hard ceiling for a single probe, measured from request dispatch.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(45);

const PROBE_USER_AGENT: &str = concat!("ttfb-monitor/", env!("CARGO_PKG_VERSION"));
const PROBE_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Issues one timed GET per [`probe`](Prober::probe) call. Redirects follow
/// the client default (up to 10 hops), so TTFB runs to the first header byte
/// of the final response.
pub struct HttpProber {
    client: Client,
    cache_header: String,
    timeout: Duration,
}

impl HttpProber {
    pub fn new(cache_header: &str) -> anyhow::Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            cache_header: cache_header.to_ascii_lowercase(),
            timeout: PROBE_TIMEOUT,
        })
    }

    /// Ceiling override, for tests that exercise the timeout path against
    /// slow endpoints.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Prober for HttpProber {
    /// Never fails at the signature level: transport errors, DNS failures
    /// and the probe ceiling all resolve to a failed [`Sample`].
    async fn probe(&self, url: &str) -> Sample {
        let timestamp = Utc::now();
        let start = Instant::now();
        let request = self
            .client
            .get(url)
            .header(USER_AGENT, PROBE_USER_AGENT)
            .header(ACCEPT, PROBE_ACCEPT)
            .send();

        let response = match timeout(self.timeout, request).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                // Alternate formatting keeps the transport-level cause chain
                // (DNS, connection refused, TLS) in the recorded text.
                let error = format!("{:#}", anyhow::Error::new(e));
                warn!("probe {} failed: {}", url, error);
                return Sample::failure(timestamp, error);
            }
            Err(_) => {
                warn!("probe {} exceeded the {}s ceiling", url, self.timeout.as_secs());
                return Sample::failure(
                    timestamp,
                    format!("Request timeout ({}s)", self.timeout.as_secs()),
                );
            }
        };

        // Headers are in; this is the latency the tool reports.
        let ttfb_ms = round2(start.elapsed().as_secs_f64() * 1000.0);
        let status = response.status().as_u16();
        let cache_status = response
            .headers()
            .get(self.cache_header.as_str())
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        // Drain the body so the pooled connection is released. Transfer time
        // is not part of TTFB, but the drain still respects the ceiling.
        let remaining = self.timeout.saturating_sub(start.elapsed());
        if timeout(remaining, response.bytes()).await.is_err() {
            debug!("probe {} body drain hit the probe ceiling", url);
        }

        debug!("probe {} -> {} in {:.2}ms", url, status, ttfb_ms);
        Sample::success(timestamp, ttfb_ms, status, cache_status)
    }
}
