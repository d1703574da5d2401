use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod http;

/// One probe outcome, immutable once created. A sample either reached the
/// response headers and carries a TTFB measurement, or it failed and carries
/// an error description; the constructors keep those states exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    /// Instant the probe was issued, at request dispatch.
    pub timestamp: DateTime<Utc>,
    /// Milliseconds from dispatch to response-headers receipt, two decimals.
    /// Absent when the probe failed or timed out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttfb: Option<f64>,
    /// HTTP status of the response, absent when none arrived. A non-2xx
    /// status is still a successful measurement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// Verbatim value of the designated cache-status header. Opaque label,
    /// never parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Sample {
    pub fn success(
        timestamp: DateTime<Utc>,
        ttfb_ms: f64,
        status_code: u16,
        cache_status: Option<String>,
    ) -> Self {
        Self {
            timestamp,
            ttfb: Some(ttfb_ms),
            status_code: Some(status_code),
            cache_status,
            error: None,
        }
    }

    pub fn failure(timestamp: DateTime<Utc>, error: impl Into<String>) -> Self {
        Self {
            timestamp,
            ttfb: None,
            status_code: None,
            cache_status: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.ttfb.is_some()
    }
}

/// A probe source the schedule loop can drive. The HTTP implementation lives
/// in [`http`]; scheduler tests substitute canned probers.
pub trait Prober {
    fn probe(&self, url: &str) -> impl Future<Output = Sample> + Send;
}
