use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::prober::Sample;
use crate::stats::SummaryStats;

pub mod html;
pub mod json;

/// Everything downstream tooling reads from one run. Field names are part
/// of the schema; external analysis depends on them staying stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub url: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: u64,
    pub interval_seconds: u64,
    pub samples: Vec<Sample>,
    pub stats: SummaryStats,
}
