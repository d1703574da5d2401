use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs;

use super::RunResult;

pub async fn write_json(path: &Path, result: &RunResult) -> Result<()> {
    let body = serde_json::to_string_pretty(result)?;
    fs::write(path, body)
        .await
        .with_context(|| format!("writing results to {}", path.display()))
}
