//! Anonymous usage notification
//!
//! A single best-effort GET, run on a detached task. Its outcome is logged at
//! debug level and never reaches the caller.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

const COLLECTOR_URL: &str = "http://collector.singer.io/i";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Query parameters identifying this target and version
pub fn usage_params(version: &str) -> [(&'static str, String); 5] {
    [
        ("e", "se".to_string()),
        ("aid", "singer".to_string()),
        ("se_ca", "target-parquet".to_string()),
        ("se_ac", "open".to_string()),
        ("se_la", version.to_string()),
    ]
}

/// Spawn the notification; the handle may be dropped
pub fn spawn_usage_notification(version: &str) -> JoinHandle<()> {
    let params = usage_params(version);
    tokio::spawn(async move {
        if let Err(e) = send_usage_stats(&params).await {
            debug!(error = %e, "Collection request failed");
        }
    })
}

async fn send_usage_stats(params: &[(&'static str, String)]) -> reqwest::Result<()> {
    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?;
    let response = client.get(COLLECTOR_URL).query(params).send().await?;
    debug!(status = %response.status(), "Collection request sent");
    Ok(())
}
