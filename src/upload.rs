//! Best-effort push of rendered metrics to a collector.

use anyhow::{bail, Context, Result};
use std::time::Duration;
use tracing::{info, warn};

/// Fire one POST of `body` to `<base>/host/<host>`. Failures are
/// logged and swallowed; the next round retries naturally.
pub async fn push_metrics(base: &str, host: &str, body: String) {
    match post(base, host, body).await {
        Ok(()) => info!(host, "metrics pushed"),
        Err(err) => warn!(host, error = %err, "metrics push failed"),
    }
}

async fn post(base: &str, host: &str, body: String) -> Result<()> {
    let url = format!("{}/host/{}", base.trim_end_matches('/'), host);
    // Push collectors commonly sit behind self-signed certs.
    let client = reqwest::Client::builder()
        .danger_accept_invalid_certs(true)
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .build()
        .context("building push client")?;
    let resp = client
        .post(&url)
        .timeout(Duration::from_secs(15))
        .body(body)
        .send()
        .await
        .with_context(|| format!("POST {}", url))?;
    let status = resp.status();
    if !status.is_success() {
        bail!("{} returned {}", url, status);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #[test]
    fn push_url_joins_without_double_slash() {
        let base = "https://collector.example:9091/";
        let url = format!("{}/host/{}", base.trim_end_matches('/'), "sw1");
        assert_eq!(url, "https://collector.example:9091/host/sw1");
    }
}
