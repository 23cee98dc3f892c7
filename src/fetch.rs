use std::time::Duration;

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::StatusCode;
use tracing::{info, warn};

const MAX_RETRIES: u32 = 3;
const BASE_BACKOFF_MS: u64 = 2000;

/// Download the roster PDF, retrying on rate limits and server errors.
pub async fn download_pdf(url: &str, timeout: Duration) -> Result<Vec<u8>> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to build HTTP client")?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message(format!("Downloading {}", url));
    pb.enable_steady_tick(Duration::from_millis(120));

    let result = download_with_retry(&client, url).await;
    pb.finish_and_clear();

    let bytes = result?;
    info!(url, bytes = bytes.len(), "Downloaded roster");
    Ok(bytes)
}

async fn download_with_retry(client: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    let mut attempt = 0;
    loop {
        let response = client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;
        let status = response.status();

        if status.is_success() {
            let bytes = response
                .bytes()
                .await
                .with_context(|| format!("Failed to read body of {}", url))?;
            return Ok(bytes.to_vec());
        }

        if !should_retry(status) || attempt == MAX_RETRIES {
            bail!("Download of {} failed with HTTP {}", url, status);
        }

        let wait = backoff(attempt);
        warn!(
            "HTTP {} from {} (attempt {}/{}), backing off {:.1}s",
            status,
            url,
            attempt + 1,
            MAX_RETRIES,
            wait.as_secs_f64()
        );
        tokio::time::sleep(wait).await;
        attempt += 1;
    }
}

fn should_retry(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(BASE_BACKOFF_MS * 2u64.pow(attempt))
}
