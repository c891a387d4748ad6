//! Streaming asset download with progress reporting.

use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::Reporter;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Download `url` into memory, reporting progress under `label`.
///
/// Non-2xx responses are errors.
pub async fn fetch_bytes(
    client: &Client,
    url: &str,
    label: &str,
    reporter: &dyn Reporter,
) -> Result<Bytes, DownloadError> {
    debug!(url, "downloading");

    let response = client
        .get(url)
        .header(reqwest::header::USER_AGENT, crate::USER_AGENT)
        .send()
        .await?
        .error_for_status()?;

    let total = response.content_length();
    reporter.downloading(label, 0, total);

    let mut buf = BytesMut::with_capacity(total.unwrap_or(0) as usize);
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        buf.extend_from_slice(&chunk);
        reporter.downloading(label, buf.len() as u64, total);
    }

    let len = buf.len() as u64;
    reporter.downloading(label, len, Some(len));
    Ok(buf.freeze())
}
