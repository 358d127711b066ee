use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use tokio_util::sync::CancellationToken;

use crate::error::{FestwrapError, Result};

/// Shared client for every outbound API call.
pub fn build_client(timeout: Duration, max_idle_per_host: usize) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(max_idle_per_host)
        .build()?;
    Ok(client)
}

/// Sends `request` and returns the response body if the server answered with
/// `expected`. Gives up as soon as `cancellation` fires.
pub async fn send_expecting(
    cancellation: &CancellationToken,
    request: RequestBuilder,
    expected: StatusCode,
) -> Result<String> {
    tokio::select! {
        result = send(request, expected) => result,
        _ = cancellation.cancelled() => Err(FestwrapError::Cancelled),
    }
}

async fn send(request: RequestBuilder, expected: StatusCode) -> Result<String> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if status != expected {
        return Err(FestwrapError::UnexpectedStatus {
            expected,
            actual: status,
            body,
        });
    }

    Ok(body)
}
