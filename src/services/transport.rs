use crate::{Result, TransferError};
use http_client::{HttpClient, Request, Response};
use http_types::{Method, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Seconds to wait when a 429 response carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER: u64 = 30;

/// Bearer-authenticated JSON transport shared by the service clients.
#[derive(Clone)]
pub struct ApiTransport {
    client: Arc<dyn HttpClient + Send + Sync>,
    access_token: String,
    base_url: String,
}

impl ApiTransport {
    pub fn new(
        client: Box<dyn HttpClient + Send + Sync>,
        access_token: String,
        base_url: String,
    ) -> Self {
        Self {
            client: Arc::from(client),
            access_token,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Absolute URL for an API path such as `/me/playlists`.
    pub fn url(&self, path_and_query: &str) -> String {
        format!("{}{}", self.base_url, path_and_query)
    }

    /// GET `url` and return the response body of a successful request.
    pub async fn get(&self, url: &str) -> Result<String> {
        self.send(Method::Get, url, None).await
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self.get(url).await?;
        parse_json(&body)
    }

    pub async fn post_json<T: DeserializeOwned>(
        &self,
        url: &str,
        payload: &serde_json::Value,
    ) -> Result<T> {
        let body = self.send(Method::Post, url, Some(payload)).await?;
        parse_json(&body)
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        payload: Option<&serde_json::Value>,
    ) -> Result<String> {
        let parsed = url
            .parse::<Url>()
            .map_err(|e| TransferError::Http(format!("Invalid URL {url}: {e}")))?;

        let mut request = Request::new(method, parsed);
        let _ = request.insert_header("Authorization", format!("Bearer {}", self.access_token));
        let _ = request.insert_header("Accept", "application/json");
        if let Some(payload) = payload {
            let _ = request.insert_header("Content-Type", "application/json");
            request.set_body(payload.to_string());
        }

        log::debug!("{method} {url}");
        let request_start = std::time::Instant::now();
        let mut response = self
            .client
            .send(request)
            .await
            .map_err(|e| TransferError::Http(e.to_string()))?;

        let status: u16 = response.status().into();
        let retry_after = retry_after_seconds(&response);
        let body = response
            .body_string()
            .await
            .map_err(|e| TransferError::Http(e.to_string()))?;
        log::trace!(
            "{method} {url} -> {status} in {}ms",
            request_start.elapsed().as_millis()
        );

        if (200..300).contains(&status) {
            Ok(body)
        } else {
            Err(status_error(status, &body, retry_after))
        }
    }
}

fn retry_after_seconds(response: &Response) -> Option<u64> {
    response
        .header("Retry-After")
        .and_then(|values| values.iter().next())
        .and_then(|value| value.as_str().trim().parse().ok())
}

pub fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| TransferError::Parse(e.to_string()))
}

/// Map a non-success status to an error.
pub fn status_error(status: u16, body: &str, retry_after: Option<u64>) -> TransferError {
    let detail = error_detail(body);
    match status {
        401 | 403 => TransferError::Auth(format!("HTTP {status}: {detail}")),
        429 => TransferError::RateLimit {
            retry_after: retry_after.unwrap_or(DEFAULT_RETRY_AFTER),
        },
        _ => TransferError::Http(format!("HTTP {status}: {detail}")),
    }
}

/// Both services wrap errors as `{"error": {"message": ...}}`; fall back to the raw body.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            json.pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.chars().take(200).collect())
}

/// Re-label a request failure as a rejected write.
pub fn into_write_error(error: TransferError) -> TransferError {
    match error {
        TransferError::Http(message) => TransferError::Write(message),
        other => other,
    }
}
