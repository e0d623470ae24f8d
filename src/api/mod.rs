//! REST API Client
//!
//! Thin reqwest wrapper over the service-order API, organized by resource.

mod orders;
mod backend;
mod reference;
mod session;
mod locality;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use order_core::{ApiError, RecordId};

use crate::config::AppConfig;

pub use orders::ListQuery;

/// Storage key of the session token
const TOKEN_KEY: &str = "token";
/// Response header carrying the page count of list endpoints
const TOTAL_PAGES_HEADER: &str = "x-total-pages";
/// Error bodies are cut to this many characters
const ERROR_BODY_LIMIT: usize = 200;

/// Body returned by create endpoints
#[derive(Deserialize)]
struct Created {
    id: RecordId,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    postal_lookup_url: String,
    localities_url: String,
    token: Option<String>,
}

fn stored_token() -> Option<String> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(TOKEN_KEY).ok().flatten())
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn truncate(body: &str) -> String {
    body.chars().take(ERROR_BODY_LIMIT).collect()
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api_base_url.clone(),
            postal_lookup_url: config.postal_lookup_url.clone(),
            localities_url: config.localities_url.clone(),
            token: stored_token(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, join_url(&self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send and map transport failures and non-2xx statuses to `ApiError`
    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        check_status(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::GET, path)).await?;
        decode(response).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, path)).await.map(|_| ())
    }
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();
    log::warn!("[API] {} -> {}", url, status);
    Err(match status.as_u16() {
        401 | 403 => ApiError::Unauthorized,
        404 => ApiError::NotFound(url),
        code => ApiError::Status { status: code, body: truncate(&body) },
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
}

/// Page count from the list header; missing or malformed means one page
fn total_pages(response: &Response) -> u32 {
    parse_total_pages(
        response
            .headers()
            .get(TOTAL_PAGES_HEADER)
            .and_then(|value| value.to_str().ok()),
    )
}

fn parse_total_pages(raw: Option<&str>) -> u32 {
    raw.and_then(|v| v.trim().parse::<u32>().ok()).unwrap_or(1).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("http://api/", "/services/orders"), "http://api/services/orders");
        assert_eq!(join_url("http://api", "prague-types"), "http://api/prague-types");
    }

    #[test]
    fn test_parse_total_pages() {
        assert_eq!(parse_total_pages(Some("4")), 4);
        assert_eq!(parse_total_pages(Some("0")), 1);
        assert_eq!(parse_total_pages(Some("x")), 1);
        assert_eq!(parse_total_pages(None), 1);
    }

    #[test]
    fn test_truncate_error_body() {
        assert_eq!(truncate(&"e".repeat(500)).len(), ERROR_BODY_LIMIT);
    }
}
