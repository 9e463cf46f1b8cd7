//! Reqwest client for the helpdesk REST API.
//!
//! Every call carries the configured token and JSON content type. Non-success
//! answers become [`RelayError::Upstream`] with the `error` field of the body.

use async_trait::async_trait;
use relay_shared::{truncate_string, DirectoryError, RelayError, UpstreamConfig, User, UserDirectory, UserPage};
use reqwest::header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Client, Method, Response, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Raw attachment bytes fetched from the helpdesk.
#[derive(Debug, Clone)]
pub struct UpstreamBinary {
    pub content_type: String,
    pub filename: Option<String>,
    pub bytes: Vec<u8>,
}

pub struct HelpdeskClient {
    client: Client,
    base_url: Url,
    token: String,
}

impl HelpdeskClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, RelayError> {
        let base_url = Url::parse(config.base())
            .map_err(|e| RelayError::Config(format!("invalid upstream url {}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(RelayError::Config(format!("upstream url {} cannot be a base", config.base_url)));
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| RelayError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            token: config.token.clone(),
        })
    }

    /// Upstream URL for the given path segments. Segments are percent-encoded.
    pub fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> reqwest::RequestBuilder {
        let url = self.url(segments);
        debug!("Upstream request: {} {}", method, url.path());
        self.client
            .request(method, url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Token token={}", self.token))
    }

    pub async fn get_json(&self, segments: &[&str]) -> Result<Value, RelayError> {
        self.get_json_with_query(segments, &[]).await
    }

    pub async fn get_json_with_query(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<Value, RelayError> {
        let response = self
            .request(Method::GET, segments)
            .query(query)
            .send()
            .await
            .map_err(transport_error)?;
        read_json(response).await
    }

    pub async fn post_json<B: Serialize + ?Sized>(&self, segments: &[&str], body: &B) -> Result<Value, RelayError> {
        self.send_json(Method::POST, segments, body).await
    }

    pub async fn put_json<B: Serialize + ?Sized>(&self, segments: &[&str], body: &B) -> Result<Value, RelayError> {
        self.send_json(Method::PUT, segments, body).await
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<Value, RelayError> {
        let response = self
            .request(method, segments)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        read_json(response).await
    }

    pub async fn get_binary(&self, segments: &[&str]) -> Result<UpstreamBinary, RelayError> {
        let response = self
            .request(Method::GET, segments)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let filename = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(disposition_filename);
        let bytes = response.bytes().await.map_err(transport_error)?.to_vec();

        Ok(UpstreamBinary {
            content_type,
            filename,
            bytes,
        })
    }
}

#[async_trait]
impl UserDirectory for HelpdeskClient {
    async fn fetch_user_page(&self, page: u32, page_size: u32) -> Result<Vec<User>, DirectoryError> {
        let body = self
            .get_json_with_query(
                &["users"],
                &[("page", page.to_string()), ("per_page", page_size.to_string())],
            )
            .await
            .map_err(|e| DirectoryError(e.to_string()))?;

        Ok(UserPage::from_value(&body).users)
    }
}

fn transport_error(e: reqwest::Error) -> RelayError {
    warn!("Upstream transport error: {}", e);
    RelayError::Transport(e.to_string())
}

async fn read_json(response: Response) -> Result<Value, RelayError> {
    if !response.status().is_success() {
        return Err(upstream_error(response).await);
    }

    let bytes = response.bytes().await.map_err(transport_error)?;
    if bytes.is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_slice(&bytes)
        .map_err(|e| RelayError::Transport(format!("invalid JSON from upstream: {}", e)))
}

async fn upstream_error(response: Response) -> RelayError {
    let status = response.status().as_u16();
    let error = match response.bytes().await {
        Ok(bytes) => serde_json::from_slice::<Value>(&bytes)
            .ok()
            .and_then(|body| body.get("error").cloned())
            .unwrap_or(Value::Null),
        Err(_) => Value::Null,
    };

    warn!("Upstream responded with {}: {}", status, truncate_string(&error.to_string(), 200));
    RelayError::Upstream { status, error }
}

/// `filename` parameter of a Content-Disposition header.
fn disposition_filename(header: &str) -> Option<String> {
    header.split(';').map(str::trim).find_map(|part| {
        let value = part.strip_prefix("filename=")?;
        let value = value.trim_matches('"');
        (!value.is_empty()).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> HelpdeskClient {
        let config = UpstreamConfig {
            base_url: base_url.to_string(),
            token: "t0ken".to_string(),
            timeout_secs: 5,
        };
        HelpdeskClient::new(&config).unwrap()
    }

    #[test]
    fn test_url_joins_segments() {
        let client = client("https://desk.example.com/api/v1/");
        assert_eq!(
            client.url(&["tickets", "42"]).as_str(),
            "https://desk.example.com/api/v1/tickets/42"
        );
    }

    #[test]
    fn test_url_encodes_segments() {
        let client = client("https://desk.example.com/api/v1");
        assert_eq!(
            client.url(&["tickets", "../admin"]).as_str(),
            "https://desk.example.com/api/v1/tickets/..%2Fadmin"
        );
    }

    #[test]
    fn test_rejects_unparseable_base() {
        let config = UpstreamConfig {
            base_url: "not a url".to_string(),
            token: "t".to_string(),
            timeout_secs: 5,
        };
        assert!(matches!(HelpdeskClient::new(&config), Err(RelayError::Config(_))));
    }

    #[test]
    fn test_disposition_filename() {
        assert_eq!(
            disposition_filename(r#"attachment; filename="report.pdf""#).as_deref(),
            Some("report.pdf")
        );
        assert_eq!(disposition_filename("inline; filename=log.txt").as_deref(), Some("log.txt"));
        assert_eq!(disposition_filename("inline"), None);
    }
}
