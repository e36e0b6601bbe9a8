use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client as HttpClient;
use tracing::debug;

use super::models::{ContentMetadata, PublishError, UploadRequest, UploadResponse};

/// GitHub contents API client for publishing chart revisions
pub struct GitHubClient {
    http_client: HttpClient,
    api_token: String,
    base_url: String,
}

impl GitHubClient {
    const DEFAULT_BASE_URL: &'static str = "https://api.github.com";
    const USER_AGENT: &'static str = concat!("candlecast/", env!("CARGO_PKG_VERSION"));

    /// Create a new GitHub API client
    pub fn new(api_token: String) -> Result<Self, PublishError> {
        Self::with_base_url(api_token, Self::DEFAULT_BASE_URL.to_string())
    }

    /// Create a new client with custom base URL (for testing)
    pub fn with_base_url(api_token: String, base_url: String) -> Result<Self, PublishError> {
        // GitHub rejects requests that carry no User-Agent header
        let http_client = HttpClient::builder()
            .user_agent(Self::USER_AGENT)
            .build()
            .map_err(|e| PublishError::Request(e.to_string()))?;

        Ok(Self {
            http_client,
            api_token,
            base_url,
        })
    }

    /// Create default headers with authorization
    fn create_headers(&self) -> Result<HeaderMap, PublishError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );

        let auth_value = HeaderValue::from_str(&format!("token {}", self.api_token))
            .map_err(|e| PublishError::Request(format!("Failed to create auth header: {}", e)))?;
        headers.insert(AUTHORIZATION, auth_value);

        Ok(headers)
    }

    fn contents_url(&self, owner: &str, repo: &str, path: &str) -> String {
        format!("{}/repos/{}/{}/contents/{}", self.base_url, owner, repo, path)
    }

    /// GET /repos/{owner}/{repo}/contents/{path}
    ///
    /// Reads the version marker (blob SHA) of the file at the destination.
    /// Any non-success status means no prior file exists, which is not an
    /// error; only transport failures are.
    pub async fn get_content_sha(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: &str,
    ) -> Result<Option<String>, PublishError> {
        let url = self.contents_url(owner, repo, path);
        let headers = self.create_headers()?;

        let response = self
            .http_client
            .get(&url)
            .headers(headers)
            .query(&[("ref", branch)])
            .send()
            .await
            .map_err(|e| PublishError::Request(e.to_string()))?;

        if !response.status().is_success() {
            debug!(
                "No existing content at {} (HTTP {})",
                path,
                response.status()
            );
            return Ok(None);
        }

        let metadata: ContentMetadata = response
            .json()
            .await
            .map_err(|e| PublishError::Deserialization(e.to_string()))?;

        Ok(Some(metadata.sha))
    }

    /// PUT /repos/{owner}/{repo}/contents/{path}
    ///
    /// Writes the file as base64-encoded content. `sha` carries the marker
    /// read earlier to perform an update; `None` performs a create.
    pub async fn put_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        bytes: &[u8],
        message: String,
        branch: String,
        sha: Option<String>,
    ) -> Result<UploadResponse, PublishError> {
        let url = self.contents_url(owner, repo, path);
        let headers = self.create_headers()?;

        let body = UploadRequest {
            message,
            content: BASE64.encode(bytes),
            branch,
            sha,
        };

        let response = self
            .http_client
            .put(&url)
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(|e| PublishError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body_text = response.text().await.unwrap_or_default();
            return Err(PublishError::Http(status, body_text));
        }

        response
            .json::<UploadResponse>()
            .await
            .map_err(|e| PublishError::Deserialization(e.to_string()))
    }
}
