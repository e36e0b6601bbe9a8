use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Metadata returned when reading existing file contents
///
/// Only the blob SHA matters here: it is the version marker a later update
/// must carry to replace the file instead of conflicting with it.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentMetadata {
    pub sha: String,
}

/// Request body for PUT contents (create or update a file)
#[derive(Debug, Clone, Serialize)]
pub struct UploadRequest {
    pub message: String,
    /// Base64-encoded file bytes
    pub content: String,
    pub branch: String,
    /// Version marker of the file being replaced; omitted on create
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

/// Commit information from a successful upload
#[derive(Debug, Clone, Deserialize)]
pub struct UploadCommit {
    pub sha: String,
}

/// Response body from PUT contents
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub commit: UploadCommit,
}

/// Errors from the remote artifact store
#[derive(Debug, Error)]
pub enum PublishError {
    /// Network/request error
    #[error("Request error: {0}")]
    Request(String),
    /// Non-success HTTP status from the store
    #[error("Store returned HTTP {0}: {1}")]
    Http(u16, String),
    /// Response body did not match the expected shape
    #[error("Failed to parse response: {0}")]
    Deserialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_omits_sha() {
        let request = UploadRequest {
            message: "Upload chart 2024-01-02 08:30:00".to_string(),
            content: "aGVsbG8=".to_string(),
            branch: "main".to_string(),
            sha: None,
        };

        let json = serde_json::to_value(&request).expect("should serialize");

        assert!(json.get("sha").is_none(), "create must not carry a marker");
        assert_eq!(json["branch"], "main");
        assert_eq!(json["content"], "aGVsbG8=");
    }

    #[test]
    fn test_update_request_carries_sha() {
        let request = UploadRequest {
            message: "Upload chart 2024-01-02 08:30:00".to_string(),
            content: "aGVsbG8=".to_string(),
            branch: "main".to_string(),
            sha: Some("95b966ae1c166bd92f8ae7d1c313e738c731dfc3".to_string()),
        };

        let json = serde_json::to_value(&request).expect("should serialize");

        assert_eq!(json["sha"], "95b966ae1c166bd92f8ae7d1c313e738c731dfc3");
    }

    #[test]
    fn test_content_metadata_deserialization() {
        let body = r#"{
            "name": "dot_chart.png",
            "path": "charts/dot_chart.png",
            "sha": "95b966ae1c166bd92f8ae7d1c313e738c731dfc3",
            "size": 12345
        }"#;

        let metadata: ContentMetadata = serde_json::from_str(body).expect("should deserialize");

        assert_eq!(metadata.sha, "95b966ae1c166bd92f8ae7d1c313e738c731dfc3");
    }
}
