//! Chart upload to the remote repository
//!
//! Read-then-conditionally-write: the current version marker is read first
//! so the upload replaces the existing revision instead of conflicting with
//! it. The marker being absent just means this is the first publish.

use chrono::{DateTime, FixedOffset, Utc};
use tracing::{debug, info};

use crate::api::github::{GitHubClient, PublishError};
use crate::config::AppConfig;
use crate::models::ChartArtifact;

/// Outcome of a successful publish
#[derive(Debug)]
pub struct PublishOutcome {
    /// Whether an existing revision was replaced (as opposed to created)
    pub replaced: bool,
    /// SHA of the commit that recorded this revision
    pub commit_sha: String,
}

/// Build the human-readable commit message for one run
fn commit_message(now: DateTime<Utc>, offset: FixedOffset) -> String {
    format!(
        "Upload chart {}",
        now.with_timezone(&offset).format("%Y-%m-%d %H:%M:%S")
    )
}

/// Idempotently replace the chart at the configured destination
pub async fn publish_chart(
    config: &AppConfig,
    client: &GitHubClient,
    artifact: &ChartArtifact,
) -> Result<PublishOutcome, PublishError> {
    let sha = client
        .get_content_sha(
            &config.github_owner,
            &config.github_repo,
            &config.remote_path,
            &config.github_branch,
        )
        .await?;

    match &sha {
        Some(marker) => debug!("Existing chart found (sha {}), updating in place", marker),
        None => info!("No existing chart at {}, creating it", config.remote_path),
    }

    let replaced = sha.is_some();
    let message = commit_message(Utc::now(), config.display_offset);

    let response = client
        .put_content(
            &config.github_owner,
            &config.github_repo,
            &config.remote_path,
            &artifact.bytes,
            message,
            config.github_branch.clone(),
            sha,
        )
        .await?;

    Ok(PublishOutcome {
        replaced,
        commit_sha: response.commit.sha,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_commit_message_uses_display_timezone() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 16, 30, 45).unwrap();
        let offset = FixedOffset::east_opt(8 * 3600).unwrap();

        assert_eq!(
            commit_message(now, offset),
            "Upload chart 2024-04-01 00:30:45"
        );
    }
}
