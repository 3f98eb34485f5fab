//! GitHub release lookup for the update notice on the system page.

use std::time::Duration;

use myficdb_core::version::{is_newer, normalize_tag_to_version};
use serde::{Deserialize, Serialize};

use crate::config::BuildInfo;

/// Latest-release endpoint of the upstream repository.
pub const RELEASES_URL: &str = "https://api.github.com/repos/mckenziesoftware/myficdb/releases/latest";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Placeholder used for every value that could not be determined.
const ERR: &str = "ERR";

/// Installed vs. latest release.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UpdateInformation {
    pub installed_version: String,
    pub installed_build_date: String,
    pub installed_git_sha: String,
    pub latest_version: String,
    pub is_update_available: bool,
    pub release_url: String,
    pub release_content: String,
}

#[derive(Debug, Deserialize)]
struct GitHubRelease {
    tag_name: Option<String>,
    html_url: Option<String>,
    body: Option<String>,
}

/// Queries the releases endpoint with a shared HTTP client.
#[derive(Debug, Clone)]
pub struct UpdateChecker {
    client: reqwest::Client,
    build: BuildInfo,
    releases_url: String,
}

impl UpdateChecker {
    pub fn new(build: BuildInfo) -> Result<Self, reqwest::Error> {
        Self::with_releases_url(build, RELEASES_URL.to_string())
    }

    pub fn with_releases_url(build: BuildInfo, releases_url: String) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            build,
            releases_url,
        })
    }

    /// Look up the latest release. Failures are folded into the result with
    /// `ERR` placeholders rather than returned as errors.
    pub async fn latest(&self) -> UpdateInformation {
        let (Some(version), Some(build_date), Some(git_sha)) = (
            self.build.version.as_deref(),
            self.build.build_date.as_deref(),
            self.build.git_sha.as_deref(),
        ) else {
            tracing::error!(build = ?self.build, "Build info incomplete, skipping update check");
            return UpdateInformation {
                installed_version: ERR.to_string(),
                installed_build_date: ERR.to_string(),
                installed_git_sha: ERR.to_string(),
                latest_version: ERR.to_string(),
                is_update_available: false,
                release_url: String::new(),
                release_content: "Unable to check for update due to internal buildinfo failure."
                    .to_string(),
            };
        };

        let failed = |content: String| UpdateInformation {
            installed_version: version.to_string(),
            installed_build_date: build_date.to_string(),
            installed_git_sha: git_sha.to_string(),
            latest_version: ERR.to_string(),
            is_update_available: false,
            release_url: String::new(),
            release_content: content,
        };

        tracing::info!(url = %self.releases_url, "Checking for updates");

        let response = match self
            .client
            .get(&self.releases_url)
            .header(reqwest::header::USER_AGENT, format!("MyFicDB/{version}"))
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Update check request failed");
                return failed(format!("Update check failed ({e})."));
            }
        };

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            tracing::warn!("GitHub releases/latest returned 404");
            return failed("GitHub returned 404 for mckenziesoftware/myficdb.".to_string());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body, "GitHub releases/latest failed");
            return failed(format!("Update check failed ({}).", status.as_u16()));
        }

        let release = match response.json::<GitHubRelease>().await {
            Ok(release) => release,
            Err(e) => {
                tracing::warn!(error = %e, "GitHub release payload could not be parsed");
                return failed("Update check failed, invalid response.".to_string());
            }
        };

        Self::compare(&self.build_info_version(), build_date, git_sha, release)
    }

    fn build_info_version(&self) -> String {
        normalize_tag_to_version(self.build.version.as_deref())
    }

    fn compare(
        installed: &str,
        build_date: &str,
        git_sha: &str,
        release: GitHubRelease,
    ) -> UpdateInformation {
        let latest = normalize_tag_to_version(release.tag_name.as_deref());
        UpdateInformation {
            installed_version: installed.to_string(),
            installed_build_date: build_date.to_string(),
            installed_git_sha: git_sha.to_string(),
            is_update_available: is_newer(&latest, installed),
            latest_version: latest,
            release_url: release.html_url.unwrap_or_default(),
            release_content: release.body.unwrap_or_else(|| "No Content".to_string()),
        }
    }
}
