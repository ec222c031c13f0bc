use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::json;
use tracing::{debug, warn};

use crate::error::ScmError;
use crate::types::{DraftReview, FileContent, RepoRef};
use crate::SourceHost;

const GITHUB_API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = "triage-engine";

/// GitHub REST API v3 adapter, grounded on the `PyGithub` call sequence in
/// `original_source/backend/draft_pr_generator.py::create_draft_pr`
/// (`get_repo`, `create_git_ref`, `get_contents`/`update_file`,
/// `create_pull`, `add_to_labels`), reimplemented against `reqwest` per the
/// teacher's `scm` crate dependency set.
pub struct GitHubClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl GitHubClient {
    #[must_use]
    pub fn new(token: String) -> Self {
        Self { client: reqwest::Client::new(), token, base_url: GITHUB_API_BASE.to_string() }
    }

    /// Point at a different API origin, for tests against a `wiremock` server.
    #[must_use]
    pub fn with_base_url(token: String, base_url: String) -> Self {
        Self { client: reqwest::Client::new(), token, base_url }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{path}", self.base_url))
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ScmError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            Err(ScmError::Api { status, body })
        }
    }
}

#[async_trait]
impl SourceHost for GitHubClient {
    async fn default_branch(&self, repo: &RepoRef) -> Result<String, ScmError> {
        let path = format!("/repos/{}/{}", repo.owner, repo.repo);
        let response = Self::check_status(self.request(reqwest::Method::GET, &path).send().await?).await?;
        let body: serde_json::Value = response.json().await?;
        body["default_branch"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ScmError::UnexpectedResponse("missing default_branch".to_string()))
    }

    async fn branch_head_sha(&self, repo: &RepoRef, branch: &str) -> Result<String, ScmError> {
        let path = format!("/repos/{}/{}/branches/{}", repo.owner, repo.repo, urlencoding::encode(branch));
        let response = Self::check_status(self.request(reqwest::Method::GET, &path).send().await?).await?;
        let body: serde_json::Value = response.json().await?;
        body["commit"]["sha"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ScmError::UnexpectedResponse("missing commit.sha".to_string()))
    }

    async fn read_file(&self, repo: &RepoRef, path: &str, reference: Option<&str>) -> Result<FileContent, ScmError> {
        let mut url = format!("/repos/{}/{}/contents/{}", repo.owner, repo.repo, urlencoding::encode(path));
        if let Some(reference) = reference {
            url.push_str(&format!("?ref={}", urlencoding::encode(reference)));
        }

        let response = Self::check_status(self.request(reqwest::Method::GET, &url).send().await?).await?;
        let body: serde_json::Value = response.json().await?;

        let encoded = body["content"]
            .as_str()
            .ok_or_else(|| ScmError::UnexpectedResponse("missing content".to_string()))?;
        let sha = body["sha"]
            .as_str()
            .ok_or_else(|| ScmError::UnexpectedResponse("missing sha".to_string()))?
            .to_string();

        let decoded = BASE64
            .decode(encoded.replace('\n', ""))
            .map_err(|e| ScmError::UnexpectedResponse(format!("invalid base64 content: {e}")))?;
        let content = String::from_utf8_lossy(&decoded).into_owned();

        Ok(FileContent { content, sha })
    }

    async fn create_branch(&self, repo: &RepoRef, branch_name: &str, from_sha: &str) -> Result<(), ScmError> {
        let path = format!("/repos/{}/{}/git/refs", repo.owner, repo.repo);
        let body = json!({ "ref": format!("refs/heads/{branch_name}"), "sha": from_sha });

        Self::check_status(self.request(reqwest::Method::POST, &path).json(&body).send().await?).await?;
        debug!(branch = branch_name, "created branch");
        Ok(())
    }

    async fn commit_file(
        &self,
        repo: &RepoRef,
        path: &str,
        message: &str,
        content: &str,
        sha: &str,
        branch: &str,
    ) -> Result<(), ScmError> {
        let url = format!("/repos/{}/{}/contents/{}", repo.owner, repo.repo, urlencoding::encode(path));
        let encoded_content = BASE64.encode(content.as_bytes());
        let body = json!({
            "message": message,
            "content": encoded_content,
            "sha": sha,
            "branch": branch,
        });

        Self::check_status(self.request(reqwest::Method::PUT, &url).json(&body).send().await?).await?;
        debug!(path, branch, "committed file update");
        Ok(())
    }

    async fn open_draft_review(
        &self,
        repo: &RepoRef,
        title: &str,
        body_text: &str,
        head: &str,
        base: &str,
    ) -> Result<DraftReview, ScmError> {
        let path = format!("/repos/{}/{}/pulls", repo.owner, repo.repo);
        let body = json!({ "title": title, "body": body_text, "head": head, "base": base, "draft": true });

        let response = Self::check_status(self.request(reqwest::Method::POST, &path).json(&body).send().await?).await?;
        let data: serde_json::Value = response.json().await?;

        let number = data["number"]
            .as_u64()
            .ok_or_else(|| ScmError::UnexpectedResponse("missing number".to_string()))?;
        let html_url = data["html_url"]
            .as_str()
            .ok_or_else(|| ScmError::UnexpectedResponse("missing html_url".to_string()))?
            .to_string();

        Ok(DraftReview { number, html_url })
    }

    async fn add_labels(&self, repo: &RepoRef, review_number: u64, labels: &[&str]) -> Result<(), ScmError> {
        let path = format!("/repos/{}/{}/issues/{}/labels", repo.owner, repo.repo, review_number);
        let body = json!({ "labels": labels });

        match Self::check_status(self.request(reqwest::Method::POST, &path).json(&body).send().await?).await {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!(review_number, error = %e, "could not add labels to review request");
                Ok(())
            }
        }
    }
}
