//! Source-hosting collaborator used by the expertise engine's blame-adjacent
//! lookups and the draft-fix generator's review creation: read file
//! contents, branch, commit, and open a draft review request, backed by
//! the GitHub REST API.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod error;
mod github;
mod types;

pub use error::ScmError;
pub use github::GitHubClient;
pub use types::{DraftReview, FileContent, RepoRef};

use async_trait::async_trait;

/// Unified source-hosting abstraction. `scm::GitHubClient` is the only
/// implementation shipped, but the trait keeps callers (`expertise`,
/// `draftfix`) decoupled from any specific host so tests can substitute a
/// `mockall`-generated double.
#[async_trait]
pub trait SourceHost: Send + Sync {
    async fn default_branch(&self, repo: &RepoRef) -> Result<String, ScmError>;
    async fn branch_head_sha(&self, repo: &RepoRef, branch: &str) -> Result<String, ScmError>;
    async fn read_file(&self, repo: &RepoRef, path: &str, reference: Option<&str>) -> Result<FileContent, ScmError>;
    async fn create_branch(&self, repo: &RepoRef, branch_name: &str, from_sha: &str) -> Result<(), ScmError>;
    async fn commit_file(
        &self,
        repo: &RepoRef,
        path: &str,
        message: &str,
        content: &str,
        sha: &str,
        branch: &str,
    ) -> Result<(), ScmError>;
    async fn open_draft_review(
        &self,
        repo: &RepoRef,
        title: &str,
        body: &str,
        head: &str,
        base: &str,
    ) -> Result<DraftReview, ScmError>;
    async fn add_labels(&self, repo: &RepoRef, review_number: u64, labels: &[&str]) -> Result<(), ScmError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn read_file_decodes_base64_content() {
        let server = MockServer::start().await;
        let encoded = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, b"fn main() {}");

        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/contents/src/lib.rs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": encoded,
                "sha": "abc123",
            })))
            .mount(&server)
            .await;

        let client = GitHubClient::with_base_url("token".to_string(), server.uri());
        let repo = RepoRef::parse("acme/widgets").unwrap();
        let file = client.read_file(&repo, "src/lib.rs", None).await.unwrap();

        assert_eq!(file.content, "fn main() {}");
        assert_eq!(file.sha, "abc123");
    }

    #[tokio::test]
    async fn add_labels_failure_is_non_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repos/acme/widgets/issues/7/labels"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = GitHubClient::with_base_url("token".to_string(), server.uri());
        let repo = RepoRef::parse("acme/widgets").unwrap();
        let result = client.add_labels(&repo, 7, &["bug-fix"]).await;

        assert!(result.is_ok());
    }

    #[test]
    fn repo_ref_roundtrips() {
        let repo = RepoRef::parse("acme/widgets").unwrap();
        assert_eq!(repo.owner, "acme");
    }
}
