use std::sync::Arc;

use ai::{BugAnalysis, TextGenerator};
use chrono::Utc;
use config::{keys, ConfigStore};
use scm::{RepoRef, SourceHost};
use stacktrace::StackTrace;
use tracing::warn;

use crate::types::{DraftFix, DraftReviewRequest};
use crate::{parse, prompt, templates, validate};

const CONFIDENCE_GATE: f64 = 85.0;
const DEFAULT_BRANCH_PREFIX: &str = "auto-fix";
const REVIEW_LABELS: [&str; 3] = ["DRAFT - Review Required", "auto-generated", "bug-fix"];

/// `original_source/backend/draft_pr_generator.py`'s `DraftPRGenerator`,
/// rebuilt against the `scm::SourceHost` and `ai::TextGenerator` traits.
pub struct DraftFixGenerator {
    source_host: Arc<dyn SourceHost>,
    generator: Arc<dyn TextGenerator>,
    config_store: Arc<dyn ConfigStore>,
}

impl DraftFixGenerator {
    #[must_use]
    pub fn new(source_host: Arc<dyn SourceHost>, generator: Arc<dyn TextGenerator>, config_store: Arc<dyn ConfigStore>) -> Self {
        Self { source_host, generator, config_store }
    }

    /// Generate and open a draft review request for a high-confidence bug.
    /// Any validation or API failure along the way returns `None`; the
    /// pipeline continues to notification without a draft link.
    pub async fn generate(
        &self,
        repo: &RepoRef,
        issue_id: &str,
        bug_analysis: &BugAnalysis,
        trace: Option<&StackTrace>,
        assignment_confidence: f64,
    ) -> Option<DraftReviewRequest> {
        if assignment_confidence <= CONFIDENCE_GATE {
            return None;
        }
        let target_file = bug_analysis.affected_files.first()?.clone();

        let file = match self.source_host.read_file(repo, &target_file, None).await {
            Ok(file) => file,
            Err(e) => {
                warn!(file = %target_file, error = %e, "could not retrieve file content for draft fix");
                return None;
            }
        };

        let prompt_text = prompt::build(bug_analysis, &target_file, &file.content, trace);
        let response = self.generator.generate(&prompt_text).await?;
        let parsed = parse::parse(&response)?;

        let fix = DraftFix {
            file_path: target_file.clone(),
            original_content: file.content.clone(),
            fixed_content: parsed.fixed_content,
            line_changes: parsed.line_changes,
            explanation: parsed.explanation,
            confidence: parsed.confidence,
        };

        if !validate::constraints_hold(&fix) {
            warn!(file = %target_file, "draft fix failed validation constraints");
            return None;
        }

        match self.open_review(repo, issue_id, bug_analysis, &fix, &file.sha).await {
            Ok(review) => Some(review),
            Err(e) => {
                warn!(issue_id, error = %e, "failed to open draft review request");
                None
            }
        }
    }

    async fn open_review(
        &self,
        repo: &RepoRef,
        issue_id: &str,
        bug_analysis: &BugAnalysis,
        fix: &DraftFix,
        file_sha: &str,
    ) -> Result<DraftReviewRequest, scm::ScmError> {
        let prefix = self.branch_prefix().await;
        let now = Utc::now();
        let branch = templates::branch_name(&prefix, issue_id, now);

        let default_branch = self.source_host.default_branch(repo).await?;
        let head_sha = self.source_host.branch_head_sha(repo, &default_branch).await?;
        self.source_host.create_branch(repo, &branch, &head_sha).await?;

        let commit_message = templates::commit_message(issue_id, bug_analysis);
        self.source_host
            .commit_file(repo, &fix.file_path, &commit_message, &fix.fixed_content, file_sha, &branch)
            .await?;

        let title = templates::pr_title(issue_id, bug_analysis);
        let description = templates::pr_description(fix, bug_analysis, issue_id);
        let review = self.source_host.open_draft_review(repo, &title, &description, &branch, &default_branch).await?;

        self.source_host.add_labels(repo, review.number, &REVIEW_LABELS).await?;

        Ok(DraftReviewRequest {
            title,
            description,
            file_path: fix.file_path.clone(),
            url: review.html_url,
            confidence: fix.confidence,
            explanation: fix.explanation.clone(),
            created_at: now,
        })
    }

    async fn branch_prefix(&self) -> String {
        self.config_store
            .get(keys::DRAFT_PR_BRANCH_PREFIX)
            .await
            .unwrap_or_else(|| DEFAULT_BRANCH_PREFIX.to_string())
    }
}
