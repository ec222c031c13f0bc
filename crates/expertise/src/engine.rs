use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use db::models::ExpertiseCacheRow;
use db::{ExpertiseCacheRepo, UserRepo};
use tracing::warn;

use crate::filters::{is_bot_author, is_merge_commit_subject};
use crate::scoring::{recency_weight, score_records};
use crate::subject::SubjectCache;
use crate::types::{ExpertiseScore, PrimaryAndFallbacks};
use crate::{blame, ExpertiseError};

/// `original_source/backend/git_analysis_engine.py`'s `GitAnalysisEngine`,
/// rebuilt around the workspace's `db` repositories for caching and active-
/// contributor lookups.
pub struct ExpertiseEngine {
    repo_dir: PathBuf,
    blame_timeout: Duration,
    cache: ExpertiseCacheRepo,
    users: UserRepo,
}

impl ExpertiseEngine {
    #[must_use]
    pub fn new(repo_dir: PathBuf, blame_timeout: Duration, cache: ExpertiseCacheRepo, users: UserRepo) -> Self {
        Self { repo_dir, blame_timeout, cache, users }
    }

    /// `[ExpertiseScore]` sorted descending by score; empty on blame failure
    /// or timeout (callers fall through to human triage).
    pub async fn get_file_expertise(&self, file_path: &str, use_cache: bool) -> Vec<ExpertiseScore> {
        let now = Utc::now();

        if use_cache {
            match self.cache.get_for_file(file_path).await {
                Ok(rows) if !rows.is_empty() && rows.iter().all(|r| ExpertiseCacheRepo::is_fresh(r.calculated_at, now)) => {
                    return rescored_from_cache(&rows, now);
                }
                Ok(_) => {}
                Err(e) => warn!(file_path, error = %e, "expertise cache lookup failed, recomputing"),
            }
        }

        match self.compute_and_cache(file_path, now).await {
            Ok(scores) => scores,
            Err(e) => {
                warn!(file_path, error = %e, "git blame failed, returning no expertise");
                Vec::new()
            }
        }
    }

    async fn compute_and_cache(&self, file_path: &str, now: chrono::DateTime<Utc>) -> Result<Vec<ExpertiseScore>, ExpertiseError> {
        let records = blame::run(&self.repo_dir, file_path, self.blame_timeout).await?;
        let mut surviving = Vec::with_capacity(records.len());
        let mut subjects = SubjectCache::new();

        for record in records {
            if is_bot_author(&record.email, &record.name) {
                continue;
            }
            let subject = subjects.subject(&self.repo_dir, &record.commit).await.unwrap_or_default();
            if is_merge_commit_subject(&subject) {
                continue;
            }
            surviving.push(record);
        }

        let scores = score_records(&surviving, now);

        let rows: Vec<ExpertiseCacheRow> = scores
            .iter()
            .map(|s| ExpertiseCacheRow {
                id: 0,
                file_path: file_path.to_string(),
                developer_email: s.email.clone(),
                score: s.score,
                commit_count: s.commit_count as i32,
                last_commit_date: s.last_commit_date,
                lines_owned: s.lines_owned as i32,
                calculated_at: now,
            })
            .collect();

        self.cache.replace_for_file(file_path, &rows).await?;
        Ok(scores)
    }

    /// `get_active_contributors`: same ranking, filtered to `UserMapping.is_active`
    /// (fail-open: no mapping row, or a lookup error, counts as active).
    pub async fn get_active_contributors(&self, file_path: &str) -> Vec<ExpertiseScore> {
        let mut active = Vec::new();
        for score in self.get_file_expertise(file_path, true).await {
            if self.is_active(&score.email).await {
                active.push(score);
            }
        }
        active
    }

    async fn is_active(&self, email: &str) -> bool {
        match self.users.find_by_git_email(email).await {
            Ok(Some(mapping)) => mapping.is_active,
            Ok(None) => true,
            Err(e) => {
                warn!(email, error = %e, "user lookup failed, assuming active");
                true
            }
        }
    }

    /// Top active contributor plus up to four runners-up.
    pub async fn get_primary_and_fallbacks(&self, file_path: &str) -> PrimaryAndFallbacks {
        let mut active = self.get_active_contributors(file_path).await;
        if active.is_empty() {
            return PrimaryAndFallbacks::default();
        }
        let primary = active.remove(0);
        active.truncate(4);
        PrimaryAndFallbacks { primary: Some(primary), fallbacks: active }
    }
}

/// Cache hit: recency weight is recomputed against the current clock while
/// the stored raw counts remain authoritative.
fn rescored_from_cache(rows: &[ExpertiseCacheRow], now: chrono::DateTime<Utc>) -> Vec<ExpertiseScore> {
    let mut scores: Vec<ExpertiseScore> = rows
        .iter()
        .map(|row| {
            let age_days = row
                .last_commit_date
                .map(|ts| (now - ts).num_seconds() as f64 / 86_400.0)
                .unwrap_or(f64::MAX);
            let weight = recency_weight(age_days, now);
            let score = f64::from(row.lines_owned) * f64::from(row.commit_count) * weight;

            ExpertiseScore {
                email: row.developer_email.clone(),
                name: String::new(),
                score,
                commit_count: row.commit_count as u32,
                lines_owned: row.lines_owned as u32,
                last_commit_date: row.last_commit_date,
            }
        })
        .collect();

    scores.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scores
}
