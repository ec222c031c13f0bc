use std::collections::HashMap;
use std::path::Path;

use tokio::process::Command;

use crate::error::ExpertiseError;

/// Looks up commit subjects via `git log -1 --format=%s <commit>`, caching
/// each commit's subject for the lifetime of a single file scan so a commit
/// touching many lines is only summarized once.
#[derive(Default)]
pub struct SubjectCache {
    cache: HashMap<String, String>,
}

impl SubjectCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn subject(&mut self, repo_dir: &Path, commit: &str) -> Result<String, ExpertiseError> {
        if let Some(subject) = self.cache.get(commit) {
            return Ok(subject.clone());
        }

        let output = Command::new("git")
            .args(["log", "-1", "--format=%s", commit])
            .current_dir(repo_dir)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            return Err(ExpertiseError::NonZeroExit(stderr));
        }

        let subject = String::from_utf8_lossy(&output.stdout).trim().to_string();
        self.cache.insert(commit.to_string(), subject.clone());
        Ok(subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let cache = SubjectCache::new();
        assert!(cache.cache.is_empty());
    }
}
