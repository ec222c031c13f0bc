#[derive(Debug, Clone)]
pub struct FileContent {
    pub content: String,
    pub sha: String,
}

#[derive(Debug, Clone)]
pub struct DraftReview {
    pub number: u64,
    pub html_url: String,
}

/// `owner/repo`, parsed once at the edge so every adapter method takes the
/// same normalized shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    /// Parse from a GitHub URL (`https://github.com/owner/repo`) or a bare
    /// `owner/repo` slug.
    pub fn parse(repository: &str) -> Result<Self, crate::error::ScmError> {
        let trimmed = repository
            .trim_start_matches("https://github.com/")
            .trim_start_matches("http://github.com/")
            .trim_end_matches(".git")
            .trim_matches('/');

        let mut parts = trimmed.splitn(2, '/');
        let (Some(owner), Some(repo)) = (parts.next(), parts.next()) else {
            return Err(crate::error::ScmError::InvalidRepository(repository.to_string()));
        };

        if owner.is_empty() || repo.is_empty() {
            return Err(crate::error::ScmError::InvalidRepository(repository.to_string()));
        }

        Ok(Self { owner: owner.to_string(), repo: repo.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_url() {
        let r = RepoRef::parse("https://github.com/acme/widgets").unwrap();
        assert_eq!(r.owner, "acme");
        assert_eq!(r.repo, "widgets");
    }

    #[test]
    fn parses_bare_slug() {
        let r = RepoRef::parse("acme/widgets").unwrap();
        assert_eq!(r.owner, "acme");
        assert_eq!(r.repo, "widgets");
    }

    #[test]
    fn rejects_malformed_repository() {
        assert!(RepoRef::parse("not-a-repo").is_err());
    }
}
