//! Bot and merge-commit exclusion, grounded on
//! `original_source/backend/git_analysis_engine.py`'s author/subject
//! denylists.

const BOT_EMAIL_SUBSTRINGS: &[&str] = &["bot", "noreply", "dependabot", "renovate", "automation"];
const BOT_EMAIL_DOMAIN_SUBSTRINGS: &[&str] = &["github", "ci", "deploy"];

const BOT_NAME_KEYWORDS: &[&str] =
    &["bot", "automation", "ci", "deploy", "github", "dependabot", "renovate"];

const MERGE_COMMIT_PREFIXES: &[&str] = &[
    "Merge pull request #",
    "Merge branch",
    "Merge remote-tracking branch",
    "Auto-merge",
    "Automatic merge",
];

/// `*bot*`, `*noreply*`, `*dependabot*`, `*renovate*`, `*automation*` match
/// anywhere; `*github*@*`, `*ci*@*`, `*deploy*@*` require the keyword before
/// the `@`.
#[must_use]
pub fn is_bot_email(email: &str) -> bool {
    let lower = email.to_lowercase();
    if BOT_EMAIL_SUBSTRINGS.iter().any(|kw| lower.contains(kw)) {
        return true;
    }
    let Some((local, _domain)) = lower.split_once('@') else {
        return false;
    };
    BOT_EMAIL_DOMAIN_SUBSTRINGS.iter().any(|kw| local.contains(kw))
}

#[must_use]
pub fn is_bot_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    BOT_NAME_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

#[must_use]
pub fn is_bot_author(email: &str, name: &str) -> bool {
    is_bot_email(email) || is_bot_name(name)
}

#[must_use]
pub fn is_merge_commit_subject(subject: &str) -> bool {
    MERGE_COMMIT_PREFIXES.iter().any(|prefix| subject.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_known_bot_emails() {
        assert!(is_bot_email("49699333+dependabot[bot]@users.noreply.github.com"));
        assert!(is_bot_email("renovate@automated.example.com"));
        assert!(is_bot_email("ci@deploys.example.com"));
        assert!(!is_bot_email("alice@example.com"));
    }

    #[test]
    fn flags_known_bot_names() {
        assert!(is_bot_name("GitHub Actions"));
        assert!(is_bot_name("deploy-runner"));
        assert!(!is_bot_name("Alice Smith"));
    }

    #[test]
    fn flags_merge_commit_subjects() {
        assert!(is_merge_commit_subject("Merge pull request #42 from acme/fix"));
        assert!(is_merge_commit_subject("Merge branch 'main' into feature"));
        assert!(!is_merge_commit_subject("Fix off-by-one in parser"));
    }
}
