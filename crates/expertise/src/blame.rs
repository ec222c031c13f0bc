use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use tokio::process::Command;

use crate::error::ExpertiseError;
use crate::types::BlameRecord;

/// Run `git blame --line-porcelain` with whitespace-ignore, copy- and
/// rename-detection, under a configurable timeout. Invalid UTF-8 in the
/// output is replaced rather than treated as a failure.
pub async fn run(repo_dir: &Path, file_path: &str, timeout: Duration) -> Result<Vec<BlameRecord>, ExpertiseError> {
    let run = Command::new("git")
        .args(["blame", "--line-porcelain", "-w", "-C", "-C", "-M", "--"])
        .arg(file_path)
        .current_dir(repo_dir)
        .output();

    let output = tokio::time::timeout(timeout, run)
        .await
        .map_err(|_| ExpertiseError::Timeout(timeout))??;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        return Err(ExpertiseError::NonZeroExit(stderr));
    }

    let text = String::from_utf8_lossy(&output.stdout);
    Ok(parse_porcelain(&text))
}

/// `git blame --line-porcelain` only repeats a commit's `author`/`author-mail`/
/// `author-time` headers the first time that commit appears; later lines
/// attributed to the same commit carry just the sha-line and content, so a
/// per-commit cache fills in the gaps.
fn parse_porcelain(text: &str) -> Vec<BlameRecord> {
    let mut cache: HashMap<String, (String, String, i64)> = HashMap::new();
    let mut current_sha = String::new();
    let mut current_name: Option<String> = None;
    let mut current_email: Option<String> = None;
    let mut current_time: Option<i64> = None;
    let mut records = Vec::new();

    for line in text.lines() {
        if let Some(sha) = sha_header(line) {
            current_sha = sha.to_string();
            if let Some((name, email, time)) = cache.get(&current_sha) {
                current_name = Some(name.clone());
                current_email = Some(email.clone());
                current_time = Some(*time);
            }
        } else if let Some(rest) = line.strip_prefix("author ") {
            current_name = Some(rest.to_string());
        } else if let Some(rest) = line.strip_prefix("author-mail ") {
            current_email = Some(rest.trim_matches(|c| c == '<' || c == '>').to_string());
        } else if let Some(rest) = line.strip_prefix("author-time ") {
            current_time = rest.trim().parse().ok();
        } else if line.starts_with('\t') {
            if let (Some(name), Some(email), Some(time)) =
                (current_name.clone(), current_email.clone(), current_time)
            {
                cache.entry(current_sha.clone()).or_insert_with(|| (name.clone(), email.clone(), time));
                let timestamp = Utc.timestamp_opt(time, 0).single().unwrap_or_else(Utc::now);
                records.push(BlameRecord { commit: current_sha.clone(), email, name, timestamp });
            }
        }
    }

    records
}

/// The commit header line is `<40 hex sha> <orig-line> <final-line>[ <group-size>]`.
fn sha_header(line: &str) -> Option<&str> {
    let sha = line.split(' ').next()?;
    if sha.len() == 40 && sha.bytes().all(|b| b.is_ascii_hexdigit()) {
        Some(sha)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa 1 1 2
author Alice Smith
author-mail <alice@example.com>
author-time 1700000000
author-tz +0000
committer Alice Smith
committer-mail <alice@example.com>
committer-time 1700000000
committer-tz +0000
summary Initial commit
filename src/lib.rs
\tfn main() {
aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa 2 2
\t    println!(\"hi\");
bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb 1 3 1
author Bob Jones
author-mail <bob@example.com>
author-time 1710000000
author-tz +0000
committer Bob Jones
committer-mail <bob@example.com>
committer-time 1710000000
committer-tz +0000
summary Tweak
filename src/lib.rs
\t}
";

    #[test]
    fn parses_repeated_and_fresh_headers() {
        let records = parse_porcelain(SAMPLE);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].email, "alice@example.com");
        assert_eq!(records[1].email, "alice@example.com");
        assert_eq!(records[1].commit, records[0].commit);
        assert_eq!(records[2].email, "bob@example.com");
    }

    #[test]
    fn sha_header_rejects_non_hex() {
        assert!(sha_header("author Alice").is_none());
        assert!(sha_header("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa 1 1 2").is_some());
    }
}
