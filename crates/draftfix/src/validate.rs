use crate::types::DraftFix;

/// All constraints must hold: line changes under 20, non-empty fixed
/// content, an explanation of at least 10 characters, and content that
/// actually differs from the original once whitespace is normalized.
#[must_use]
pub fn constraints_hold(fix: &DraftFix) -> bool {
    if fix.line_changes >= 20 {
        return false;
    }
    if fix.fixed_content.trim().is_empty() {
        return false;
    }
    if fix.explanation.trim().len() < 10 {
        return false;
    }
    if fix.fixed_content.trim() == fix.original_content.trim() {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> DraftFix {
        DraftFix {
            file_path: "src/lib.rs".to_string(),
            original_content: "fn main() {}".to_string(),
            fixed_content: "fn main() { println!(\"hi\"); }".to_string(),
            line_changes: 1,
            explanation: "added a greeting".to_string(),
            confidence: 0.9,
        }
    }

    #[test]
    fn accepts_well_formed_fix() {
        assert!(constraints_hold(&base()));
    }

    #[test]
    fn rejects_too_many_line_changes() {
        let mut fix = base();
        fix.line_changes = 20;
        assert!(!constraints_hold(&fix));
    }

    #[test]
    fn rejects_empty_content() {
        let mut fix = base();
        fix.fixed_content = "   ".to_string();
        assert!(!constraints_hold(&fix));
    }

    #[test]
    fn rejects_short_explanation() {
        let mut fix = base();
        fix.explanation = "ok".to_string();
        assert!(!constraints_hold(&fix));
    }

    #[test]
    fn rejects_unchanged_content() {
        let mut fix = base();
        fix.fixed_content = fix.original_content.clone();
        assert!(!constraints_hold(&fix));
    }
}
