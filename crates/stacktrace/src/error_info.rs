//! Error type/message extraction, grounded on `_extract_error_info`.

use regex::Regex;

#[must_use]
pub fn extract(text: &str, pattern: &Regex) -> (String, String) {
    pattern
        .captures(text)
        .map(|caps| {
            let error_type = caps.get(1).map_or("", |m| m.as_str()).to_string();
            let error_message = caps.get(2).map_or(String::new(), |m| m.as_str().to_string());
            (error_type, error_message)
        })
        .unwrap_or_else(|| ("UnknownError".to_string(), "No error message found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_python_style_error() {
        let re = Regex::new(r"(?m)^(\w+(?:Error|Exception)): (.+)$").unwrap();
        let (t, m) = extract("Traceback...\nValueError: bad input\n", &re);
        assert_eq!(t, "ValueError");
        assert_eq!(m, "bad input");
    }

    #[test]
    fn falls_back_when_no_match() {
        let re = Regex::new(r"(?m)^(\w+(?:Error|Exception)): (.+)$").unwrap();
        let (t, m) = extract("nothing relevant", &re);
        assert_eq!(t, "UnknownError");
        assert_eq!(m, "No error message found");
    }
}
