//! Redaction of session secrets before they reach log output.
//!
//! Cookie values are bearer credentials for the portal session; only the
//! cookie names are ever logged.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `name=value` pair inside a Cookie / Set-Cookie string
    static ref COOKIE_PAIR: Regex = Regex::new(r"([^=;,\s]+)=([^;,]*)").unwrap();
}

const MASK: &str = "***";

/// Mask every cookie value, keeping names: `A=1; B=2` -> `A=***; B=***`.
pub fn redact_cookie(cookie: &str) -> String {
    COOKIE_PAIR
        .replace_all(cookie, |caps: &regex::Captures| {
            format!("{}={}", &caps[1], MASK)
        })
        .into_owned()
}

/// Cookie names only, for compact log lines.
pub fn cookie_names(cookie: &str) -> Vec<String> {
    COOKIE_PAIR
        .captures_iter(cookie)
        .map(|caps| caps[1].to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_cookie() {
        assert_eq!(
            redact_cookie("ASPSESSIONIDQA=KJHGF; auth=1"),
            "ASPSESSIONIDQA=***; auth=***"
        );
        assert_eq!(redact_cookie(""), "");
    }

    #[test]
    fn test_cookie_names() {
        assert_eq!(cookie_names("a=1; b=2"), vec!["a", "b"]);
        assert!(cookie_names("").is_empty());
    }
}
