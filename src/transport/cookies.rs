//! Session cookie accumulation across the login handshake.
//!
//! The portal issues its session id on the anonymous GET and may add more
//! cookies on the credential POST. Values are only ever appended.

use std::fmt;

use reqwest::header::{HeaderMap, SET_COOKIE};

use crate::security::redact_cookie;

/// Cookie string sent back to the portal, e.g. `ASPSESSIONID=...; auth=1`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SessionCookie(String);

impl SessionCookie {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append cookie pairs, separated by `; `.
    pub fn merge(&mut self, pairs: &str) {
        if pairs.is_empty() {
            return;
        }
        if self.0.is_empty() {
            self.0 = pairs.to_string();
        } else {
            self.0 = format!("{}; {}", self.0, pairs);
        }
    }

    /// Merge every `Set-Cookie` header of a response.
    pub fn merge_headers(&mut self, headers: &HeaderMap) {
        let values: Vec<&str> = headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        self.merge(&cookie_pairs(&values.join(", ")));
    }
}

impl From<&str> for SessionCookie {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Debug for SessionCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionCookie")
            .field(&redact_cookie(&self.0))
            .finish()
    }
}

/// Reduce a (possibly comma-folded) `Set-Cookie` value to `name=value` pairs
/// joined with `; `.
///
/// Each comma-separated piece contributes the text before its first `;`.
/// Pieces without `=` are the tail of an `Expires=Wed, 21 Oct ...`
/// attribute split on its comma and are dropped.
pub fn cookie_pairs(set_cookie: &str) -> String {
    set_cookie
        .split(',')
        .filter_map(|piece| piece.split(';').next())
        .map(str::trim)
        .filter(|pair| !pair.is_empty() && pair.contains('='))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_cookie_pairs_single() {
        assert_eq!(
            cookie_pairs("ASPSESSIONIDQQ=ABCDEF; path=/"),
            "ASPSESSIONIDQQ=ABCDEF"
        );
    }

    #[test]
    fn test_cookie_pairs_folded() {
        assert_eq!(
            cookie_pairs("a=1; path=/, b=2; HttpOnly"),
            "a=1; b=2"
        );
    }

    #[test]
    fn test_cookie_pairs_drops_expires_fragment() {
        assert_eq!(
            cookie_pairs("sid=xyz; Expires=Wed, 21 Oct 2015 07:28:00 GMT; Path=/"),
            "sid=xyz"
        );
    }

    #[test]
    fn test_cookie_pairs_empty() {
        assert_eq!(cookie_pairs(""), "");
        assert_eq!(cookie_pairs(" ; path=/"), "");
    }

    #[test]
    fn test_merge_appends_never_replaces() {
        let mut cookie = SessionCookie::new();
        cookie.merge("a=1");
        cookie.merge("");
        cookie.merge("b=2; c=3");
        assert_eq!(cookie.as_str(), "a=1; b=2; c=3");
    }

    #[test]
    fn test_merge_headers_reads_every_set_cookie() {
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("a=1; path=/"));
        headers.append(SET_COOKIE, HeaderValue::from_static("b=2; HttpOnly"));

        let mut cookie = SessionCookie::from("seed=0");
        cookie.merge_headers(&headers);
        assert_eq!(cookie.as_str(), "seed=0; a=1; b=2");
    }

    #[test]
    fn test_debug_redacts_values() {
        let cookie = SessionCookie::from("sid=secret");
        assert_eq!(format!("{:?}", cookie), "SessionCookie(\"sid=***\")");
    }
}
