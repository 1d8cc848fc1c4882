//! URL validation, run before any network activity.

use crate::error::ScoutError;
use url::Url;

/// Validate `input` as an absolute http(s) URL.
///
/// Surrounding whitespace is ignored, and input without a scheme separator
/// gets `https://` prepended. Anything that then fails to parse, uses another
/// scheme, or has no host is rejected as [`ScoutError::InvalidUrl`].
pub fn validate_url(input: &str) -> Result<Url, ScoutError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ScoutError::InvalidUrl(input.to_string()));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let parsed = Url::parse(&candidate).map_err(|_| ScoutError::InvalidUrl(candidate.clone()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ScoutError::InvalidUrl(candidate));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(ScoutError::InvalidUrl(candidate));
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_accepts_http_and_https() {
        for input in [
            "http://example.com",
            "https://example.com/login?next=%2F",
            "https://sub.example.co.uk:8443/a/b",
            "http://127.0.0.1:3000/signin",
        ] {
            let url = validate_url(input).unwrap_or_else(|e| panic!("{input}: {e}"));
            assert!(matches!(url.scheme(), "http" | "https"));
        }
    }

    #[test]
    fn test_missing_scheme_defaults_to_https() {
        let url = validate_url("example.com/login").unwrap();
        assert_eq!(url.as_str(), "https://example.com/login");

        let url = validate_url("  localhost:8080  ").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.port(), Some(8080));
    }

    #[test]
    fn test_rejects_malformed_and_foreign_schemes() {
        for input in [
            "",
            "   ",
            "https://",
            "http://",
            "ftp://example.com/file",
            "file:///etc/passwd",
            "not a url",
            "https://exa mple.com",
            "://missing-scheme",
        ] {
            let err = validate_url(input).expect_err(input);
            assert_eq!(err.code(), ErrorCode::InvalidUrl, "{input}");
        }
    }
}
