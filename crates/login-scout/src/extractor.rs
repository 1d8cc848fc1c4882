//! Login-field classification over parsed HTML.
//!
//! Every `<input>` in the document is visited once, in document order, and
//! assigned at most one [`FieldType`]. The password rule is checked first, so
//! an input matching both rules is reported as a password field only.
//!
//! The entry point is synchronous and pure. The parsed tree is dropped
//! before it returns, so callers can hold the result across `.await`.

use crate::types::{ExtractionResult, FieldType, LoginElement};
use scraper::{ElementRef, Html, Selector};

/// Lowercased substrings that mark an identity field.
const IDENTITY_HINTS: &[&str] = &["username", "user", "email", "e-mail", "login"];

/// Attributes searched for [`IDENTITY_HINTS`].
const IDENTITY_ATTRS: &[&str] = &["type", "name", "id", "autocomplete", "placeholder"];

/// Input types eligible for the username rule. An absent or empty `type`
/// behaves as `text`.
const TEXT_LIKE_TYPES: &[&str] = &["text", "email"];

/// Find username and password inputs in `html`.
///
/// Never fails: markup the parser cannot make sense of simply yields an
/// empty result.
pub fn extract_login_elements(url: &str, html: &str) -> ExtractionResult {
    let document = Html::parse_document(html);

    let input_sel = match Selector::parse("input") {
        Ok(s) => s,
        Err(_) => return ExtractionResult::new(url, Vec::new()),
    };

    let elements = document
        .select(&input_sel)
        .filter_map(|el| {
            classify(&el).map(|field_type| LoginElement {
                field_type,
                html_snippet: el.html(),
            })
        })
        .collect();

    ExtractionResult::new(url, elements)
}

/// Classify one input, password rule first.
fn classify(el: &ElementRef<'_>) -> Option<FieldType> {
    if is_password(el) {
        Some(FieldType::Password)
    } else if is_username(el) {
        Some(FieldType::Username)
    } else {
        None
    }
}

fn is_password(el: &ElementRef<'_>) -> bool {
    let input_type = attr_lower(el, "type");
    if input_type.as_deref().map(str::trim) == Some("password") {
        return true;
    }

    attr_lower(el, "autocomplete")
        .is_some_and(|ac| ac.split_whitespace().any(|token| token == "current-password"))
}

fn is_username(el: &ElementRef<'_>) -> bool {
    let text_like = match attr_lower(el, "type") {
        None => true,
        Some(t) => {
            let t = t.trim();
            t.is_empty() || TEXT_LIKE_TYPES.contains(&t)
        }
    };
    if !text_like {
        return false;
    }

    IDENTITY_ATTRS.iter().any(|attr| {
        attr_lower(el, attr).is_some_and(|value| IDENTITY_HINTS.iter().any(|hint| value.contains(hint)))
    })
}

fn attr_lower(el: &ElementRef<'_>, name: &str) -> Option<String> {
    el.value().attr(name).map(str::to_ascii_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.com/login";

    fn types(result: &ExtractionResult) -> Vec<FieldType> {
        result.elements().iter().map(|e| e.field_type).collect()
    }

    #[test]
    fn test_password_by_type() {
        let result = extract_login_elements(URL, r#"<input type="password" name="pass">"#);
        assert_eq!(result.count(), 1);
        assert_eq!(result.elements()[0].field_type, FieldType::Password);
        assert_eq!(
            result.elements()[0].html_snippet,
            r#"<input type="password" name="pass">"#
        );
    }

    #[test]
    fn test_password_by_autocomplete() {
        let html = r#"<input type="text" autocomplete="section-a current-password" name="pw">"#;
        let result = extract_login_elements(URL, html);
        assert_eq!(types(&result), vec![FieldType::Password]);
    }

    #[test]
    fn test_username_variants() {
        let html = r#"
            <form>
              <input type="email" id="user-email">
              <input name="LoginName">
              <input type="text" placeholder="E-mail address">
              <input type="text" autocomplete="username">
              <input type="text" name="search">
            </form>"#;
        let result = extract_login_elements(URL, html);
        assert_eq!(result.count(), 4);
        assert!(result
            .elements()
            .iter()
            .all(|e| e.field_type == FieldType::Username));
    }

    #[test]
    fn test_username_rule_skips_non_text_inputs() {
        let html = r#"
            <input type="hidden" name="username" value="bob">
            <input type="checkbox" name="remember_user">
            <input type="submit" value="Login" id="login-button">"#;
        let result = extract_login_elements(URL, html);
        assert!(result.is_empty());
    }

    #[test]
    fn test_one_element_per_node_password_wins() {
        // Matches the username hints too, but is only reported once.
        let html = r#"<input type="password" name="user_password" id="login-pass">"#;
        let result = extract_login_elements(URL, html);
        assert_eq!(types(&result), vec![FieldType::Password]);
    }

    #[test]
    fn test_document_order_preserved() {
        let html = r#"
            <input type="password" name="pass">
            <div><input type="text" name="username"></div>
            <input type="password" name="confirm">"#;
        let result = extract_login_elements(URL, html);
        assert_eq!(
            types(&result),
            vec![FieldType::Password, FieldType::Username, FieldType::Password]
        );
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let html = r#"<form><input name="email"><input type="password"></form>"#;
        let first = extract_login_elements(URL, html);
        let second = extract_login_elements(URL, html);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_snippet_keeps_source_attribute_order() {
        let html = r#"<form>
            <input type="email" name="login" id="user-email" autocomplete="username" placeholder="Email">
            <input type="password" name="pass" id="pw" placeholder="Password">
        </form>"#;
        let expected = vec![
            r#"<input type="email" name="login" id="user-email" autocomplete="username" placeholder="Email">"#,
            r#"<input type="password" name="pass" id="pw" placeholder="Password">"#,
        ];

        let mut seen = std::collections::HashSet::new();
        for _ in 0..50 {
            let result = extract_login_elements(URL, html);
            let snippets: Vec<&str> = result.elements().iter().map(|e| e.html_snippet.as_str()).collect();
            assert_eq!(snippets, expected);
            seen.insert(serde_json::to_string(&result).unwrap());
        }
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn test_malformed_html_yields_nothing() {
        for html in [
            "",
            "<html><body><form><input type=\"pass",
            "<<<>>><div <p </",
            "\u{0}\u{fffd}<input",
            "<input type=",
        ] {
            let result = extract_login_elements(URL, html);
            assert_eq!(result.count(), 0, "{html:?}");
        }
    }

    #[test]
    fn test_uppercase_markup() {
        let html = r#"<INPUT TYPE="PASSWORD" NAME="Pass"><INPUT TYPE="EMAIL">"#;
        let result = extract_login_elements(URL, html);
        assert_eq!(types(&result), vec![FieldType::Password, FieldType::Username]);
    }
}
