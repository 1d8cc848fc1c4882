//! Data types shared by the fetch tiers, the extractor and the record store.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which tier produced a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMethod {
    /// Plain HTTP GET; scripts are not executed.
    Static,
    /// Rendered by a headless browser.
    Dynamic,
}

impl fmt::Display for FetchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchMethod::Static => f.write_str("static"),
            FetchMethod::Dynamic => f.write_str("dynamic"),
        }
    }
}

/// HTML successfully retrieved by one of the tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// The URL that was requested.
    pub url: String,
    pub html: String,
    pub method: FetchMethod,
}

/// Classification of a login input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Username,
    Password,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Username => "username",
            FieldType::Password => "password",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One matched `<input>` node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginElement {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Outer markup of the input tag.
    #[serde(rename = "html")]
    pub html_snippet: String,
}

/// Login inputs found on one page, in document order.
///
/// `count` is derived from the element list at construction and cannot
/// drift from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    url: String,
    #[serde(rename = "login_elements")]
    elements: Vec<LoginElement>,
    count: usize,
}

impl ExtractionResult {
    pub fn new(url: impl Into<String>, elements: Vec<LoginElement>) -> Self {
        let count = elements.len();
        Self {
            url: url.into(),
            elements,
            count,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn elements(&self) -> &[LoginElement] {
        &self.elements
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// A row in the CLI's append-only output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedRecord {
    pub url: String,
    pub field_type: String,
    pub extracted_html: String,
    /// ISO-8601 UTC timestamp shared by all records of one invocation.
    pub timestamp: String,
}

impl PersistedRecord {
    /// One record per element, all stamped with `at`.
    pub fn from_result(result: &ExtractionResult, at: DateTime<Utc>) -> Vec<PersistedRecord> {
        let timestamp = at.to_rfc3339_opts(SecondsFormat::Micros, false);
        result
            .elements()
            .iter()
            .map(|el| PersistedRecord {
                url: result.url().to_string(),
                field_type: el.field_type.to_string(),
                extracted_html: el.html_snippet.clone(),
                timestamp: timestamp.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> ExtractionResult {
        ExtractionResult::new(
            "https://example.com/login",
            vec![
                LoginElement {
                    field_type: FieldType::Username,
                    html_snippet: r#"<input type="email" id="user-email">"#.to_string(),
                },
                LoginElement {
                    field_type: FieldType::Password,
                    html_snippet: r#"<input type="password" name="pass">"#.to_string(),
                },
            ],
        )
    }

    #[test]
    fn test_count_tracks_elements() {
        let result = sample();
        assert_eq!(result.count(), 2);
        assert!(!result.is_empty());
        assert!(ExtractionResult::new("https://example.com", Vec::new()).is_empty());
    }

    #[test]
    fn test_extraction_result_wire_shape() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["url"], "https://example.com/login");
        assert_eq!(value["count"], 2);
        assert_eq!(value["login_elements"][0]["type"], "username");
        assert_eq!(value["login_elements"][1]["type"], "password");
        assert_eq!(
            value["login_elements"][1]["html"],
            r#"<input type="password" name="pass">"#
        );
    }

    #[test]
    fn test_records_share_timestamp() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap();
        let records = PersistedRecord::from_result(&sample(), at);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].field_type, "username");
        assert_eq!(records[1].field_type, "password");
        assert_eq!(records[0].timestamp, "2026-03-01T12:30:00.000000+00:00");
        assert_eq!(records[0].timestamp, records[1].timestamp);
        assert_eq!(records[1].url, "https://example.com/login");
    }
}
