//! `scrape` command persistence with fake fetch tiers.

use async_trait::async_trait;
use login_scout::{
    ErrorCode, FetchMethod, FetchedPage, PageSource, PersistedRecord, RecordStore, Scout,
    ScoutError,
};
use login_scout_cli::cli::scrape_cmd;
use std::sync::Arc;
use url::Url;

struct CannedTier {
    method: FetchMethod,
    html: &'static str,
}

#[async_trait]
impl PageSource for CannedTier {
    fn method(&self) -> FetchMethod {
        self.method
    }

    async fn fetch(&self, url: &Url) -> Result<FetchedPage, ScoutError> {
        Ok(FetchedPage {
            url: url.to_string(),
            html: self.html.to_string(),
            method: self.method,
        })
    }
}

fn scout(static_html: &'static str, dynamic_html: &'static str) -> Scout {
    Scout::new(
        Arc::new(CannedTier {
            method: FetchMethod::Static,
            html: static_html,
        }),
        Arc::new(CannedTier {
            method: FetchMethod::Dynamic,
            html: dynamic_html,
        }),
    )
}

#[tokio::test]
async fn appends_one_record_per_element() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::new(dir.path().join("login_elements.json"));
    let scout = scout(
        r#"<input name="username"><input type="password" name="pass">"#,
        "",
    );

    let result = scrape_cmd::execute(&scout, "https://example.com/login", false, Some(&store))
        .await
        .unwrap();
    assert_eq!(result.count(), 2);

    scrape_cmd::execute(&scout, "https://example.com/login", false, Some(&store))
        .await
        .unwrap();

    let raw = std::fs::read_to_string(store.path()).unwrap();
    let records: Vec<PersistedRecord> = serde_json::from_str(&raw).unwrap();
    assert_eq!(records.len(), 4);
    assert_eq!(records[0].field_type, "username");
    assert_eq!(records[1].field_type, "password");
    assert_eq!(records[0].url, "https://example.com/login");
    assert_eq!(records[0].timestamp, records[1].timestamp);
    assert!(chrono::DateTime::parse_from_rfc3339(&records[2].timestamp).is_ok());
}

#[tokio::test]
async fn failure_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::new(dir.path().join("login_elements.json"));
    let scout = scout("<p>static</p>", "<p>rendered</p>");

    let err = scrape_cmd::execute(&scout, "https://example.com", false, Some(&store))
        .await
        .unwrap_err();

    let scout_err = err.downcast_ref::<ScoutError>().expect("scout error");
    assert_eq!(scout_err.code(), ErrorCode::NoLoginElements);
    assert!(!store.path().exists());
}

#[tokio::test]
async fn runs_without_store() {
    let scout = scout(r#"<input type="password">"#, "");

    let result = scrape_cmd::execute(&scout, "https://example.com", false, None)
        .await
        .unwrap();

    assert_eq!(result.count(), 1);
}
