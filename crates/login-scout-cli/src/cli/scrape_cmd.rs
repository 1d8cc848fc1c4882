//! `login-scout scrape <url>` — find login fields on one page and save them.

use crate::cli::output;
use anyhow::{Context, Result};
use chrono::Utc;
use login_scout::config::resolve_output_path;
use login_scout::{validate_url, ExtractionResult, PersistedRecord, RecordStore, Scout, ScoutConfig};

/// Characters of markup shown per element in the summary.
const PREVIEW_CHARS: usize = 100;

/// Run the scrape command with a Chromium-backed scout.
pub async fn run(
    url: &str,
    force_dynamic: bool,
    output_file: Option<&str>,
    save: bool,
    config: &ScoutConfig,
) -> Result<()> {
    let scout = Scout::from_config(config)?;
    let store = save.then(|| RecordStore::new(resolve_output_path(output_file)));
    execute(&scout, url, force_dynamic, store.as_ref()).await?;
    Ok(())
}

/// Scrape `url`, append one record per element to `store`, and report.
pub async fn execute(
    scout: &Scout,
    url: &str,
    force_dynamic: bool,
    store: Option<&RecordStore>,
) -> Result<ExtractionResult> {
    let human = !output::is_json() && !output::is_quiet();

    if human {
        // Validation is repeated inside `scrape`; this only echoes the target.
        if let Ok(valid) = validate_url(url) {
            println!("Fetching content from: {valid}");
        }
    }

    let result = scout.scrape(url, force_dynamic).await?;

    if human {
        println!("Found {} login element(s)", result.count());
    }

    let records = PersistedRecord::from_result(&result, Utc::now());
    if let Some(store) = store {
        store
            .append(&records)
            .with_context(|| format!("failed to save results to {}", store.path().display()))?;
        if human {
            println!("Data saved to {}", store.path().display());
        }
    }

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "success": true,
            "data": &result,
        }));
    } else if human {
        println!("\nExtracted elements:");
        for record in &records {
            println!(
                "- {}: {}",
                record.field_type,
                output::preview(&record.extracted_html, PREVIEW_CHARS)
            );
        }
    }

    Ok(result)
}
