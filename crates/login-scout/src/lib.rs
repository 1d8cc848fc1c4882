// Copyright 2026 Login Scout Contributors
// SPDX-License-Identifier: Apache-2.0

//! login-scout — locate login form fields on a web page.
//!
//! A page is fetched with a plain HTTP request first. When that fails, or the
//! returned markup holds no login inputs, the page is rendered in a fresh
//! headless Chromium and the rendered DOM is searched instead.

pub mod config;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod renderer;
pub mod scout;
pub mod store;
pub mod types;
pub mod validate;

pub use config::ScoutConfig;
pub use error::{ErrorCode, ErrorInfo, ScoutError};
pub use extractor::extract_login_elements;
pub use fetcher::{PageSource, StaticFetcher};
pub use renderer::DynamicFetcher;
pub use scout::Scout;
pub use store::{RecordStore, StoreError};
pub use types::{ExtractionResult, FetchMethod, FetchedPage, FieldType, LoginElement, PersistedRecord};
pub use validate::validate_url;
