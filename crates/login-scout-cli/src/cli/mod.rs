//! CLI subcommand implementations for the login-scout binary.

pub mod doctor;
pub mod output;
pub mod scrape_cmd;
pub mod serve;
