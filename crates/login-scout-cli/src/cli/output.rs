//! Output mode flags shared by all subcommands.

use serde::Serialize;

const ENV_JSON: &str = "LOGIN_SCOUT_JSON";
const ENV_QUIET: &str = "LOGIN_SCOUT_QUIET";

/// Record the global output flags for the rest of the process.
pub fn set_flags(json: bool, quiet: bool) {
    if json {
        std::env::set_var(ENV_JSON, "1");
    }
    if quiet {
        std::env::set_var(ENV_QUIET, "1");
    }
}

/// Whether machine-readable JSON output was requested.
pub fn is_json() -> bool {
    std::env::var(ENV_JSON).is_ok_and(|v| v == "1")
}

/// Whether non-essential output should be suppressed.
pub fn is_quiet() -> bool {
    std::env::var(ENV_QUIET).is_ok_and(|v| v == "1")
}

/// Pretty-print a value as JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("  Error: failed to encode output: {e}"),
    }
}

/// First `max` characters of `s`, with `...` appended when cut.
pub fn preview(s: &str, max: usize) -> String {
    let mut out: String = s.chars().take(max).collect();
    if s.chars().count() > max {
        out.push_str("...");
    }
    out
}
