// Copyright 2026 Login Scout Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use login_scout::{ErrorCode, ErrorInfo, ScoutConfig, ScoutError};
use login_scout_cli::cli::{self, output};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "login-scout",
    about = "login-scout — find login form fields on web pages",
    version,
    after_help = "Run 'login-scout <command> --help' for details on each command."
)]
struct Cli {
    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Static fetch timeout in milliseconds
    #[arg(long, global = true)]
    static_timeout_ms: Option<u64>,

    /// Browser render timeout in milliseconds
    #[arg(long, global = true)]
    render_timeout_ms: Option<u64>,

    /// Path to a Chrome/Chromium binary
    #[arg(long, global = true)]
    chromium_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract login elements from a webpage
    Scrape {
        /// URL of the webpage to scrape (https:// is assumed when omitted)
        url: String,
        /// Skip the static fetch and render in a headless browser directly
        #[arg(long)]
        dynamic: bool,
        /// JSON file to append results to (default: login_elements.json)
        #[arg(long, short)]
        output: Option<String>,
        /// Do not write results to disk
        #[arg(long)]
        no_save: bool,
    },
    /// Serve the REST API and browser UI
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to listen on
        #[arg(long, default_value = "8000")]
        port: u16,
    },
    /// Check environment and diagnose issues
    Doctor {
        /// Output file to report on
        #[arg(long, short)]
        output: Option<String>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

impl Cli {
    /// Environment config with command-line overrides applied.
    fn config(&self) -> ScoutConfig {
        let mut config = ScoutConfig::from_env();
        if let Some(ms) = self.static_timeout_ms.filter(|ms| *ms > 0) {
            config.static_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = self.render_timeout_ms.filter(|ms| *ms > 0) {
            config.render_timeout = Duration::from_millis(ms);
        }
        if let Some(path) = &self.chromium_path {
            config.chromium_path = Some(path.clone());
        }
        config
    }
}

fn init_tracing(verbose: bool, quiet: bool) -> Result<()> {
    let default = if verbose {
        "login_scout=debug,login_scout_cli=debug"
    } else if quiet {
        "login_scout=warn,login_scout_cli=warn"
    } else {
        "login_scout=info,login_scout_cli=info"
    };

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    output::set_flags(cli.json, cli.quiet);
    init_tracing(cli.verbose, cli.quiet)?;
    let config = cli.config();

    let result = match &cli.command {
        Commands::Scrape {
            url,
            dynamic,
            output,
            no_save,
        } => cli::scrape_cmd::run(url, *dynamic, output.as_deref(), !no_save, &config).await,
        Commands::Serve { host, port } => cli::serve::run(host, *port, &config).await,
        Commands::Doctor { output } => cli::doctor::run(&config, output.as_deref()).await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "login-scout", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        if output::is_json() {
            let info = match e.downcast_ref::<ScoutError>() {
                Some(scout_err) => ErrorInfo::from(scout_err),
                None => ErrorInfo {
                    error: format!("{e:#}"),
                    error_code: ErrorCode::InternalError,
                },
            };
            output::print_json(&serde_json::json!({
                "success": false,
                "error": info,
            }));
        } else if !output::is_quiet() {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(1);
    }

    result
}
