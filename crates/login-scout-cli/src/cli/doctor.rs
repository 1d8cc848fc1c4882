//! Environment readiness check.

use anyhow::Result;
use login_scout::config::resolve_output_path;
use login_scout::renderer::chromium::find_chromium;
use login_scout::ScoutConfig;

/// Report Chromium availability and the effective configuration.
pub async fn run(config: &ScoutConfig, output_file: Option<&str>) -> Result<()> {
    println!("login-scout doctor");
    println!("==================");
    println!();

    println!("OS:   {}", std::env::consts::OS);
    println!("Arch: {}", std::env::consts::ARCH);
    println!();

    let chromium_path = find_chromium(config.chromium_path.as_deref());
    match &chromium_path {
        Some(path) => println!("[OK] Chromium found: {}", path.display()),
        None => println!(
            "[!!] Chromium NOT found. Script-rendered pages cannot be scraped until it is installed."
        ),
    }

    println!();
    println!("Static timeout: {}ms", config.static_timeout.as_millis());
    println!("Render timeout: {}ms", config.render_timeout.as_millis());
    println!("Settle budget:  {}ms", config.settle_timeout.as_millis());
    println!("Output file:    {}", resolve_output_path(output_file).display());

    println!();
    if chromium_path.is_some() {
        println!("Status: READY");
    } else {
        println!("Status: STATIC ONLY");
        println!("  Install Chrome/Chromium or set LOGIN_SCOUT_CHROMIUM_PATH.");
    }

    Ok(())
}
