//! Live script edit.
//!
//! Demonstrates:
//! - Enabling the Debugger and collecting parsed scripts
//! - Replacing a running script's source from a local file
//! - Handling ambiguous and missing file names
//!
//! Usage:
//!   cargo run --example live_edit -- <path/to/app.js>
//!   cargo run --example live_edit -- <path/to/app.js> --port 9229

mod common;

// ============================================================================
// Imports
// ============================================================================

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, bail};
use common::Args;
use rdbg::Error;

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    let args = Args::parse();
    common::init_logging(args.debug);

    if let Err(e) = run(args).await {
        eprintln!("\n[ERROR] {e:#}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    println!("=== Live Edit ===\n");

    let Some(path) = args.positional.first() else {
        bail!("usage: live_edit <path/to/script.js>");
    };
    let source = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let name = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .context("path has no file name")?
        .to_string();

    let client = common::attach(&args).await?;
    let debugger = client.debugger();

    // ========================================================================
    // Collect scripts
    // ========================================================================

    println!("[1] Enabling debugger...");
    debugger.enable().await?;

    // Parse events for existing scripts follow the enable response
    tokio::time::sleep(Duration::from_millis(500)).await;
    println!("    ✓ {} scripts known\n", debugger.scripts().len());

    // ========================================================================
    // Replace source
    // ========================================================================

    println!("[2] Replacing `{name}`...");
    match debugger.set_script_source_by_basename(&name, source).await {
        Ok(result) => match result.exception_details {
            Some(details) => println!("    ✗ Compile error: {}", details.text),
            None => println!("    ✓ Source replaced"),
        },
        Err(Error::AmbiguousScript { count, .. }) => {
            println!("    ✗ {count} scripts are named `{name}`:");
            for script in debugger.scripts_by_basename(&name) {
                println!("      {}", script.url);
            }
        }
        Err(e) => return Err(e).context("setting script source"),
    }

    client.close().await;
    println!("\n=== Done ===");
    Ok(())
}
