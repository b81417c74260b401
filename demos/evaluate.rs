//! Expression evaluation.
//!
//! Demonstrates:
//! - Listing debug targets
//! - Attaching to the first page
//! - Evaluating expressions by value and by handle
//! - Listing the properties of a remote object
//!
//! Usage:
//!   cargo run --example evaluate
//!   cargo run --example evaluate -- "location.href"
//!   cargo run --example evaluate -- --port 9229 --debug

mod common;

// ============================================================================
// Imports
// ============================================================================

use common::Args;
use rdbg::{Client, EvaluateOptions, GetPropertiesOptions, Result};

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    let args = Args::parse();
    common::init_logging(args.debug);

    if let Err(e) = run(args).await {
        eprintln!("\n[ERROR] {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    println!("=== Evaluate ===\n");

    // ========================================================================
    // Targets
    // ========================================================================

    println!("[1] Listing targets...");
    let targets = Client::builder()
        .host(args.host.clone())
        .port(args.port)
        .list_targets()
        .await?;
    for target in &targets {
        let marker = if target.is_attachable() { "✓" } else { "-" };
        println!("    {marker} [{}] {} {}", target.target_type, target.id, target.url);
    }
    println!();

    let client = common::attach(&args).await?;
    let runtime = client.runtime();
    runtime.enable().await?;

    // ========================================================================
    // By value
    // ========================================================================

    let expression = args
        .positional
        .first()
        .cloned()
        .unwrap_or_else(|| "document.title".to_string());

    println!("[2] Evaluating `{expression}`...");
    let result = runtime
        .evaluate(&expression, EvaluateOptions::new().with_return_by_value())
        .await?;

    if result.threw() {
        let text = result
            .exception_details
            .map(|d| d.text)
            .unwrap_or_default();
        println!("    ✗ Threw: {text}\n");
    } else {
        println!("    ✓ {:?}\n", result.result.value);
    }

    // ========================================================================
    // By handle
    // ========================================================================

    println!("[3] Inspecting `navigator`...");
    let result = runtime
        .evaluate("navigator", EvaluateOptions::new().with_object_group("demo"))
        .await?;

    if let Some(object_id) = result.result.object_id {
        let properties = runtime
            .get_properties(&object_id, GetPropertiesOptions::default())
            .await?;
        for property in properties.result.iter().take(10) {
            let description = property
                .value
                .as_ref()
                .and_then(|v| v.description.clone())
                .unwrap_or_default();
            println!("    {} = {}", property.name, description);
        }
        runtime.release_object_group("demo").await?;
    }

    client.close().await;
    println!("\n=== Done ===");
    Ok(())
}
