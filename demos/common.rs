//! Shared utilities for demos.
//!
//! Provides common functionality used across all demos:
//! - Command-line argument parsing
//! - Logging initialization
//! - Target attachment

#![allow(dead_code)]

// ============================================================================
// Imports
// ============================================================================

use rdbg::{Client, Result};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Types
// ============================================================================

/// Command-line arguments for demos.
#[derive(Debug, Clone)]
pub struct Args {
    pub debug: bool,
    pub host: String,
    pub port: u16,
    /// Arguments that are not flags, in order.
    pub positional: Vec<String>,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse() -> Self {
        let mut parsed = Self {
            debug: false,
            host: "localhost".to_string(),
            port: 9222,
            positional: Vec::new(),
        };

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--debug" => parsed.debug = true,
                "--host" => {
                    if let Some(host) = args.next() {
                        parsed.host = host;
                    }
                }
                "--port" => {
                    if let Some(port) = args.next().and_then(|p| p.parse().ok()) {
                        parsed.port = port;
                    }
                }
                _ => parsed.positional.push(arg),
            }
        }

        parsed
    }
}

// ============================================================================
// Functions
// ============================================================================

/// Initialize tracing/logging.
pub fn init_logging(debug: bool) {
    let filter = if debug { "rdbg=debug" } else { "rdbg=info" };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();
}

/// Attach to the first page target at the configured endpoint.
pub async fn attach(args: &Args) -> Result<Client> {
    println!("[Setup] Attaching to {}:{}...", args.host, args.port);

    let client = Client::builder()
        .host(args.host.clone())
        .port(args.port)
        .attach_first()
        .await?;

    println!("        ✓ Attached\n");
    Ok(client)
}
