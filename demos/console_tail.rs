//! Console tail.
//!
//! Demonstrates:
//! - Enabling the Console domain
//! - Streaming console messages as they are logged
//! - Watching connection-level events
//!
//! Usage:
//!   cargo run --example console_tail
//!   cargo run --example console_tail -- --debug

mod common;

// ============================================================================
// Imports
// ============================================================================

use common::Args;
use rdbg::{ConsoleEvent, ConnectionEvent, Result};

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
    println!("=== Console Tail ===\n");

    let client = common::attach(&args).await?;
    let console = client.console();

    // Subscribe before enabling: the replay of earlier messages follows enable
    let mut events = console.events();
    let mut connection_events = client.connection_events();
    console.enable().await?;

    println!("Tailing console (Ctrl+C to exit)...\n");

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(ConsoleEvent::MessageAdded(message)) => {
                    println!("[{:>7}] {}", message.level, message.text);
                }
                Some(ConsoleEvent::MessagesCleared) => println!("--- console cleared ---"),
                None => break,
            },

            event = connection_events.recv() => {
                if let Ok(ConnectionEvent::Closed) = event {
                    println!("\n[Closed] Remote end went away");
                    break;
                }
            }

            _ = tokio::signal::ctrl_c() => {
                client.close().await;
                break;
            }
        }
    }

    println!("\n=== Done ===");
    Ok(())
}
