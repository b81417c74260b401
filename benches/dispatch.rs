//! Dispatch benchmark suite.
//!
//! Benchmarks the hot paths of the client:
//! - Inbound message classification
//! - Script registry churn
//! - Request round trips over an in-memory WebSocket, at several fan-outs
//!
//! Run with: cargo bench --bench dispatch
//! Results saved to: target/criterion/

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use futures_util::{SinkExt, StreamExt};
use rdbg::protocol::Incoming;
use rdbg::{ClientOptions, Connection, ScriptMetadata, ScriptRegistry};
use serde_json::{Value, json};
use tokio::io::duplex;
use tokio::runtime::Runtime;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::Role;

// ============================================================================
// Benchmark Parameters
// ============================================================================

const FAN_OUTS: &[usize] = &[1, 16, 64];
const SCRIPT_COUNTS: &[usize] = &[100, 1000];

// ============================================================================
// Benchmark: Message Classification
// ============================================================================

fn bench_incoming_parse(c: &mut Criterion) {
    let response = json!({ "id": 42, "result": { "result": { "type": "number", "value": 2 } } })
        .to_string();
    let event = json!({
        "method": "Debugger.scriptParsed",
        "params": { "scriptId": "17", "url": "http://localhost/app.js", "startLine": 0, "endLine": 120 }
    })
    .to_string();

    let mut group = c.benchmark_group("incoming_parse");
    group.bench_function("response", |b| {
        b.iter(|| Incoming::parse(black_box(&response)))
    });
    group.bench_function("event", |b| b.iter(|| Incoming::parse(black_box(&event))));
    group.finish();
}

// ============================================================================
// Benchmark: Script Registry
// ============================================================================

fn script(id: usize, url: usize) -> ScriptMetadata {
    serde_json::from_value(json!({
        "scriptId": id.to_string(),
        "url": format!("http://localhost/s{url}.js")
    }))
    .expect("script metadata")
}

fn bench_registry(c: &mut Criterion) {
    let mut group = c.benchmark_group("script_registry");

    for &count in SCRIPT_COUNTS {
        // Every URL parsed twice: half the inserts replace an entry
        let scripts: Vec<_> = (0..count * 2).map(|n| script(n, n % count)).collect();

        group.bench_with_input(BenchmarkId::new("reparse", count), &scripts, |b, scripts| {
            b.iter(|| {
                let mut registry = ScriptRegistry::new();
                for meta in scripts {
                    registry.on_parsed(meta.clone());
                }
                black_box(registry.len())
            });
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Round Trip
// ============================================================================

/// Connects a client to an in-memory remote that answers every request.
async fn echo_connection() -> Connection {
    let (client_io, remote_io) = duplex(1 << 20);
    let client_ws = WebSocketStream::from_raw_socket(client_io, Role::Client, None).await;
    let mut remote_ws = WebSocketStream::from_raw_socket(remote_io, Role::Server, None).await;

    tokio::spawn(async move {
        while let Some(Ok(message)) = remote_ws.next().await {
            let Message::Text(text) = message else { continue };
            let Ok(request) = serde_json::from_str::<Value>(&text) else { continue };
            let reply = json!({ "id": request["id"], "result": {} }).to_string();
            if remote_ws.send(Message::Text(reply.into())).await.is_err() {
                break;
            }
        }
    });

    let options = ClientOptions::new().with_max_pending_requests(1024);
    Connection::new(client_ws, options)
}

fn bench_round_trip(c: &mut Criterion) {
    let rt = Runtime::new().expect("runtime");
    let connection = rt.block_on(echo_connection());

    let mut group = c.benchmark_group("round_trip");

    for &fan_out in FAN_OUTS {
        group.bench_with_input(BenchmarkId::new("concurrent", fan_out), &fan_out, |b, &n| {
            b.to_async(&rt).iter(|| {
                let connection = connection.clone();
                async move {
                    let pending: Vec<_> = (0..n)
                        .map(|_| connection.request("Runtime.evaluate", json!({ "expression": "1" })))
                        .collect::<Result<_, _>>()
                        .expect("request");
                    for handle in pending {
                        handle.wait().await.expect("response");
                    }
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_incoming_parse, bench_registry, bench_round_trip);
criterion_main!(benches);
