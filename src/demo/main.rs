/**
 * Toggle Demo - Entry Point
 *
 * Simulates a user hammering a follow button against a slow server and
 * prints how the toggle queue serializes and coalesces the requests.
 *
 * Environment:
 *   RUST_LOG               tracing filter (default "info")
 *   DEMO_LATENCY_MS        simulated server latency (default 150)
 *   XFSOCIAL_SERVER_URL    server reported in the log
 *   XFSOCIAL_ACCESS_TOKEN  accepted but unused; no real requests are sent
 *
 * Settings are read from the user config file when it exists.
 */
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use xfsocial::client::relationship::RelationshipClient;
use xfsocial::client::toggle::ToggleMutationQueue;
use xfsocial::shared::{AppConfig, MutationError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let latency = std::env::var("DEMO_LATENCY_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(150);
    tracing::info!("[DEMO] Simulated server latency: {}ms", latency);

    let client = RelationshipClient::new(AppConfig::discover()?);
    let repo = client
        .config()
        .repo_did
        .clone()
        .unwrap_or_else(|| "did:plc:alice".to_string());
    tracing::info!(
        "[DEMO] Simulating {} for repo {}",
        client.config().server_url(),
        repo
    );

    let next_rkey = Arc::new(AtomicU64::new(1));
    let queue = ToggleMutationQueue::builder()
        .label("follow:did:plc:bob")
        .initial_state(None::<String>)
        .run_mutation(move |previous: Option<String>, follow: bool| {
            let next_rkey = Arc::clone(&next_rkey);
            let repo = repo.clone();
            async move {
                tracing::info!("[DEMO] Server call: previous={:?}, follow={}", previous, follow);
                tokio::time::sleep(Duration::from_millis(latency)).await;
                let state = if follow {
                    let rkey = next_rkey.fetch_add(1, Ordering::SeqCst);
                    Some(format!("at://{}/app.bsky.graph.follow/{}", repo, rkey))
                } else {
                    None
                };
                Ok::<_, MutationError>(state)
            }
        })
        .on_success(|state: &Option<String>| {
            tracing::info!("[DEMO] Drain finished, confirmed={:?}", state);
        })
        .build()?;

    // Five taps, each 20ms apart, all while the first request is in flight.
    let mut handles = Vec::new();
    let mut following = false;
    for tap in 1..=5 {
        following = !following;
        tracing::info!("[DEMO] Tap {}: follow={}", tap, following);
        handles.push(queue.queue_toggle(following));
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    for (tap, handle) in handles.into_iter().enumerate() {
        let outcome = handle.await?;
        println!("tap {} settled with {:?}", tap + 1, outcome);
    }

    let stats = queue.stats();
    println!(
        "final state: {:?} ({} mutations, {} coalesced, {} superseded, {} drains)",
        queue.confirmed_state(),
        stats.mutations_applied,
        stats.coalesced,
        stats.superseded,
        stats.drains
    );
    Ok(())
}
