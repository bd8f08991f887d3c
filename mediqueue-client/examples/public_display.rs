//! Public queue display
//!
//! Polls the backend and renders one row per area: current turn,
//! waiting count, and the short queue behind it.
//!
//! Usage: cargo run --example public_display -- http://localhost:8080

use mediqueue_client::{
    ClientConfig, FeedConfig, HttpClient, MemoryCredentialStore, TurnFeed, project,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let base_url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://localhost:8080".to_string());

    let store = Arc::new(MemoryCredentialStore::new());
    let client = HttpClient::new(&ClientConfig::new(&base_url), store);

    let areas = client.basic_areas().await?;
    println!("Areas: {}", areas.len());

    let feed = TurnFeed::spawn(client, FeedConfig::default());
    let mut updates = feed.subscribe();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();

                print!("\x1B[2J\x1B[H");
                println!("======== MediQueue ========");
                if let Some(ref error) = snapshot.error {
                    println!("[!] {} (mostrando datos anteriores)", error);
                }

                for row in project(&areas, &snapshot.turns) {
                    match row.current_label() {
                        Some(label) => println!(
                            "{:<20} turno {:<6} en espera: {}",
                            row.area.name, label, row.waiting_count
                        ),
                        None => println!("{:<20} sin turnos activos", row.area.name),
                    }
                }

                if let Some(next) = &snapshot.next_turn {
                    println!("---------------------------");
                    println!("Próximo turno: {}", next.number);
                }
            }
        }
    }

    feed.stop().await;
    Ok(())
}
