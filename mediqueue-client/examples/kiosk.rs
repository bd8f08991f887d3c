//! Self-service kiosk flow on the terminal
//!
//! Walks the acquisition state machine from area selection to the
//! printed ticket. Tickets are spooled as ESC/POS files under
//! ./tickets/ unless PRINTER_ADDR points at a network printer.
//!
//! Usage: cargo run --example kiosk -- http://localhost:8080

use mediqueue_client::acquire::PrinterSink;
use mediqueue_client::{AcquireState, ClientConfig, HttpClient, MemoryCredentialStore, TurnKiosk};
use mediqueue_printer::{FilePrinter, NetworkPrinter, TicketRenderer};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// Owned view of the machine state for one loop iteration
enum Step {
    Select,
    Confirm(String),
    Success {
        label: String,
        office: Option<i32>,
        remaining_secs: u64,
    },
    Cooldown(String),
    Failed(String),
    InFlight,
}

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

    let renderer = TicketRenderer::new(32);
    let mut kiosk = match std::env::var("PRINTER_ADDR") {
        Ok(addr) => {
            let printer = NetworkPrinter::from_addr(&addr)?;
            TurnKiosk::new(client)
                .await?
                .with_receipt_sink(PrinterSink::new(renderer, printer))
        }
        Err(_) => {
            std::fs::create_dir_all("tickets")?;
            TurnKiosk::new(client)
                .await?
                .with_receipt_sink(PrinterSink::new(renderer, FilePrinter::new("tickets")))
        }
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let step = match kiosk.state() {
            AcquireState::SelectingArea => Step::Select,
            AcquireState::Confirming { area } => Step::Confirm(area.name.clone()),
            AcquireState::Requesting { .. } => Step::InFlight,
            AcquireState::Success { ticket, countdown } => Step::Success {
                label: ticket.label.clone(),
                office: ticket.office_number,
                remaining_secs: countdown.remaining().as_secs(),
            },
            AcquireState::Cooldown { message, .. } => Step::Cooldown(message.clone()),
            AcquireState::Failed { message, .. } => Step::Failed(message.clone()),
        };

        match step {
            Step::Select => {
                println!("\nSeleccione un área:");
                for (i, area) in kiosk.areas().iter().enumerate() {
                    println!("  {}. {} ({})", i + 1, area.name, area.letter_code);
                }
                println!("  q. salir");

                let Some(line) = lines.next_line().await? else { break };
                let input = line.trim();
                if input == "q" {
                    break;
                }
                let chosen = input
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| kiosk.areas().get(n.saturating_sub(1)).cloned());
                match chosen {
                    Some(area) => {
                        kiosk.select_area(&area.id);
                    }
                    None => println!("Opción inválida"),
                }
            }
            Step::Confirm(area_name) => {
                println!("\nÁrea: {} - confirmar? (s/n)", area_name);
                let Some(line) = lines.next_line().await? else { break };
                if line.trim() == "s" {
                    kiosk.confirm().await;
                } else {
                    kiosk.back();
                }
            }
            Step::InFlight => {
                // Transient; confirm() resolves it before we get here
            }
            Step::Success {
                label,
                office,
                remaining_secs,
            } => {
                println!("\nSu turno: {}", label);
                if let Some(office) = office {
                    println!("Diríjase al consultorio {}", office);
                }
                println!("Volviendo al inicio en {} segundos...", remaining_secs);
                kiosk.wait_reset().await;
            }
            Step::Cooldown(message) => {
                println!("\n[Aviso] {}", message);
                kiosk.back();
            }
            Step::Failed(message) => {
                println!("\n[Error] {} - reintentar? (s/n)", message);
                let Some(line) = lines.next_line().await? else { break };
                if line.trim() == "s" {
                    kiosk.confirm().await;
                } else {
                    kiosk.back();
                }
            }
        }
    }

    Ok(())
}
