//! MediQueue Client - queue display and turn acquisition for the public kiosk
//!
//! The logical core of the clinic queue system's public side:
//!
//! - [`HttpClient`]: single point of outbound HTTP, bearer injection from a
//!   [`CredentialStore`], centralized error classification
//! - [`TurnFeed`]: polling loop that keeps a live snapshot of active turns
//! - [`projection`]: pure "current turn + waiting count" view per area
//! - [`TurnKiosk`]: state machine driving area selection, turn request,
//!   cooldown handling and receipt emission

pub mod acquire;
pub mod config;
pub mod credentials;
pub mod error;
pub mod feed;
pub mod http;
pub mod projection;

pub use acquire::{AcquireState, AcquiredTicket, ReceiptSink, ResetCountdown, TurnApi, TurnKiosk};
pub use config::ClientConfig;
pub use credentials::{CredentialStore, MemoryCredentialStore};
pub use error::{ClientError, ClientResult};
pub use feed::{FeedConfig, FeedSnapshot, TurnFeed};
pub use http::HttpClient;
pub use projection::{QueueRow, project, project_area};

// Re-export shared types for convenience
pub use shared::client::{CooldownInfo, CreatedTurn, LoginResponse, PublicTurnRequest, UserInfo};
pub use shared::{Area, Office, Turn, TurnStatus};
