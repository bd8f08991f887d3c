//! Shared types for the MediQueue client stack
//!
//! Domain models, wire DTOs and the unified API response envelope used
//! by the queue client and the receipt renderer.

pub mod client;
pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{Area, Office, Turn, TurnStatus};
pub use response::ApiResponse;
