//! Turn Model

use serde::{Deserialize, Serialize};

/// Turn lifecycle status
///
/// The public client only ever reads these; transitions are driven by
/// staff actions on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TurnStatus {
    #[default]
    Waiting,
    Calling,
    Attended,
    Cancelled,
    NoShow,
}

impl TurnStatus {
    /// Active turns are the ones still in the queue (shown on the public display)
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Waiting | Self::Calling)
    }
}

/// Turn entity - a queue ticket
///
/// `number` is sequential per area and assigned by the server; it is
/// monotonically increasing and never mutated client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub id: String,
    #[serde(rename = "numero_turno")]
    pub number: i64,
    #[serde(rename = "estado")]
    pub status: TurnStatus,
    pub area_id: String,
    /// Assigned office, null until assignment
    #[serde(rename = "consultorio_id", default)]
    pub office_id: Option<String>,
    /// ISO-8601 creation timestamp
    #[serde(rename = "creado_en", default)]
    pub created_at: Option<String>,
}
