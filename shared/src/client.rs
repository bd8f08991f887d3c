//! Client-related types shared between backend and client
//!
//! Request/response DTOs for the public turn endpoints and the auth
//! flows that write the credential store.

use serde::{Deserialize, Serialize};

// Re-export ApiResponse from response module
pub use crate::response::ApiResponse;

// =============================================================================
// Public Turn API DTOs
// =============================================================================

/// Body of `POST /api/turnos/publico/auto`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicTurnRequest {
    #[serde(rename = "areaId")]
    pub area_id: String,
}

/// Office reference inside an automatic assignment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignedOffice {
    #[serde(rename = "numero")]
    pub number: i32,
}

/// Result of the server-side automatic office assignment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoAssignment {
    #[serde(rename = "consultorio_asignado", default)]
    pub office: Option<AssignedOffice>,
}

/// Created turn returned by `POST /api/turnos/publico/auto`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedTurn {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "numero_turno")]
    pub number: i64,
    #[serde(rename = "asignacion_automatica", default)]
    pub assignment: Option<AutoAssignment>,
}

impl CreatedTurn {
    /// Office number picked by the automatic assignment, if any
    pub fn office_number(&self) -> Option<i32> {
        self.assignment
            .as_ref()
            .and_then(|a| a.office.as_ref())
            .map(|o| o.number)
    }
}

/// Cooldown payload carried by an HTTP 429 envelope
///
/// `timeRemaining` is an opaque server-provided value in seconds; the
/// scope of the cooldown (per patient, device or area) is the server's
/// business.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CooldownInfo {
    #[serde(rename = "timeRemaining")]
    pub time_remaining: u64,
}

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// User information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_turn_with_assignment() {
        let json = r#"{
            "numero_turno": 5,
            "asignacion_automatica": { "consultorio_asignado": { "numero": 2 } }
        }"#;
        let turn: CreatedTurn = serde_json::from_str(json).unwrap();
        assert_eq!(turn.number, 5);
        assert_eq!(turn.office_number(), Some(2));
    }

    #[test]
    fn test_created_turn_without_assignment() {
        let json = r#"{"numero_turno": 12}"#;
        let turn: CreatedTurn = serde_json::from_str(json).unwrap();
        assert_eq!(turn.number, 12);
        assert_eq!(turn.office_number(), None);
    }

    #[test]
    fn test_cooldown_info_wire_name() {
        let info: CooldownInfo = serde_json::from_str(r#"{"timeRemaining":125}"#).unwrap();
        assert_eq!(info.time_remaining, 125);
    }
}
