//! Office (Consultorio) Model

use serde::{Deserialize, Serialize};

/// Office entity (consultorio) - a physical room belonging to one area
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Office {
    pub id: String,
    /// Numeric label shown on the door (1-999)
    #[serde(rename = "numero")]
    pub number: i32,
    #[serde(rename = "area_id")]
    pub area_id: String,
    #[serde(rename = "activo", default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}
