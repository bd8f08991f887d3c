//! Area Model

use serde::{Deserialize, Serialize};

/// Area entity (medical department or specialty, e.g. Cardiología)
///
/// Served by `GET /api/areas/basicas`. The letter code is used as the
/// ticket prefix ("C" + 5 = "C5"). Uniqueness of the code is enforced
/// server-side; the client tolerates collisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    #[serde(rename = "areaId")]
    pub id: String,
    pub name: String,
    /// Single or double letter ticket prefix
    #[serde(rename = "letterCode")]
    pub letter_code: String,
    /// Display color (hex string), purely presentational
    #[serde(default)]
    pub color: Option<String>,
    /// Icon identifier from the admin catalog
    #[serde(default)]
    pub icon: Option<String>,
}

impl Area {
    /// Format a ticket label for this area, e.g. letter "C" + number 5 = "C5"
    pub fn ticket_label(&self, number: i64) -> String {
        format!("{}{}", self.letter_code, number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cardiologia() -> Area {
        Area {
            id: "a1".into(),
            name: "Cardiología".into(),
            letter_code: "C".into(),
            color: Some("#e74c3c".into()),
            icon: Some("heart".into()),
        }
    }

    #[test]
    fn test_ticket_label() {
        assert_eq!(cardiologia().ticket_label(5), "C5");
    }

    #[test]
    fn test_deserialize_wire_names() {
        let json = r#"{"areaId":"a1","name":"Cardiología","letterCode":"C"}"#;
        let area: Area = serde_json::from_str(json).unwrap();
        assert_eq!(area.id, "a1");
        assert_eq!(area.letter_code, "C");
        assert!(area.color.is_none());
    }
}
