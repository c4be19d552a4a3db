use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use super::columns::{CREATED_ALIASES, SERIAL_ALIASES};
use super::deserializers::json_scalar_to_string;
use crate::analyzer::Timestamped;

/// One row of a panel export, before validation. Keys follow the backend's
/// `panels` table (`panel_serial`, `created_at`) or the device API
/// (`serial`, `created`).
#[derive(Debug, Clone, Default)]
pub struct PanelRaw {
    pub serial: Option<String>,
    pub created: Option<String>,
}

impl PanelRaw {
    /// Reads a JSON object row. When several aliases of a field are present,
    /// the first usable one in alias priority order wins, as for CSV headers.
    pub fn from_json_row(row: &Map<String, Value>) -> Self {
        let pick = |aliases: &[&str]| {
            aliases
                .iter()
                .find_map(|key| row.get(*key).and_then(json_scalar_to_string))
        };
        PanelRaw {
            serial: pick(SERIAL_ALIASES),
            created: pick(CREATED_ALIASES),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelRecord {
    pub serial: String,
    pub created_at: DateTime<Utc>,
}

impl Timestamped for PanelRecord {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseWarning {
    pub line: usize,
    pub message: String,
}
