use serde::{Deserialize, Serialize};

use crate::error::{CardError, CardResult};
use crate::render::Renderer;

use super::{FlipCardWidget, WidgetSnapshot};

pub const WIDGET_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: WidgetSnapshot,
}

impl WidgetSnapshot {
    pub fn to_json_contract_v1_pretty(&self) -> CardResult<String> {
        let payload = WidgetSnapshotJsonContractV1 {
            schema_version: WIDGET_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            CardError::InvalidData(format!("failed to serialize snapshot contract v1: {e}"))
        })
    }

    /// Accepts either a bare snapshot or a versioned contract payload.
    pub fn from_json_compat_str(input: &str) -> CardResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<WidgetSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: WidgetSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            CardError::InvalidData(format!("failed to parse snapshot json payload: {e}"))
        })?;
        if payload.schema_version != WIDGET_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(CardError::InvalidData(format!(
                "unsupported snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}

impl<R: Renderer> FlipCardWidget<R> {
    pub fn snapshot_json_contract_v1_pretty(&self) -> CardResult<String> {
        self.snapshot().to_json_contract_v1_pretty()
    }
}
