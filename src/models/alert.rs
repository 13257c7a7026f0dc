// Alert event model

use serde::{Deserialize, Serialize};

use super::AlertMetric;

/// A threshold violation. Timestamp equals the triggering snapshot's timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertEvent {
    pub timestamp: u64,
    pub metric: AlertMetric,
    pub message: String,
    pub value: f64,
    pub threshold: f64,
}
