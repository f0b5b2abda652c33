//! Request and response types for the gateway proxy API.

use serde::{Deserialize, Serialize};
use serde_json::Value;


// ============================================================================
// Health
// ============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

// ============================================================================
// Error Envelope
// ============================================================================

/// Discriminator of an [`ErrorEnvelope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnvelopeKind {
    /// Non-2xx upstream answer.
    #[serde(rename = "IBKR API Error")]
    Upstream,
    /// Upstream could not be reached.
    #[serde(rename = "Request Error")]
    Transport,
}

/// Error body returned by the proxy for failed forwarded calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Failure kind.
    pub error: EnvelopeKind,
    /// Upstream HTTP status, for upstream errors only.
    #[serde(default)]
    pub status_code: Option<u16>,
    /// Upstream body or transport failure description.
    pub detail: String,
}

impl ErrorEnvelope {
    /// Recognizes an error envelope in a decoded response body.
    ///
    /// Payloads that merely contain an `error` field with another value are
    /// not envelopes.
    #[must_use]
    pub fn detect(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        if !object.contains_key("detail") {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }
}

// ============================================================================
// Alerts
// ============================================================================

/// A single alert condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertCondition {
    /// Condition type: 3 for price, 5 for time, 6 for margin.
    #[serde(rename = "type")]
    pub condition_type: i32,
    /// Contract identifier and exchange, e.g. `265598@SMART`.
    pub conidex: String,
    /// Comparison operator.
    pub operator: String,
    /// Threshold value.
    pub value: String,
    /// Logical operator linking to the next condition.
    #[serde(rename = "logicBind")]
    pub logic_bind: String,
    /// Time zone for time based conditions.
    #[serde(rename = "timeZone", skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    /// Trigger method.
    #[serde(rename = "triggerMethod", skip_serializing_if = "Option::is_none")]
    pub trigger_method: Option<String>,
}

impl AlertCondition {
    /// Price condition type.
    pub const PRICE: i32 = 3;
    /// Time condition type.
    pub const TIME: i32 = 5;
    /// Margin condition type.
    pub const MARGIN: i32 = 6;

    /// Creates a price condition, e.g. `price("265598@SMART", ">=", "175")`.
    #[must_use]
    pub fn price(conidex: &str, operator: &str, value: &str) -> Self {
        Self {
            condition_type: Self::PRICE,
            conidex: conidex.to_string(),
            operator: operator.to_string(),
            value: value.to_string(),
            logic_bind: "and".to_string(),
            time_zone: None,
            trigger_method: None,
        }
    }
}

/// Request to create or modify an alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRequest {
    /// Alert order id. Set to modify an existing alert.
    #[serde(rename = "orderId", skip_serializing_if = "Option::is_none")]
    pub order_id: Option<i64>,
    /// Alert name.
    #[serde(rename = "alertName")]
    pub alert_name: String,
    /// Message sent when the alert triggers.
    #[serde(rename = "alertMessage")]
    pub alert_message: String,
    /// 1 for active, 0 for inactive.
    #[serde(rename = "alertActive")]
    pub alert_active: i32,
    /// Trigger conditions.
    pub conditions: Vec<AlertCondition>,
    /// Time in force.
    pub tif: String,
    /// Allow triggering outside regular trading hours.
    #[serde(rename = "outsideRth")]
    pub outside_rth: bool,
    /// Allow triggering during extended trading hours.
    #[serde(rename = "iTtif")]
    pub i_ttif: bool,
}

impl AlertRequest {
    /// Creates an active GTC alert.
    #[must_use]
    pub fn new(name: &str, message: &str, conditions: Vec<AlertCondition>) -> Self {
        Self {
            order_id: None,
            alert_name: name.to_string(),
            alert_message: message.to_string(),
            alert_active: 1,
            conditions,
            tif: "GTC".to_string(),
            outside_rth: false,
            i_ttif: false,
        }
    }
}

/// Request to activate or deactivate an alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertActivationRequest {
    /// Alert id.
    #[serde(rename = "alertId")]
    pub alert_id: i64,
    /// 1 to activate, 0 to deactivate.
    #[serde(rename = "alertActive")]
    pub alert_active: i32,
}

// ============================================================================
// Scanner
// ============================================================================

/// A single iServer scanner filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannerFilter {
    /// Filter name, e.g. `volumeAbove`.
    pub name: String,
    /// Filter value.
    pub value: Value,
}

impl ScannerFilter {
    /// Creates a filter.
    #[must_use]
    pub fn new(name: &str, value: impl Into<Value>) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
        }
    }
}

/// iServer scanner subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannerSubscription {
    /// Instrument type.
    pub instrument: String,
    /// Scanner type.
    #[serde(rename = "type")]
    pub scan_type: String,
    /// Location code.
    #[serde(rename = "locationCode")]
    pub location_code: String,
    /// Optional filters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Vec<ScannerFilter>>,
}

/// Historical Market Data Service scanner request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HmdsScannerRequest {
    /// Instrument type.
    pub instrument: String,
    /// Comma separated location codes.
    pub locations: String,
    /// Scanner type.
    pub scan_code: String,
    /// Security type.
    pub sec_type: String,
    /// Scanner filters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Value>,
}
