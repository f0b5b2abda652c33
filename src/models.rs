//! Request and response models for the REST API.
//!
//! Request bodies are validated by deserialization: a missing required field
//! or a wrongly typed value is rejected before any upstream call is made.
//! Optional fields that are absent are omitted when the body is forwarded.

use crate::xml::Element;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;


fn default_logic_bind() -> String {
    "and".to_string()
}

fn default_tif() -> String {
    "GTC".to_string()
}

// ============================================================================
// Health
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

// ============================================================================
// Alerts
// ============================================================================

/// A single alert condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AlertCondition {
    /// Condition type: 3 for price, 5 for time, 6 for margin.
    #[serde(rename = "type")]
    pub condition_type: i32,
    /// Contract identifier and exchange, e.g. `265598@SMART`.
    pub conidex: String,
    /// Comparison operator, e.g. `>=`.
    pub operator: String,
    /// Threshold value.
    pub value: String,
    /// Logical operator linking this condition to the next (`and` / `or`).
    #[serde(rename = "logicBind", default = "default_logic_bind")]
    pub logic_bind: String,
    /// Time zone for time based conditions.
    #[serde(rename = "timeZone", default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    /// Trigger method.
    #[serde(
        rename = "triggerMethod",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub trigger_method: Option<String>,
}

/// Request to create or modify an alert.
///
/// Include `orderId` to modify an existing alert; omit it to create one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "alertName": "Price Alert for IBM",
    "alertMessage": "IBM crossed 175",
    "alertActive": 1,
    "conditions": [{
        "type": 3,
        "conidex": "265598@SMART",
        "operator": ">=",
        "value": "175",
        "logicBind": "and"
    }],
    "tif": "GTC"
}))]
pub struct AlertRequest {
    /// Alert order id. Required for modifications.
    #[serde(rename = "orderId", default, skip_serializing_if = "Option::is_none")]
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
    /// Conditions that trigger the alert.
    pub conditions: Vec<AlertCondition>,
    /// Time in force (default: GTC).
    #[serde(default = "default_tif")]
    pub tif: String,
    /// Allow triggering outside regular trading hours.
    #[serde(rename = "outsideRth", default)]
    pub outside_rth: bool,
    /// Allow triggering during extended trading hours.
    #[serde(rename = "iTtif", default)]
    pub i_ttif: bool,
}

/// Request to activate or deactivate an alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
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
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScannerFilter {
    /// Filter name, e.g. `volumeAbove`.
    pub name: String,
    /// Filter value. Any JSON value is accepted.
    #[schema(value_type = Object)]
    pub value: Value,
}

/// iServer scanner subscription.
///
/// Converted to XML before it is sent upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "instrument": "STK",
    "type": "TOP_PERC_GAIN",
    "locationCode": "STK.US.MAJOR",
    "filter": [
        {"name": "volumeAbove", "value": 10000},
        {"name": "priceAbove", "value": 1}
    ]
}))]
pub struct ScannerSubscription {
    /// Instrument type, e.g. `STK`.
    pub instrument: String,
    /// Scanner type, e.g. `TOP_PERC_GAIN`.
    #[serde(rename = "type")]
    pub scan_type: String,
    /// Location code, e.g. `STK.US.MAJOR`.
    #[serde(rename = "locationCode")]
    pub location_code: String,
    /// Optional filters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Vec<ScannerFilter>>,
}

impl ScannerSubscription {
    /// Builds the upstream XML document.
    ///
    /// ```text
    /// <ScannerSubscription>
    ///   <instrument/><type/><locationCode/>
    ///   <filter><item><name/><value/></item>...</filter>
    /// </ScannerSubscription>
    /// ```
    ///
    /// The `filter` block is only emitted when at least one filter is present.
    #[must_use]
    pub fn to_xml(&self) -> Element {
        let mut root = Element::new("ScannerSubscription")
            .child(Element::with_text("instrument", &self.instrument))
            .child(Element::with_text("type", &self.scan_type))
            .child(Element::with_text("locationCode", &self.location_code));

        if let Some(filters) = self.filter.as_ref().filter(|f| !f.is_empty()) {
            root = root.child(Element::new("filter").children(filters.iter().map(|item| {
                Element::new("item")
                    .child(Element::with_text("name", &item.name))
                    .child(Element::with_text("value", value_text(&item.value)))
            })));
        }

        root
    }
}

/// Renders a JSON value as XML text content.
///
/// Strings are emitted without quotes, null as empty text, and composite
/// values as compact JSON.
#[must_use]
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Historical Market Data Service scanner request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "instrument": "STK",
    "locations": "STK.US.MAJOR",
    "scanCode": "TOP_PERC_GAIN",
    "secType": "STK",
    "filters": [
        {"code": "price", "value": 1.0},
        {"code": "volume", "value": 10000}
    ]
}))]
pub struct HmdsScannerRequest {
    /// Instrument type, e.g. `STK`.
    pub instrument: String,
    /// Comma separated location codes.
    pub locations: String,
    /// Scanner type, e.g. `TOP_PERC_GAIN`.
    pub scan_code: String,
    /// Security type, e.g. `STK`.
    pub sec_type: String,
    /// Scanner filters, passed through as given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub filters: Option<Value>,
}
