//! Time-series message shapes
//!
//! Inbound frame messages and the outbound series payload exchanged with the
//! transport collaborator. `deviceId` and `timestamp` pass through untouched.

use crate::types::{DecodedValue, RawFrame};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// Content type of outbound messages
pub const CONTENT_TYPE_JSON: &str = "application/json";
/// Content encoding of outbound messages
pub const CONTENT_ENCODING_UTF8: &str = "utf-8";
/// Custom property naming the payload kind
pub const MESSAGE_TYPE_PROPERTY: &str = "type";
/// Value of [`MESSAGE_TYPE_PROPERTY`] for series payloads
pub const TIME_SERIES_TYPE: &str = "time-series";
/// Route decoded series are published on unless configured otherwise
pub const DEFAULT_OUTPUT_ROUTE: &str = "output1";

/// One frame message as received from the transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundMessage {
    pub device_id: String,
    /// Kept as raw JSON so it is forwarded exactly as received
    pub timestamp: serde_json::Value,
    pub identifier: String,
    pub data: Vec<String>,
}

impl InboundMessage {
    /// The frame part of the message
    pub fn frame(&self) -> RawFrame {
        RawFrame {
            identifier: self.identifier.clone(),
            data: self.data.clone(),
        }
    }
}

/// Decoded series for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPayload {
    pub device_id: String,
    pub timestamp: serde_json::Value,
    /// Serialized as `[{"<label>": value}, ...]`
    #[serde(serialize_with = "serialize_series")]
    pub series: Vec<DecodedValue>,
}

impl SeriesPayload {
    /// Attach decoded values to the metadata of the message they came from
    pub fn new(inbound: &InboundMessage, series: Vec<DecodedValue>) -> Self {
        Self {
            device_id: inbound.device_id.clone(),
            timestamp: inbound.timestamp.clone(),
            series,
        }
    }
}

fn serialize_series<S: Serializer>(values: &[DecodedValue], serializer: S) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(values.len()))?;
    for value in values {
        seq.serialize_element(&SeriesPoint(value))?;
    }
    seq.end()
}

/// Single-key object `{"<label>": value}`
struct SeriesPoint<'a>(&'a DecodedValue);

impl Serialize for SeriesPoint<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.0.label, &self.0.value)?;
        map.end()
    }
}

/// Outbound message: series body plus transport metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundMessage {
    pub route: String,
    pub content_type: String,
    pub content_encoding: String,
    pub properties: BTreeMap<String, String>,
    pub body: Vec<SeriesPayload>,
}

impl OutboundMessage {
    /// Wrap one series payload as a time-series message for `route`
    pub fn time_series(payload: SeriesPayload, route: impl Into<String>) -> Self {
        let mut properties = BTreeMap::new();
        properties.insert(MESSAGE_TYPE_PROPERTY.to_string(), TIME_SERIES_TYPE.to_string());

        Self {
            route: route.into(),
            content_type: CONTENT_TYPE_JSON.to_string(),
            content_encoding: CONTENT_ENCODING_UTF8.to_string(),
            properties,
            body: vec![payload],
        }
    }

    /// The body alone, as published on the wire
    pub fn body_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.body)
    }

    /// Body together with route and metadata
    pub fn envelope_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn inbound() -> InboundMessage {
        serde_json::from_value(json!({
            "deviceId": "truck-7",
            "timestamp": "2020-03-01T12:00:00Z",
            "identifier": "18FEF200",
            "data": ["0A", "00", "FF", "FF", "FF", "FF", "FF", "FF"],
            "extra": 1
        }))
        .unwrap()
    }

    #[test]
    fn test_inbound_parsing() {
        let msg = inbound();
        assert_eq!(msg.device_id, "truck-7");
        assert_eq!(msg.frame().identifier, "18FEF200");
        assert_eq!(msg.frame().data.len(), 8);
    }

    #[test]
    fn test_timestamp_passes_through() {
        let mut msg = inbound();
        msg.timestamp = json!(1583064000123u64);
        let payload = SeriesPayload::new(&msg, vec![]);
        assert_eq!(serde_json::to_value(&payload).unwrap()["timestamp"], json!(1583064000123u64));
    }

    #[test]
    fn test_series_body_shape() {
        let payload = SeriesPayload::new(
            &inbound(),
            vec![
                DecodedValue { label: "Fuel Rate (l/h)".into(), value: 0.5 },
                DecodedValue { label: "Status (int)".into(), value: 1.0 },
            ],
        );
        let message = OutboundMessage::time_series(payload, DEFAULT_OUTPUT_ROUTE);

        let body: serde_json::Value = serde_json::from_str(&message.body_json().unwrap()).unwrap();
        assert_eq!(
            body,
            json!([{
                "deviceId": "truck-7",
                "timestamp": "2020-03-01T12:00:00Z",
                "series": [{"Fuel Rate (l/h)": 0.5}, {"Status (int)": 1.0}]
            }])
        );
    }

    #[test]
    fn test_envelope_metadata() {
        let message = OutboundMessage::time_series(SeriesPayload::new(&inbound(), vec![]), "output2");
        let envelope: serde_json::Value =
            serde_json::from_str(&message.envelope_json().unwrap()).unwrap();

        assert_eq!(envelope["route"], "output2");
        assert_eq!(envelope["contentType"], CONTENT_TYPE_JSON);
        assert_eq!(envelope["contentEncoding"], CONTENT_ENCODING_UTF8);
        assert_eq!(envelope["properties"]["type"], TIME_SERIES_TYPE);
        assert_eq!(envelope["body"][0]["deviceId"], "truck-7");
    }
}
