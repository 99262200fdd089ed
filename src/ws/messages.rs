//! WebSocket frame types: sensor reports in, acks and LED commands out.

use serde::{Deserialize, Serialize};

use crate::domain::{Command, Reading};
use crate::error::FrameDecodeError;

/// Status string of the acknowledgment frame.
pub const ACK_STATUS: &str = "Message Received";

/// Inbound sensor report: `{"tdsvalue": n?, "turbidityvalue": n?, "phvalue": n?}`.
///
/// Every field is optional and `null` counts as absent. Unknown fields are
/// ignored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct SensorFrame {
    /// Total dissolved solids.
    pub tdsvalue: Option<f64>,
    /// Turbidity.
    pub turbidityvalue: Option<f64>,
    /// pH.
    pub phvalue: Option<f64>,
}

impl SensorFrame {
    /// Decodes one frame payload.
    ///
    /// # Errors
    ///
    /// Returns [`FrameDecodeError::Json`] for invalid JSON or a non-numeric
    /// field, and [`FrameDecodeError::NotAnObject`] for any JSON value that
    /// is not an object.
    pub fn decode(payload: &[u8]) -> Result<Self, FrameDecodeError> {
        let value: serde_json::Value = serde_json::from_slice(payload)?;
        if !value.is_object() {
            return Err(FrameDecodeError::NotAnObject);
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Converts the frame into a domain [`Reading`].
    #[must_use]
    pub const fn into_reading(self) -> Reading {
        Reading::new(self.tdsvalue, self.turbidityvalue, self.phvalue)
    }
}

/// Server → device frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OutboundFrame {
    /// `{"status": "Message Received"}`, once per stored report.
    Ack {
        /// Always [`ACK_STATUS`].
        status: &'static str,
    },
    /// `{"led": 0|1}`.
    Led {
        /// `1` for on, `0` for off.
        led: u8,
    },
}

impl OutboundFrame {
    /// The acknowledgment frame.
    #[must_use]
    pub const fn ack() -> Self {
        Self::Ack { status: ACK_STATUS }
    }

    /// The frame carrying `command`.
    #[must_use]
    pub const fn command(command: Command) -> Self {
        Self::Led {
            led: command.led_value(),
        }
    }

    /// Serializes the frame to its JSON text.
    #[must_use]
    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::error::FrameDecodeError;

    #[test]
    fn decodes_full_report() {
        let Ok(frame) =
            SensorFrame::decode(br#"{"tdsvalue": 120, "turbidityvalue": 3, "phvalue": 7.1}"#)
        else {
            panic!("valid frame");
        };
        assert_eq!(frame.into_reading(), Reading::new(Some(120.0), Some(3.0), Some(7.1)));
    }

    #[test]
    fn missing_and_null_fields_are_absent() {
        let Ok(frame) = SensorFrame::decode(br#"{"phvalue": 7.1, "tdsvalue": null}"#) else {
            panic!("valid frame");
        };
        assert_eq!(frame.into_reading(), Reading::new(None, None, Some(7.1)));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let Ok(frame) = SensorFrame::decode(br#"{"client": "rover", "tdsvalue": 5}"#) else {
            panic!("valid frame");
        };
        assert_eq!(frame.tdsvalue, Some(5.0));
    }

    #[test]
    fn empty_object_is_a_valid_empty_report() {
        let Ok(frame) = SensorFrame::decode(b"{}") else {
            panic!("valid frame");
        };
        assert!(frame.into_reading().is_empty());
    }

    #[test]
    fn invalid_json_is_rejected() {
        let Err(FrameDecodeError::Json(_)) = SensorFrame::decode(b"{not json") else {
            panic!("expected json error");
        };
    }

    #[test]
    fn non_numeric_field_is_rejected() {
        let Err(FrameDecodeError::Json(_)) = SensorFrame::decode(br#"{"phvalue": "7.1"}"#) else {
            panic!("expected json error");
        };
    }

    #[test]
    fn non_object_is_rejected() {
        let Err(FrameDecodeError::NotAnObject) = SensorFrame::decode(b"[120, 3, 7.1]") else {
            panic!("expected not-an-object error");
        };
        assert!(SensorFrame::decode(b"42").is_err());
    }

    #[test]
    fn ack_encoding() {
        let json: serde_json::Value =
            serde_json::from_str(&OutboundFrame::ack().encode()).unwrap_or_default();
        assert_eq!(json, serde_json::json!({"status": "Message Received"}));
    }

    #[test]
    fn command_encoding() {
        let on: serde_json::Value =
            serde_json::from_str(&OutboundFrame::command(Command::On).encode()).unwrap_or_default();
        let off: serde_json::Value =
            serde_json::from_str(&OutboundFrame::command(Command::Off).encode())
                .unwrap_or_default();
        assert_eq!(on, serde_json::json!({"led": 1}));
        assert_eq!(off, serde_json::json!({"led": 0}));
    }
}
