//! Messages exchanged with the host.
//!
//! Inbound messages drive the scanner; outbound messages report scan
//! results. Both serialize to the JSON shape the browser bridge uses:
//! an `action` tag plus a payload field.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::activation::SettingsUpdate;
use crate::error::DeliveryError;

/// Counts from one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    /// Matches that produced a translation.
    pub term_count: usize,
    /// Markers inserted.
    pub translation_count: usize,
    /// Milliseconds since the Unix epoch when the scan finished.
    pub timestamp: u64,
}

impl ScanResult {
    /// A result stamped with the current time.
    pub fn now(term_count: usize, translation_count: usize) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or_default();
        Self {
            term_count,
            translation_count,
            timestamp,
        }
    }
}

/// Counts plus whether the scanner is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentStats {
    /// Matches that produced a translation in the last scan.
    pub term_count: usize,
    /// Markers inserted in the last scan.
    pub translation_count: usize,
    /// Whether the page is being processed.
    pub is_active: bool,
}

/// Reply to [`InboundMessage::GetCurrentStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct StatsReply {
    /// Always `true`.
    pub success: bool,
    /// The stats.
    pub stats: CurrentStats,
}

impl From<CurrentStats> for StatsReply {
    fn from(stats: CurrentStats) -> Self {
        Self {
            success: true,
            stats,
        }
    }
}

/// Commands from the host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum InboundMessage {
    /// Turn processing on or off.
    ToggleExtension {
        /// New master switch.
        enabled: bool,
    },
    /// Merge a partial settings change.
    SettingsUpdated {
        /// The change.
        settings: SettingsUpdate,
    },
    /// Rescan now.
    ScanPage,
    /// Ask for the current counts.
    GetCurrentStats,
}

/// Notifications to the host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum OutboundMessage {
    /// Record a detection in the host's history.
    LogDetection {
        /// Scan counts.
        data: ScanResult,
    },
    /// Live counts for an open popup.
    StatsUpdated {
        /// Scan counts.
        stats: ScanResult,
    },
}

impl OutboundMessage {
    /// Action tag, for logging.
    pub const fn action(&self) -> &'static str {
        match self {
            Self::LogDetection { .. } => "logDetection",
            Self::StatsUpdated { .. } => "statsUpdated",
        }
    }
}

/// Receives outbound notifications.
///
/// Delivery failures are reported to the caller, which logs and drops them.
pub trait StatsSink {
    /// Deliver one message.
    fn send(&mut self, message: &OutboundMessage) -> Result<(), DeliveryError>;
}

impl<S: StatsSink + ?Sized> StatsSink for &mut S {
    fn send(&mut self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        (**self).send(message)
    }
}

impl<S: StatsSink + ?Sized> StatsSink for Box<S> {
    fn send(&mut self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        (**self).send(message)
    }
}

/// Sink with nobody listening.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl StatsSink for NullSink {
    fn send(&mut self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        Err(DeliveryError::NoListener(message.action()))
    }
}

/// Sink that keeps every message, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingSink {
    /// Messages received so far.
    pub messages: Vec<OutboundMessage>,
}

impl StatsSink for RecordingSink {
    fn send(&mut self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        self.messages.push(message.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inbound_messages_parse() {
        let toggle: InboundMessage =
            serde_json::from_str(r#"{"action": "toggleExtension", "enabled": true}"#).unwrap();
        assert_eq!(toggle, InboundMessage::ToggleExtension { enabled: true });

        let scan: InboundMessage = serde_json::from_str(r#"{"action": "scanPage"}"#).unwrap();
        assert_eq!(scan, InboundMessage::ScanPage);

        let update: InboundMessage = serde_json::from_str(
            r#"{"action": "settingsUpdated", "settings": {"showTooltips": false}}"#,
        )
        .unwrap();
        let InboundMessage::SettingsUpdated { settings } = update else {
            panic!("wrong variant");
        };
        assert_eq!(settings.show_tooltips, Some(false));
        assert_eq!(settings.enabled, None);
    }

    #[test]
    fn unknown_action_is_rejected() {
        assert!(serde_json::from_str::<InboundMessage>(r#"{"action": "reload"}"#).is_err());
    }

    #[test]
    fn outbound_shape() {
        let result = ScanResult {
            term_count: 3,
            translation_count: 2,
            timestamp: 1_700_000_000_000,
        };
        let json = serde_json::to_value(OutboundMessage::LogDetection { data: result }).unwrap();
        assert_eq!(json["action"], "logDetection");
        assert_eq!(json["data"]["termCount"], 3);
        assert_eq!(json["data"]["translationCount"], 2);

        let json = serde_json::to_value(OutboundMessage::StatsUpdated { stats: result }).unwrap();
        assert_eq!(json["stats"]["timestamp"], 1_700_000_000_000u64);
    }

    #[test]
    fn stats_reply_shape() {
        let reply = StatsReply::from(CurrentStats {
            term_count: 1,
            translation_count: 1,
            is_active: true,
        });
        let json = serde_json::to_value(reply).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["stats"]["isActive"], true);
    }

    #[test]
    fn sinks() {
        let msg = OutboundMessage::StatsUpdated {
            stats: ScanResult::now(0, 0),
        };
        assert_eq!(
            NullSink.send(&msg),
            Err(DeliveryError::NoListener("statsUpdated"))
        );
        let mut rec = RecordingSink::default();
        rec.send(&msg).unwrap();
        assert_eq!(rec.messages, vec![msg]);
    }

    #[test]
    fn timestamp_is_recent() {
        assert!(ScanResult::now(0, 0).timestamp > 1_600_000_000_000);
    }
}
