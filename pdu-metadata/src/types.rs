//! Core types for the PDU metadata extractor
//!
//! This module defines the records produced by the extraction functions and the
//! final correlated output. Every record is built once by a pure extraction pass
//! over a parsed ARXML document and is never mutated afterwards.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Service interfaces keyed by normalized interface name
pub type ServiceMap = BTreeMap<String, ServiceRecord>;

/// PDU records keyed by raw PDU short name
pub type PduMap = BTreeMap<String, PduRecord>;

/// Placeholder compu-method string for signals without a resolvable compu method
pub const NO_COMPU_METHOD: &str = "0.NoCompuMethod";

/// Errors that can occur during extraction
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("File not found: {0:?}")]
    FileNotFound(PathBuf),

    #[error("Failed to parse ARXML document {source_name}: {message}")]
    XmlParseError {
        source_name: String,
        message: String,
    },

    #[error("Missing required field {field} in {element}")]
    MissingField {
        element: &'static str,
        field: &'static str,
    },

    #[error("No {0} document loaded")]
    DocumentNotLoaded(&'static str),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A SOME/IP service interface deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceRecord {
    /// Deployment SHORT-NAME as written in the document
    #[serde(rename = "service_interface")]
    pub interface_name: String,
    /// SERVICE-INTERFACE-ID text (empty when absent)
    pub service_id: String,
    /// EVENT-ID texts in document order
    #[serde(serialize_with = "serialize_joined")]
    pub event_ids: Vec<String>,
}

impl ServiceRecord {
    /// Record substituted for PDUs that match no service interface
    pub fn unmatched() -> Self {
        Self {
            interface_name: "N/A".to_string(),
            service_id: String::new(),
            event_ids: Vec::new(),
        }
    }

    /// Event ids as comma-separated text
    pub fn event_ids_joined(&self) -> String {
        self.event_ids.join(",")
    }
}

fn serialize_joined<S: Serializer>(ids: &[String], serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&ids.join(","))
}

/// PACKING-BYTE-ORDER of a signal inside its PDU
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum PackingByteOrder {
    /// Big-endian (Motorola format)
    MostSignificantByteFirst,
    /// Little-endian (Intel format)
    LeastSignificantByteFirst,
    /// Little-endian as spelled by AUTOSAR 4.x documents
    MostSignificantByteLast,
    /// Byte order not applicable
    Opaque,
    /// No PACKING-BYTE-ORDER element on the mapping
    #[default]
    Unknown,
    /// Any other text, carried through verbatim
    Other(String),
}

impl PackingByteOrder {
    /// Interpret the text of a PACKING-BYTE-ORDER element
    pub fn from_text(text: &str) -> Self {
        match text {
            "MOST-SIGNIFICANT-BYTE-FIRST" => Self::MostSignificantByteFirst,
            "LEAST-SIGNIFICANT-BYTE-FIRST" => Self::LeastSignificantByteFirst,
            "MOST-SIGNIFICANT-BYTE-LAST" => Self::MostSignificantByteLast,
            "OPAQUE" => Self::Opaque,
            "Unknown" => Self::Unknown,
            other => Self::Other(other.to_string()),
        }
    }

    /// The literal text written to the JSON output
    pub fn as_str(&self) -> &str {
        match self {
            Self::MostSignificantByteFirst => "MOST-SIGNIFICANT-BYTE-FIRST",
            Self::LeastSignificantByteFirst => "LEAST-SIGNIFICANT-BYTE-FIRST",
            Self::MostSignificantByteLast => "MOST-SIGNIFICANT-BYTE-LAST",
            Self::Opaque => "OPAQUE",
            Self::Unknown => "Unknown",
            Self::Other(text) => text,
        }
    }
}

impl fmt::Display for PackingByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PackingByteOrder {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Bit layout of one signal inside a PDU
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignalLayout {
    /// Placeholder value, always 0
    pub value: i64,
    pub byte_order: PackingByteOrder,
    /// START-POSITION in bits, -1 when absent
    pub start_bit: i64,
    /// Bit length as decimal text, "0" when the signal has no known length
    #[serde(rename = "len")]
    pub length: String,
    /// `"<raw_value>.<compu_method_name>"` or [`NO_COMPU_METHOD`]
    pub compu_method: String,
}

impl SignalLayout {
    /// Sentinel start bit for mappings without a START-POSITION
    pub const NO_START_BIT: i64 = -1;
}

/// An I-SIGNAL-I-PDU with its mapped signals
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PduRecord {
    pub name: String,
    /// PDU LENGTH text
    pub length: String,
    /// Cycle time in seconds, inferred from the PDU name
    pub cycle_time: String,
    /// Number of signal mappings processed
    pub total_signals: usize,
    pub signals: BTreeMap<String, SignalLayout>,
}

/// One compu-scale of a compu method
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompuMethodEntry {
    /// Short name of the owning COMPU-METHOD; used as the join key
    #[serde(rename = "signal_name")]
    pub method_name: String,
    /// LOWER-LIMIT text
    pub raw_value: String,
    /// Uppercase hex of `raw_value`, "0x0" when it is not all decimal digits
    pub hex_value: String,
    /// COMPU-CONST/VT text
    pub description: String,
}

/// A PDU correlated with its service interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnifiedMessage {
    pub pdu_name: String,
    pub service_interface: String,
    pub service_id: String,
    pub event_ids: String,
    pub length: String,
    pub cycle_time: String,
    pub total_signals: usize,
    pub signals: BTreeMap<String, SignalLayout>,
}

/// The complete output document: `{"Messages": {pdu_name: message}}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PduMetadata {
    #[serde(rename = "Messages")]
    pub messages: BTreeMap<String, UnifiedMessage>,
}

impl PduMetadata {
    /// Look up a message by PDU name
    pub fn message(&self, pdu_name: &str) -> Option<&UnifiedMessage> {
        self.messages.get(pdu_name)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
