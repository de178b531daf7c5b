//! PDU Metadata Library
//!
//! Extracts network message metadata from AUTOSAR ARXML files: SOME/IP service
//! interface deployments from a service document and I-SIGNAL-I-PDUs with
//! their signal layouts from an RBS document, correlated into one JSON
//! descriptor per PDU.
//!
//! # Architecture
//!
//! Every extraction function is a pure pass over an in-memory, read-only XML
//! tree:
//! - Service interfaces are keyed by a normalized name
//! - Signal lengths and compu methods are resolved from I-SIGNAL definitions
//! - Cycle times are inferred from the `_<ms>` suffix of PDU names
//! - PDUs are joined with service interfaces on the normalized name
//!
//! The library does NOT:
//! - Validate documents against the AUTOSAR schema
//! - Resolve arbitrary AUTOSAR references
//! - Write files or keep a diagnostic log
//!
//! Presentation, file output and the diagnostic log live in the application
//! layer (pdu-metadata-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use pdu_metadata::{ExtractorConfig, MetadataExtractor};
//! use std::path::Path;
//!
//! let mut extractor = MetadataExtractor::with_config(ExtractorConfig::new());
//! extractor.load_service(Path::new("Service_Instance.arxml")).unwrap();
//! extractor.load_rbs(Path::new("RBS.arxml")).unwrap();
//!
//! let metadata = extractor.generate().unwrap();
//! for (pdu_name, message) in &metadata.messages {
//!     println!("{} → {} ({} signals)", pdu_name, message.service_interface, message.total_signals);
//! }
//! ```

// Public modules
pub mod arxml;
pub mod config;
pub mod correlate;
pub mod cycle_time;
pub mod extractor;
pub mod normalize;
pub mod types;

// Re-export main types for convenience
pub use arxml::{ArxmlDocument, SignalCompuMethods, SignalLengths, AUTOSAR_NS};
pub use config::ExtractorConfig;
pub use correlate::correlate;
pub use cycle_time::{infer_cycle_time, CycleTime};
pub use extractor::{
    generate_pdu_metadata, parse_rbs_pdus, parse_service_interfaces, MetadataExtractor,
};
pub use normalize::normalize;
pub use types::{
    CompuMethodEntry, ExtractError, PackingByteOrder, PduMap, PduMetadata, PduRecord, Result,
    ServiceMap, ServiceRecord, SignalLayout, UnifiedMessage, NO_COMPU_METHOD,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
