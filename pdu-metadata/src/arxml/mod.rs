//! ARXML extraction
//!
//! Each submodule performs one full traversal of a parsed document and returns
//! a complete, independent result. The service document and the RBS document
//! are never traversed together; they are joined later by
//! [`crate::correlate`].

pub mod compu;
pub mod document;
pub mod pdu;
pub mod service;
pub mod signal;

// Re-export key types for convenience
pub use compu::{extract_compu_method_entries, extract_signal_compu_methods, resolve_signal_compu_methods, SignalCompuMethods};
pub use document::{element_text, reference_target_name, ArxmlDocument, ArxmlTree, AUTOSAR_NS};
pub use pdu::extract_pdus;
pub use service::extract_service_interfaces;
pub use signal::{extract_signal_lengths, SignalLengths};
