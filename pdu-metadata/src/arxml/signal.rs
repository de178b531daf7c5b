//! I-SIGNAL length lookup
//!
//! Signal-to-PDU mappings only reference their I-SIGNAL by path, so the bit
//! length has to be looked up from the I-SIGNAL definitions themselves.

use super::document::ArxmlTree;
use std::collections::HashMap;

/// Length reported for signals that were never seen in the length pass
pub const UNRESOLVED_LENGTH: &str = "0";

/// Raw I-SIGNAL short name → LENGTH text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalLengths {
    lengths: HashMap<String, String>,
}

impl SignalLengths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, signal_name: impl Into<String>, length: impl Into<String>) {
        self.lengths.insert(signal_name.into(), length.into());
    }

    /// Length of a signal, "0" if the signal is unknown
    pub fn length_of(&self, signal_name: &str) -> &str {
        self.lengths
            .get(signal_name)
            .map(String::as_str)
            .unwrap_or(UNRESOLVED_LENGTH)
    }

    pub fn contains(&self, signal_name: &str) -> bool {
        self.lengths.contains_key(signal_name)
    }

    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }
}

/// Build the signal length lookup table from every I-SIGNAL in the document
pub fn extract_signal_lengths(tree: &ArxmlTree<'_>) -> SignalLengths {
    let mut lengths = SignalLengths::new();

    for signal in tree.elements("I-SIGNAL") {
        let Some(name) = tree.short_name(signal) else {
            log::warn!("I-SIGNAL without SHORT-NAME, skipping");
            continue;
        };

        let length = tree
            .get_sub_element_text(signal, "LENGTH")
            .unwrap_or_else(|| UNRESOLVED_LENGTH.to_string());

        lengths.insert(name, length);
    }

    log::debug!("Collected lengths for {} I-SIGNALs", lengths.len());
    lengths
}
