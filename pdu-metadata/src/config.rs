//! Extractor configuration types
//!
//! The extraction functions are pure; this configuration only selects which
//! XML namespace identifies AUTOSAR elements and whether the compu-method
//! column is resolved for each signal.

use crate::arxml::AUTOSAR_NS;
use serde::{Deserialize, Serialize};

/// Configuration for the extractor library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// XML namespace of AUTOSAR elements (default: `http://autosar.org/schema/r4.0`)
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Resolve compu methods for mapped signals (false = every signal gets "0.NoCompuMethod")
    #[serde(default = "default_true")]
    pub resolve_compu_methods: bool,
}

fn default_namespace() -> String {
    AUTOSAR_NS.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            resolve_compu_methods: true,
        }
    }
}

impl ExtractorConfig {
    /// Create a new extractor configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: match elements in a different AUTOSAR namespace
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Builder method: enable or disable compu-method resolution
    pub fn with_compu_methods(mut self, enabled: bool) -> Self {
        self.resolve_compu_methods = enabled;
        self
    }
}
