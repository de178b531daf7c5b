//! Compu-method resolution for I-SIGNALs
//!
//! Resolution runs in two stages:
//!
//! 1. Every COMPU-METHOD contributes one [`CompuMethodEntry`] per compu-scale:
//!    COMPU-METHOD → COMPU-INTERNAL-TO-PHYS → COMPU-SCALES → COMPU-SCALE
//!    → LOWER-LIMIT + COMPU-CONST/VT
//!
//! 2. Every I-SIGNAL is linked to a compu method through the first reference
//!    chain that resolves:
//!    a. I-SIGNAL → PHYSICAL-PROPS → SW-DATA-DEF-PROPS → DATA-TYPE-REF
//!       → APPLICATION-(PRIMITIVE-)DATA-TYPE → COMPU-METHOD-REF
//!    b. I-SIGNAL → SW-DATA-DEF-PROPS → COMPU-METHOD-REF
//!
//! The signal is described as `"<lower limit of the first scale>.<method name>"`.
//! Any missing link yields [`NO_COMPU_METHOD`]; resolution never fails.

use super::document::{element_text, reference_target_name, ArxmlTree};
use crate::types::{CompuMethodEntry, NO_COMPU_METHOD};
use roxmltree::Node;
use std::collections::{BTreeMap, HashMap};

/// Element names that can be the target of a DATA-TYPE-REF
const DATA_TYPE_ELEMENTS: [&str; 2] = ["APPLICATION-PRIMITIVE-DATA-TYPE", "APPLICATION-DATA-TYPE"];

/// Description used for compu-scales without COMPU-CONST/VT
pub const NO_DESCRIPTION: &str = "No Description";

/// Raw I-SIGNAL short name → `"<raw_value>.<compu_method_name>"`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalCompuMethods {
    methods: BTreeMap<String, String>,
}

impl SignalCompuMethods {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, signal_name: impl Into<String>, compu_method: impl Into<String>) {
        self.methods.insert(signal_name.into(), compu_method.into());
    }

    /// Compu-method string of a signal, "0.NoCompuMethod" if it has none
    pub fn compu_method_of(&self, signal_name: &str) -> &str {
        self.methods
            .get(signal_name)
            .map(String::as_str)
            .unwrap_or(NO_COMPU_METHOD)
    }

    /// Signals in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.methods.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

/// Hex form of a LOWER-LIMIT: `0x` + uppercase hex when the text is all
/// decimal digits, otherwise `0x0` (negative and fractional limits included).
pub fn hex_value(raw_value: &str) -> String {
    if raw_value.is_empty() || !raw_value.bytes().all(|b| b.is_ascii_digit()) {
        return "0x0".to_string();
    }

    match raw_value.parse::<u128>() {
        Ok(value) => format!("0x{:X}", value),
        Err(_) => "0x0".to_string(),
    }
}

/// Stage 1: one entry per compu-scale of every COMPU-METHOD, in document order
pub fn extract_compu_method_entries(tree: &ArxmlTree<'_>) -> Vec<CompuMethodEntry> {
    let mut entries = Vec::new();

    for method in tree.elements("COMPU-METHOD") {
        let Some(method_name) = tree.short_name(method) else {
            log::warn!("COMPU-METHOD without SHORT-NAME, skipping");
            continue;
        };

        let scales = tree.find_all_by_path(
            method,
            &["COMPU-INTERNAL-TO-PHYS", "COMPU-SCALES", "COMPU-SCALE"],
        );

        for scale in scales {
            let raw_value = tree
                .get_sub_element_text(scale, "LOWER-LIMIT")
                .unwrap_or_else(|| "0".to_string());

            let description = tree
                .find_path(scale, &["COMPU-CONST", "VT"])
                .map(element_text)
                .unwrap_or_else(|| NO_DESCRIPTION.to_string());

            entries.push(CompuMethodEntry {
                method_name: method_name.clone(),
                hex_value: hex_value(&raw_value),
                raw_value,
                description,
            });
        }
    }

    log::debug!("Collected {} compu-scale entries", entries.len());
    entries
}

/// Stage 2: resolve the compu-method string of every I-SIGNAL
pub fn resolve_signal_compu_methods(
    tree: &ArxmlTree<'_>,
    entries: &[CompuMethodEntry],
) -> SignalCompuMethods {
    // First scale of each method wins
    let mut first_raw_value: HashMap<&str, &str> = HashMap::new();
    for entry in entries {
        first_raw_value
            .entry(entry.method_name.as_str())
            .or_insert(entry.raw_value.as_str());
    }

    let data_types = DataTypeIndex::build(tree);
    let mut methods = SignalCompuMethods::new();

    for signal in tree.elements("I-SIGNAL") {
        let Some(signal_name) = tree.short_name(signal) else {
            continue;
        };

        let reference = compu_method_reference(tree, signal, &data_types).map(element_text);

        let compu_method = match reference {
            Some(reference) => {
                let method_name = reference_target_name(&reference);
                match first_raw_value.get(method_name) {
                    Some(raw_value) => format!("{}.{}", raw_value, method_name),
                    None => {
                        log::debug!(
                            "I-SIGNAL {} references unknown compu method {}",
                            signal_name,
                            method_name
                        );
                        NO_COMPU_METHOD.to_string()
                    }
                }
            }
            None => NO_COMPU_METHOD.to_string(),
        };

        methods.insert(signal_name, compu_method);
    }

    methods
}

/// Run both stages over one document
pub fn extract_signal_compu_methods(
    tree: &ArxmlTree<'_>,
) -> (Vec<CompuMethodEntry>, SignalCompuMethods) {
    let entries = extract_compu_method_entries(tree);
    let methods = resolve_signal_compu_methods(tree, &entries);
    (entries, methods)
}

/// COMPU-METHOD-REF governing a signal: via its data type first, then direct
fn compu_method_reference<'a, 'input>(
    tree: &ArxmlTree<'input>,
    signal: Node<'a, 'input>,
    data_types: &DataTypeIndex<'a, 'input>,
) -> Option<Node<'a, 'input>> {
    reference_via_data_type(tree, signal, data_types).or_else(|| direct_reference(tree, signal))
}

fn reference_via_data_type<'a, 'input>(
    tree: &ArxmlTree<'input>,
    signal: Node<'a, 'input>,
    data_types: &DataTypeIndex<'a, 'input>,
) -> Option<Node<'a, 'input>> {
    let physical_props = tree.find_descendant(signal, "PHYSICAL-PROPS")?;
    let data_type_ref = tree.find_path(physical_props, &["SW-DATA-DEF-PROPS", "DATA-TYPE-REF"])?;
    let data_type = data_types.get(&element_text(data_type_ref))?;
    tree.find_descendant(data_type, "COMPU-METHOD-REF")
}

fn direct_reference<'a, 'input>(
    tree: &ArxmlTree<'input>,
    signal: Node<'a, 'input>,
) -> Option<Node<'a, 'input>> {
    let sw_data_def_props = tree.find_descendant(signal, "SW-DATA-DEF-PROPS")?;
    tree.find_sub_element(sw_data_def_props, "COMPU-METHOD-REF")
}

/// Application data types by AUTOSAR path
struct DataTypeIndex<'a, 'input> {
    by_path: HashMap<String, Node<'a, 'input>>,
}

impl<'a, 'input> DataTypeIndex<'a, 'input> {
    fn build(tree: &'a ArxmlTree<'input>) -> Self {
        let mut by_path = HashMap::new();

        for element_name in DATA_TYPE_ELEMENTS {
            for data_type in tree.elements(element_name) {
                if let Some(path) = tree.autosar_path(data_type) {
                    by_path.entry(path).or_insert(data_type);
                }
            }
        }

        Self { by_path }
    }

    fn get(&self, path: &str) -> Option<Node<'a, 'input>> {
        self.by_path.get(path).copied()
    }
}
