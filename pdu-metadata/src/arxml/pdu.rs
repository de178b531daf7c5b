//! I-SIGNAL-I-PDU extraction
//!
//! AUTOSAR structure:
//! I-SIGNAL-I-PDU → SHORT-NAME + LENGTH
//!   → I-SIGNAL-TO-PDU-MAPPINGS → I-SIGNAL-TO-I-PDU-MAPPING
//!     → I-SIGNAL-REF + START-POSITION + PACKING-BYTE-ORDER
//!
//! Signal lengths come from the I-SIGNAL definitions ([`SignalLengths`]) and
//! the cycle time from the PDU name ([`infer_cycle_time`]).

use super::compu::SignalCompuMethods;
use super::document::{element_text, reference_target_name, ArxmlTree};
use super::signal::SignalLengths;
use crate::cycle_time::infer_cycle_time;
use crate::types::{PackingByteOrder, PduMap, PduRecord, SignalLayout};
use roxmltree::Node;
use std::collections::BTreeMap;

/// Name given to I-SIGNAL-I-PDUs without SHORT-NAME
pub const UNNAMED_PDU: &str = "Unnamed_PDU";

/// Extract every I-SIGNAL-I-PDU with its mapped signals, keyed by PDU name
///
/// When two PDUs share a name the later one replaces the earlier one.
pub fn extract_pdus(
    tree: &ArxmlTree<'_>,
    lengths: &SignalLengths,
    compu_methods: &SignalCompuMethods,
) -> PduMap {
    let mut pdus = PduMap::new();

    for element in tree.elements("I-SIGNAL-I-PDU") {
        let pdu = parse_i_signal_i_pdu(tree, element, lengths, compu_methods);

        log::debug!(
            "I-PDU {}: length {}, cycle time {} s, {} signals",
            pdu.name,
            pdu.length,
            pdu.cycle_time,
            pdu.total_signals
        );

        if let Some(previous) = pdus.insert(pdu.name.clone(), pdu) {
            log::debug!("I-PDU {} defined more than once, keeping the later one", previous.name);
        }
    }

    log::info!("Extracted {} I-SIGNAL-I-PDUs", pdus.len());
    pdus
}

fn parse_i_signal_i_pdu<'a, 'input>(
    tree: &ArxmlTree<'input>,
    element: Node<'a, 'input>,
    lengths: &SignalLengths,
    compu_methods: &SignalCompuMethods,
) -> PduRecord {
    let name = tree
        .short_name(element)
        .unwrap_or_else(|| UNNAMED_PDU.to_string());

    let length = tree
        .get_sub_element_text(element, "LENGTH")
        .unwrap_or_else(|| "0".to_string());

    // CYCLIC-TIMING is not evaluated; the period always comes from the name
    if let Some(timing) = tree.find_descendant(element, "CYCLIC-TIMING") {
        log::trace!(
            "I-PDU {} has CYCLIC-TIMING ({:?}), using name-derived cycle time",
            name,
            tree.find_descendant(timing, "VALUE").map(element_text)
        );
    }
    let cycle_time = infer_cycle_time(&name);

    let mut signals = BTreeMap::new();
    let mut total_signals = 0;

    let mappings = tree.find_all_by_path(
        element,
        &["I-SIGNAL-TO-PDU-MAPPINGS", "I-SIGNAL-TO-I-PDU-MAPPING"],
    );

    for mapping in mappings {
        if let Some((signal_name, layout)) = parse_signal_mapping(tree, mapping, lengths, compu_methods) {
            signals.insert(signal_name, layout);
            total_signals += 1;
        }
    }

    PduRecord {
        name,
        length,
        cycle_time: cycle_time.seconds,
        total_signals,
        signals,
    }
}

fn parse_signal_mapping<'a, 'input>(
    tree: &ArxmlTree<'input>,
    mapping: Node<'a, 'input>,
    lengths: &SignalLengths,
    compu_methods: &SignalCompuMethods,
) -> Option<(String, SignalLayout)> {
    // Signal name comes from I-SIGNAL-REF, not from the mapping's SHORT-NAME
    let Some(signal_ref) = tree.find_sub_element(mapping, "I-SIGNAL-REF") else {
        log::debug!("Signal mapping has no I-SIGNAL-REF, skipping");
        return None;
    };
    let signal_path = element_text(signal_ref);
    let signal_name = reference_target_name(&signal_path).to_string();

    let start_bit = tree
        .get_sub_element_text(mapping, "START-POSITION")
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(SignalLayout::NO_START_BIT);

    let byte_order = tree
        .get_sub_element_text(mapping, "PACKING-BYTE-ORDER")
        .map(|text| PackingByteOrder::from_text(&text))
        .unwrap_or_default();

    if !lengths.contains(&signal_name) {
        log::debug!("I-SIGNAL {} has no length definition", signal_name);
    }

    let layout = SignalLayout {
        value: 0,
        byte_order,
        start_bit,
        length: lengths.length_of(&signal_name).to_string(),
        compu_method: compu_methods.compu_method_of(&signal_name).to_string(),
    };

    Some((signal_name, layout))
}
