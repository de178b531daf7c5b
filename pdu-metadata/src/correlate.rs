//! Correlation of PDUs with service interfaces
//!
//! PDUs and service deployments live in separate documents and share no
//! reference; they are joined on [`normalize`]d names. A PDU whose full name
//! matches no service is tried once more without its cycle-time suffix, so
//! `EngineStatus_100` finds `SomeIp_SI_EngineStatus`.

use crate::cycle_time::strip_cycle_suffix;
use crate::normalize::normalize;
use crate::types::{PduMap, PduMetadata, ServiceMap, ServiceRecord, UnifiedMessage};

/// Join every PDU with the service interface of the same normalized name
///
/// PDUs without a matching service get interface `"N/A"` and empty ids.
pub fn correlate(services: &ServiceMap, pdus: &PduMap) -> PduMetadata {
    let unmatched = ServiceRecord::unmatched();
    let mut metadata = PduMetadata::default();
    let mut matched = 0;

    for (pdu_name, pdu) in pdus {
        let service = match find_service(services, pdu_name) {
            Some(service) => {
                matched += 1;
                service
            }
            None => &unmatched,
        };

        metadata.messages.insert(
            pdu_name.clone(),
            UnifiedMessage {
                pdu_name: pdu_name.clone(),
                service_interface: service.interface_name.clone(),
                service_id: service.service_id.clone(),
                event_ids: service.event_ids_joined(),
                length: pdu.length.clone(),
                cycle_time: pdu.cycle_time.clone(),
                total_signals: pdu.total_signals,
                signals: pdu.signals.clone(),
            },
        );
    }

    log::info!(
        "Correlated {} PDUs, {} matched a service interface",
        metadata.len(),
        matched
    );
    metadata
}

/// Service for a PDU: exact normalized name first, then without the period suffix
fn find_service<'a>(services: &'a ServiceMap, pdu_name: &str) -> Option<&'a ServiceRecord> {
    services.get(&normalize(pdu_name)).or_else(|| {
        let base_name = strip_cycle_suffix(pdu_name)?;
        services.get(&normalize(base_name))
    })
}
