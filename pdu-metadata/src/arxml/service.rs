//! SOME/IP service interface deployments
//!
//! AUTOSAR structure:
//! SOMEIP-SERVICE-INTERFACE-DEPLOYMENT → SHORT-NAME + SERVICE-INTERFACE-ID
//!   → EVENT-DEPLOYMENTS → SOMEIP-EVENT-DEPLOYMENT → EVENT-ID

use super::document::{element_text, ArxmlTree};
use crate::normalize::normalize;
use crate::types::{ExtractError, Result, ServiceMap, ServiceRecord};
use roxmltree::Node;

/// Extract every service interface deployment, keyed by normalized name
///
/// A deployment without SHORT-NAME is an error. When two deployments normalize
/// to the same key the later one replaces the earlier one.
pub fn extract_service_interfaces(tree: &ArxmlTree<'_>) -> Result<ServiceMap> {
    let mut services = ServiceMap::new();

    for deployment in tree.elements("SOMEIP-SERVICE-INTERFACE-DEPLOYMENT") {
        let record = parse_deployment(tree, deployment)?;
        let key = normalize(&record.interface_name);

        log::debug!(
            "Service interface {} (id {:?}, {} events) → key {}",
            record.interface_name,
            record.service_id,
            record.event_ids.len(),
            key
        );

        if let Some(previous) = services.insert(key.clone(), record) {
            log::debug!(
                "Service interface {} replaced by a later deployment with key {}",
                previous.interface_name,
                key
            );
        }
    }

    log::info!("Extracted {} service interfaces", services.len());
    Ok(services)
}

fn parse_deployment<'a, 'input>(tree: &ArxmlTree<'input>, deployment: Node<'a, 'input>) -> Result<ServiceRecord> {
    let interface_name = tree
        .short_name(deployment)
        .ok_or(ExtractError::MissingField {
            element: "SOMEIP-SERVICE-INTERFACE-DEPLOYMENT",
            field: "SHORT-NAME",
        })?;

    let service_id = tree
        .find_descendant(deployment, "SERVICE-INTERFACE-ID")
        .map(element_text)
        .unwrap_or_default();

    let event_ids = tree
        .find_all_by_path(deployment, &["EVENT-DEPLOYMENTS", "SOMEIP-EVENT-DEPLOYMENT"])
        .into_iter()
        .filter_map(|event| tree.get_sub_element_text(event, "EVENT-ID"))
        .collect();

    Ok(ServiceRecord {
        interface_name,
        service_id,
        event_ids,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arxml::AUTOSAR_NS;

    fn extract(body: &str) -> Result<ServiceMap> {
        let xml = format!(
            r#"<AUTOSAR xmlns="http://autosar.org/schema/r4.0"><AR-PACKAGES><AR-PACKAGE>
               <SHORT-NAME>Deployments</SHORT-NAME><ELEMENTS>{}</ELEMENTS>
               </AR-PACKAGE></AR-PACKAGES></AUTOSAR>"#,
            body
        );
        let tree = ArxmlTree::parse("service.arxml", &xml, AUTOSAR_NS)?;
        extract_service_interfaces(&tree)
    }

    #[test]
    fn test_deployment_with_events() {
        let services = extract(
            r#"<SOMEIP-SERVICE-INTERFACE-DEPLOYMENT>
                 <SHORT-NAME>SomeIp_SI_EngineStatus</SHORT-NAME>
                 <EVENT-DEPLOYMENTS>
                   <SOMEIP-EVENT-DEPLOYMENT><SHORT-NAME>E1</SHORT-NAME><EVENT-ID>7</EVENT-ID></SOMEIP-EVENT-DEPLOYMENT>
                   <SOMEIP-EVENT-DEPLOYMENT><SHORT-NAME>E2</SHORT-NAME></SOMEIP-EVENT-DEPLOYMENT>
                   <SOMEIP-EVENT-DEPLOYMENT><SHORT-NAME>E3</SHORT-NAME><EVENT-ID>9</EVENT-ID></SOMEIP-EVENT-DEPLOYMENT>
                 </EVENT-DEPLOYMENTS>
                 <SERVICE-INTERFACE-ID>42</SERVICE-INTERFACE-ID>
               </SOMEIP-SERVICE-INTERFACE-DEPLOYMENT>"#,
        )
        .unwrap();

        assert_eq!(services.len(), 1);
        let record = &services["enginestatus"];
        assert_eq!(record.interface_name, "SomeIp_SI_EngineStatus");
        assert_eq!(record.service_id, "42");
        assert_eq!(record.event_ids, vec!["7", "9"]);
        assert_eq!(record.event_ids_joined(), "7,9");
    }

    #[test]
    fn test_missing_service_id_defaults_to_empty() {
        let services = extract(
            r#"<SOMEIP-SERVICE-INTERFACE-DEPLOYMENT><SHORT-NAME>Door_SI</SHORT-NAME></SOMEIP-SERVICE-INTERFACE-DEPLOYMENT>"#,
        )
        .unwrap();

        let record = &services["door"];
        assert_eq!(record.service_id, "");
        assert!(record.event_ids.is_empty());
    }

    #[test]
    fn test_missing_short_name_is_fatal() {
        let result = extract(
            r#"<SOMEIP-SERVICE-INTERFACE-DEPLOYMENT><SERVICE-INTERFACE-ID>3</SERVICE-INTERFACE-ID></SOMEIP-SERVICE-INTERFACE-DEPLOYMENT>"#,
        );
        assert!(matches!(
            result,
            Err(ExtractError::MissingField { field: "SHORT-NAME", .. })
        ));
    }

    #[test]
    fn test_later_deployment_wins_on_collision() {
        let services = extract(
            r#"<SOMEIP-SERVICE-INTERFACE-DEPLOYMENT>
                 <SHORT-NAME>SomeIp_SI_Climate</SHORT-NAME>
                 <SERVICE-INTERFACE-ID>1</SERVICE-INTERFACE-ID>
               </SOMEIP-SERVICE-INTERFACE-DEPLOYMENT>
               <SOMEIP-SERVICE-INTERFACE-DEPLOYMENT>
                 <SHORT-NAME>Climate</SHORT-NAME>
                 <SERVICE-INTERFACE-ID>2</SERVICE-INTERFACE-ID>
               </SOMEIP-SERVICE-INTERFACE-DEPLOYMENT>"#,
        )
        .unwrap();

        assert_eq!(services.len(), 1);
        assert_eq!(services["climate"].interface_name, "Climate");
        assert_eq!(services["climate"].service_id, "2");
    }

    #[test]
    fn test_no_deployments() {
        assert!(extract("").unwrap().is_empty());
    }
}
