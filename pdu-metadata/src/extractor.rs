//! Main extractor API
//!
//! The [`MetadataExtractor`] holds the service and RBS documents and runs the
//! extraction passes over them on demand. The free functions at the bottom of
//! this module cover the common one-shot cases.

use crate::arxml::{
    extract_pdus, extract_service_interfaces, extract_signal_compu_methods, extract_signal_lengths,
    ArxmlDocument, ArxmlTree, SignalCompuMethods,
};
use crate::config::ExtractorConfig;
use crate::correlate::correlate;
use crate::cycle_time::{infer_cycle_time, CycleTime};
use crate::types::{CompuMethodEntry, ExtractError, PduMap, PduMetadata, Result, ServiceMap};
use std::path::Path;

/// Entry point for all extraction operations
#[derive(Debug, Clone, Default)]
pub struct MetadataExtractor {
    config: ExtractorConfig,
    service: Option<ArxmlDocument>,
    rbs: Option<ArxmlDocument>,
}

impl MetadataExtractor {
    /// Create an extractor with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with a custom configuration
    pub fn with_config(config: ExtractorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Load the service-definition ARXML file
    ///
    /// # Example
    /// ```no_run
    /// use pdu_metadata::MetadataExtractor;
    /// use std::path::Path;
    ///
    /// let mut extractor = MetadataExtractor::new();
    /// extractor.load_service(Path::new("Service_Instance.arxml")).unwrap();
    /// let services = extractor.service_interfaces().unwrap();
    /// ```
    pub fn load_service(&mut self, path: &Path) -> Result<()> {
        self.service = Some(ArxmlDocument::from_path(path)?);
        Ok(())
    }

    /// Load the RBS (communication) ARXML file
    pub fn load_rbs(&mut self, path: &Path) -> Result<()> {
        self.rbs = Some(ArxmlDocument::from_path(path)?);
        Ok(())
    }

    /// Use an in-memory service document
    pub fn set_service(&mut self, document: ArxmlDocument) {
        self.service = Some(document);
    }

    /// Use an in-memory RBS document
    pub fn set_rbs(&mut self, document: ArxmlDocument) {
        self.rbs = Some(document);
    }

    pub fn has_service(&self) -> bool {
        self.service.is_some()
    }

    pub fn has_rbs(&self) -> bool {
        self.rbs.is_some()
    }

    /// Service interfaces keyed by normalized name
    pub fn service_interfaces(&self) -> Result<ServiceMap> {
        let document = self.service.as_ref().ok_or(ExtractError::DocumentNotLoaded("service"))?;
        service_interfaces_of(document, &self.config)
    }

    /// PDU records keyed by PDU name
    pub fn pdus(&self) -> Result<PduMap> {
        rbs_pdus_of(self.rbs_document()?, &self.config)
    }

    /// Compu-method entries and the per-signal compu-method strings
    pub fn compu_methods(&self) -> Result<(Vec<CompuMethodEntry>, SignalCompuMethods)> {
        let tree = self.rbs_document()?.tree(&self.config.namespace)?;
        Ok(extract_signal_compu_methods(&tree))
    }

    /// Cycle time inference details for every PDU, in PDU name order
    pub fn cycle_times(&self) -> Result<Vec<(String, CycleTime)>> {
        Ok(self
            .pdus()?
            .into_keys()
            .map(|name| {
                let cycle_time = infer_cycle_time(&name);
                (name, cycle_time)
            })
            .collect())
    }

    /// Correlate both documents into the final metadata
    pub fn generate(&self) -> Result<PduMetadata> {
        let services = self.service_interfaces()?;
        let pdus = self.pdus()?;
        Ok(correlate(&services, &pdus))
    }

    fn rbs_document(&self) -> Result<&ArxmlDocument> {
        self.rbs.as_ref().ok_or(ExtractError::DocumentNotLoaded("RBS"))
    }
}

/// Extract service interfaces from an in-memory document
pub fn service_interfaces_of(document: &ArxmlDocument, config: &ExtractorConfig) -> Result<ServiceMap> {
    let tree = document.tree(&config.namespace)?;
    extract_service_interfaces(&tree)
}

/// Extract PDU records from an in-memory RBS document
pub fn rbs_pdus_of(document: &ArxmlDocument, config: &ExtractorConfig) -> Result<PduMap> {
    let tree = document.tree(&config.namespace)?;
    Ok(pdus_from_tree(&tree, config))
}

fn pdus_from_tree(tree: &ArxmlTree<'_>, config: &ExtractorConfig) -> PduMap {
    let lengths = extract_signal_lengths(tree);
    let compu_methods = if config.resolve_compu_methods {
        extract_signal_compu_methods(tree).1
    } else {
        SignalCompuMethods::new()
    };
    extract_pdus(tree, &lengths, &compu_methods)
}

/// Parse a service-definition ARXML file
pub fn parse_service_interfaces(path: &Path, config: &ExtractorConfig) -> Result<ServiceMap> {
    service_interfaces_of(&ArxmlDocument::from_path(path)?, config)
}

/// Parse an RBS ARXML file
pub fn parse_rbs_pdus(path: &Path, config: &ExtractorConfig) -> Result<PduMap> {
    rbs_pdus_of(&ArxmlDocument::from_path(path)?, config)
}

/// Run the whole pipeline over a service document and an RBS document
pub fn generate_pdu_metadata(
    service: &ArxmlDocument,
    rbs: &ArxmlDocument,
    config: &ExtractorConfig,
) -> Result<PduMetadata> {
    let services = service_interfaces_of(service, config)?;
    let pdus = rbs_pdus_of(rbs, config)?;
    Ok(correlate(&services, &pdus))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVICE: &str = r#"<AUTOSAR xmlns="http://autosar.org/schema/r4.0">
        <SOMEIP-SERVICE-INTERFACE-DEPLOYMENT>
          <SHORT-NAME>SomeIp_SI_Seat_10</SHORT-NAME>
          <SERVICE-INTERFACE-ID>5</SERVICE-INTERFACE-ID>
        </SOMEIP-SERVICE-INTERFACE-DEPLOYMENT>
      </AUTOSAR>"#;

    const RBS: &str = r#"<AUTOSAR xmlns="http://autosar.org/schema/r4.0">
        <I-SIGNAL>
          <SHORT-NAME>Seat_Pos</SHORT-NAME>
          <LENGTH>8</LENGTH>
          <SW-DATA-DEF-PROPS><COMPU-METHOD-REF>/CM/CM_Seat</COMPU-METHOD-REF></SW-DATA-DEF-PROPS>
        </I-SIGNAL>
        <COMPU-METHOD>
          <SHORT-NAME>CM_Seat</SHORT-NAME>
          <COMPU-INTERNAL-TO-PHYS><COMPU-SCALES>
            <COMPU-SCALE><LOWER-LIMIT>3</LOWER-LIMIT></COMPU-SCALE>
          </COMPU-SCALES></COMPU-INTERNAL-TO-PHYS>
        </COMPU-METHOD>
        <I-SIGNAL-I-PDU>
          <SHORT-NAME>Seat_10</SHORT-NAME>
          <LENGTH>16</LENGTH>
          <I-SIGNAL-TO-PDU-MAPPINGS>
            <I-SIGNAL-TO-I-PDU-MAPPING><I-SIGNAL-REF>/S/Seat_Pos</I-SIGNAL-REF></I-SIGNAL-TO-I-PDU-MAPPING>
          </I-SIGNAL-TO-PDU-MAPPINGS>
        </I-SIGNAL-I-PDU>
      </AUTOSAR>"#;

    fn loaded(config: ExtractorConfig) -> MetadataExtractor {
        let mut extractor = MetadataExtractor::with_config(config);
        extractor.set_service(ArxmlDocument::from_string("service.arxml", SERVICE));
        extractor.set_rbs(ArxmlDocument::from_string("rbs.arxml", RBS));
        extractor
    }

    #[test]
    fn test_documents_must_be_loaded() {
        let extractor = MetadataExtractor::new();
        assert!(!extractor.has_service());
        assert!(matches!(
            extractor.service_interfaces(),
            Err(ExtractError::DocumentNotLoaded("service"))
        ));
        assert!(matches!(extractor.pdus(), Err(ExtractError::DocumentNotLoaded("RBS"))));
        assert!(extractor.generate().is_err());
    }

    #[test]
    fn test_generate() {
        let metadata = loaded(ExtractorConfig::default()).generate().unwrap();
        let seat = metadata.message("Seat_10").unwrap();

        assert_eq!(seat.service_interface, "SomeIp_SI_Seat_10");
        assert_eq!(seat.service_id, "5");
        assert_eq!(seat.cycle_time, "0.01");
        assert_eq!(seat.signals["Seat_Pos"].compu_method, "3.CM_Seat");
        assert_eq!(seat.signals["Seat_Pos"].start_bit, -1);
    }

    #[test]
    fn test_compu_resolution_can_be_disabled() {
        let extractor = loaded(ExtractorConfig::new().with_compu_methods(false));
        let pdus = extractor.pdus().unwrap();
        assert_eq!(pdus["Seat_10"].signals["Seat_Pos"].compu_method, "0.NoCompuMethod");
    }

    #[test]
    fn test_other_namespace_finds_nothing() {
        let extractor = loaded(ExtractorConfig::new().with_namespace("http://autosar.org/schema/r3.0"));
        assert!(extractor.generate().unwrap().is_empty());
        assert!(extractor.service_interfaces().unwrap().is_empty());
    }

    #[test]
    fn test_cycle_times_and_compu_methods() {
        let extractor = loaded(ExtractorConfig::default());

        let cycle_times = extractor.cycle_times().unwrap();
        assert_eq!(cycle_times.len(), 1);
        assert_eq!(cycle_times[0].0, "Seat_10");
        assert_eq!(cycle_times[0].1.extracted, "10");

        let (entries, methods) = extractor.compu_methods().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(methods.compu_method_of("Seat_Pos"), "3.CM_Seat");
    }

    #[test]
    fn test_free_functions_match_extractor() {
        let config = ExtractorConfig::default();
        let service = ArxmlDocument::from_string("service.arxml", SERVICE);
        let rbs = ArxmlDocument::from_string("rbs.arxml", RBS);

        let metadata = generate_pdu_metadata(&service, &rbs, &config).unwrap();
        assert_eq!(metadata, loaded(config).generate().unwrap());
    }
}
