//! Topology document checks.
//!
//! Reads an existing `edge_devices.xml` and applies the checks the edge
//! computing simulator performs when it loads the file: required attributes
//! and elements, a numeric attractiveness per location, and unique wlan ids.
//! Missing attributes or elements surface as deserialization errors.

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::types::EdgeDevices;

/// Counts the simulator derives from a topology document
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TopologySummary {
    pub datacenters: usize,
    pub hosts: usize,
    pub vms: usize,
    /// Highest attractiveness level plus one
    pub place_types: u32,
}

/// Document check failures
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CheckError {
    #[error("Datacenter {index} has a non-numeric attractiveness '{value}'")]
    InvalidAttractiveness { index: usize, value: String },
    #[error("Datacenter {index} has attractiveness {level}, too high to count place types")]
    AttractivenessOutOfRange { index: usize, level: u32 },
    #[error("wlan_id {wlan_id} is used by more than one datacenter")]
    DuplicateWlanId { wlan_id: usize },
    #[error("Datacenter {index} has an empty '{field}'")]
    EmptyField { index: usize, field: &'static str },
}

/// Parse a topology document from XML text
pub fn parse_topology(xml: &str) -> Result<EdgeDevices> {
    quick_xml::de::from_str(xml).wrap_err("Edge devices XML cannot be parsed")
}

/// Load and parse a topology document from disk
pub fn load_topology(path: &Path) -> Result<EdgeDevices> {
    info!("Loading topology from: {:?}", path);
    let xml = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read topology '{}'", path.display()))?;
    parse_topology(&xml).wrap_err_with(|| format!("Invalid topology '{}'", path.display()))
}

/// Check a parsed document and summarize it
pub fn check_topology(doc: &EdgeDevices) -> Result<TopologySummary, CheckError> {
    let mut wlan_ids = HashSet::with_capacity(doc.datacenters.len());
    let mut place_types = 0u32;

    for (index, dc) in doc.datacenters.iter().enumerate() {
        for (field, value) in [("arch", &dc.arch), ("os", &dc.os), ("vmm", &dc.vmm)] {
            if value.trim().is_empty() {
                return Err(CheckError::EmptyField { index, field });
            }
        }

        let level: u32 = dc.location.attractiveness.trim().parse().map_err(|_| {
            CheckError::InvalidAttractiveness {
                index,
                value: dc.location.attractiveness.clone(),
            }
        })?;
        let types = level
            .checked_add(1)
            .ok_or(CheckError::AttractivenessOutOfRange { index, level })?;
        place_types = place_types.max(types);

        if !wlan_ids.insert(dc.location.wlan_id) {
            return Err(CheckError::DuplicateWlanId { wlan_id: dc.location.wlan_id });
        }
    }

    Ok(TopologySummary {
        datacenters: doc.datacenters.len(),
        hosts: doc.host_count(),
        vms: doc.vm_count(),
        place_types,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::topology::emitter::build_topology;
    use crate::topology::grid::GridLayout;
    use crate::topology::writer::to_xml_string;

    const TWO_DEVICES: &str = r#"<?xml version='1.0' encoding='us-ascii'?>
<edge_devices>
  <datacenter arch="x86" os="Linux" vmm="Xen">
    <costPerBw>0.1</costPerBw>
    <costPerSec>3.0</costPerSec>
    <costPerMem>0.05</costPerMem>
    <costPerStorage>0.1</costPerStorage>
    <location>
      <x_pos>100</x_pos>
      <y_pos>100</y_pos>
      <wlan_id>0</wlan_id>
      <attractiveness>2</attractiveness>
    </location>
    <hosts>
      <host>
        <core>8</core><mips>4000</mips><ram>8000</ram><storage>200000</storage>
        <VMs>
          <VM vmm="Xen"><core>2</core><mips>1000</mips><ram>2000</ram><storage>50000</storage></VM>
        </VMs>
      </host>
    </hosts>
  </datacenter>
  <datacenter arch="x86" os="Linux" vmm="Xen">
    <costPerBw>0.1</costPerBw>
    <costPerSec>3.0</costPerSec>
    <costPerMem>0.05</costPerMem>
    <costPerStorage>0.1</costPerStorage>
    <location>
      <x_pos>300</x_pos>
      <y_pos>100</y_pos>
      <wlan_id>1</wlan_id>
      <attractiveness>0</attractiveness>
    </location>
    <hosts>
      <host>
        <core>8</core><mips>4000</mips><ram>8000</ram><storage>200000</storage>
        <VMs>
          <VM vmm="Xen"><core>2</core><mips>1000</mips><ram>2000</ram><storage>50000</storage></VM>
          <VM vmm="Xen"><core>2</core><mips>1000</mips><ram>2000</ram><storage>50000</storage></VM>
        </VMs>
      </host>
    </hosts>
  </datacenter>
</edge_devices>"#;

    #[test]
    fn test_check_handwritten_document() {
        let doc = parse_topology(TWO_DEVICES).unwrap();
        let summary = check_topology(&doc).unwrap();
        assert_eq!(
            summary,
            TopologySummary { datacenters: 2, hosts: 2, vms: 3, place_types: 3 }
        );
    }

    #[test]
    fn test_generated_document_parses_back() {
        let config = Config::rectangle_preset();
        let grid = GridLayout::rectangle(5.0, 2.0, 3.0).unwrap();
        let doc = build_topology(&config, &grid).unwrap();

        let parsed = parse_topology(&to_xml_string(&doc).unwrap()).unwrap();
        assert_eq!(parsed, doc);

        let summary = check_topology(&parsed).unwrap();
        assert_eq!(summary.datacenters, 90);
        assert_eq!(summary.hosts, 90);
        assert_eq!(summary.vms, 180);
        assert_eq!(summary.place_types, 1);
    }

    #[test]
    fn test_missing_attribute_is_rejected() {
        let xml = TWO_DEVICES.replacen(" arch=\"x86\"", "", 1);
        assert!(parse_topology(&xml).is_err());
    }

    #[test]
    fn test_missing_location_element_is_rejected() {
        let xml = TWO_DEVICES.replacen("<y_pos>100</y_pos>", "", 1);
        assert!(parse_topology(&xml).is_err());
    }

    #[test]
    fn test_duplicate_wlan_id() {
        let xml = TWO_DEVICES.replacen("<wlan_id>1</wlan_id>", "<wlan_id>0</wlan_id>", 1);
        let doc = parse_topology(&xml).unwrap();
        assert_eq!(check_topology(&doc), Err(CheckError::DuplicateWlanId { wlan_id: 0 }));
    }

    #[test]
    fn test_invalid_attractiveness() {
        let xml = TWO_DEVICES.replacen(
            "<attractiveness>0</attractiveness>",
            "<attractiveness>busy</attractiveness>",
            1,
        );
        let doc = parse_topology(&xml).unwrap();
        assert!(matches!(
            check_topology(&doc),
            Err(CheckError::InvalidAttractiveness { index: 1, .. })
        ));
    }

    #[test]
    fn test_attractiveness_at_u32_max_is_rejected() {
        let mut config = Config::square_preset();
        config.datacenter.attractiveness = u32::MAX.to_string();
        let (grid, _) = GridLayout::square(1, 1.0).unwrap();
        let doc = build_topology(&config, &grid).unwrap();

        assert_eq!(
            check_topology(&doc),
            Err(CheckError::AttractivenessOutOfRange { index: 0, level: u32::MAX })
        );
    }

    #[test]
    fn test_empty_document() {
        let doc = parse_topology("<edge_devices></edge_devices>").unwrap();
        let summary = check_topology(&doc).unwrap();
        assert_eq!(summary.datacenters, 0);
        assert_eq!(summary.place_types, 0);
    }
}
