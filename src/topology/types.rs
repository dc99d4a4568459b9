//! Edge topology document types.
//!
//! These structures mirror the `edge_devices.xml` document consumed by the
//! edge computing simulator. Field order is element order: serialization
//! emits children exactly as declared here. Attributes use quick-xml's `@`
//! prefix convention.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Root of the topology document
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename = "edge_devices")]
pub struct EdgeDevices {
    /// One datacenter per grid cell, in row-major order
    #[serde(rename = "datacenter", default)]
    pub datacenters: Vec<Datacenter>,
}

/// A simulated edge device modelled as a datacenter
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Datacenter {
    #[serde(rename = "@arch")]
    pub arch: String,
    #[serde(rename = "@os")]
    pub os: String,
    #[serde(rename = "@vmm")]
    pub vmm: String,
    #[serde(rename = "costPerBw")]
    pub cost_per_bw: String,
    #[serde(rename = "costPerSec")]
    pub cost_per_sec: String,
    #[serde(rename = "costPerMem")]
    pub cost_per_mem: String,
    #[serde(rename = "costPerStorage")]
    pub cost_per_storage: String,
    pub location: Location,
    /// Host list, shared by every datacenter of a generated document
    pub hosts: Arc<Hosts>,
}

/// Placement of a datacenter on the simulated area
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Location {
    pub x_pos: i64,
    pub y_pos: i64,
    pub wlan_id: usize,
    pub attractiveness: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Hosts {
    #[serde(rename = "host", default)]
    pub hosts: Vec<Host>,
}

/// Physical machine template
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Host {
    pub core: String,
    pub mips: String,
    pub ram: String,
    pub storage: String,
    #[serde(rename = "VMs")]
    pub vms: Vms,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Vms {
    #[serde(rename = "VM", default)]
    pub vms: Vec<Vm>,
}

/// Virtual machine template
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Vm {
    #[serde(rename = "@vmm")]
    pub vmm: String,
    pub core: String,
    pub mips: String,
    pub ram: String,
    pub storage: String,
}

impl EdgeDevices {
    /// Total number of hosts across all datacenters
    pub fn host_count(&self) -> usize {
        self.datacenters.iter().map(|dc| dc.hosts.hosts.len()).sum()
    }

    /// Total number of VMs across all hosts
    pub fn vm_count(&self) -> usize {
        self.datacenters
            .iter()
            .flat_map(|dc| dc.hosts.hosts.iter())
            .map(|host| host.vms.vms.len())
            .sum()
    }
}
