use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Grid layout selection
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Layout {
    /// Rectangle sized in kilometers with a fixed device density per kilometer
    Rectangle {
        x_size_km: f64,
        y_size_km: f64,
        edge_devices_per_km: f64,
    },
    /// Square grid derived from a device count target and an area target
    Square {
        edge_devices_total: u64,
        area_sq_km: f64,
    },
}

impl Layout {
    /// Short name used on the command line and in log output
    pub fn kind(&self) -> LayoutKind {
        match self {
            Layout::Rectangle { .. } => LayoutKind::Rectangle,
            Layout::Square { .. } => LayoutKind::Square,
        }
    }
}

/// Layout mode without its parameters
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    Rectangle,
    Square,
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutKind::Rectangle => write!(f, "rectangle"),
            LayoutKind::Square => write!(f, "square"),
        }
    }
}

/// Complete generator configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub layout: Layout,
    #[serde(default)]
    pub datacenter: DatacenterConfig,
    #[serde(default = "default_hosts_per_edge_device")]
    pub hosts_per_edge_device: usize,
    #[serde(default)]
    pub host: ResourceTemplate,
    #[serde(default = "default_vms_per_host")]
    pub vms_per_host: usize,
    #[serde(default)]
    pub vm: VmConfig,
}

impl Config {
    /// Built-in rectangle preset: 5 km x 2 km at 3 devices per km
    pub fn rectangle_preset() -> Self {
        Self {
            layout: Layout::Rectangle {
                x_size_km: 5.0,
                y_size_km: 2.0,
                edge_devices_per_km: 3.0,
            },
            datacenter: DatacenterConfig::default(),
            hosts_per_edge_device: 1,
            host: ResourceTemplate::new("8", "4000", "8000", "200000"),
            vms_per_host: 2,
            vm: VmConfig {
                vmm: "Xen".to_string(),
                resources: ResourceTemplate::new("2", "1000", "2000", "50000"),
            },
        }
    }

    /// Built-in square preset: 100 devices on 10 square km, zeroed resources
    pub fn square_preset() -> Self {
        Self {
            layout: Layout::Square {
                edge_devices_total: 100,
                area_sq_km: 10.0,
            },
            datacenter: DatacenterConfig::default(),
            hosts_per_edge_device: 1,
            host: ResourceTemplate::zeroed(),
            vms_per_host: 1,
            vm: VmConfig::default(),
        }
    }

    /// Preset for the given layout mode
    pub fn preset(kind: LayoutKind) -> Self {
        match kind {
            LayoutKind::Rectangle => Self::rectangle_preset(),
            LayoutKind::Square => Self::square_preset(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.layout {
            Layout::Rectangle { x_size_km, y_size_km, edge_devices_per_km } => {
                for (name, value) in [
                    ("x_size_km", *x_size_km),
                    ("y_size_km", *y_size_km),
                    ("edge_devices_per_km", *edge_devices_per_km),
                ] {
                    if !value.is_finite() || value <= 0.0 {
                        return Err(ValidationError::InvalidLayout(format!(
                            "{} must be a positive number, got {}",
                            name, value
                        )));
                    }
                }

                // Device counts along each axis must come out whole
                for (name, size) in [("x_size_km", *x_size_km), ("y_size_km", *y_size_km)] {
                    let count = size * edge_devices_per_km;
                    if (count - count.round()).abs() > 1e-9 || count.round() < 1.0 {
                        return Err(ValidationError::InvalidLayout(format!(
                            "{} * edge_devices_per_km = {} is not a positive whole number of devices",
                            name, count
                        )));
                    }
                }
            }
            Layout::Square { edge_devices_total, area_sq_km } => {
                if *edge_devices_total == 0 {
                    return Err(ValidationError::InvalidLayout(
                        "edge_devices_total must be at least 1".to_string(),
                    ));
                }
                if !area_sq_km.is_finite() || *area_sq_km <= 0.0 {
                    return Err(ValidationError::InvalidLayout(format!(
                        "area_sq_km must be a positive number, got {}",
                        area_sq_km
                    )));
                }
            }
        }

        for (name, value) in [
            ("datacenter.arch", &self.datacenter.arch),
            ("datacenter.os", &self.datacenter.os),
            ("datacenter.vmm", &self.datacenter.vmm),
            ("vm.vmm", &self.vm.vmm),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::InvalidTemplate(format!(
                    "{} cannot be empty",
                    name
                )));
            }
        }

        // The simulator counts place types as the highest level plus one
        let level = self.datacenter.attractiveness.parse::<u32>().ok();
        if level.and_then(|l| l.checked_add(1)).is_none() {
            return Err(ValidationError::InvalidTemplate(format!(
                "attractiveness must be an integer from 0 to {}, got '{}'",
                u32::MAX - 1,
                self.datacenter.attractiveness
            )));
        }

        Ok(())
    }
}

/// Descriptive tags and cost coefficients shared by every datacenter
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DatacenterConfig {
    pub arch: String,
    pub os: String,
    pub vmm: String,
    #[serde(deserialize_with = "verbatim")]
    pub cost_per_bw: String,
    #[serde(deserialize_with = "verbatim")]
    pub cost_per_sec: String,
    #[serde(deserialize_with = "verbatim")]
    pub cost_per_mem: String,
    #[serde(deserialize_with = "verbatim")]
    pub cost_per_storage: String,
    #[serde(deserialize_with = "verbatim")]
    pub attractiveness: String,
}

impl Default for DatacenterConfig {
    fn default() -> Self {
        Self {
            arch: "x86".to_string(),
            os: "Linux".to_string(),
            vmm: "Xen".to_string(),
            cost_per_bw: "0.1".to_string(),
            cost_per_sec: "3.0".to_string(),
            cost_per_mem: "0.05".to_string(),
            cost_per_storage: "0.1".to_string(),
            attractiveness: "0".to_string(),
        }
    }
}

/// Core count, compute rating, memory and storage, kept as emitted text
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ResourceTemplate {
    #[serde(deserialize_with = "verbatim")]
    pub core: String,
    #[serde(deserialize_with = "verbatim")]
    pub mips: String,
    #[serde(deserialize_with = "verbatim")]
    pub ram: String,
    #[serde(deserialize_with = "verbatim")]
    pub storage: String,
}

impl ResourceTemplate {
    pub fn new(core: &str, mips: &str, ram: &str, storage: &str) -> Self {
        Self {
            core: core.to_string(),
            mips: mips.to_string(),
            ram: ram.to_string(),
            storage: storage.to_string(),
        }
    }

    pub fn zeroed() -> Self {
        Self::new("0", "0", "0", "0")
    }
}

impl Default for ResourceTemplate {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// VM template: virtualization tag plus resources
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VmConfig {
    #[serde(default = "default_vmm")]
    pub vmm: String,
    #[serde(flatten)]
    pub resources: ResourceTemplate,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            vmm: default_vmm(),
            resources: ResourceTemplate::zeroed(),
        }
    }
}

fn default_vmm() -> String {
    "Xen".to_string()
}

fn default_hosts_per_edge_device() -> usize {
    1
}

fn default_vms_per_host() -> usize {
    1
}

/// Scalar accepted where the emitted document expects verbatim text
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
}

/// Accept a YAML string as-is, or render a YAML number with its display form
fn verbatim<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Text(s) => s,
        Scalar::Integer(i) => i.to_string(),
        Scalar::Float(f) => f.to_string(),
    })
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid layout configuration: {0}")]
    InvalidLayout(String),
    #[error("Invalid template configuration: {0}")]
    InvalidTemplate(String),
}
