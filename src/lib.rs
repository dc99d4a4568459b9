//! # EdgeGrid - Topology generator for edge computing simulations
//!
//! This library generates the `edge_devices.xml` topology consumed by edge
//! computing simulators, with edge datacenters placed on a regular grid, and
//! keeps the simulator's `default_config.properties` area size in step with
//! the generated grid.
//!
//! ## Layouts
//!
//! - **Rectangle**: an X by Y kilometer area with a fixed number of edge
//!   devices per kilometer on both axes.
//! - **Square**: a target device count on a target area; the grid side is
//!   the rounded square root of the count.
//!
//! In both layouts devices are spread with uniform spacing and kept half a
//! spacing away from the area boundary. Each device becomes a datacenter
//! holding identical hosts, each holding identical VMs.
//!
//! ## Architecture
//!
//! - `config`: Type-safe configuration structures, presets and YAML parsing
//! - `config_loader`: Configuration file loading and preset selection
//! - `topology`: Grid math, document types, emission, output and checks
//! - `properties`: In-place patching of the simulator properties file
//! - `utils`: Validation outcomes shared by the consistency checks
//! - `orchestrator`: A full generation run
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use edgegrid::{config::Config, orchestrator};
//!
//! let config = Config::rectangle_preset();
//! let report = orchestrator::generate(&config, &orchestrator::GenerateOptions::default())?;
//! assert_eq!(report.datacenters, 90);
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Configuration Format
//!
//! ```yaml
//! layout:
//!   type: rectangle        # or: square
//!   x_size_km: 5
//!   y_size_km: 2
//!   edge_devices_per_km: 3
//! datacenter:
//!   arch: "x86"
//!   os: "Linux"
//!   vmm: "Xen"
//!   cost_per_sec: "3.0"
//! hosts_per_edge_device: 1
//! host: { core: "8", mips: "4000", ram: "8000", storage: "200000" }
//! vms_per_host: 2
//! vm: { vmm: "Xen", core: "2", mips: "1000", ram: "2000", storage: "50000" }
//! ```
//!
//! ## Error Handling
//!
//! Application-level functions return `color_eyre::Result`. Module-level
//! failures are `thiserror` enums, and non-fatal findings are reported as
//! [`utils::Validation`] values.

pub mod config;
pub mod config_loader;
pub mod orchestrator;
pub mod properties;
pub mod topology;
pub mod utils;
