//! Edge topology module.
//!
//! This module contains the grid math, the document types, and the code that
//! emits, serializes and checks the `edge_devices.xml` topology.

pub mod checker;
pub mod emitter;
pub mod grid;
pub mod types;
pub mod writer;

// Re-export key types and functions for easier access
pub use checker::{check_topology, load_topology, CheckError, TopologySummary};
pub use emitter::{build_topology, EmitError};
pub use grid::{GridLayout, LayoutError};
pub use types::EdgeDevices;
pub use writer::{to_xml_string, write_topology, DEFAULT_OUTPUT};
