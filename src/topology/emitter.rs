//! Topology emission.
//!
//! Walks the grid with X as the outer loop and Y as the inner loop and
//! creates one datacenter per cell. The host list is built once from the
//! configured templates and shared by every datacenter.

use std::sync::Arc;

use log::{debug, info};

use super::grid::GridLayout;
use super::types::{Datacenter, EdgeDevices, Host, Hosts, Location, Vm, Vms};
use crate::config::Config;
use crate::utils::validation::Validation;

/// Internal consistency failures of the emitter
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EmitError {
    #[error("Emitter consistency check failed: {0}")]
    Inconsistent(String),
}

/// Check that the running counter matches the row-major index of `(ix, iy)`
pub fn check_index(counter: usize, grid: &GridLayout, ix: usize, iy: usize) -> Validation {
    let expected = grid.linear_index(ix, iy);
    if counter == expected {
        Validation::Ok
    } else {
        Validation::Fatal(format!(
            "Edge device counter {} does not match wlan_id {} at cell ({}, {})",
            counter, expected, ix, iy
        ))
    }
}

/// Check that the final counter matches the grid size
pub fn check_total(counter: usize, grid: &GridLayout) -> Validation {
    if counter == grid.total() {
        Validation::Ok
    } else {
        Validation::Fatal(format!(
            "Emitted {} edge devices but the grid holds {}",
            counter,
            grid.total()
        ))
    }
}

/// Build the host list shared by every datacenter
pub fn build_hosts(config: &Config) -> Hosts {
    let vm = Vm {
        vmm: config.vm.vmm.clone(),
        core: config.vm.resources.core.clone(),
        mips: config.vm.resources.mips.clone(),
        ram: config.vm.resources.ram.clone(),
        storage: config.vm.resources.storage.clone(),
    };

    let host = Host {
        core: config.host.core.clone(),
        mips: config.host.mips.clone(),
        ram: config.host.ram.clone(),
        storage: config.host.storage.clone(),
        vms: Vms {
            vms: vec![vm; config.vms_per_host],
        },
    };

    Hosts {
        hosts: vec![host; config.hosts_per_edge_device],
    }
}

/// Build the complete topology document for `grid`
pub fn build_topology(config: &Config, grid: &GridLayout) -> Result<EdgeDevices, EmitError> {
    let hosts = Arc::new(build_hosts(config));
    let dc = &config.datacenter;

    let mut datacenters = Vec::with_capacity(grid.total());
    let mut counter = 0usize;

    for ix in 0..grid.count_x {
        for iy in 0..grid.count_y {
            let wlan_id = grid.linear_index(ix, iy);
            let (x_pos, y_pos) = grid.position(ix, iy);
            debug!("Device {} at position ({}, {})", wlan_id, x_pos, y_pos);

            datacenters.push(Datacenter {
                arch: dc.arch.clone(),
                os: dc.os.clone(),
                vmm: dc.vmm.clone(),
                cost_per_bw: dc.cost_per_bw.clone(),
                cost_per_sec: dc.cost_per_sec.clone(),
                cost_per_mem: dc.cost_per_mem.clone(),
                cost_per_storage: dc.cost_per_storage.clone(),
                location: Location {
                    x_pos,
                    y_pos,
                    wlan_id,
                    attractiveness: dc.attractiveness.clone(),
                },
                hosts: Arc::clone(&hosts),
            });

            ensure(check_index(counter, grid, ix, iy))?;
            counter += 1;
        }
    }

    ensure(check_total(counter, grid))?;

    info!(
        "Built {} datacenters with {} host(s) each and {} VM(s) per host",
        datacenters.len(),
        config.hosts_per_edge_device,
        config.vms_per_host
    );

    Ok(EdgeDevices { datacenters })
}

fn ensure(validation: Validation) -> Result<(), EmitError> {
    validation.log();
    match validation {
        Validation::Fatal(msg) => Err(EmitError::Inconsistent(msg)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_rectangle_preset_topology() {
        let config = Config::rectangle_preset();
        let grid = GridLayout::rectangle(5.0, 2.0, 3.0).unwrap();
        let doc = build_topology(&config, &grid).unwrap();

        assert_eq!(doc.datacenters.len(), 90);
        assert_eq!(doc.host_count(), 90);
        assert_eq!(doc.vm_count(), 180);

        let first = &doc.datacenters[0];
        assert_eq!(first.location.x_pos, 167);
        assert_eq!(first.location.y_pos, 167);
        assert_eq!(first.location.wlan_id, 0);
        assert_eq!(first.location.attractiveness, "0");
        assert_eq!(first.arch, "x86");
        assert_eq!(first.cost_per_sec, "3.0");

        // Grid cell (1, 0) follows the full first column
        let second_column = &doc.datacenters[6];
        assert_eq!(second_column.location.wlan_id, 6);
        assert_eq!(second_column.location.x_pos, 500);
        assert_eq!(second_column.location.y_pos, 167);

        let ids: HashSet<usize> = doc.datacenters.iter().map(|dc| dc.location.wlan_id).collect();
        assert_eq!(ids.len(), 90);
        assert!(ids.iter().all(|id| *id < 90));
    }

    #[test]
    fn test_hosts_are_shared() {
        let config = Config::rectangle_preset();
        let grid = GridLayout::rectangle(1.0, 1.0, 2.0).unwrap();
        let doc = build_topology(&config, &grid).unwrap();

        assert_eq!(doc.datacenters.len(), 4);
        assert!(Arc::ptr_eq(&doc.datacenters[0].hosts, &doc.datacenters[3].hosts));

        let host = &doc.datacenters[0].hosts.hosts[0];
        assert_eq!(host.core, "8");
        assert_eq!(host.storage, "200000");
        assert_eq!(host.vms.vms.len(), 2);
        assert_eq!(host.vms.vms[1].vmm, "Xen");
        assert_eq!(host.vms.vms[1].mips, "1000");
    }

    #[test]
    fn test_zero_hosts_and_vms() {
        let mut config = Config::square_preset();
        config.hosts_per_edge_device = 0;
        let (grid, _) = GridLayout::square(4, 1.0).unwrap();
        let doc = build_topology(&config, &grid).unwrap();
        assert_eq!(doc.datacenters.len(), 4);
        assert_eq!(doc.host_count(), 0);

        config.hosts_per_edge_device = 3;
        config.vms_per_host = 0;
        let doc = build_topology(&config, &grid).unwrap();
        assert_eq!(doc.host_count(), 12);
        assert_eq!(doc.vm_count(), 0);
    }

    #[test]
    fn test_ensure_fails_only_on_fatal() {
        assert_eq!(ensure(Validation::Ok), Ok(()));
        assert_eq!(ensure(Validation::Warning("odd".to_string())), Ok(()));
        assert_eq!(
            ensure(Validation::Fatal("broken".to_string())),
            Err(EmitError::Inconsistent("broken".to_string()))
        );
    }

    #[test]
    fn test_counter_checks() {
        let grid = GridLayout::rectangle(5.0, 2.0, 3.0).unwrap();
        assert!(check_index(6, &grid, 1, 0).is_ok());
        assert!(check_index(5, &grid, 1, 0).is_fatal());
        assert!(check_total(90, &grid).is_ok());

        let validation = check_total(89, &grid);
        assert!(validation.is_fatal());
        assert_eq!(
            validation.message(),
            Some("Emitted 89 edge devices but the grid holds 90")
        );
    }
}
