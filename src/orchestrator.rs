//! Generation orchestrator.
//!
//! Runs one generation end to end: grid layout, topology emission, document
//! output and the properties patch. Warnings are collected into the
//! [`GenerationReport`]; with `strict` set the first warning aborts the run.

use color_eyre::eyre::{bail, WrapErr};
use color_eyre::Result;
use log::info;
use std::path::PathBuf;

use crate::config::Config;
use crate::properties::{self, PatchReport};
use crate::topology::{build_topology, write_topology, GridLayout};
use crate::utils::validation::Validation;

/// Where and how to write a generation run
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Topology document path
    pub output: PathBuf,
    /// Properties file to patch, `None` to leave it alone
    pub properties: Option<PathBuf>,
    /// Treat warnings as fatal
    pub strict: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            output: PathBuf::from(crate::topology::DEFAULT_OUTPUT),
            properties: Some(PathBuf::from(properties::DEFAULT_PROPERTIES)),
            strict: false,
        }
    }
}

/// Outcome of a generation run
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub grid: GridLayout,
    /// Datacenters written to the document
    pub datacenters: usize,
    /// Area width and height in whole meters
    pub dimensions: (i64, i64),
    pub patch: Option<PatchReport>,
    /// Non-fatal findings, in the order they were raised
    pub warnings: Vec<String>,
}

/// Generate the topology described by `config`
pub fn generate(config: &Config, options: &GenerateOptions) -> Result<GenerationReport> {
    let mut warnings = Vec::new();

    let (grid, layout_check) = GridLayout::from_layout(&config.layout)
        .wrap_err_with(|| format!("Invalid {} layout", config.layout.kind()))?;
    record(layout_check, options.strict, &mut warnings)?;

    println!("{}", grid);

    let doc = build_topology(config, &grid)?;
    write_topology(&doc, &options.output)?;

    let dimensions = grid.dimensions();
    let patch = match &options.properties {
        Some(path) => {
            let report = properties::patch_area_size(path, dimensions.0, dimensions.1, options.strict)?;
            if let Some(msg) = report.validation().message() {
                warnings.push(msg.to_string());
            }
            Some(report)
        }
        None => {
            info!("Skipping properties patch");
            None
        }
    };

    info!(
        "Generated {} edge devices on a {}m x {}m area",
        doc.datacenters.len(),
        dimensions.0,
        dimensions.1
    );

    Ok(GenerationReport {
        datacenters: doc.datacenters.len(),
        grid,
        dimensions,
        patch,
        warnings,
    })
}

fn record(validation: Validation, strict: bool, warnings: &mut Vec<String>) -> Result<()> {
    let validation = validation.escalate(strict);
    validation.log();
    match validation {
        Validation::Ok => Ok(()),
        Validation::Warning(msg) => {
            warnings.push(msg);
            Ok(())
        }
        Validation::Fatal(msg) => bail!(msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Layout;
    use std::fs;

    fn options_in(dir: &std::path::Path, with_properties: bool) -> GenerateOptions {
        GenerateOptions {
            output: dir.join("edge_devices.xml"),
            properties: with_properties.then(|| dir.join("default_config.properties")),
            strict: false,
        }
    }

    #[test]
    fn test_generate_rectangle_preset() {
        let dir = tempfile::tempdir().unwrap();
        let options = options_in(dir.path(), true);
        fs::write(options.properties.as_ref().unwrap(), "area_x_size=0\narea_y_size=0\n").unwrap();

        let report = generate(&Config::rectangle_preset(), &options).unwrap();
        assert_eq!(report.datacenters, 90);
        assert_eq!(report.dimensions, (5000, 2000));
        assert!(report.warnings.is_empty());
        assert_eq!(
            fs::read_to_string(options.properties.as_ref().unwrap()).unwrap(),
            "area_x_size=5000\narea_y_size=2000\n"
        );
        assert!(options.output.exists());
    }

    #[test]
    fn test_square_mismatch_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let options = options_in(dir.path(), false);

        let mut config = Config::square_preset();
        config.layout = Layout::Square { edge_devices_total: 99, area_sq_km: 10.0 };

        let report = generate(&config, &options).unwrap();
        assert_eq!(report.datacenters, 100);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.patch.is_none());
    }

    #[test]
    fn test_strict_square_mismatch_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = options_in(dir.path(), false);
        options.strict = true;

        let mut config = Config::square_preset();
        config.layout = Layout::Square { edge_devices_total: 99, area_sq_km: 10.0 };

        assert!(generate(&config, &options).is_err());
        assert!(!options.output.exists());
    }

    #[test]
    fn test_missing_properties_file_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let options = options_in(dir.path(), true);
        assert!(generate(&Config::square_preset(), &options).is_err());
    }
}
