use crate::config::{Config, LayoutKind};
use color_eyre::eyre::{bail, WrapErr};
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::Path;

/// Load and parse configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration file '{}'", config_path.display()))?;

    let config: Config = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse configuration file '{}'", config_path.display()))?;

    info!("Detected {} layout configuration", config.layout.kind());

    config.validate()?;

    Ok(config)
}

/// Resolve the configuration for a run: the file when one is given, the
/// built-in preset otherwise. A layout requested next to a file must agree
/// with the file.
pub fn resolve_config(config_path: Option<&Path>, layout: Option<LayoutKind>) -> Result<Config> {
    match config_path {
        Some(path) => {
            let config = load_config(path)?;
            if let Some(requested) = layout {
                if requested != config.layout.kind() {
                    bail!(
                        "Requested {} layout but '{}' describes a {} layout",
                        requested,
                        path.display(),
                        config.layout.kind()
                    );
                }
            }
            Ok(config)
        }
        None => {
            let kind = layout.unwrap_or(LayoutKind::Rectangle);
            info!("No configuration file given, using built-in {} preset", kind);
            let config = Config::preset(kind);
            config.validate()?;
            Ok(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Layout;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SQUARE_YAML: &str = r#"
layout:
  type: square
  edge_devices_total: 49
  area_sq_km: 4
"#;

    #[test]
    fn test_load_square_config() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", SQUARE_YAML).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(
            config.layout,
            Layout::Square { edge_devices_total: 49, area_sq_km: 4.0 }
        );
    }

    #[test]
    fn test_load_invalid_config_fails() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(
            temp_file,
            "layout:\n  type: rectangle\n  x_size_km: 1\n  y_size_km: 1\n  edge_devices_per_km: -2\n"
        )
        .unwrap();

        assert!(load_config(temp_file.path()).is_err());
    }

    #[test]
    fn test_missing_config_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(&dir.path().join("absent.yaml")).is_err());
    }

    #[test]
    fn test_resolve_presets() {
        let config = resolve_config(None, None).unwrap();
        assert_eq!(config, Config::rectangle_preset());

        let config = resolve_config(None, Some(LayoutKind::Square)).unwrap();
        assert_eq!(config, Config::square_preset());
    }

    #[test]
    fn test_resolve_layout_conflict() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", SQUARE_YAML).unwrap();

        assert!(resolve_config(Some(temp_file.path()), Some(LayoutKind::Square)).is_ok());
        assert!(resolve_config(Some(temp_file.path()), Some(LayoutKind::Rectangle)).is_err());
    }
}
