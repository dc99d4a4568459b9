//! Properties file patching.
//!
//! Rewrites `key=value` lines of the simulator's properties file in place.
//! Only lines that start with the key followed by `=` are touched; every
//! other line, including comments and line endings, is kept byte for byte.

use color_eyre::eyre::{bail, WrapErr};
use color_eyre::Result;
use log::{info, warn};
use regex::{NoExpand, Regex};
use std::fs;
use std::path::Path;

use crate::utils::validation::{most_severe, Validation};

/// Default properties file, relative to the working directory
pub const DEFAULT_PROPERTIES: &str = "default_config.properties";

pub const AREA_X_KEY: &str = "area_x_size";
pub const AREA_Y_KEY: &str = "area_y_size";

/// Number of lines rewritten per key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
    pub substitutions: Vec<(String, usize)>,
}

impl PatchReport {
    /// Warning for every key that matched no line
    pub fn validation(&self) -> Validation {
        most_severe(self.substitutions.iter().map(|(key, count)| {
            if *count == 0 {
                Validation::Warning(format!(
                    "No '{}=' line found, 0 substitutions made",
                    key
                ))
            } else {
                Validation::Ok
            }
        }))
    }

    /// Lines rewritten for `key`
    pub fn count(&self, key: &str) -> usize {
        self.substitutions
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, count)| *count)
            .sum()
    }
}

/// Replace the value of every `key=` line in `content`.
///
/// Returns the new text and the number of lines rewritten.
///
/// # Examples
/// ```
/// use edgegrid::properties::patch_text;
///
/// let (text, count) = patch_text("# area\narea_x_size=10\n", "area_x_size", "5000").unwrap();
/// assert_eq!(text, "# area\narea_x_size=5000\n");
/// assert_eq!(count, 1);
/// ```
pub fn patch_text(content: &str, key: &str, value: &str) -> Result<(String, usize), regex::Error> {
    // A carriage return stays with the line ending, not the value
    let re = Regex::new(&format!(r"(?m)^{}=[^\r\n]*", regex::escape(key)))?;

    let count = re.find_iter(content).count();
    if count == 0 {
        return Ok((content.to_string(), 0));
    }
    let replacement = format!("{}={}", key, value);
    Ok((re.replace_all(content, NoExpand(&replacement)).into_owned(), count))
}

/// Apply `updates` to the properties file at `path`.
///
/// In strict mode a key that matches no line aborts before the file is
/// rewritten.
pub fn patch_properties(path: &Path, updates: &[(&str, String)], strict: bool) -> Result<PatchReport> {
    let mut content = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read properties file '{}'", path.display()))?;

    let mut substitutions = Vec::with_capacity(updates.len());
    for (key, value) in updates {
        let (patched, count) = patch_text(&content, key, value)?;
        info!("Set {}={} ({} line(s))", key, value, count);
        content = patched;
        substitutions.push((key.to_string(), count));
    }

    let report = PatchReport { substitutions };
    match report.validation().escalate(strict) {
        Validation::Fatal(msg) => bail!("{} in '{}'", msg, path.display()),
        Validation::Warning(msg) => warn!("{} in '{}'", msg, path.display()),
        Validation::Ok => {}
    }

    fs::write(path, content)
        .wrap_err_with(|| format!("Failed to write properties file '{}'", path.display()))?;

    Ok(report)
}

/// Set the area width and height in meters
pub fn patch_area_size(path: &Path, width: i64, height: i64, strict: bool) -> Result<PatchReport> {
    info!("Replacing area size values in {:?}", path);
    patch_properties(
        path,
        &[(AREA_X_KEY, width.to_string()), (AREA_Y_KEY, height.to_string())],
        strict,
    )
}
