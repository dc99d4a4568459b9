//! Grid layout calculation.
//!
//! Turns a [`Layout`] into device counts per axis, the spacing between
//! neighbouring devices and the margin to the area boundary. Devices sit on a
//! regular lattice offset by half a spacing from the origin, so no device is
//! placed exactly on the edge of the area.

use crate::config::Layout;
use crate::utils::validation::Validation;
use std::fmt;

/// Meters per kilometer
const METERS_PER_KM: f64 = 1000.0;

/// Resolved grid geometry
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    /// Devices along the X axis
    pub count_x: usize,
    /// Devices along the Y axis
    pub count_y: usize,
    /// Distance between adjacent devices in meters
    pub spacing: f64,
    /// Distance between the outermost devices and the area boundary in meters
    pub edge_offset: f64,
    /// Physical area width in meters
    pub width_m: f64,
    /// Physical area height in meters
    pub height_m: f64,
    /// Area in square kilometers, as configured
    pub area_sq_km: f64,
    /// Shape of the area, used for the summary
    pub shape: Shape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Rectangle,
    Square,
}

/// Grid calculation errors
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LayoutError {
    #[error("{axis} axis would hold {count} devices, expected a positive whole number")]
    FractionalCount { axis: char, count: f64 },
    #[error("Square grid needs at least one device, got {0}")]
    EmptySquare(u64),
    #[error("Grid of {count_x} x {count_y} devices is too large to generate")]
    TooLarge { count_x: usize, count_y: usize },
    #[error("{name} must be a positive number, got {value}")]
    NonPositive { name: &'static str, value: f64 },
}

/// Round half to even, the rule used for every real-to-integer conversion in
/// the generated output
pub fn round_half_even(value: f64) -> i64 {
    value.round_ties_even() as i64
}

impl GridLayout {
    /// Compute the grid for any layout mode.
    ///
    /// Returns the grid together with the outcome of the count check: a
    /// square layout whose requested count is not a perfect square yields a
    /// warning and realizes the nearest perfect square instead.
    pub fn from_layout(layout: &Layout) -> Result<(GridLayout, Validation), LayoutError> {
        match layout {
            Layout::Rectangle { x_size_km, y_size_km, edge_devices_per_km } => {
                let grid = Self::rectangle(*x_size_km, *y_size_km, *edge_devices_per_km)?;
                Ok((grid, Validation::Ok))
            }
            Layout::Square { edge_devices_total, area_sq_km } => {
                Self::square(*edge_devices_total, *area_sq_km)
            }
        }
    }

    /// Rectangle sized in kilometers with `per_km` devices per kilometer on
    /// both axes
    pub fn rectangle(x_size_km: f64, y_size_km: f64, per_km: f64) -> Result<GridLayout, LayoutError> {
        positive("x_size_km", x_size_km)?;
        positive("y_size_km", y_size_km)?;
        positive("edge_devices_per_km", per_km)?;

        let count_x = whole_count('X', x_size_km * per_km)?;
        let count_y = whole_count('Y', y_size_km * per_km)?;
        checked_total(count_x, count_y)?;

        let spacing = METERS_PER_KM / per_km;

        Ok(GridLayout {
            count_x,
            count_y,
            spacing,
            edge_offset: spacing / 2.0,
            width_m: x_size_km * METERS_PER_KM,
            height_m: y_size_km * METERS_PER_KM,
            area_sq_km: x_size_km * y_size_km,
            shape: Shape::Rectangle,
        })
    }

    /// Square of `area_sq_km` holding roughly `requested` devices
    pub fn square(requested: u64, area_sq_km: f64) -> Result<(GridLayout, Validation), LayoutError> {
        positive("area_sq_km", area_sq_km)?;

        let side = round_half_even((requested as f64).sqrt());
        if side < 1 {
            return Err(LayoutError::EmptySquare(requested));
        }
        let side = usize::try_from(side)
            .map_err(|_| LayoutError::TooLarge { count_x: usize::MAX, count_y: usize::MAX })?;
        let realized = checked_total(side, side)? as u64;

        let validation = if realized != requested {
            Validation::Warning(format!(
                "Generating {} edge devices instead of the requested {} ({} is not a perfect square)",
                realized, requested, requested
            ))
        } else {
            Validation::Ok
        };

        let size_m = area_sq_km.sqrt() * METERS_PER_KM;
        let spacing = size_m / side as f64;

        let grid = GridLayout {
            count_x: side,
            count_y: side,
            spacing,
            edge_offset: spacing / 2.0,
            width_m: size_m,
            height_m: size_m,
            area_sq_km,
            shape: Shape::Square,
        };
        Ok((grid, validation))
    }

    /// Number of devices on the grid, checked against overflow on construction
    pub fn total(&self) -> usize {
        self.count_x * self.count_y
    }

    /// Row-major index of cell `(ix, iy)`, X outer and Y inner
    pub fn linear_index(&self, ix: usize, iy: usize) -> usize {
        ix * self.count_y + iy
    }

    /// Position of cell `(ix, iy)` in whole meters
    pub fn position(&self, ix: usize, iy: usize) -> (i64, i64) {
        (
            round_half_even(ix as f64 * self.spacing + self.edge_offset),
            round_half_even(iy as f64 * self.spacing + self.edge_offset),
        )
    }

    /// Area width and height rounded to whole meters
    pub fn dimensions(&self) -> (i64, i64) {
        (round_half_even(self.width_m), round_half_even(self.height_m))
    }
}

impl fmt::Display for GridLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = self.dimensions();
        let (shape, approx) = match self.shape {
            Shape::Rectangle => ("rectangle", "="),
            Shape::Square => ("square", "~"),
        };
        writeln!(
            f,
            "Generating {}*{}={} edge devices in a {} of {}m*{}m ({}{} square km)",
            self.count_x,
            self.count_y,
            self.total(),
            shape,
            width,
            height,
            approx,
            self.area_sq_km
        )?;
        writeln!(f, "Distance between edge devices: {:.2}m", self.spacing)?;
        write!(
            f,
            "Distance between edge devices and edge of the area: {:.2}m",
            self.edge_offset
        )
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), LayoutError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LayoutError::NonPositive { name, value })
    }
}

fn checked_total(count_x: usize, count_y: usize) -> Result<usize, LayoutError> {
    count_x
        .checked_mul(count_y)
        .ok_or(LayoutError::TooLarge { count_x, count_y })
}

fn whole_count(axis: char, count: f64) -> Result<usize, LayoutError> {
    let rounded = count.round();
    if (count - rounded).abs() > 1e-9 || rounded < 1.0 {
        return Err(LayoutError::FractionalCount { axis, count });
    }
    Ok(rounded as usize)
}
