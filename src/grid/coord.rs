//! Dimension coordinates and their physical roles

use crate::errors::{AeolusError, Result};
use ndarray::{Array1, Array2, Axis};
use std::fmt;

/// Physical role of a coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisRole {
    /// Longitude-like axis (`X`)
    Longitude,
    /// Latitude-like axis (`Y`)
    Latitude,
    /// Height, pressure or model level (`Z`)
    Vertical,
    /// Any other axis, e.g. time or an index
    Other,
}

impl AxisRole {
    /// Cartesian axis letter associated with the role
    #[must_use]
    pub const fn axis_letter(self) -> Option<char> {
        match self {
            Self::Longitude => Some('X'),
            Self::Latitude => Some('Y'),
            Self::Vertical => Some('Z'),
            Self::Other => None,
        }
    }

    /// Conventional coordinate name for the role
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Longitude => "longitude",
            Self::Latitude => "latitude",
            Self::Vertical => "vertical",
            Self::Other => "other",
        }
    }

    /// Guess the role of a coordinate from its CF metadata.
    ///
    /// The `axis` attribute wins, followed by `standard_name`, the units and
    /// finally the variable name itself.
    #[must_use]
    pub fn guess(name: &str, standard_name: Option<&str>, axis: Option<&str>, units: &str) -> Self {
        if let Some(axis) = axis {
            match axis.trim().to_ascii_uppercase().as_str() {
                "X" => return Self::Longitude,
                "Y" => return Self::Latitude,
                "Z" => return Self::Vertical,
                "T" => return Self::Other,
                _ => {}
            }
        }

        if let Some(role) = standard_name.and_then(Self::from_standard_name) {
            return role;
        }

        match units.trim() {
            "degrees_east" | "degree_east" | "degree_E" | "degrees_E" => return Self::Longitude,
            "degrees_north" | "degree_north" | "degree_N" | "degrees_N" => return Self::Latitude,
            _ => {}
        }

        let lower = name.to_ascii_lowercase();
        if lower.starts_with("lon") || lower == "x" {
            Self::Longitude
        } else if lower.starts_with("lat") || lower == "y" {
            Self::Latitude
        } else if matches!(
            lower.as_str(),
            "z" | "lev" | "level" | "plev" | "height" | "level_height" | "sigma" | "model_level_number"
        ) {
            Self::Vertical
        } else {
            Self::Other
        }
    }

    fn from_standard_name(standard_name: &str) -> Option<Self> {
        match standard_name {
            "longitude" | "grid_longitude" => Some(Self::Longitude),
            "latitude" | "grid_latitude" => Some(Self::Latitude),
            "height" | "altitude" | "air_pressure" | "atmosphere_hybrid_height_coordinate"
            | "model_level_number" | "depth" => Some(Self::Vertical),
            _ => None,
        }
    }
}

impl fmt::Display for AxisRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A one-dimensional coordinate with optional cell bounds
#[derive(Debug, Clone, PartialEq)]
pub struct DimCoord {
    pub name: String,
    pub units: String,
    pub role: AxisRole,
    points: Array1<f64>,
    bounds: Option<Array2<f64>>,
}

impl DimCoord {
    /// Create a coordinate without bounds
    pub fn new(name: impl Into<String>, role: AxisRole, points: impl Into<Array1<f64>>) -> Self {
        let units = match role {
            AxisRole::Longitude => "degrees_east",
            AxisRole::Latitude => "degrees_north",
            AxisRole::Vertical => "m",
            AxisRole::Other => "1",
        };
        Self {
            name: name.into(),
            units: units.to_string(),
            role,
            points: points.into(),
            bounds: None,
        }
    }

    /// Longitude coordinate in degrees east
    pub fn longitude(points: impl Into<Array1<f64>>) -> Self {
        Self::new("longitude", AxisRole::Longitude, points)
    }

    /// Latitude coordinate in degrees north
    pub fn latitude(points: impl Into<Array1<f64>>) -> Self {
        Self::new("latitude", AxisRole::Latitude, points)
    }

    #[must_use]
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    /// Attach explicit cell bounds of shape `(n, 2)`
    ///
    /// # Errors
    ///
    /// Returns a shape error if the bounds do not match the points.
    pub fn with_bounds(mut self, bounds: Array2<f64>) -> Result<Self> {
        if bounds.dim() != (self.points.len(), 2) {
            return Err(AeolusError::shape(format!(
                "Bounds of coordinate '{}' have shape {:?}, expected ({}, 2)",
                self.name,
                bounds.dim(),
                self.points.len()
            )));
        }
        self.bounds = Some(bounds);
        Ok(self)
    }

    pub fn points(&self) -> &Array1<f64> {
        &self.points
    }

    pub fn bounds(&self) -> Option<&Array2<f64>> {
        self.bounds.as_ref()
    }

    pub fn has_bounds(&self) -> bool {
        self.bounds.is_some()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True when the points are strictly increasing or strictly decreasing
    pub fn is_monotonic(&self) -> bool {
        let diffs: Vec<f64> = self.points.windows(2).into_iter().map(|w| w[1] - w[0]).collect();
        diffs.iter().all(|&d| d > 0.0) || diffs.iter().all(|&d| d < 0.0)
    }

    /// True when all spacings are equal to within a small relative tolerance
    pub fn is_regular(&self) -> bool {
        is_uniform(&self.points)
    }

    /// Copy of this coordinate with bounds guessed from the points.
    ///
    /// Bounds sit halfway between neighbouring points and the outermost cells
    /// extend by half of the adjacent spacing. A single point gets a
    /// zero-width cell. Existing bounds are kept.
    #[must_use]
    pub fn guess_bounds(&self) -> Self {
        if self.has_bounds() {
            return self.clone();
        }
        let n = self.points.len();
        let p = &self.points;
        let mut bounds = Array2::<f64>::zeros((n, 2));
        match n {
            0 => {}
            1 => {
                bounds[[0, 0]] = p[0];
                bounds[[0, 1]] = p[0];
            }
            _ => {
                for i in 0..n {
                    let lower = if i == 0 {
                        p[0] - 0.5 * (p[1] - p[0])
                    } else {
                        0.5 * (p[i - 1] + p[i])
                    };
                    let upper = if i == n - 1 {
                        p[n - 1] + 0.5 * (p[n - 1] - p[n - 2])
                    } else {
                        0.5 * (p[i] + p[i + 1])
                    };
                    bounds[[i, 0]] = lower;
                    bounds[[i, 1]] = upper;
                }
            }
        }
        Self {
            bounds: Some(bounds),
            ..self.clone()
        }
    }

    /// Copy of this coordinate with bounds removed
    #[must_use]
    pub fn without_bounds(&self) -> Self {
        Self {
            bounds: None,
            ..self.clone()
        }
    }

    /// Signed cell widths `upper - lower`, guessing bounds when absent
    pub fn cell_widths(&self) -> Array1<f64> {
        let guessed = self.guess_bounds();
        match guessed.bounds {
            Some(b) => &b.column(1) - &b.column(0),
            None => Array1::zeros(0),
        }
    }

    /// Index of the point closest to `value`
    ///
    /// # Errors
    ///
    /// Returns a lookup error when the coordinate has no points.
    pub fn nearest_neighbour_index(&self, value: f64) -> Result<usize> {
        self.points
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| (*a - value).abs().total_cmp(&(*b - value).abs()))
            .map(|(i, _)| i)
            .ok_or_else(|| {
                AeolusError::lookup(format!(
                    "Coordinate '{}' has no points to look up {value} in",
                    self.name
                ))
            })
    }

    /// The point closest to `value`
    ///
    /// # Errors
    ///
    /// Returns a lookup error when the coordinate has no points.
    pub fn nearest_value(&self, value: f64) -> Result<f64> {
        let i = self.nearest_neighbour_index(value)?;
        Ok(self.points[i])
    }

    /// Sub-coordinate made of the points at `indices`
    pub(crate) fn select(&self, indices: &[usize]) -> Self {
        Self {
            name: self.name.clone(),
            units: self.units.clone(),
            role: self.role,
            points: self.points.select(Axis(0), indices),
            bounds: self.bounds.as_ref().map(|b| b.select(Axis(0), indices)),
        }
    }

    /// Add `offset` to the first `n` points and their bounds
    pub(crate) fn offset_leading(&self, n: usize, offset: f64) -> Self {
        let mut out = self.clone();
        out.points
            .iter_mut()
            .take(n)
            .for_each(|p| *p += offset);
        if let Some(bounds) = out.bounds.as_mut() {
            bounds
                .rows_mut()
                .into_iter()
                .take(n)
                .for_each(|mut row| row += offset);
        }
        out
    }

    /// Replace the points, dropping bounds
    pub(crate) fn with_points(&self, points: Array1<f64>) -> Self {
        Self {
            name: self.name.clone(),
            units: self.units.clone(),
            role: self.role,
            points,
            bounds: None,
        }
    }
}

fn is_uniform(points: &Array1<f64>) -> bool {
    if points.len() < 3 {
        return true;
    }
    let first = points[1] - points[0];
    let tol = 1e-5 * first.abs().max(f64::EPSILON);
    points
        .windows(2)
        .into_iter()
        .all(|w| ((w[1] - w[0]) - first).abs() <= tol)
}

/// Cell boundaries of uniformly spaced points, shape `(M + 1,)`.
///
/// `bound_position` is the relative position of the bound between two
/// points (0.5 puts it halfway).
///
/// # Errors
///
/// Returns a shape error for fewer than two points.
pub fn cell_bounds(points: &Array1<f64>, bound_position: f64) -> Result<Array1<f64>> {
    if points.len() < 2 {
        return Err(AeolusError::shape(
            "At least two points are needed to compute cell bounds",
        ));
    }
    if !is_uniform(points) {
        log::warn!("cell_bounds() is supposed to work only for uniformly spaced points");
    }
    let delta = (points[1] - points[0]) * bound_position;
    let mut bounds = Vec::with_capacity(points.len() + 1);
    bounds.push(points[0] - delta);
    bounds.extend(points.iter().map(|&p| p + delta));
    Ok(Array1::from(bounds))
}

/// Cell centres from a sequence of boundaries, shape `(M - 1,)`.
///
/// # Errors
///
/// Returns a shape error for fewer than two bounds.
pub fn cell_centres(bounds: &Array1<f64>, bound_position: f64) -> Result<Array1<f64>> {
    if bounds.len() < 2 {
        return Err(AeolusError::shape(
            "At least two bounds are needed to compute cell centres",
        ));
    }
    Ok(bounds
        .windows(2)
        .into_iter()
        .map(|w| w[0] + (w[1] - w[0]) * bound_position)
        .collect())
}
