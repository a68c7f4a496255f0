//! Horizontal fluxes through the boundary of a lat-lon box
//!
//! The net flux of a scalar quantity out of a region is the surface integral
//! of `wind · scalar` over the four vertical walls of the box. Each wall is a
//! cross-section of the scalar field at a fixed longitude or latitude; its
//! cell areas come from [`vertical_cross_section_area`].

use crate::errors::{AeolusError, Result};
use crate::grid::{vertical_cross_section_area, AxisRole, Constraint, GridField};
use std::fmt;
use std::str::FromStr;

/// Snapping further than this (in coordinate units) from the requested
/// boundary value emits a warning
pub const SNAP_WARNING_THRESHOLD: f64 = 10.0;

/// One of the four walls of a lat-lon box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxEdge {
    /// Western wall
    Longitude0,
    /// Eastern wall
    Longitude1,
    /// Southern wall
    Latitude0,
    /// Northern wall
    Latitude1,
}

impl BoxEdge {
    /// Order in which edges are visited
    pub const ALL: [BoxEdge; 4] = [
        Self::Longitude0,
        Self::Longitude1,
        Self::Latitude0,
        Self::Latitude1,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Longitude0 => "longitude0",
            Self::Longitude1 => "longitude1",
            Self::Latitude0 => "latitude0",
            Self::Latitude1 => "latitude1",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|edge| edge.key() == key)
    }

    /// Axis held constant along the wall
    #[must_use]
    pub const fn fixed_axis(self) -> AxisRole {
        match self {
            Self::Longitude0 | Self::Longitude1 => AxisRole::Longitude,
            Self::Latitude0 | Self::Latitude1 => AxisRole::Latitude,
        }
    }

    /// Axis running along the wall
    #[must_use]
    pub const fn free_axis(self) -> AxisRole {
        match self.fixed_axis() {
            AxisRole::Longitude => AxisRole::Latitude,
            _ => AxisRole::Longitude,
        }
    }
}

impl fmt::Display for BoxEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Lat-lon box given by its bounding longitudes and latitudes.
///
/// `longitude1 < longitude0` denotes a box wrapping past the date line, and
/// likewise for latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionBox {
    pub longitude0: f64,
    pub longitude1: f64,
    pub latitude0: f64,
    pub latitude1: f64,
}

impl RegionBox {
    pub const fn new(longitude0: f64, longitude1: f64, latitude0: f64, latitude1: f64) -> Self {
        Self {
            longitude0,
            longitude1,
            latitude0,
            latitude1,
        }
    }

    /// Build a box from `(key, value)` pairs.
    ///
    /// Keys must be exactly `longitude0`, `longitude1`, `latitude0` and
    /// `latitude1`, in any order.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRegion` for an unknown, duplicate or missing key.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut values: [Option<f64>; 4] = [None; 4];
        for (key, value) in pairs {
            let edge = BoxEdge::from_key(key).ok_or_else(|| AeolusError::InvalidRegion {
                message: format!("Unknown boundary key '{key}'"),
            })?;
            let slot = &mut values[edge as usize];
            if slot.is_some() {
                return Err(AeolusError::InvalidRegion {
                    message: format!("Boundary key '{key}' given more than once"),
                });
            }
            *slot = Some(value);
        }
        let get = |edge: BoxEdge| {
            values[edge as usize].ok_or_else(|| AeolusError::InvalidRegion {
                message: format!("Missing boundary key '{edge}'"),
            })
        };
        Ok(Self::new(
            get(BoxEdge::Longitude0)?,
            get(BoxEdge::Longitude1)?,
            get(BoxEdge::Latitude0)?,
            get(BoxEdge::Latitude1)?,
        ))
    }

    #[must_use]
    pub const fn value(&self, edge: BoxEdge) -> f64 {
        match edge {
            BoxEdge::Longitude0 => self.longitude0,
            BoxEdge::Longitude1 => self.longitude1,
            BoxEdge::Latitude0 => self.latitude0,
            BoxEdge::Latitude1 => self.latitude1,
        }
    }

    /// `(min, max)` of the box along a horizontal axis
    ///
    /// # Errors
    ///
    /// Returns `InvalidRegion` for a non-horizontal axis.
    pub fn span(&self, axis: AxisRole) -> Result<(f64, f64)> {
        match axis {
            AxisRole::Longitude => Ok((self.longitude0, self.longitude1)),
            AxisRole::Latitude => Ok((self.latitude0, self.latitude1)),
            AxisRole::Vertical | AxisRole::Other => Err(AeolusError::InvalidRegion {
                message: format!("A lat-lon box has no {axis} span"),
            }),
        }
    }
}

impl FromStr for RegionBox {
    type Err = AeolusError;

    /// Parse `lon0,lon1,lat0,lat1`
    fn from_str(s: &str) -> Result<Self> {
        let values = s
            .split(',')
            .map(|part| {
                part.trim().parse::<f64>().map_err(|_| AeolusError::InvalidRegion {
                    message: format!("Invalid boundary value '{part}'"),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        match values.as_slice() {
            &[lon0, lon1, lat0, lat1] => Ok(Self::new(lon0, lon1, lat0, lat1)),
            _ => Err(AeolusError::InvalidRegion {
                message: "Expected 'longitude0,longitude1,latitude0,latitude1'".to_string(),
            }),
        }
    }
}

/// A boundary value that had to be moved far to reach the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapWarning {
    pub edge: BoxEdge,
    pub requested: f64,
    pub nearest: f64,
}

impl SnapWarning {
    pub fn offset(&self) -> f64 {
        self.nearest - self.requested
    }
}

impl fmt::Display for SnapWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Nearest value is {:.2} deg away from the given value of {}",
            self.offset(),
            self.edge.fixed_axis()
        )
    }
}

/// Net horizontal flux of a quantity out of a lat-lon box
#[derive(Debug, Clone, PartialEq)]
pub struct FluxResult {
    pub name: String,
    pub units: String,
    pub value: f64,
    /// Total flux through each wall, in [`BoxEdge::ALL`] order
    pub edge_fluxes: [f64; 4],
    pub warnings: Vec<SnapWarning>,
}

impl FluxResult {
    pub fn edge_flux(&self, edge: BoxEdge) -> f64 {
        self.edge_fluxes[edge as usize]
    }

    /// The result as a zero-dimensional field
    pub fn to_field(&self) -> GridField {
        GridField::scalar(self.name.clone(), self.units.clone(), self.value)
    }
}

/// Calculate the net horizontal flux of `scalar` out of `region`.
///
/// Each of the four walls is snapped to the nearest grid line of `scalar`,
/// cut out together with the perpendicular wind (`u` for the meridional
/// walls, `v` for the zonal walls), and `wind · scalar · area` summed over
/// the wall. The net result is
/// `(F[longitude1] - F[longitude0]) + (F[latitude1] - F[latitude0])`,
/// positive for net outflow of a box whose coordinates increase eastward and
/// northward.
///
/// `vertical_constraint` restricts every wall to a vertical level or layer.
///
/// # Errors
///
/// Returns a shape error when a wall selects no points or the wind and
/// scalar sections do not line up, and a lookup error when a boundary cannot
/// be snapped to the grid.
pub fn net_horizontal_flux_to_region(
    scalar: &GridField,
    region: &RegionBox,
    u: &GridField,
    v: &GridField,
    planet_radius: f64,
    vertical_constraint: Option<&Constraint>,
) -> Result<FluxResult> {
    let mut edge_fluxes = [0.0; 4];
    let mut warnings = Vec::new();
    let mut units = String::new();

    for edge in BoxEdge::ALL {
        let wind = match edge.fixed_axis() {
            AxisRole::Longitude => u,
            _ => v,
        };
        let (section_flux, warning) =
            wall_flux(scalar, region, wind, edge, planet_radius, vertical_constraint)?;
        if let Some(w) = warning {
            warnings.push(w);
        }
        edge_fluxes[edge as usize] = section_flux.total();
        units = section_flux.units().to_string();
    }

    let value = (edge_fluxes[BoxEdge::Longitude1 as usize]
        - edge_fluxes[BoxEdge::Longitude0 as usize])
        + (edge_fluxes[BoxEdge::Latitude1 as usize] - edge_fluxes[BoxEdge::Latitude0 as usize]);

    Ok(FluxResult {
        name: format!("net_{}_horizontal_flux_to_region", scalar.name()),
        units,
        value,
        edge_fluxes,
        warnings,
    })
}

fn wall_flux(
    scalar: &GridField,
    region: &RegionBox,
    wind: &GridField,
    edge: BoxEdge,
    planet_radius: f64,
    vertical_constraint: Option<&Constraint>,
) -> Result<(GridField, Option<SnapWarning>)> {
    let this_coord = edge.fixed_axis();
    let other_coord = edge.free_axis();

    let requested = region.value(edge);
    let nearest = scalar.coord(this_coord)?.nearest_value(requested)?;
    let warning = if (nearest - requested).abs() > SNAP_WARNING_THRESHOLD {
        let w = SnapWarning {
            edge,
            requested,
            nearest,
        };
        log::warn!("{w}");
        Some(w)
    } else {
        None
    };

    let mut constraint = Constraint::equals(this_coord, nearest);
    if let Some(vc) = vertical_constraint {
        constraint = constraint & vc.clone();
    }
    let (other_min, other_max) = region.span(other_coord)?;
    constraint = constraint & Constraint::range(other_coord, other_min, other_max);

    let section = scalar.extract(&constraint)?;
    let area = vertical_cross_section_area(&section, planet_radius)?;
    log::debug!(
        "{edge}: {this_coord}={nearest}, section shape {:?}",
        section.shape()
    );

    let flux = wind.extract(&constraint)?.multiply(&section)?.multiply(&area)?;
    Ok((flux, warning))
}
