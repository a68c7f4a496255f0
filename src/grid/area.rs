//! Grid cell areas on a sphere

use super::coord::AxisRole;
use super::field::GridField;
use crate::errors::{AeolusError, Result};
use ndarray::{Array2, ArrayD, IxDyn};
use std::f64::consts::PI;

fn check_radius(planet_radius: f64) -> Result<()> {
    if planet_radius > 0.0 && planet_radius.is_finite() {
        Ok(())
    } else {
        Err(AeolusError::invalid(format!(
            "Planet radius must be a positive number of metres, got {planet_radius}"
        )))
    }
}

/// Areas in m2 of the cells of a 2-D vertical (or horizontal) cross-section.
///
/// The spacing along the second dimension is converted from degrees to metres.
/// When that dimension is longitude, the conversion factor is scaled by the
/// cosine of the first latitude value of the section, which is exact for a
/// section at constant latitude and approximate for narrow bands. A latitude
/// first dimension is converted to metres as well; any other first dimension
/// (height) is taken to be in metres already.
///
/// Missing bounds are guessed; a single-point dimension without bounds gives
/// zero-width cells and therefore zero area.
///
/// # Errors
///
/// Returns a shape error if the field is not 2-D, `CoordinateNotFound` if a
/// longitude section carries no latitude, and an invalid-argument error for a
/// non-positive radius.
pub fn vertical_cross_section_area(section: &GridField, planet_radius: f64) -> Result<GridField> {
    check_radius(planet_radius)?;
    if section.ndim() != 2 {
        return Err(AeolusError::shape(format!(
            "Cross-section '{}' must be 2-D, got shape {:?}",
            section.name(),
            section.shape()
        )));
    }

    let coords = section.dim_coords();
    let mut m_per_deg = (PI / 180.0) * planet_radius;
    if coords[1].role.axis_letter() == Some('X') {
        let lat = section.coord(AxisRole::Latitude)?;
        let lat0 = lat.points().get(0).copied().ok_or_else(|| {
            AeolusError::lookup(format!("Latitude of '{}' has no points", section.name()))
        })?;
        m_per_deg *= lat0.to_radians().cos();
    }

    let mut dz = coords[0].cell_widths();
    // a horizontal (latitude, longitude) slice measures both sides in metres
    if coords[0].role == AxisRole::Latitude {
        dz *= (PI / 180.0) * planet_radius;
    }
    let dx = coords[1].cell_widths();
    let area = Array2::from_shape_fn((dz.len(), dx.len()), |(i, j)| dz[i] * (dx[j] * m_per_deg));

    let stripped = coords.iter().map(|c| c.without_bounds()).collect();
    let mut out = GridField::new("vertical_section_area", "m2", area.into_dyn(), stripped)?;
    for coord in section.scalar_coords() {
        out = out.with_scalar_coord(coord.clone());
    }
    Ok(out)
}

/// Horizontal areas in m2 of the cells of a lat-lon grid, shape `(nlat, nlon)`
fn horizontal_cell_areas(field: &GridField, planet_radius: f64) -> Result<Array2<f64>> {
    let lon = field.dim_coord(AxisRole::Longitude)?.guess_bounds();
    let lat = field.dim_coord(AxisRole::Latitude)?.guess_bounds();
    let lon_widths = lon.cell_widths().mapv(|w| w.to_radians().abs());
    let lat_bounds = lat
        .bounds()
        .cloned()
        .unwrap_or_else(|| Array2::zeros((lat.len(), 2)))
        .mapv(|b| b.clamp(-90.0, 90.0).to_radians());
    let r2 = planet_radius * planet_radius;
    Ok(Array2::from_shape_fn((lat.len(), lon.len()), |(i, j)| {
        r2 * (lat_bounds[[i, 1]].sin() - lat_bounds[[i, 0]].sin()).abs() * lon_widths[j]
    }))
}

/// Spherical grid cell areas broadcast to the shape of `field`.
///
/// Each cell spans `R² · Δλ · |sin φ_upper − sin φ_lower|`. With `normalize`
/// the weights of every horizontal slice sum to one and are dimensionless.
///
/// # Errors
///
/// Returns `CoordinateNotFound` if the field lacks a longitude or latitude
/// dimension and an invalid-argument error for a non-positive radius.
pub fn area_weights(field: &GridField, planet_radius: f64, normalize: bool) -> Result<GridField> {
    check_radius(planet_radius)?;
    let mut cells = horizontal_cell_areas(field, planet_radius)?;
    if normalize {
        let total = cells.sum();
        if total > 0.0 {
            cells /= total;
        }
    }

    let (lat_dim, lon_dim) = horizontal_dims(field)?;
    let weights = ArrayD::from_shape_fn(IxDyn(field.shape()), |idx| {
        cells[[idx[lat_dim], idx[lon_dim]]]
    });
    let units = if normalize { "1" } else { "m2" };
    Ok(field
        .with_data(weights)?
        .renamed("grid_cell_area")
        .with_units(units))
}

/// Dimension indices of latitude and longitude
pub(crate) fn horizontal_dims(field: &GridField) -> Result<(usize, usize)> {
    let lat = field.coord_dim(AxisRole::Latitude);
    let lon = field.coord_dim(AxisRole::Longitude);
    match (lat, lon) {
        (Some(lat), Some(lon)) => Ok((lat, lon)),
        (None, _) => Err(AeolusError::CoordinateNotFound {
            field: field.name().to_string(),
            coord: AxisRole::Latitude.as_str().to_string(),
        }),
        (_, None) => Err(AeolusError::CoordinateNotFound {
            field: field.name().to_string(),
            coord: AxisRole::Longitude.as_str().to_string(),
        }),
    }
}

/// Total horizontal area of the field's grid
///
/// # Errors
///
/// See [`area_weights`].
pub fn total_area(field: &GridField, planet_radius: f64) -> Result<f64> {
    check_radius(planet_radius)?;
    Ok(horizontal_cell_areas(field, planet_radius)?.sum())
}
