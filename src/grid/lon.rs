//! Longitude conventions

use super::coord::AxisRole;
use super::field::GridField;
use crate::errors::{AeolusError, Result};
use ndarray::{Array1, Axis};

/// True if a regular array of longitudes covers the whole sphere
pub fn is_longitude_global(lon_points: &Array1<f64>) -> bool {
    if lon_points.len() < 2 {
        return false;
    }
    let n = lon_points.len();
    let dx = lon_points[1] - lon_points[0];
    let first = lon_points[0];
    let last = lon_points[n - 1];
    let case_0_360 = (first - dx) <= 0.0 && (last + dx) >= 360.0;
    let case_pm180 = (first - dx) <= -180.0 && (last + dx) >= 180.0;
    case_0_360 || case_pm180
}

fn wrap_lon(x: f64) -> f64 {
    (x + 180.0).rem_euclid(360.0) - 180.0
}

/// Convert a field with longitudes in 0..360 to -180..180.
///
/// Points are wrapped and sorted, and the data reordered to follow them;
/// for a global grid this is a roll by half the grid. Bounds are re-guessed
/// from the new points. A field already in -180..180 is returned unchanged.
///
/// # Errors
///
/// Returns an invalid-argument error when negative longitudes fall outside
/// -180..180, and a shape error if wrapping produces duplicate points.
pub fn roll_e2w(field: &GridField) -> Result<GridField> {
    let dim = field
        .coord_dim(AxisRole::Longitude)
        .ok_or_else(|| AeolusError::CoordinateNotFound {
            field: field.name().to_string(),
            coord: AxisRole::Longitude.as_str().to_string(),
        })?;
    let xcoord = &field.dim_coords()[dim];
    let points = xcoord.points();

    if points.iter().any(|&x| x < 0.0) {
        if points.iter().all(|&x| (-180.0..=180.0).contains(&x)) {
            return Ok(field.clone());
        }
        let min = points.iter().copied().fold(f64::INFINITY, f64::min);
        let max = points.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        return Err(AeolusError::invalid(format!(
            "Incorrect {} values: from {min} to {max}",
            xcoord.name
        )));
    }

    if is_longitude_global(points) {
        log::debug!("Rolling global field '{}' to -180..180", field.name());
    }

    let wrapped: Vec<f64> = points.iter().map(|&x| wrap_lon(x)).collect();
    let mut order: Vec<usize> = (0..wrapped.len()).collect();
    order.sort_by(|&a, &b| wrapped[a].total_cmp(&wrapped[b]));

    let new_points: Array1<f64> = order.iter().map(|&i| wrapped[i]).collect();
    let mut new_coord = xcoord.with_points(new_points);
    if xcoord.has_bounds() {
        new_coord = new_coord.guess_bounds();
    }

    let data = field.data().select(Axis(dim), &order);
    let mut dim_coords = field.dim_coords().to_vec();
    dim_coords[dim] = new_coord;

    let mut out = GridField::new(field.name(), field.units(), data, dim_coords)?;
    for coord in field.scalar_coords() {
        out = out.with_scalar_coord(coord.clone());
    }
    for (k, v) in field.attributes() {
        out = out.with_attribute(k.clone(), v.clone());
    }
    Ok(out)
}
