//! Spatial statistics over the horizontal plane

use super::operations::{StatOperation, StatisticalReduction};
use super::parallel::parallel_percentile_rows;
use crate::errors::{AeolusError, Result};
use crate::grid::area::horizontal_dims;
use crate::grid::{area_weights, AxisRole, DimCoord, GridField};
use ndarray::{Array1, Array2, ArrayD, Axis, IxDyn};

/// Horizontal plane of a field laid out as `(outer, nlat * nlon)` rows
struct HorizontalRows {
    rows: Array2<f64>,
    outer_shape: Vec<usize>,
    outer_coords: Vec<DimCoord>,
}

fn horizontal_rows(field: &GridField) -> Result<HorizontalRows> {
    let (lat_dim, lon_dim) = horizontal_dims(field)?;
    let outer: Vec<usize> = (0..field.ndim())
        .filter(|&d| d != lat_dim && d != lon_dim)
        .collect();
    let mut order = outer.clone();
    order.push(lat_dim);
    order.push(lon_dim);

    let outer_shape: Vec<usize> = outer.iter().map(|&d| field.shape()[d]).collect();
    let n_outer: usize = outer_shape.iter().product();
    let n_inner = field.shape()[lat_dim] * field.shape()[lon_dim];

    let permuted = field
        .data()
        .view()
        .permuted_axes(IxDyn(&order))
        .as_standard_layout()
        .into_owned();
    let rows = permuted.into_shape((n_outer, n_inner))?;
    let outer_coords = outer.iter().map(|&d| field.dim_coords()[d].clone()).collect();

    Ok(HorizontalRows {
        rows,
        outer_shape,
        outer_coords,
    })
}

fn collapsed_field(field: &GridField, hr: HorizontalRows, values: Vec<f64>) -> Result<GridField> {
    let data = ArrayD::from_shape_vec(IxDyn(&hr.outer_shape), values)?;
    Ok(GridField::from_parts(
        field.name().to_string(),
        field.units().to_string(),
        data,
        hr.outer_coords,
        field.scalar_coords().to_vec(),
        field.attributes().clone(),
    ))
}

/// Collapse longitude and latitude with a statistical operation.
///
/// The mean is weighted by the spherical cell areas (bounds are guessed
/// where missing) unless a horizontal dimension is a single unbounded
/// point; sum, minimum and maximum are unweighted.
///
/// # Errors
///
/// Returns `CoordinateNotFound` if the field lacks a horizontal dimension.
pub fn spatial(field: &GridField, operation: StatOperation, planet_radius: f64) -> Result<GridField> {
    let hr = horizontal_rows(field)?;
    let weights = match operation {
        StatOperation::Mean => horizontal_weights(field, planet_radius)?,
        StatOperation::Sum | StatOperation::Min | StatOperation::Max => None,
    };
    log::debug!(
        "Spatial {} of '{}' over {} rows",
        operation.as_str(),
        field.name(),
        hr.rows.nrows()
    );
    let values = hr.rows.reduce_rows(operation, weights.as_ref())?;
    collapsed_field(field, hr, values)
}

/// Normalised cell areas of one horizontal slice.
///
/// `None` when a horizontal dimension is a single point without bounds,
/// since its cell has no width to weight by.
fn horizontal_weights(field: &GridField, planet_radius: f64) -> Result<Option<Array1<f64>>> {
    let degenerate = [AxisRole::Latitude, AxisRole::Longitude]
        .into_iter()
        .map(|role| field.dim_coord(role))
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .find(|c| c.len() == 1 && !c.has_bounds());
    if let Some(coord) = degenerate {
        log::warn!(
            "Single-point {} of '{}' has no bounds, the spatial mean is unweighted",
            coord.name,
            field.name()
        );
        return Ok(None);
    }
    let weights = area_weights(field, planet_radius, true)?;
    let hr = horizontal_rows(&weights)?;
    Ok(Some(hr.rows.row(0).to_owned()))
}

/// Unweighted 25th and 75th percentiles over the horizontal plane
///
/// # Errors
///
/// Returns `CoordinateNotFound` if the field lacks a horizontal dimension.
pub fn spatial_quartiles(field: &GridField) -> Result<(GridField, GridField)> {
    log::warn!("No weights are applied!");
    let q25 = {
        let hr = horizontal_rows(field)?;
        let values = parallel_percentile_rows(&hr.rows, 25.0);
        collapsed_field(field, hr, values)?
    };
    let q75 = {
        let hr = horizontal_rows(field)?;
        let values = parallel_percentile_rows(&hr.rows, 75.0);
        collapsed_field(field, hr, values)?
    };
    Ok((q25, q75))
}

/// Spatial maximum minus spatial minimum
///
/// # Errors
///
/// Returns `CoordinateNotFound` if the field lacks a horizontal dimension.
pub fn minmaxdiff(field: &GridField, planet_radius: f64) -> Result<GridField> {
    let max = spatial(field, StatOperation::Max, planet_radius)?;
    let min = spatial(field, StatOperation::Min, planet_radius)?;
    Ok(max
        .subtract(&min)?
        .renamed(format!("{}_minmaxdiff", field.name())))
}

/// Mean over latitude weighted by the cosine of latitude
///
/// # Errors
///
/// Returns `CoordinateNotFound` if the field has no latitude dimension.
pub fn meridional_mean(field: &GridField) -> Result<GridField> {
    let lat_dim = field
        .coord_dim(AxisRole::Latitude)
        .ok_or_else(|| AeolusError::CoordinateNotFound {
            field: field.name().to_string(),
            coord: AxisRole::Latitude.as_str().to_string(),
        })?;
    let coslat = field.dim_coords()[lat_dim]
        .points()
        .mapv(|lat| lat.to_radians().cos());
    let norm = coslat.sum();

    let mut shape = vec![1; field.ndim()];
    shape[lat_dim] = coslat.len();
    let weights = coslat.into_shape(IxDyn(&shape))?;
    let weighted = field.data() * &weights;
    let data = weighted.sum_axis(Axis(lat_dim)) / norm;

    let mut dim_coords = field.dim_coords().to_vec();
    dim_coords.remove(lat_dim);
    Ok(GridField::from_parts(
        field.name().to_string(),
        field.units().to_string(),
        data,
        dim_coords,
        field.scalar_coords().to_vec(),
        field.attributes().clone(),
    ))
}

/// Integrate along a dimension coordinate with the trapezoidal rule.
///
/// The result is named `integral_of_<name>_wrt_<coord>` and carries the
/// product of the field and coordinate units.
///
/// # Errors
///
/// Returns `CoordinateNotFound` if `role` is not a dimension of the field.
pub fn integrate(field: &GridField, role: AxisRole) -> Result<GridField> {
    let dim = field
        .coord_dim(role)
        .ok_or_else(|| AeolusError::CoordinateNotFound {
            field: field.name().to_string(),
            coord: role.as_str().to_string(),
        })?;
    let coord = &field.dim_coords()[dim];
    let x = coord.points();
    let data = field.data();

    let mut acc = ArrayD::<f64>::zeros(data.index_axis(Axis(dim), 0).raw_dim());
    for i in 0..coord.len().saturating_sub(1) {
        let half_dx = 0.5 * (x[i + 1] - x[i]);
        acc.scaled_add(half_dx, &data.index_axis(Axis(dim), i));
        acc.scaled_add(half_dx, &data.index_axis(Axis(dim), i + 1));
    }

    let mut dim_coords = field.dim_coords().to_vec();
    dim_coords.remove(dim);
    Ok(GridField::from_parts(
        format!("integral_of_{}_wrt_{}", field.name(), coord.name),
        format!("{} {}", field.units(), coord.units),
        acc,
        dim_coords,
        field.scalar_coords().to_vec(),
        field.attributes().clone(),
    ))
}
