//! Vertical coordinate handling

use super::coord::{AxisRole, DimCoord};
use super::field::GridField;
use crate::errors::{AeolusError, Result};
use ndarray::{stack, Array1, ArrayD, Axis};

/// Interpolate a field onto new vertical levels.
///
/// With `heights`, the vertical dimension coordinate (model level numbers in
/// raw model output) is first replaced by these points, typically the
/// `level_height` of the levels; missing bounds are guessed. With `target`,
/// the data are then linearly interpolated onto the target points, and
/// extrapolated from the outermost pair of levels beyond the source range.
///
/// # Errors
///
/// Returns `CoordinateNotFound` without a vertical dimension, and a shape
/// error when `heights` does not match that dimension, `target` is empty or
/// not monotonic, or fewer than two source levels are available.
pub fn z_interp(
    field: &GridField,
    heights: Option<&DimCoord>,
    target: Option<&Array1<f64>>,
) -> Result<GridField> {
    let dim = field
        .coord_dim(AxisRole::Vertical)
        .ok_or_else(|| AeolusError::CoordinateNotFound {
            field: field.name().to_string(),
            coord: AxisRole::Vertical.as_str().to_string(),
        })?;

    let mut dim_coords = field.dim_coords().to_vec();
    if let Some(heights) = heights {
        if heights.len() != field.shape()[dim] {
            return Err(AeolusError::shape(format!(
                "'{}' has {} points but '{}' has {} vertical levels",
                heights.name,
                heights.len(),
                field.name(),
                field.shape()[dim]
            )));
        }
        let mut promoted = heights.guess_bounds();
        promoted.role = AxisRole::Vertical;
        dim_coords[dim] = promoted;
    }

    let data = match target {
        Some(target) => {
            let source = dim_coords[dim].clone();
            let data = interp_axis(field.data(), dim, source.points(), target)?;
            dim_coords[dim] = source.with_points(target.clone());
            data
        }
        None => field.data().clone(),
    };

    let mut out = GridField::new(field.name(), field.units(), data, dim_coords)?;
    for coord in field.scalar_coords() {
        out = out.with_scalar_coord(coord.clone());
    }
    for (k, v) in field.attributes() {
        out = out.with_attribute(k.clone(), v.clone());
    }
    Ok(out)
}

/// Index `k` of the level pair `(k, k + 1)` used for `z`, and the weight of
/// the upper level
fn bracket(points: &Array1<f64>, z: f64) -> (usize, f64) {
    let n = points.len();
    let k = (0..n - 1)
        .find(|&k| {
            let (a, b) = (points[k], points[k + 1]);
            a.min(b) <= z && z <= a.max(b)
        })
        .unwrap_or_else(|| {
            let ascending = points[n - 1] > points[0];
            let before_first = if ascending { z < points[0] } else { z > points[0] };
            if before_first {
                0
            } else {
                n - 2
            }
        });
    (k, (z - points[k]) / (points[k + 1] - points[k]))
}

fn interp_axis(
    data: &ArrayD<f64>,
    dim: usize,
    points: &Array1<f64>,
    target: &Array1<f64>,
) -> Result<ArrayD<f64>> {
    if points.len() < 2 {
        return Err(AeolusError::shape(
            "At least two vertical levels are needed to interpolate",
        ));
    }
    if target.is_empty() {
        return Err(AeolusError::shape("No target levels to interpolate onto"));
    }

    let levels: Vec<ArrayD<f64>> = target
        .iter()
        .map(|&z| {
            let (k, w) = bracket(points, z);
            let lower = data.index_axis(Axis(dim), k);
            let upper = data.index_axis(Axis(dim), k + 1);
            &lower * (1.0 - w) + &upper * w
        })
        .collect();
    let views: Vec<_> = levels.iter().map(|level| level.view()).collect();
    Ok(stack(Axis(dim), &views)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_bracket_inside_and_outside() {
        let up = array![0.0, 10.0, 20.0];
        assert_eq!(bracket(&up, 15.0), (1, 0.5));
        assert_eq!(bracket(&up, -10.0), (0, -1.0));
        assert_eq!(bracket(&up, 30.0), (1, 2.0));

        let down = array![20.0, 10.0, 0.0];
        assert_eq!(bracket(&down, 5.0), (1, 0.5));
        assert_eq!(bracket(&down, 30.0), (0, -1.0));
    }
}
