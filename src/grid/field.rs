//! Labelled n-dimensional fields on a geophysical grid

use super::constraint::Constraint;
use super::coord::{AxisRole, DimCoord};
use crate::errors::{AeolusError, Result};
use ndarray::{ArrayD, Axis, IxDyn};
use std::collections::BTreeMap;

/// An n-dimensional array of values labelled with dimension coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct GridField {
    name: String,
    units: String,
    data: ArrayD<f64>,
    dim_coords: Vec<DimCoord>,
    scalar_coords: Vec<DimCoord>,
    attributes: BTreeMap<String, String>,
}

impl GridField {
    /// Create a field, checking that the coordinates describe the data.
    ///
    /// # Errors
    ///
    /// Returns a shape error when the number or lengths of the coordinates do
    /// not match the data, a coordinate is not strictly monotonic, or two
    /// coordinates share the same geographic role.
    pub fn new(
        name: impl Into<String>,
        units: impl Into<String>,
        data: ArrayD<f64>,
        dim_coords: Vec<DimCoord>,
    ) -> Result<Self> {
        let name = name.into();
        if data.ndim() != dim_coords.len() {
            return Err(AeolusError::shape(format!(
                "Field '{name}' has {} dimensions but {} dimension coordinates",
                data.ndim(),
                dim_coords.len()
            )));
        }
        for (i, (coord, &len)) in dim_coords.iter().zip(data.shape()).enumerate() {
            if coord.len() != len || len == 0 {
                return Err(AeolusError::shape(format!(
                    "Coordinate '{}' has {} points but dimension {i} of '{name}' has length {len}",
                    coord.name,
                    coord.len()
                )));
            }
            if !coord.is_monotonic() {
                return Err(AeolusError::shape(format!(
                    "Coordinate '{}' of '{name}' is not strictly monotonic",
                    coord.name
                )));
            }
            if coord.role != AxisRole::Other
                && dim_coords[..i].iter().any(|c| c.role == coord.role)
            {
                return Err(AeolusError::shape(format!(
                    "Field '{name}' has more than one {} dimension",
                    coord.role
                )));
            }
        }
        Ok(Self {
            name,
            units: units.into(),
            data,
            dim_coords,
            scalar_coords: Vec::new(),
            attributes: BTreeMap::new(),
        })
    }

    /// A zero-dimensional field holding a single value
    pub fn scalar(name: impl Into<String>, units: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            units: units.into(),
            data: ArrayD::from_elem(IxDyn(&[]), value),
            dim_coords: Vec::new(),
            scalar_coords: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Attach a single-valued coordinate that does not span a dimension
    #[must_use]
    pub fn with_scalar_coord(mut self, coord: DimCoord) -> Self {
        self.scalar_coords.push(coord);
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub(crate) fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn dim_coords(&self) -> &[DimCoord] {
        &self.dim_coords
    }

    pub fn scalar_coords(&self) -> &[DimCoord] {
        &self.scalar_coords
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// The value of a zero-dimensional field
    ///
    /// # Errors
    ///
    /// Returns a shape error if the field has any dimension.
    pub fn value(&self) -> Result<f64> {
        if self.ndim() != 0 {
            return Err(AeolusError::shape(format!(
                "Field '{}' with shape {:?} is not a scalar",
                self.name,
                self.shape()
            )));
        }
        Ok(self.data.iter().copied().next().unwrap_or(f64::NAN))
    }

    /// Index of the dimension spanned by the coordinate with `role`
    pub fn coord_dim(&self, role: AxisRole) -> Option<usize> {
        self.dim_coords.iter().position(|c| c.role == role)
    }

    /// Copy of the dimension coordinate with `role`
    ///
    /// # Errors
    ///
    /// Returns `CoordinateNotFound` if no dimension has that role.
    pub fn dim_coord(&self, role: AxisRole) -> Result<DimCoord> {
        self.dim_coords
            .iter()
            .find(|c| c.role == role)
            .cloned()
            .ok_or_else(|| self.missing(role))
    }

    /// Dimension or scalar coordinate with `role`
    ///
    /// # Errors
    ///
    /// Returns `CoordinateNotFound` if the field has no such coordinate.
    pub fn coord(&self, role: AxisRole) -> Result<&DimCoord> {
        self.dim_coords
            .iter()
            .chain(self.scalar_coords.iter())
            .find(|c| c.role == role)
            .ok_or_else(|| self.missing(role))
    }

    fn missing(&self, role: AxisRole) -> AeolusError {
        AeolusError::CoordinateNotFound {
            field: self.name.clone(),
            coord: role.as_str().to_string(),
        }
    }

    /// The points of the coordinate with `role` broadcast to a field.
    ///
    /// A dimension coordinate gives a field of this field's shape and
    /// dimensions; a scalar coordinate gives a zero-dimensional field. The
    /// result is named after the coordinate and carries its units.
    ///
    /// # Errors
    ///
    /// Returns `CoordinateNotFound` if the field has no such coordinate.
    pub fn coord_field(&self, role: AxisRole) -> Result<Self> {
        let coord = self.coord(role)?;
        let Some(dim) = self.coord_dim(role) else {
            let value = coord.points().iter().copied().next().unwrap_or(f64::NAN);
            return Ok(Self::scalar(coord.name.clone(), coord.units.clone(), value));
        };
        let points = coord.points();
        let data = ArrayD::from_shape_fn(self.data.raw_dim(), |idx| points[idx[dim]]);
        Ok(Self {
            name: coord.name.clone(),
            units: coord.units.clone(),
            data,
            dim_coords: self.dim_coords.clone(),
            scalar_coords: self.scalar_coords.clone(),
            attributes: BTreeMap::new(),
        })
    }

    /// Copy of this field's metadata with new data of the same shape
    ///
    /// # Errors
    ///
    /// Returns a shape error if the shape differs.
    pub fn with_data(&self, data: ArrayD<f64>) -> Result<Self> {
        if data.shape() != self.shape() {
            return Err(AeolusError::shape(format!(
                "Cannot replace data of '{}' with shape {:?} by data with shape {:?}",
                self.name,
                self.shape(),
                data.shape()
            )));
        }
        Ok(Self {
            data,
            ..self.clone()
        })
    }

    /// Select the points satisfying `constraint`.
    ///
    /// Dimensions fixed by an equality constraint are removed and their
    /// coordinate kept as a scalar coordinate. Range constraints keep the
    /// dimension even when a single point is left. Longitudes selected by a
    /// wrapped range are reordered to run across the wrap point, with the
    /// part above the range start shifted down by 360 degrees.
    ///
    /// # Errors
    ///
    /// Returns a shape error when nothing matches and `CoordinateNotFound`
    /// when the constraint names a role the field does not have.
    pub fn extract(&self, constraint: &Constraint) -> Result<Self> {
        for leaf in constraint.leaves() {
            if let Some(role) = leaf.role() {
                let coord = self.coord(role)?;
                // scalar coordinates either match or empty the selection
                if self.coord_dim(role).is_none()
                    && !coord.points().iter().all(|&x| constraint.accepts(role, x))
                {
                    return Err(self.empty_selection(constraint));
                }
            }
        }

        let mut data = self.data.clone();
        let mut dim_coords = Vec::with_capacity(self.dim_coords.len());
        for (dim, coord) in self.dim_coords.iter().enumerate() {
            let mut indices: Vec<usize> = coord
                .points()
                .iter()
                .enumerate()
                .filter(|&(_, &x)| constraint.accepts(coord.role, x))
                .map(|(i, _)| i)
                .collect();
            if indices.is_empty() {
                return Err(self.empty_selection(constraint));
            }

            // a wrapped longitude range is made contiguous: [350, 0, 10] -> [-10, 0, 10]
            let mut n_shifted = 0;
            if coord.role == AxisRole::Longitude {
                if let Some(start) = constraint.wrap_start(AxisRole::Longitude) {
                    let (high, low): (Vec<usize>, Vec<usize>) = indices
                        .iter()
                        .copied()
                        .partition(|&i| coord.points()[i] >= start);
                    if !high.is_empty() && !low.is_empty() {
                        n_shifted = high.len();
                        indices = high.into_iter().chain(low).collect();
                    }
                }
            }

            if indices.len() != coord.len() || n_shifted > 0 {
                data = data.select(Axis(dim), &indices);
            }
            let selected = coord.select(&indices);
            dim_coords.push(if n_shifted > 0 {
                selected.offset_leading(n_shifted, -360.0)
            } else {
                selected
            });
        }

        let mut scalar_coords = self.scalar_coords.clone();
        for dim in (0..dim_coords.len()).rev() {
            let role = dim_coords[dim].role;
            if role != AxisRole::Other && constraint.fixes(role) && dim_coords[dim].len() == 1 {
                data = data.index_axis_move(Axis(dim), 0);
                scalar_coords.push(dim_coords.remove(dim));
            }
        }

        Ok(Self {
            name: self.name.clone(),
            units: self.units.clone(),
            data,
            dim_coords,
            scalar_coords,
            attributes: self.attributes.clone(),
        })
    }

    fn empty_selection(&self, constraint: &Constraint) -> AeolusError {
        AeolusError::shape(format!(
            "Constraint {constraint:?} selects no points of '{}'",
            self.name
        ))
    }

    fn check_same_shape(&self, other: &Self, op: &str) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(AeolusError::shape(format!(
                "Cannot {op} '{}' with shape {:?} and '{}' with shape {:?}",
                self.name,
                self.shape(),
                other.name,
                other.shape()
            )));
        }
        Ok(())
    }

    /// Element-wise product; units are combined
    ///
    /// # Errors
    ///
    /// Returns a shape error if the shapes differ.
    pub fn multiply(&self, other: &Self) -> Result<Self> {
        self.check_same_shape(other, "multiply")?;
        let mut out = self.with_data(&self.data * &other.data)?;
        out.units = format!("{} {}", self.units, other.units);
        Ok(out)
    }

    /// Element-wise sum
    ///
    /// # Errors
    ///
    /// Returns a shape error if the shapes differ.
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.check_same_shape(other, "add")?;
        self.with_data(&self.data + &other.data)
    }

    /// Element-wise difference
    ///
    /// # Errors
    ///
    /// Returns a shape error if the shapes differ.
    pub fn subtract(&self, other: &Self) -> Result<Self> {
        self.check_same_shape(other, "subtract")?;
        self.with_data(&self.data - &other.data)
    }

    /// Multiply every value by `factor`
    #[must_use]
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            data: &self.data * factor,
            ..self.clone()
        }
    }

    /// Apply `f` to every value
    #[must_use]
    pub fn mapv(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            data: self.data.mapv(f),
            ..self.clone()
        }
    }

    /// Sum over the dimensions with the given roles
    ///
    /// # Errors
    ///
    /// Returns `CoordinateNotFound` if a role is not a dimension of the field.
    pub fn collapsed_sum(&self, roles: &[AxisRole]) -> Result<Self> {
        let mut dims = roles
            .iter()
            .map(|&role| self.coord_dim(role).ok_or_else(|| self.missing(role)))
            .collect::<Result<Vec<_>>>()?;
        dims.sort_unstable();
        dims.dedup();

        let mut data = self.data.clone();
        let mut dim_coords = self.dim_coords.clone();
        for &dim in dims.iter().rev() {
            data = data.sum_axis(Axis(dim));
            dim_coords.remove(dim);
        }
        Ok(Self {
            data,
            dim_coords,
            ..self.clone()
        })
    }

    /// Sum over every dimension
    pub fn total(&self) -> f64 {
        self.data.sum()
    }

    pub(crate) fn from_parts(
        name: String,
        units: String,
        data: ArrayD<f64>,
        dim_coords: Vec<DimCoord>,
        scalar_coords: Vec<DimCoord>,
        attributes: BTreeMap<String, String>,
    ) -> Self {
        Self {
            name,
            units,
            data,
            dim_coords,
            scalar_coords,
            attributes,
        }
    }
}
