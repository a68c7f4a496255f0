//! NetCDF I/O of gridded fields
//!
//! Fields are read together with their CF coordinate variables (a
//! one-dimensional variable named after its dimension) and cell bounds, and
//! written back with the same layout plus a `history` attribute.

use crate::diagnostics::FieldList;
use crate::errors::{AeolusError, Result};
use crate::grid::{AxisRole, DimCoord, GridField};
use chrono::Utc;
use ndarray::{Array1, Array2, ArrayD, IxDyn};
use netcdf::{AttributeValue, File, Variable};
use std::collections::{BTreeMap, BTreeSet};
use std::{fs, path::Path};

/// Attributes handled explicitly rather than copied to the field
const RESERVED_ATTRIBUTES: [&str; 5] = ["units", "_FillValue", "missing_value", "bounds", "coordinates"];

fn string_attribute(var: &Variable, name: &str) -> Option<String> {
    match var.attribute(name)?.value().ok()? {
        AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

fn numeric_attribute(var: &Variable, name: &str) -> Option<f64> {
    match var.attribute(name)?.value().ok()? {
        AttributeValue::Float(v) => Some(f64::from(v)),
        AttributeValue::Double(v) => Some(v),
        AttributeValue::Short(v) => Some(f64::from(v)),
        AttributeValue::Int(v) => Some(f64::from(v)),
        _ => None,
    }
}

fn read_coord(file: &File, dim_name: &str, len: usize) -> Result<DimCoord> {
    let Some(cvar) = file
        .variable(dim_name)
        .filter(|v| v.dimensions().len() == 1)
    else {
        log::debug!("Dimension '{dim_name}' has no coordinate variable, using an index");
        return Ok(DimCoord::new(
            dim_name,
            AxisRole::Other,
            Array1::range(0.0, len as f64, 1.0),
        ));
    };
    coord_from_variable(file, &cvar, dim_name, len)
}

fn coord_from_variable(file: &File, cvar: &Variable, name: &str, len: usize) -> Result<DimCoord> {
    let points = cvar.get_values::<f64, _>(..)?;
    let units = string_attribute(cvar, "units").unwrap_or_else(|| "1".to_string());
    let role = AxisRole::guess(
        name,
        string_attribute(cvar, "standard_name").as_deref(),
        string_attribute(cvar, "axis").as_deref(),
        &units,
    );
    let mut coord = DimCoord::new(name, role, Array1::from(points)).with_units(units);

    if let Some(bounds_var) = string_attribute(cvar, "bounds").and_then(|b| file.variable(&b)) {
        let bounds = bounds_var.get_values::<f64, _>(..)?;
        coord = coord.with_bounds(Array2::from_shape_vec((len, 2), bounds)?)?;
    }
    Ok(coord)
}

/// Zero-dimensional variables listed in the `coordinates` attribute of `var`
fn read_scalar_coords(file: &File, var: &Variable) -> Result<Vec<DimCoord>> {
    let Some(listed) = string_attribute(var, "coordinates") else {
        return Ok(Vec::new());
    };
    let mut coords = Vec::new();
    for name in listed.split_whitespace() {
        match file.variable(name) {
            Some(cvar) if cvar.dimensions().is_empty() => {
                coords.push(coord_from_variable(file, &cvar, name, 1)?);
            }
            _ => log::debug!("Skipping auxiliary coordinate '{name}' of '{}'", var.name()),
        }
    }
    Ok(coords)
}

/// Read variable `var_name` and its coordinates as a field.
///
/// Fill values become NaN; string attributes other than the CF bookkeeping
/// ones are copied onto the field. Zero-dimensional variables named in the
/// `coordinates` attribute become scalar coordinates.
///
/// # Errors
///
/// Returns a lookup error if the variable does not exist, and NetCDF or
/// shape errors if its data or coordinates cannot be read.
pub fn read_field(file: &File, var_name: &str) -> Result<GridField> {
    let var = file
        .variable(var_name)
        .ok_or_else(|| AeolusError::lookup(format!("Variable '{var_name}' not found in file")))?;

    let dims: Vec<(String, usize)> = var
        .dimensions()
        .iter()
        .map(|d| (d.name(), d.len()))
        .collect();
    let shape: Vec<usize> = dims.iter().map(|(_, len)| *len).collect();

    let mut values = var.get_values::<f64, _>(..)?;
    for fill_name in ["_FillValue", "missing_value"] {
        if let Some(fill) = numeric_attribute(&var, fill_name) {
            values
                .iter_mut()
                .filter(|v| **v == fill)
                .for_each(|v| *v = f64::NAN);
        }
    }
    let data = ArrayD::from_shape_vec(IxDyn(&shape), values)?;

    let coords = dims
        .iter()
        .map(|(name, len)| read_coord(file, name, *len))
        .collect::<Result<Vec<_>>>()?;

    let units = string_attribute(&var, "units").unwrap_or_else(|| "1".to_string());
    let mut field = GridField::new(var_name, units, data, coords)?;
    for coord in read_scalar_coords(file, &var)? {
        field = field.with_scalar_coord(coord);
    }
    for attr in var.attributes() {
        if RESERVED_ATTRIBUTES.contains(&attr.name()) {
            continue;
        }
        if let Ok(AttributeValue::Str(value)) = attr.value() {
            field.set_attribute(attr.name(), value);
        }
    }
    Ok(field)
}

/// Load every data variable of a NetCDF file.
///
/// Coordinate, scalar coordinate and bounds variables are skipped.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a variable cannot be read.
pub fn load_fields(path: &Path) -> Result<FieldList> {
    let file = netcdf::open(path)?;
    let dim_names: BTreeSet<String> = file.dimensions().map(|d| d.name()).collect();
    let bounds_names: BTreeSet<String> = file
        .variables()
        .filter_map(|v| string_attribute(&v, "bounds"))
        .collect();
    let aux_names: BTreeSet<String> = file
        .variables()
        .filter_map(|v| string_attribute(&v, "coordinates"))
        .flat_map(|c| c.split_whitespace().map(str::to_string).collect::<Vec<_>>())
        .collect();

    let mut fields = FieldList::new();
    for var in file.variables() {
        let name = var.name();
        if dim_names.contains(&name) || bounds_names.contains(&name) || aux_names.contains(&name)
        {
            continue;
        }
        fields.push(read_field(&file, &name)?);
    }
    log::info!(
        "Loaded {} fields from {}",
        fields.len(),
        path.display()
    );
    Ok(fields)
}

/// Writer of fields to a new NetCDF file
pub struct NetCDFWriter<'a> {
    output_path: &'a Path,
}

impl<'a> NetCDFWriter<'a> {
    /// Create a new NetCDF writer
    pub fn new(output_path: &'a Path) -> Self {
        Self { output_path }
    }

    /// Write a single field, replacing any existing file
    ///
    /// # Errors
    ///
    /// See [`NetCDFWriter::write_fields`].
    pub fn write_field(&self, field: &GridField) -> Result<()> {
        self.write_fields(&[field])
    }

    /// Write fields sharing dimensions of the same name.
    ///
    /// Scalar coordinates are written as zero-dimensional variables listed
    /// in the `coordinates` attribute of the field; one already written
    /// under the same name is reused.
    ///
    /// # Errors
    ///
    /// Returns a shape error if two fields disagree on the length of a
    /// dimension, or any NetCDF or I/O error.
    pub fn write_fields(&self, fields: &[&GridField]) -> Result<()> {
        if self.output_path.exists() {
            fs::remove_file(self.output_path)?;
        }
        let mut file = netcdf::create(self.output_path)?;
        let mut written: BTreeMap<String, usize> = BTreeMap::new();
        let mut written_scalars: BTreeSet<String> = BTreeSet::new();

        for field in fields {
            for coord in field.dim_coords() {
                if written_scalars.contains(&coord.name) {
                    return Err(AeolusError::shape(format!(
                        "Coordinate '{}' is scalar in one field and a dimension of '{}'",
                        coord.name,
                        field.name()
                    )));
                }
                match written.get(&coord.name) {
                    Some(&len) if len == coord.len() => continue,
                    Some(&len) => {
                        return Err(AeolusError::shape(format!(
                            "Dimension '{}' has length {len} in one field and {} in '{}'",
                            coord.name,
                            coord.len(),
                            field.name()
                        )))
                    }
                    None => {}
                }
                write_coord(&mut file, coord, &mut written)?;
            }

            let mut aux_names = Vec::new();
            for coord in field.scalar_coords() {
                if written.contains_key(&coord.name) {
                    log::warn!(
                        "Scalar coordinate '{}' of '{}' clashes with a dimension, not written",
                        coord.name,
                        field.name()
                    );
                    continue;
                }
                if written_scalars.insert(coord.name.clone()) {
                    write_scalar_coord(&mut file, coord)?;
                }
                aux_names.push(coord.name.as_str());
            }

            let dim_refs: Vec<&str> = field.dim_coords().iter().map(|c| c.name.as_str()).collect();
            let mut var = file.add_variable::<f64>(field.name(), &dim_refs)?;
            var.put_attribute("units", field.units())?;
            if !aux_names.is_empty() {
                var.put_attribute("coordinates", aux_names.join(" "))?;
            }
            for (key, value) in field.attributes() {
                var.put_attribute(key, value.as_str())?;
            }
            let values: Vec<f64> = field.data().iter().copied().collect();
            var.put_values(&values, ..)?;
        }

        file.add_attribute(
            "history",
            format!("Created by aeolus on {}", Utc::now().to_rfc3339()),
        )?;
        log::info!(
            "Saved {} fields to {}",
            fields.len(),
            self.output_path.display()
        );
        Ok(())
    }
}

fn write_coord(
    file: &mut netcdf::FileMut,
    coord: &DimCoord,
    written: &mut BTreeMap<String, usize>,
) -> Result<()> {
    file.add_dimension(&coord.name, coord.len())?;
    let bounds_name = format!("{}_bnds", coord.name);
    {
        let mut var = file.add_variable::<f64>(&coord.name, &[coord.name.as_str()])?;
        var.put_attribute("units", coord.units.as_str())?;
        if let Some(axis) = coord.role.axis_letter() {
            var.put_attribute("axis", axis.to_string())?;
        }
        if coord.has_bounds() {
            var.put_attribute("bounds", bounds_name.as_str())?;
        }
        var.put_values(&coord.points().to_vec(), ..)?;
    }

    if let Some(bounds) = coord.bounds() {
        if file.dimension("bnds").is_none() {
            file.add_dimension("bnds", 2)?;
        }
        let mut var = file.add_variable::<f64>(&bounds_name, &[coord.name.as_str(), "bnds"])?;
        let values: Vec<f64> = bounds.iter().copied().collect();
        var.put_values(&values, ..)?;
    }
    written.insert(coord.name.clone(), coord.len());
    Ok(())
}

fn write_scalar_coord(file: &mut netcdf::FileMut, coord: &DimCoord) -> Result<()> {
    let bounds_name = format!("{}_bnds", coord.name);
    {
        let mut var = file.add_variable::<f64>(&coord.name, &[])?;
        var.put_attribute("units", coord.units.as_str())?;
        if let Some(axis) = coord.role.axis_letter() {
            var.put_attribute("axis", axis.to_string())?;
        }
        if coord.has_bounds() {
            var.put_attribute("bounds", bounds_name.as_str())?;
        }
        var.put_values(&coord.points().to_vec(), ..)?;
    }

    if let Some(bounds) = coord.bounds() {
        if file.dimension("bnds").is_none() {
            file.add_dimension("bnds", 2)?;
        }
        let mut var = file.add_variable::<f64>(&bounds_name, &["bnds"])?;
        let values: Vec<f64> = bounds.iter().copied().collect();
        var.put_values(&values, ..)?;
    }
    Ok(())
}
