//! Human-readable summaries of loaded fields
//!
//! Used by `--list-vars` to show each field with its coordinates and the
//! axis role recognised for them.

use crate::diagnostics::FieldList;
use crate::grid::{DimCoord, GridField};
use std::fmt::Write;

fn describe_coord(coord: &DimCoord) -> String {
    let bounds = if coord.has_bounds() { ", bounded" } else { "" };
    let points = coord.points();
    match coord.len() {
        0 => format!("{} [{}] (empty)", coord.name, coord.role),
        1 => format!(
            "{} [{}] = {} {}{bounds}",
            coord.name, coord.role, points[0], coord.units
        ),
        n => format!(
            "{} [{}] = {n} ({} .. {} {}{bounds})",
            coord.name,
            coord.role,
            points[0],
            points[n - 1],
            coord.units
        ),
    }
}

/// One-paragraph description of a field
pub fn describe_field(field: &GridField) -> String {
    let mut out = String::new();
    let dims: Vec<&str> = field.dim_coords().iter().map(|c| c.name.as_str()).collect();
    let shape: Vec<String> = field.shape().iter().map(ToString::to_string).collect();
    if dims.is_empty() {
        let _ = writeln!(out, "    {} / ({}): scalar", field.name(), field.units());
    } else {
        let _ = writeln!(
            out,
            "    {} / ({}): [{}] = ({})",
            field.name(),
            field.units(),
            dims.join(", "),
            shape.join(" x ")
        );
    }
    for coord in field.dim_coords() {
        let _ = writeln!(out, "      - {}", describe_coord(coord));
    }
    for coord in field.scalar_coords() {
        let _ = writeln!(out, "      * {}", describe_coord(coord));
    }
    for (key, value) in field.attributes() {
        let _ = writeln!(out, "      {key}: {value}");
    }
    out
}

/// List all fields sorted by name
pub fn list_fields(fields: &FieldList) -> String {
    let mut sorted: Vec<&GridField> = fields.iter().collect();
    sorted.sort_by(|a, b| a.name().cmp(b.name()));

    let mut out = String::from("\n Fields\n==========\n");
    if sorted.is_empty() {
        out.push_str("   (No fields found)\n");
    }
    for field in sorted {
        out.push_str(&describe_field(field));
    }
    out
}
