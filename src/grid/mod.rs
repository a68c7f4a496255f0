//! Gridded field model and grid geometry
//!
//! # Organization
//!
//! - [`coord`]: dimension coordinates, axis roles and bounds inference
//! - [`constraint`]: value-based selection of grid points
//! - [`field`]: the labelled [`GridField`] array
//! - [`area`]: grid cell areas on a sphere
//! - [`lon`]: longitude conventions
//! - [`vertical`]: vertical coordinate replacement and interpolation

pub mod area;
pub mod constraint;
pub mod coord;
pub mod field;
pub mod lon;
pub mod vertical;

pub use area::{area_weights, total_area, vertical_cross_section_area};
pub use constraint::Constraint;
pub use coord::{cell_bounds, cell_centres, AxisRole, DimCoord};
pub use field::GridField;
pub use lon::{is_longitude_global, roll_e2w};
pub use vertical::z_interp;
