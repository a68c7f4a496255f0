//! aeolus: diagnostics of planetary atmosphere model output
//!
//! A Rust library for post-processing gridded output of general circulation
//! models of Earth and other planets. Fields are read from NetCDF files
//! into labelled arrays with longitude, latitude and vertical coordinates,
//! and then reduced with grid-aware operations.
//!
//! ## Key Features
//!
//! - **Grid Geometry**: Cell areas of horizontal grids and vertical cross-sections
//! - **Fluxes**: Net horizontal flux of a quantity into a lat-lon box
//! - **Statistical Functions**: Area-weighted spatial means, sums, extremes, quartiles
//! - **Diagnostics**: Cloud radiative effect, TOA energy budget, precipitation
//! - **Parallel Processing**: Horizontal reductions run on Rayon
//! - **Planet Constants**: JSON constant sets for Earth and exoplanets
//!
//! ## Module Organization
//!
//! - [`grid`]: Field model, constraints, cell areas, longitude conventions
//! - [`flux`]: Net horizontal flux through the walls of a region box
//! - [`statistics`]: Spatial statistics and parallel row reductions
//! - [`diagnostics`]: Derived quantities computed from a [`FieldList`]
//! - [`region`]: Named geographical regions
//! - [`constants`] and [`run`]: Planet constants and a model run container
//! - [`netcdf_io`] and [`metadata`]: NetCDF I/O and field summaries
//! - [`parallel`]: Parallel processing configuration
//! - [`errors`]: Centralized error handling
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use aeolus::prelude::*;
//! use std::path::Path;
//!
//! let fields = load_fields(Path::new("model_output.nc")).unwrap();
//! let q = fields.extract_strict("specific_humidity").unwrap();
//! let u = fields.extract_strict("x_wind").unwrap();
//! let v = fields.extract_strict("y_wind").unwrap();
//!
//! let region = RegionBox::new(-10.0, 10.0, -5.0, 5.0);
//! let flux = net_horizontal_flux_to_region(q, &region, u, v, 6_371_229.0, None).unwrap();
//! println!("{} = {} {}", flux.name, flux.value, flux.units);
//! ```

pub mod cli;
pub mod constants;
pub mod diagnostics;
pub mod errors;
pub mod flux;
pub mod grid;
pub mod logging;
pub mod metadata;
pub mod netcdf_io;
pub mod parallel;
pub mod plot;
pub mod region;
pub mod run;
pub mod statistics;
pub mod text;

pub use diagnostics::FieldList;
pub use errors::{AeolusError, Result};
pub use flux::{net_horizontal_flux_to_region, FluxResult, RegionBox};
pub use grid::{vertical_cross_section_area, AxisRole, Constraint, DimCoord, GridField};

pub mod prelude {
    //! Commonly used imports for convenience
    pub use crate::constants::{init_const, PlanetConstants};
    pub use crate::diagnostics::FieldList;
    pub use crate::errors::{AeolusError, Result};
    pub use crate::flux::{net_horizontal_flux_to_region, BoxEdge, FluxResult, RegionBox};
    pub use crate::grid::{
        area_weights, vertical_cross_section_area, AxisRole, Constraint, DimCoord, GridField,
    };
    pub use crate::netcdf_io::{load_fields, read_field, NetCDFWriter};
    pub use crate::parallel::ParallelConfig;
    pub use crate::region::Region;
    pub use crate::run::Run;
    pub use crate::statistics::{spatial, StatOperation, StatisticalReduction};
}
