//! Statistical computations over gridded fields
//!
//! This module provides area-weighted spatial statistics, quartiles,
//! meridional means and integration along a coordinate. Reductions over the
//! horizontal plane run in parallel over the remaining dimensions.
//!
//! # Organization
//!
//! This module is organized into submodules:
//! - [`operations`]: Core statistical operations and traits
//! - [`parallel`]: Parallel computation implementations
//! - [`spatial`]: Statistics over longitude and latitude

pub mod operations;
pub mod parallel;
pub mod spatial;

pub use operations::{StatOperation, StatisticalReduction};
pub use parallel::{
    parallel_max_rows, parallel_min_rows, parallel_percentile_rows, parallel_sum_rows,
    parallel_weighted_mean_rows,
};
pub use spatial::{integrate, meridional_mean, minmaxdiff, spatial, spatial_quartiles};
