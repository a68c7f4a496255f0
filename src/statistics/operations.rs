//! Core statistical operations and traits
//!
//! This module defines the fundamental types and traits for statistical operations.

use crate::errors::{AeolusError, Result};
use ndarray::{Array1, Array2};
use std::str::FromStr;

/// Supported statistical operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatOperation {
    /// Area-weighted arithmetic mean
    Mean,
    /// Sum of values
    Sum,
    /// Minimum value
    Min,
    /// Maximum value
    Max,
}

impl StatOperation {
    /// Get the string representation of the operation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Sum => "sum",
            Self::Min => "minimum",
            Self::Max => "maximum",
        }
    }
}

impl FromStr for StatOperation {
    type Err = AeolusError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mean" => Ok(Self::Mean),
            "sum" => Ok(Self::Sum),
            "min" | "minimum" => Ok(Self::Min),
            "max" | "maximum" => Ok(Self::Max),
            other => Err(AeolusError::invalid(format!(
                "Unknown statistical operation '{other}'"
            ))),
        }
    }
}

/// Trait for row-wise reductions of a `(outer, horizontal)` matrix
pub trait StatisticalReduction {
    /// Reduce every row to one value
    ///
    /// `weights`, when given, must have one entry per column and is only
    /// used by [`StatOperation::Mean`].
    ///
    /// # Errors
    ///
    /// Returns a shape error if the weights do not match the row length.
    fn reduce_rows(&self, operation: StatOperation, weights: Option<&Array1<f64>>)
        -> Result<Vec<f64>>;
}

impl StatisticalReduction for Array2<f64> {
    fn reduce_rows(
        &self,
        operation: StatOperation,
        weights: Option<&Array1<f64>>,
    ) -> Result<Vec<f64>> {
        if let Some(w) = weights {
            if w.len() != self.ncols() {
                return Err(AeolusError::shape(format!(
                    "{} weights given for rows of length {}",
                    w.len(),
                    self.ncols()
                )));
            }
        }

        Ok(match (operation, weights) {
            (StatOperation::Mean, Some(w)) => super::parallel::parallel_weighted_mean_rows(self, w),
            (StatOperation::Mean, None) => {
                let ones = Array1::ones(self.ncols());
                super::parallel::parallel_weighted_mean_rows(self, &ones)
            }
            (StatOperation::Sum, _) => super::parallel::parallel_sum_rows(self),
            (StatOperation::Min, _) => super::parallel::parallel_min_rows(self),
            (StatOperation::Max, _) => super::parallel::parallel_max_rows(self),
        })
    }
}
