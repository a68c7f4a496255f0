//! Plotting helpers

use crate::errors::{AeolusError, Result};
use ndarray::ArrayD;

/// Normalise data around a midpoint.
///
/// Maps `[vmin, midpoint, vmax]` piecewise-linearly onto `[0, 0.5, 1]`, so a
/// diverging colour map stays centred on `midpoint` even for an asymmetric
/// data range. Values outside `[vmin, vmax]` are clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MidpointNormalize {
    pub vmin: f64,
    pub vmax: f64,
    pub midpoint: f64,
}

impl MidpointNormalize {
    /// # Errors
    ///
    /// Returns an invalid-argument error unless `vmin <= midpoint <= vmax`
    /// and `vmin < vmax`.
    pub fn new(vmin: f64, vmax: f64, midpoint: f64) -> Result<Self> {
        if !(vmin < vmax && vmin <= midpoint && midpoint <= vmax) {
            return Err(AeolusError::invalid(format!(
                "Expected vmin <= midpoint <= vmax, got {vmin}, {midpoint}, {vmax}"
            )));
        }
        Ok(Self {
            vmin,
            vmax,
            midpoint,
        })
    }

    pub fn normalize(&self, value: f64) -> f64 {
        if value.is_nan() {
            return f64::NAN;
        }
        if value <= self.vmin {
            0.0
        } else if value >= self.vmax {
            1.0
        } else if value <= self.midpoint {
            0.5 * (value - self.vmin) / (self.midpoint - self.vmin)
        } else {
            0.5 + 0.5 * (value - self.midpoint) / (self.vmax - self.midpoint)
        }
    }

    pub fn normalize_array(&self, values: &ArrayD<f64>) -> ArrayD<f64> {
        values.mapv(|v| self.normalize(v))
    }
}
