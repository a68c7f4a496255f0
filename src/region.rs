//! Subsetting fields over rectangular geographical regions

use crate::errors::{AeolusError, Result};
use crate::grid::{AxisRole, Constraint, GridField};
use std::fmt;

/// Bounding longitudes and latitudes of a lon-lat rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundsRect {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

impl BoundsRect {
    /// # Errors
    ///
    /// Returns a boundary error if west > east or south > north.
    pub fn new(west: f64, east: f64, south: f64, north: f64) -> Result<Self> {
        if west > east {
            return Err(AeolusError::Boundary {
                message: "West boundary value should be less than east".to_string(),
            });
        }
        if south > north {
            return Err(AeolusError::Boundary {
                message: "South boundary value should be less than north".to_string(),
            });
        }
        Ok(Self {
            west,
            east,
            south,
            north,
        })
    }
}

/// Rectangular geographical region
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    pub description: String,
    pub bounds: BoundsRect,
}

impl Region {
    /// # Errors
    ///
    /// Returns a boundary error if the bounds are not ordered.
    pub fn new(
        west: f64,
        east: f64,
        south: f64,
        north: f64,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            description: description.into(),
            bounds: BoundsRect::new(west, east, south, north)?,
        })
    }

    pub fn lon_size(&self) -> f64 {
        self.bounds.east - self.bounds.west
    }

    pub fn lat_size(&self) -> f64 {
        self.bounds.north - self.bounds.south
    }

    /// Constraint selecting the points inside the region, edges included
    pub fn constraint(&self) -> Constraint {
        Constraint::between(AxisRole::Longitude, self.bounds.west, self.bounds.east)
            & Constraint::between(AxisRole::Latitude, self.bounds.south, self.bounds.north)
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        (self.bounds.west..=self.bounds.east).contains(&lon)
            && (self.bounds.south..=self.bounds.north).contains(&lat)
    }

    /// Part of `field` inside the region
    ///
    /// # Errors
    ///
    /// Returns a shape error if the region holds no grid points.
    pub fn extract(&self, field: &GridField) -> Result<GridField> {
        field.extract(&self.constraint())
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Geographical region '{}' (west={}, east={}, south={}, north={})",
            self.name, self.bounds.west, self.bounds.east, self.bounds.south, self.bounds.north
        )
    }
}
