//! Selection constraints on coordinate values

use super::coord::AxisRole;
use std::ops::BitAnd;

/// Relative tolerance used when matching a coordinate value for equality
const EQ_TOLERANCE: f64 = 1e-9;

/// Selection of grid points by coordinate value
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Coordinate equals `value`; the matching dimension is dropped
    Equals { role: AxisRole, value: f64 },
    /// `min <= x <= max`
    Between { role: AxisRole, min: f64, max: f64 },
    /// `x >= min || x <= max`, for ranges wrapping past the axis discontinuity
    Wrapped { role: AxisRole, min: f64, max: f64 },
    /// All of the inner constraints
    And(Vec<Constraint>),
}

impl Constraint {
    pub const fn equals(role: AxisRole, value: f64) -> Self {
        Self::Equals { role, value }
    }

    pub const fn between(role: AxisRole, min: f64, max: f64) -> Self {
        Self::Between { role, min, max }
    }

    pub const fn wrapped(role: AxisRole, min: f64, max: f64) -> Self {
        Self::Wrapped { role, min, max }
    }

    /// Inclusive range, wrapping around when `max < min`
    pub fn range(role: AxisRole, min: f64, max: f64) -> Self {
        if max >= min {
            Self::between(role, min, max)
        } else {
            Self::wrapped(role, min, max)
        }
    }

    /// Flattened list of the leaf constraints
    pub fn leaves(&self) -> Vec<&Constraint> {
        match self {
            Self::And(inner) => inner.iter().flat_map(Constraint::leaves).collect(),
            leaf => vec![leaf],
        }
    }

    /// Coordinate role a leaf constraint applies to
    pub fn role(&self) -> Option<AxisRole> {
        match self {
            Self::Equals { role, .. } | Self::Between { role, .. } | Self::Wrapped { role, .. } => {
                Some(*role)
            }
            Self::And(_) => None,
        }
    }

    /// Whether `x` on coordinate `role` passes every leaf aimed at that role
    pub fn accepts(&self, role: AxisRole, x: f64) -> bool {
        match self {
            Self::Equals { role: r, value } => {
                *r != role || (x - value).abs() <= EQ_TOLERANCE * value.abs().max(1.0)
            }
            Self::Between { role: r, min, max } => *r != role || (*min <= x && x <= *max),
            Self::Wrapped { role: r, min, max } => *r != role || (x >= *min || x <= *max),
            Self::And(inner) => inner.iter().all(|c| c.accepts(role, x)),
        }
    }

    /// Lower end of a wrapped range on `role`, if there is one
    pub(crate) fn wrap_start(&self, role: AxisRole) -> Option<f64> {
        self.leaves().into_iter().find_map(|c| match c {
            Self::Wrapped { role: r, min, .. } if *r == role => Some(*min),
            _ => None,
        })
    }

    /// Whether an equality leaf targets `role`
    pub(crate) fn fixes(&self, role: AxisRole) -> bool {
        self.leaves()
            .iter()
            .any(|c| matches!(c, Self::Equals { role: r, .. } if *r == role))
    }
}

impl BitAnd for Constraint {
    type Output = Constraint;

    fn bitand(self, rhs: Self) -> Self::Output {
        let mut inner = match self {
            Self::And(v) => v,
            other => vec![other],
        };
        match rhs {
            Self::And(v) => inner.extend(v),
            other => inner.push(other),
        }
        Self::And(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_wraps() {
        let c = Constraint::range(AxisRole::Longitude, 350.0, 10.0);
        assert!(matches!(c, Constraint::Wrapped { .. }));
        assert!(c.accepts(AxisRole::Longitude, 355.0));
        assert!(c.accepts(AxisRole::Longitude, 5.0));
        assert!(!c.accepts(AxisRole::Longitude, 180.0));
        // other coordinates are unconstrained
        assert!(c.accepts(AxisRole::Latitude, 180.0));
    }

    #[test]
    fn test_and_flattens() {
        let c = Constraint::equals(AxisRole::Longitude, 0.0)
            & Constraint::between(AxisRole::Latitude, -10.0, 10.0)
            & Constraint::equals(AxisRole::Vertical, 100.0);
        assert_eq!(c.leaves().len(), 3);
        assert!(c.fixes(AxisRole::Vertical));
        assert!(!c.fixes(AxisRole::Latitude));
    }
}
