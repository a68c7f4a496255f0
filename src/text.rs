//! Text formatting of coordinate values

use crate::errors::{AeolusError, Result};
use std::str::FromStr;

/// Whether a value is a longitude or a latitude
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LonLat {
    Lon,
    Lat,
}

impl FromStr for LonLat {
    type Err = AeolusError;

    /// Accepts anything starting with `lon` or `lat`, case-insensitively
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("lat") {
            Ok(Self::Lat)
        } else if lower.starts_with("lon") {
            Ok(Self::Lon)
        } else {
            Err(AeolusError::invalid(
                "2nd arg of the function should start with `lon` or `lat`",
            ))
        }
    }
}

/// Format an integer longitude or latitude with a hemisphere letter.
///
/// Longitudes are brought into -180..=180 first. With `degree`, a TeX degree
/// symbol precedes the letter. Zero has no hemisphere.
///
/// ```
/// use aeolus::text::{fmt_lonlat, LonLat};
///
/// assert_eq!(fmt_lonlat(-25, LonLat::Lon, false), "25W");
/// assert_eq!(fmt_lonlat(89, LonLat::Lat, true), r"89$^\degree$N");
/// assert_eq!(fmt_lonlat(0, LonLat::Lon, false), "0");
/// ```
pub fn fmt_lonlat(value: i32, kind: LonLat, degree: bool) -> String {
    let value = match kind {
        LonLat::Lon => {
            let wrapped = (value + 180).rem_euclid(360) - 180;
            // keep +180 as east rather than folding it to -180
            if wrapped == -180 && value > 0 {
                180
            } else {
                wrapped
            }
        }
        LonLat::Lat => value,
    };
    let hemisphere = match (kind, value < 0) {
        (_, _) if value == 0 => "",
        (LonLat::Lon, false) => "E",
        (LonLat::Lon, true) => "W",
        (LonLat::Lat, false) => "N",
        (LonLat::Lat, true) => "S",
    };
    let degree_sign = if degree { r"$^\degree$" } else { "" };
    format!("{}{degree_sign}{hemisphere}", value.abs())
}
