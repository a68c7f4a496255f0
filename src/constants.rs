//! Physical constants of planets, loaded from JSON constant sets
//!
//! A constant set is a JSON array of `{"name", "value", "units"}` records.
//! The shared `general` set is always loaded and merged with the set of the
//! requested planet. Sets for `earth`, `proxb` and `trap1e` are bundled with
//! the crate; a directory given by the caller takes precedence for the
//! planet set.

use crate::errors::{AeolusError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

const GENERAL: &str = include_str!("../const_store/general.json");
const EARTH: &str = include_str!("../const_store/earth.json");
const PROXB: &str = include_str!("../const_store/proxb.json");
const TRAP1E: &str = include_str!("../const_store/trap1e.json");

fn bundled(name: &str) -> Option<&'static str> {
    match name {
        "general" => Some(GENERAL),
        "earth" => Some(EARTH),
        "proxb" => Some(PROXB),
        "trap1e" => Some(TRAP1E),
        _ => None,
    }
}

/// A constant value with its units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarConst {
    pub value: f64,
    pub units: String,
}

#[derive(Debug, Deserialize)]
struct ConstRecord {
    name: String,
    value: f64,
    #[serde(default = "dimensionless")]
    units: String,
}

fn dimensionless() -> String {
    "1".to_string()
}

/// Set of physical constants for one planet
#[derive(Debug, Clone, PartialEq)]
pub struct PlanetConstants {
    planet: String,
    values: BTreeMap<String, ScalarConst>,
}

impl PlanetConstants {
    pub fn planet(&self) -> &str {
        &self.planet
    }

    /// Look a constant up by name
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the constant is not defined.
    pub fn get(&self, name: &str) -> Result<&ScalarConst> {
        self.values.get(name).ok_or_else(|| {
            AeolusError::lookup(format!(
                "Constant '{name}' is not defined for {}",
                self.planet
            ))
        })
    }

    /// Planet radius in metres
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the set has no radius.
    pub fn radius(&self) -> Result<f64> {
        Ok(self.get("radius")?.value)
    }

    /// Surface gravity in m s-2
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the set has no gravity.
    pub fn gravity(&self) -> Result<f64> {
        Ok(self.get("gravity")?.value)
    }

    /// Stefan-Boltzmann constant in W m-2 K-4
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the set has no Stefan-Boltzmann constant.
    pub fn stefan_boltzmann(&self) -> Result<f64> {
        Ok(self.get("stefan_boltzmann")?.value)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl fmt::Display for PlanetConstants {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut chars = self.planet.chars();
        let capitalized: String = chars
            .next()
            .map(|c| c.to_uppercase().chain(chars).collect())
            .unwrap_or_default();
        let fields: Vec<String> = self
            .values
            .iter()
            .map(|(name, c)| format!("{name} [{}]", c.units))
            .collect();
        write!(f, "{capitalized}Constants({})", fields.join(", "))
    }
}

fn parse_const_set(json: &str) -> Result<BTreeMap<String, ScalarConst>> {
    let records: Vec<ConstRecord> = serde_json::from_str(json)?;
    Ok(records
        .into_iter()
        .map(|r| {
            (
                r.name,
                ScalarConst {
                    value: r.value,
                    units: r.units,
                },
            )
        })
        .collect())
}

fn read_const_file(name: &str, directory: Option<&Path>) -> Result<BTreeMap<String, ScalarConst>> {
    match directory {
        Some(dir) => {
            let path = dir.join(name).with_extension("json");
            let json = fs::read_to_string(&path).map_err(|_| AeolusError::Load {
                message: format!(
                    "JSON file for {} {name} configuration not found, check the directory",
                    dir.display()
                ),
            })?;
            parse_const_set(&json)
        }
        None => {
            let json = bundled(name).ok_or_else(|| AeolusError::Load {
                message: format!("No bundled constants for '{name}'"),
            })?;
            parse_const_set(json)
        }
    }
}

/// Create the constant set of planet `name`.
///
/// # Errors
///
/// Returns a load error when the planet file is missing and a JSON error
/// when a file is malformed.
pub fn init_const(name: &str, directory: Option<&Path>) -> Result<PlanetConstants> {
    let mut values = read_const_file("general", None)?;
    values.extend(read_const_file(name, directory)?);
    log::debug!("Loaded {} constants for '{name}'", values.len());
    Ok(PlanetConstants {
        planet: name.to_string(),
        values,
    })
}
