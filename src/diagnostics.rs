//! Commonly used diagnostics in atmospheric science
//!
//! All diagnostics work on a [`FieldList`] of model output and return
//! domain-averaged fields with the horizontal dimensions collapsed.

use crate::errors::{AeolusError, Result};
use crate::grid::GridField;
use crate::statistics::{spatial, StatOperation};
use std::fmt;
use std::str::FromStr;

/// Density of liquid water used to convert precipitation mass fluxes
const WATER_DENSITY: f64 = 1000.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// An ordered collection of fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldList(Vec<GridField>);

impl FieldList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: GridField) {
        self.0.push(field);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GridField> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, GridField> {
        self.0.iter_mut()
    }

    /// Names of all fields, in order
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(GridField::name).collect()
    }

    /// The single field called `name`
    ///
    /// # Errors
    ///
    /// Returns a lookup error unless exactly one field matches.
    pub fn extract_strict(&self, name: &str) -> Result<&GridField> {
        self.unique(|f| f.name() == name, || format!("name '{name}'"))
    }

    /// The single field whose attribute `key` equals `value`
    ///
    /// # Errors
    ///
    /// Returns a lookup error unless exactly one field matches.
    pub fn extract_by_attribute(&self, key: &str, value: &str) -> Result<&GridField> {
        self.unique(
            |f| f.attribute(key) == Some(value),
            || format!("{key}={value}"),
        )
    }

    /// All fields whose name is in `names`, in the order of `names`
    pub fn extract(&self, names: &[&str]) -> Vec<&GridField> {
        names
            .iter()
            .filter_map(|name| self.0.iter().find(|f| f.name() == *name))
            .collect()
    }

    fn unique<P, D>(&self, predicate: P, describe: D) -> Result<&GridField>
    where
        P: Fn(&GridField) -> bool,
        D: Fn() -> String,
    {
        let mut matches = self.0.iter().filter(|f| predicate(*f));
        match (matches.next(), matches.next()) {
            (Some(field), None) => Ok(field),
            (None, _) => Err(AeolusError::lookup(format!(
                "No field matches {}",
                describe()
            ))),
            (Some(_), Some(_)) => Err(AeolusError::lookup(format!(
                "More than one field matches {}",
                describe()
            ))),
        }
    }
}

impl FromIterator<GridField> for FieldList {
    fn from_iter<I: IntoIterator<Item = GridField>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for FieldList {
    type Item = GridField;
    type IntoIter = std::vec::IntoIter<GridField>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Part of the spectrum a cloud radiative effect is computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreKind {
    Sw,
    Lw,
    Total,
}

impl CreKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sw => "sw",
            Self::Lw => "lw",
            Self::Total => "total",
        }
    }

    /// STASH codes of the all-sky and clear-sky outgoing fluxes
    const fn stash_codes(self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::Sw => Some(("m01s01i208", "m01s01i209")),
            Self::Lw => Some(("m01s02i205", "m01s02i206")),
            Self::Total => None,
        }
    }
}

impl fmt::Display for CreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CreKind {
    type Err = AeolusError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sw" => Ok(Self::Sw),
            "lw" => Ok(Self::Lw),
            "total" => Ok(Self::Total),
            other => Err(AeolusError::invalid(format!("Unknown CRE kind '{other}'"))),
        }
    }
}

fn spatial_mean(field: &GridField, planet_radius: f64) -> Result<GridField> {
    spatial(field, StatOperation::Mean, planet_radius)
}

/// Domain-average TOA cloud radiative effect, clear-sky minus all-sky flux
///
/// # Errors
///
/// Returns a lookup error if the fluxes with the required STASH codes are
/// not in `fields`.
pub fn toa_cloud_radiative_effect(
    fields: &FieldList,
    kind: CreKind,
    planet_radius: f64,
) -> Result<GridField> {
    let name = format!("toa_cloud_radiative_effect_{kind}");
    let Some((all_sky, clr_sky)) = kind.stash_codes() else {
        let sw = toa_cloud_radiative_effect(fields, CreKind::Sw, planet_radius)?;
        let lw = toa_cloud_radiative_effect(fields, CreKind::Lw, planet_radius)?;
        return Ok(sw.add(&lw)?.renamed(name));
    };

    let cube_clr = spatial_mean(fields.extract_by_attribute("STASH", clr_sky)?, planet_radius)?;
    let cube_all = spatial_mean(fields.extract_by_attribute("STASH", all_sky)?, planet_radius)?;
    Ok(cube_clr.subtract(&cube_all)?.renamed(name))
}

/// Domain-average TOA net radiative flux: incoming SW minus outgoing SW and LW
///
/// # Errors
///
/// Returns a lookup error if any of the three terms is missing.
pub fn toa_net(fields: &FieldList, planet_radius: f64) -> Result<GridField> {
    let names = [
        "toa_incoming_shortwave_flux",
        "toa_outgoing_shortwave_flux",
        "toa_outgoing_longwave_flux",
    ];
    let terms = fields.extract(&names);
    if terms.len() != names.len() {
        return Err(AeolusError::lookup(format!(
            "Error when extracting TOA radiation terms: found {} of {}",
            terms.len(),
            names.len()
        )));
    }
    let means = terms
        .into_iter()
        .map(|f| spatial_mean(f, planet_radius))
        .collect::<Result<Vec<_>>>()?;
    Ok(means[0]
        .subtract(&means[1])?
        .subtract(&means[2])?
        .renamed("toa_net_radiative_flux"))
}

/// Domain-average precipitation minus evaporation
///
/// # Errors
///
/// Returns a lookup error if either term is missing.
pub fn sfc_water_balance(fields: &FieldList, planet_radius: f64) -> Result<GridField> {
    let precip = spatial_mean(fields.extract_strict("precipitation_flux")?, planet_radius)?;
    let evap = spatial_mean(
        fields.extract_strict("surface_upward_water_flux")?,
        planet_radius,
    )?;
    Ok(precip.subtract(&evap)?.renamed("surface_net_water_flux"))
}

/// Precipitation type for [`total_precip`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecipType {
    Stratiform,
    Convective,
}

impl FromStr for PrecipType {
    type Err = AeolusError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "stra" => Ok(Self::Stratiform),
            "conv" => Ok(Self::Convective),
            other => Err(AeolusError::invalid(format!("Unknown ptype={other}"))),
        }
    }
}

/// Total precipitation flux in mm day-1.
///
/// Rain and snow fluxes in kg m-2 s-1 are summed (all of them when `ptype`
/// is `None`). Only the first term is required; missing others are skipped.
///
/// # Errors
///
/// Returns a lookup error if the first term is missing and an
/// invalid-argument error for fluxes in other units.
pub fn total_precip(fields: &FieldList, ptype: Option<PrecipType>) -> Result<GridField> {
    const STRA: [&str; 2] = ["stratiform_rainfall_flux", "stratiform_snowfall_flux"];
    const CONV: [&str; 2] = ["convective_rainfall_flux", "convective_snowfall_flux"];
    let varnames: Vec<&str> = match ptype {
        None => STRA.iter().chain(CONV.iter()).copied().collect(),
        Some(PrecipType::Stratiform) => STRA.to_vec(),
        Some(PrecipType::Convective) => CONV.to_vec(),
    };

    let first = fields.extract_strict(varnames[0])?;
    check_mass_flux_units(first)?;
    let mut tot_precip = first.clone();
    for varname in &varnames[1..] {
        match fields.extract_strict(varname) {
            Ok(term) => {
                check_mass_flux_units(term)?;
                tot_precip = tot_precip.add(term)?;
            }
            Err(AeolusError::Lookup { .. }) => {
                log::debug!("Skipping missing precipitation term '{varname}'");
            }
            Err(e) => return Err(e),
        }
    }

    // kg m-2 s-1 / kg m-3 = m s-1, then to mm day-1
    Ok(tot_precip
        .scale(1000.0 * SECONDS_PER_DAY / WATER_DENSITY)
        .with_units("mm day-1")
        .renamed("total_precipitation_flux"))
}

fn check_mass_flux_units(field: &GridField) -> Result<()> {
    let units = field.units().split_whitespace().collect::<Vec<_>>().join(" ");
    if units == "kg m-2 s-1" {
        Ok(())
    } else {
        Err(AeolusError::invalid(format!(
            "Precipitation flux '{}' must be in kg m-2 s-1, got '{}'",
            field.name(),
            field.units()
        )))
    }
}

/// Effective temperature `(OLR / σ)^(1/4)` from the domain-average OLR
///
/// # Errors
///
/// Returns a lookup error if the outgoing longwave flux is missing.
pub fn toa_eff_temp(fields: &FieldList, planet_radius: f64, stefan_boltzmann: f64) -> Result<GridField> {
    let olr = spatial_mean(
        fields.extract_strict("toa_outgoing_longwave_flux")?,
        planet_radius,
    )?;
    Ok(olr
        .mapv(|x| (x / stefan_boltzmann).powf(0.25))
        .with_units("K")
        .renamed("toa_effective_temperature"))
}

/// Normalised greenhouse effect `1 - OLR / (σ T_sfc⁴)`
///
/// # Errors
///
/// Returns a lookup error if the OLR or surface temperature is missing.
pub fn ghe_norm(fields: &FieldList, planet_radius: f64, stefan_boltzmann: f64) -> Result<GridField> {
    let olr = spatial_mean(
        fields.extract_strict("toa_outgoing_longwave_flux")?,
        planet_radius,
    )?;
    let t_sfc = spatial_mean(fields.extract_strict("surface_temperature")?, planet_radius)?;
    let sfc_emission = t_sfc.mapv(|t| stefan_boltzmann * t.powi(4));
    let ratio = olr
        .data()
        .iter()
        .zip(sfc_emission.data().iter())
        .map(|(&o, &e)| 1.0 - o / e)
        .collect::<Vec<_>>();
    let data = ndarray::ArrayD::from_shape_vec(olr.data().raw_dim(), ratio)?;
    Ok(olr
        .with_data(data)?
        .with_units("1")
        .renamed("normalized_greenhouse_effect_parameter"))
}
