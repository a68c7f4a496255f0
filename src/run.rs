//! A model run: planet constants plus the fields loaded for it

use crate::constants::{init_const, PlanetConstants};
use crate::diagnostics::FieldList;
use crate::errors::Result;
use crate::grid::GridField;
use crate::netcdf_io::load_fields;
use std::path::Path;

/// Planet constants used when none is given
pub const DEFAULT_PLANET: &str = "earth";

/// Fields of one model run together with the planet they were produced for
#[derive(Debug, Clone)]
pub struct Run {
    pub name: String,
    pub description: String,
    pub constants: PlanetConstants,
    pub raw_data: FieldList,
    pub processed: FieldList,
}

impl Run {
    /// # Errors
    ///
    /// Returns a load error if the constant set cannot be read.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        planet: Option<&str>,
        const_dir: Option<&Path>,
    ) -> Result<Self> {
        let constants = init_const(planet.unwrap_or(DEFAULT_PLANET), const_dir)?;
        Ok(Self {
            name: name.into(),
            description: description.into(),
            constants,
            raw_data: FieldList::new(),
            processed: FieldList::new(),
        })
    }

    /// Append the fields of every file in `paths` to the raw data
    ///
    /// # Errors
    ///
    /// Fails on the first file that cannot be read.
    pub fn load_data<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<()> {
        for path in paths {
            for field in load_fields(path.as_ref())? {
                self.raw_data.push(field);
            }
        }
        log::info!(
            "Run '{}' holds {} fields from {} files",
            self.name,
            self.raw_data.len(),
            paths.len()
        );
        Ok(())
    }

    pub fn planet_radius(&self) -> Result<f64> {
        self.constants.radius()
    }

    /// Apply `func` to the raw data and store the results.
    ///
    /// Every result is tagged with a `planet_conf` attribute naming the
    /// constant set used.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `func`.
    pub fn proc_data<F>(&mut self, func: F) -> Result<&FieldList>
    where
        F: Fn(&FieldList, &PlanetConstants) -> Result<Vec<GridField>>,
    {
        let planet = self.constants.planet().to_string();
        self.processed = func(&self.raw_data, &self.constants)?
            .into_iter()
            .map(|field| field.with_attribute("planet_conf", planet.clone()))
            .collect();
        Ok(&self.processed)
    }
}
