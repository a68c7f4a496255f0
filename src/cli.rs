//! Defines command-line interface options using `clap` for the aeolus application.

use crate::flux::RegionBox;
use crate::statistics::StatOperation;
use clap::Parser;
use std::path::PathBuf;

/// A CLI tool for diagnosing planetary atmosphere model output
#[derive(Parser, Debug)]
#[command(
    version,
    name = "aeolus",
    about = "Diagnostics of gridded atmospheric model output in NetCDF files"
)]
pub struct Args {
    /// Path to the NetCDF file
    #[arg(short, long)]
    pub file: PathBuf,

    /// List all fields with their coordinates
    #[arg(long)]
    pub list_vars: bool,

    /// Compute the cell areas of a vertical cross-section variable
    #[arg(long)]
    pub area: Option<String>,

    /// Collapse a variable over longitude and latitude, formatted as <var>:<op>
    /// with <op> one of mean, sum, min, max
    #[arg(long, value_parser = parse_spatial_arg)]
    pub spatial: Option<(String, StatOperation)>,

    /// Net horizontal flux of a scalar into --region, formatted as <scalar>:<u>:<v>
    #[arg(long, value_parser = parse_flux_arg, requires = "region")]
    pub flux: Option<FluxVars>,

    /// Region box formatted as lon0,lon1,lat0,lat1
    #[arg(long, value_parser = parse_region_arg, allow_hyphen_values = true)]
    pub region: Option<RegionBox>,

    /// Restrict the flux calculation to a single vertical level
    #[arg(long, allow_hyphen_values = true)]
    pub level: Option<f64>,

    /// Planet whose constants are used
    #[arg(long, default_value = "earth")]
    pub planet: String,

    /// Directory with planet constant JSON files, overriding the bundled ones
    #[arg(long)]
    pub const_dir: Option<PathBuf>,

    /// Path to save result as NetCDF. If not set, prints to terminal.
    #[arg(long)]
    pub output_netcdf: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Number of threads to use for parallel processing. Defaults to number of CPU cores.
    #[arg(short = 't', long)]
    pub threads: Option<usize>,
}

/// Names of the variables taking part in a flux calculation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FluxVars {
    pub scalar: String,
    pub u: String,
    pub v: String,
}

pub fn parse_spatial_arg(s: &str) -> Result<(String, StatOperation), String> {
    let parts: Vec<&str> = s.split(':').collect();
    match parts.as_slice() {
        [var, op] if !var.is_empty() => {
            let op = op.parse::<StatOperation>().map_err(|e| e.to_string())?;
            Ok((var.to_string(), op))
        }
        _ => Err("Invalid format: Expected '<variable>:<operation>'.".to_string()),
    }
}

pub fn parse_flux_arg(s: &str) -> Result<FluxVars, String> {
    let parts: Vec<&str> = s.split(':').collect();
    match parts.as_slice() {
        [scalar, u, v] if [scalar, u, v].iter().all(|p| !p.is_empty()) => Ok(FluxVars {
            scalar: scalar.to_string(),
            u: u.to_string(),
            v: v.to_string(),
        }),
        _ => Err("Invalid format: Expected '<scalar>:<u>:<v>'.".to_string()),
    }
}

pub fn parse_region_arg(s: &str) -> Result<RegionBox, String> {
    s.parse::<RegionBox>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spatial_arg() {
        assert_eq!(
            parse_spatial_arg("temp:mean").unwrap(),
            ("temp".to_string(), StatOperation::Mean)
        );
        assert!(parse_spatial_arg("temp").is_err());
        assert!(parse_spatial_arg("temp:median").is_err());
    }

    #[test]
    fn test_parse_flux_arg() {
        let vars = parse_flux_arg("q:u:v").unwrap();
        assert_eq!(vars.scalar, "q");
        assert_eq!(vars.v, "v");
        assert!(parse_flux_arg("q:u").is_err());
        assert!(parse_flux_arg("q::v").is_err());
    }

    #[test]
    fn test_args_with_negative_region() {
        let args = Args::try_parse_from([
            "aeolus",
            "--file",
            "data.nc",
            "--flux",
            "q:u:v",
            "--region",
            "-10,10,-5,5",
        ])
        .unwrap();
        let region = args.region.unwrap();
        assert_eq!(region.longitude0, -10.0);
        assert_eq!(region.latitude1, 5.0);
        assert_eq!(args.planet, "earth");
    }
}
