//! Entry point for the aeolus application.
//! Handles CLI parsing, file loading, and dispatches the area, spatial statistics and flux diagnostics.

use aeolus::cli::Args;
use aeolus::flux::net_horizontal_flux_to_region;
use aeolus::grid::{vertical_cross_section_area, AxisRole, Constraint, GridField};
use aeolus::logging::init_logging;
use aeolus::metadata::list_fields;
use aeolus::netcdf_io::NetCDFWriter;
use aeolus::parallel::{get_parallel_info, ParallelConfig};
use aeolus::run::Run;
use aeolus::statistics::spatial;
use clap::Parser;

fn emit(field: &GridField, args: &Args) -> aeolus::Result<()> {
    if let Some(output_path) = &args.output_netcdf {
        NetCDFWriter::new(output_path).write_field(field)?;
        println!("Saved result to {}", output_path.display());
    } else if field.ndim() == 0 {
        println!("{} = {} {}", field.name(), field.value()?, field.units());
    } else {
        println!("{} ({}):\n{}", field.name(), field.units(), field.data());
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    ParallelConfig::from_cli(args.threads)?.setup_global_pool()?;
    if args.verbose {
        log::debug!("Parallel processing: {}", get_parallel_info());
    }

    let mut run = Run::new(
        args.file.display().to_string(),
        "",
        Some(args.planet.as_str()),
        args.const_dir.as_deref(),
    )?;
    run.load_data(&[&args.file])?;
    let radius = run.planet_radius()?;
    log::info!("Using {}", run.constants);

    let mut did_something = false;

    if let Some(var) = &args.area {
        let section = run.raw_data.extract_strict(var)?;
        emit(&vertical_cross_section_area(section, radius)?, &args)?;
        did_something = true;
    }

    if let Some((var, op)) = &args.spatial {
        let field = run.raw_data.extract_strict(var)?;
        emit(&spatial(field, *op, radius)?, &args)?;
        did_something = true;
    }

    if let Some(vars) = &args.flux {
        // clap guarantees --region is present alongside --flux
        let region = args.region.ok_or("--flux requires --region")?;
        let scalar = run.raw_data.extract_strict(&vars.scalar)?;
        let u = run.raw_data.extract_strict(&vars.u)?;
        let v = run.raw_data.extract_strict(&vars.v)?;
        // a one-level range keeps the vertical dimension so walls stay 2-D
        let vertical = args
            .level
            .map(|level| Constraint::between(AxisRole::Vertical, level, level));
        if vertical.is_some() && !scalar.coord(AxisRole::Vertical)?.has_bounds() {
            log::warn!(
                "Vertical coordinate of '{}' has no bounds, a single level has zero thickness",
                scalar.name()
            );
        }

        let result =
            net_horizontal_flux_to_region(scalar, &region, u, v, radius, vertical.as_ref())?;
        for warning in &result.warnings {
            eprintln!("Warning: {warning}");
        }
        emit(&result.to_field(), &args)?;
        did_something = true;
    }

    if args.list_vars || !did_something {
        println!("{}", list_fields(&run.raw_data));
    }

    Ok(())
}
