use aeolus::diagnostics::FieldList;
use aeolus::flux::{net_horizontal_flux_to_region, RegionBox};
use aeolus::grid::{vertical_cross_section_area, AxisRole, Constraint, DimCoord, GridField};
use aeolus::metadata::list_fields;
use aeolus::netcdf_io::{load_fields, read_field, NetCDFWriter};
use aeolus::run::Run;
use aeolus::statistics::{spatial, StatOperation};
use approx::assert_relative_eq;
use ndarray::{array, Array2, ArrayD, IxDyn};
use netcdf::{create, open};
use tempfile::tempdir;

fn model_level_field(name: &str, units: &str, f: impl Fn(f64, f64, f64) -> f64) -> GridField {
    let z = DimCoord::new("level_height", AxisRole::Vertical, array![500.0, 1500.0])
        .with_units("m")
        .with_bounds(
            Array2::from_shape_vec((2, 2), vec![0.0, 1000.0, 1000.0, 2000.0])
                .expect("Bounds shape"),
        )
        .expect("Valid bounds");
    let lat = DimCoord::latitude(array![-10.0, -5.0, 0.0, 5.0, 10.0]);
    let lon = DimCoord::longitude(array![0.0, 10.0, 20.0, 30.0, 40.0]);
    let data = ArrayD::from_shape_fn(IxDyn(&[2, 5, 5]), |idx| {
        f(z.points()[idx[0]], lat.points()[idx[1]], lon.points()[idx[2]])
    });
    GridField::new(name, units, data, vec![z, lat, lon]).expect("Failed to build field")
}

#[test]
fn test_netcdf_round_trip() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("round_trip.nc");

    let q = model_level_field("specific_humidity", "kg kg-1", |z, lat, lon| {
        z + 10.0 * lat + lon
    })
    .with_attribute("STASH", "m01s00i010");
    let u = model_level_field("x_wind", "m s-1", |_, _, lon| lon / 10.0);

    NetCDFWriter::new(&file_path)
        .write_fields(&[&q, &u])
        .expect("Failed to write NetCDF file");

    // history is stamped on the file
    {
        let file = open(&file_path).expect("Failed to open NetCDF file");
        assert!(file.attribute("history").is_some());
    }

    let fields = load_fields(&file_path).expect("Failed to load fields");
    assert_eq!(fields.len(), 2);

    let loaded = fields
        .extract_strict("specific_humidity")
        .expect("Humidity should be loaded");
    assert_eq!(loaded.units(), "kg kg-1");
    assert_eq!(loaded.data(), q.data());
    assert_eq!(loaded.attribute("STASH"), Some("m01s00i010"));
    assert_eq!(loaded.coord_dim(AxisRole::Vertical), Some(0));
    assert_eq!(loaded.coord_dim(AxisRole::Latitude), Some(1));
    assert_eq!(loaded.coord_dim(AxisRole::Longitude), Some(2));

    let z = loaded
        .coord(AxisRole::Vertical)
        .expect("Height should be loaded");
    assert_eq!(z.units, "m");
    assert_eq!(
        z.bounds().expect("Bounds should be loaded"),
        q.coord(AxisRole::Vertical)
            .expect("Height")
            .bounds()
            .expect("Bounds")
    );

    let listing = list_fields(&fields);
    assert!(listing.contains("specific_humidity"));
    assert!(listing.contains("x_wind"));
}

#[test]
fn test_overwrite_existing_file() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("result.nc");

    let first = GridField::scalar("net_q_horizontal_flux_to_region", "kg s-1", 1.5);
    NetCDFWriter::new(&file_path)
        .write_field(&first)
        .expect("Failed to write NetCDF file");
    let second = model_level_field("ta", "K", |_, _, _| 250.0);
    NetCDFWriter::new(&file_path)
        .write_field(&second)
        .expect("Failed to overwrite NetCDF file");

    let fields = load_fields(&file_path).expect("Failed to load fields");
    assert_eq!(fields.names(), vec!["ta"]);
}

#[test]
fn test_conflicting_dimensions_are_rejected() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("conflict.nc");

    let a = GridField::new(
        "a",
        "1",
        ArrayD::zeros(IxDyn(&[3])),
        vec![DimCoord::latitude(array![0.0, 1.0, 2.0])],
    )
    .expect("Failed to build field");
    let b = GridField::new(
        "b",
        "1",
        ArrayD::zeros(IxDyn(&[2])),
        vec![DimCoord::latitude(array![0.0, 1.0])],
    )
    .expect("Failed to build field");

    let result = NetCDFWriter::new(&file_path).write_fields(&[&a, &b]);
    assert!(matches!(result, Err(aeolus::AeolusError::Shape { .. })));
}

#[test]
fn test_scalar_coordinates_round_trip() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("section.nc");

    let q = model_level_field("q", "kg kg-1", |_, lat, lon| lat + lon);
    let section = q
        .extract(&Constraint::equals(AxisRole::Latitude, 5.0))
        .expect("Extraction should succeed");
    let area = vertical_cross_section_area(&section, 6_371_229.0).expect("Area should be computed");

    NetCDFWriter::new(&file_path)
        .write_fields(&[&section, &area])
        .expect("Failed to write NetCDF file");

    {
        let file = open(&file_path).expect("Failed to open NetCDF file");
        let latitude = file.variable("latitude").expect("Scalar coordinate variable");
        assert!(latitude.dimensions().is_empty());
    }

    let fields = load_fields(&file_path).expect("Failed to load fields");
    assert_eq!(fields.names(), vec!["q", "vertical_section_area"]);
    for field in fields.iter() {
        assert_eq!(field.coord_dim(AxisRole::Latitude), None);
        let lat = field
            .coord(AxisRole::Latitude)
            .expect("Latitude should be read back");
        assert_eq!(lat.points().to_vec(), vec![5.0]);
        assert_eq!(lat.units, "degrees_north");
    }

    // the same name cannot be scalar in one field and a dimension in another
    let result = NetCDFWriter::new(&file_path).write_fields(&[&section, &q]);
    assert!(matches!(result, Err(aeolus::AeolusError::Shape { .. })));
}

#[test]
fn test_read_field_with_fill_values_and_index_dimension() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("raw.nc");

    {
        let mut file = create(&file_path).expect("Failed to create NetCDF file");
        file.add_dimension("station", 3)
            .expect("Failed to add dimension station");
        file.add_dimension("lat", 2)
            .expect("Failed to add dimension lat");

        let mut lat = file
            .add_variable::<f64>("lat", &["lat"])
            .expect("Failed to add variable lat");
        lat.put_attribute("units", "degrees_north")
            .expect("Failed to add units");
        lat.put_values(&[10.0_f64, 20.0][..], ..)
            .expect("Failed to write lat");

        let mut var = file
            .add_variable::<f32>("rain", &["station", "lat"])
            .expect("Failed to add variable");
        var.put_attribute("_FillValue", -999.0f32)
            .expect("Failed to add fill value");
        var.put_attribute("long_name", "rainfall")
            .expect("Failed to add long name");
        let data = Array2::from_shape_vec((3, 2), vec![1.0f32, 2.0, -999.0, 4.0, 5.0, 6.0])
            .expect("Failed to create array from test data");
        var.put(data.view(), ..).expect("Failed to write data");
    }

    let file = open(&file_path).expect("Failed to open NetCDF file");
    let rain = read_field(&file, "rain").expect("Failed to read rain");

    assert_eq!(rain.shape(), &[3, 2]);
    assert_eq!(rain.units(), "1");
    assert_eq!(rain.attribute("long_name"), Some("rainfall"));
    assert!(rain.data()[[1, 0]].is_nan());
    assert_eq!(rain.data()[[2, 1]], 6.0);

    let station = &rain.dim_coords()[0];
    assert_eq!(station.role, AxisRole::Other);
    assert_eq!(station.points().to_vec(), vec![0.0, 1.0, 2.0]);
    // role guessed without an axis attribute
    assert_eq!(rain.coord_dim(AxisRole::Latitude), Some(1));

    assert!(matches!(
        read_field(&file, "snow"),
        Err(aeolus::AeolusError::Lookup { .. })
    ));
}

#[test]
fn test_run_flux_from_file() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("model.nc");

    let q = model_level_field("q", "kg kg-1", |_, lat, _| 1.0 + 0.01 * lat);
    let u = model_level_field("u", "m s-1", |z, _, lon| z / 1000.0 + lon / 10.0);
    let v = model_level_field("v", "m s-1", |_, lat, _| lat);
    NetCDFWriter::new(&file_path)
        .write_fields(&[&q, &u, &v])
        .expect("Failed to write NetCDF file");

    let mut run = Run::new("test_run", "Synthetic data", None, None).expect("Failed to create run");
    run.load_data(&[&file_path]).expect("Failed to load data");
    assert_eq!(run.raw_data.len(), 3);
    let radius = run.planet_radius().expect("Radius");
    assert_eq!(radius, 6_371_229.0);

    let region = RegionBox::new(10.0, 30.0, -5.0, 5.0);
    let from_file = net_horizontal_flux_to_region(
        run.raw_data.extract_strict("q").expect("q"),
        &region,
        run.raw_data.extract_strict("u").expect("u"),
        run.raw_data.extract_strict("v").expect("v"),
        radius,
        None,
    )
    .expect("Flux should be computed");
    let in_memory = net_horizontal_flux_to_region(&q, &region, &u, &v, radius, None)
        .expect("Flux should be computed");

    assert_relative_eq!(from_file.value, in_memory.value, max_relative = 1e-12);
    assert!(from_file.value > 0.0);
    assert!(from_file.warnings.is_empty());

    let processed = run
        .proc_data(|fields: &FieldList, constants| {
            let r = constants.radius()?;
            fields
                .iter()
                .map(|f| spatial(f, StatOperation::Mean, r))
                .collect()
        })
        .expect("Processing should succeed");
    assert_eq!(processed.len(), 3);
    assert!(processed
        .iter()
        .all(|f| f.attribute("planet_conf") == Some("earth") && f.shape().to_vec() == vec![2]));
}

#[test]
fn test_load_missing_file() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let result = load_fields(&temp_dir.path().join("absent.nc"));
    assert!(matches!(result, Err(aeolus::AeolusError::NetCDF(_))));
}
