//! Area definitions for fixed-grid and lat/lon products.

mod common;

use abi_l2_reader::{
    AbiL2Reader, AreaDefinition, DatasetSource, MemoryDataset, ProjParams, ProjValue,
    ProjectionKind, ReaderError, Variable, VariableData,
};
use test_utils::fixtures::{ellipsoid, fixed_grid, satellite};
use test_utils::{assert_approx_eq, assert_coords_approx_eq, linspace};

use common::*;

fn area_of(dataset: MemoryDataset) -> Result<AreaDefinition, ReaderError> {
    let reader = AbiL2Reader::with_defaults(dataset, ht_file_info())?;
    reader.get_area_def(None)
}

fn params(entries: &[(&str, ProjValue)]) -> ProjParams {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn test_get_area_def_fixedgrid() {
    let reader = AbiL2Reader::with_defaults(ht_dataset(), ht_file_info()).unwrap();
    let area = reader.get_area_def(None).unwrap();

    let expected = params(&[
        ("a", 1.0.into()),
        ("b", 1.0.into()),
        ("h", 1.0.into()),
        ("lon_0", (-90.0).into()),
        ("proj", "geos".into()),
        ("sweep", "x".into()),
        ("units", "m".into()),
    ]);
    assert_eq!(area.proj_params(), expected);
    assert_eq!(area.ncols, reader.ncols());
    assert_eq!(area.nlines, reader.nlines());

    let (xmin, ymin, xmax, ymax) = area.extent.as_tuple();
    assert_approx_eq!(xmin, -2.0, 1e-9);
    assert_approx_eq!(ymin, -2.0, 1e-9);
    assert_approx_eq!(xmax, 2.0, 1e-9);
    assert_approx_eq!(ymax, 2.0, 1e-9);
}

#[test]
fn test_fixedgrid_identity_defaults() {
    let area = area_of(ht_dataset()).unwrap();
    assert_eq!(area.area_id, "abi_geos");
    assert_eq!(area.proj_id, "abi_geos");
    assert_eq!(area.description, "ABI file area");
    assert_eq!(
        area.proj4_string(),
        "+proj=geos +a=1 +b=1 +h=1 +lon_0=-90 +sweep=x +units=m"
    );
}

#[test]
fn test_identity_from_global_attributes() {
    let dataset = ht_dataset()
        .with_attr("orbital_slot", "GOES-East")
        .with_attr("spatial_resolution", "10km at nadir");
    let area = area_of(dataset).unwrap();
    assert_eq!(area.area_id, "GOES-East");
    assert_eq!(area.description, "10km at nadir");
    assert_eq!(area.proj_id, "abi_geos");
}

#[test]
fn test_get_area_def_latlon() {
    let reader = AbiL2Reader::with_defaults(rsr_dataset(), rsr_file_info()).unwrap();
    let area = reader.get_area_def(None).unwrap();

    let expected = params(&[
        ("proj", "latlong".into()),
        ("a", 1.0.into()),
        ("b", 1.0.into()),
        ("fi", 1.0.into()),
        ("pm", 0.0.into()),
        ("lon_0", (-75.0).into()),
        ("lat_0", 0.0.into()),
    ]);
    assert_eq!(area.proj_params(), expected);
    assert_eq!(area.ncols, reader.ncols());
    assert_eq!(area.nlines, reader.nlines());
    assert_eq!(area.extent.as_tuple(), (-85.0, -20.0, -65.0, 20.0));
    assert_eq!(area.area_id, "abi_latlon");
    assert_eq!(
        area.proj4_string(),
        "+proj=latlong +a=1 +b=1 +fi=1 +lat_0=0 +lon_0=-75 +pm=0"
    );
}

#[test]
fn test_latlon_pixels_are_geographic() {
    let area = area_of(rsr_dataset()).unwrap();
    // 2x2 over 20 x 40 degrees
    assert_eq!(area.pixel_size(), (10.0, 20.0));
    assert_eq!(area.pixel_lonlat(0, 0), Some((-80.0, 10.0)));
    assert_eq!(area.pixel_lonlat(1, 1), Some((-70.0, -10.0)));
}

#[test]
fn test_fixed_grid_wins_when_both_present() {
    let dataset = ht_dataset()
        .with_variable(latlon_projection())
        .with_variable(latlon_extent());
    let area = area_of(dataset).unwrap();
    assert!(matches!(area.projection, ProjectionKind::FixedGrid(_)));
}

#[test]
fn test_unsupported_projection() {
    let dataset = MemoryDataset::new()
        .with_variable(ht_variable())
        .with_variable(packed_axis("x", 2.0, -1.0))
        .with_variable(packed_axis("y", -2.0, 1.0));
    assert!(matches!(
        area_of(dataset),
        Err(ReaderError::UnsupportedProjection)
    ));
}

#[test]
fn test_malformed_fixed_grid_projection() {
    let mut proj = fixed_grid_projection();
    proj.attrs.remove("perspective_point_height");
    let dataset = ht_dataset().with_variable(proj);

    match area_of(dataset) {
        Err(ReaderError::MalformedProjection {
            variable,
            attribute,
        }) => {
            assert_eq!(variable, "goes_imager_projection");
            assert_eq!(attribute, "perspective_point_height");
        }
        other => panic!("expected MalformedProjection, got {:?}", other),
    }
}

#[test]
fn test_unknown_sweep_axis_is_malformed() {
    let proj = fixed_grid_projection().with_attr("sweep_angle_axis", "z");
    let dataset = ht_dataset().with_variable(proj);
    assert!(matches!(
        area_of(dataset),
        Err(ReaderError::MalformedProjection { attribute, .. }) if attribute == "sweep_angle_axis"
    ));
}

#[test]
fn test_non_numeric_attribute_is_malformed() {
    let proj = fixed_grid_projection().with_attr("semi_major_axis", "6378137 m");
    let dataset = ht_dataset().with_variable(proj);
    assert!(matches!(
        area_of(dataset),
        Err(ReaderError::MalformedProjection { .. })
    ));
}

#[test]
fn test_malformed_latlon_extent() {
    let mut extent = latlon_extent();
    extent.attrs.remove("geospatial_lat_center");
    let dataset = rsr_dataset().with_variable(extent);
    assert!(matches!(
        area_of(dataset),
        Err(ReaderError::MalformedProjection { variable, attribute })
            if variable == "geospatial_lat_lon_extent" && attribute == "geospatial_lat_center"
    ));
}

#[test]
fn test_latlon_without_extent_variable() {
    let mut dataset = rsr_dataset();
    dataset.variables.remove("geospatial_lat_lon_extent");
    assert!(matches!(
        area_of(dataset),
        Err(ReaderError::MissingVariable(name)) if name == "geospatial_lat_lon_extent"
    ));
}

#[test]
fn test_single_value_axis_is_invalid() {
    let x = Variable::axis("x", VariableData::F64(vec![0.0]));
    let dataset = ht_dataset().with_variable(x);
    assert!(matches!(area_of(dataset), Err(ReaderError::InvalidFormat(_))));
}

/// GOES-16 projection over unpacked scan angles `-0.2..=0.2` rad, 5 pixels.
fn goes16_toy_grid() -> MemoryDataset {
    let proj = Variable::attributes_only("goes_imager_projection")
        .with_attr("semi_major_axis", ellipsoid::SEMI_MAJOR_AXIS)
        .with_attr("semi_minor_axis", ellipsoid::SEMI_MINOR_AXIS)
        .with_attr("perspective_point_height", satellite::PERSPECTIVE_POINT_HEIGHT)
        .with_attr("longitude_of_projection_origin", satellite::GOES_EAST_LON)
        .with_attr("sweep_angle_axis", "x");

    MemoryDataset::new()
        .with_variable(proj)
        .with_variable(Variable::axis("x", VariableData::F64(linspace(-0.2, 0.2, 5))))
        .with_variable(Variable::axis("y", VariableData::F64(linspace(0.2, -0.2, 5))))
}

#[test]
fn test_fixed_grid_pixel_geolocation() {
    let area = area_of(goes16_toy_grid()).unwrap();
    assert_eq!((area.ncols, area.nlines), (5, 5));

    // Center pixel looks straight down at the subpoint
    let (lon, lat) = area.pixel_lonlat(2, 2).unwrap();
    assert_coords_approx_eq!((lon, lat), (-75.0, 0.0), 1e-6);

    // Upper-left of center is north-west of the subpoint
    let (lon, lat) = area.pixel_lonlat(1, 1).unwrap();
    assert!(lon < -75.0, "lon {} should be west of -75", lon);
    assert!(lat > 0.0, "lat {} should be north", lat);

    // 0.28 rad off nadir misses the Earth
    assert_eq!(area.pixel_lonlat(0, 0), None);
    assert_eq!(area.pixel_lonlat(5, 0), None);
}

#[test]
fn test_fixed_grid_geolocation_roundtrip() {
    let area = area_of(goes16_toy_grid()).unwrap();
    let ProjectionKind::FixedGrid(proj) = &area.projection else {
        panic!("expected fixed grid");
    };

    let (x, y) = area.pixel_center(1, 3).unwrap();
    let (lon, lat) = proj.to_geographic(x, y).unwrap();
    let (x2, y2) = proj.from_geographic(lon, lat).unwrap();
    assert_coords_approx_eq!((x2, y2), (x, y), 1e-3);
}

#[test]
fn test_goes16_full_disk_extent() {
    let n = fixed_grid::FULL_DISK_2KM;
    let stored: Vec<i16> = (0..n as i16).collect();

    let proj = Variable::attributes_only("goes_imager_projection")
        .with_attr("semi_major_axis", ellipsoid::SEMI_MAJOR_AXIS)
        .with_attr("semi_minor_axis", ellipsoid::SEMI_MINOR_AXIS)
        .with_attr("perspective_point_height", satellite::PERSPECTIVE_POINT_HEIGHT)
        .with_attr("longitude_of_projection_origin", satellite::GOES_EAST_LON)
        .with_attr("sweep_angle_axis", "x");
    let x = Variable::axis("x", VariableData::I16(stored.clone()))
        .with_attr("scale_factor", fixed_grid::X_SCALE)
        .with_attr("add_offset", fixed_grid::X_OFFSET);
    let y = Variable::axis("y", VariableData::I16(stored))
        .with_attr("scale_factor", fixed_grid::Y_SCALE)
        .with_attr("add_offset", fixed_grid::Y_OFFSET);

    let dataset = MemoryDataset::new()
        .with_variable(proj)
        .with_variable(x)
        .with_variable(y)
        .with_attr("orbital_slot", "GOES-East")
        .with_attr("spatial_resolution", "2km at nadir");
    assert!(dataset.contains("goes_imager_projection"));

    let area = area_of(dataset).unwrap();
    let (xmin, ymin, xmax, ymax) = area.extent.as_tuple();
    let edge = 5434894.885056;
    assert_approx_eq!(xmin, -edge, 1e-3);
    assert_approx_eq!(ymin, -edge, 1e-3);
    assert_approx_eq!(xmax, edge, 1e-3);
    assert_approx_eq!(ymax, edge, 1e-3);

    let (dx, dy) = area.pixel_size();
    assert_approx_eq!(dx, 2004.017, 1e-3);
    assert_approx_eq!(dy, 2004.017, 1e-3);
}

#[test]
fn test_area_def_serializes_with_kind_tag() {
    let area = area_of(rsr_dataset()).unwrap();
    let json = serde_json::to_value(&area).unwrap();
    assert_eq!(json["projection"]["kind"], "lat_lon");
    assert_eq!(json["ncols"], 2);

    let back: AreaDefinition = serde_json::from_value(json).unwrap();
    assert_eq!(back, area);
}
