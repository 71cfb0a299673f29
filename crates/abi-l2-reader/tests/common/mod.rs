//! Shared datasets for abi-l2-reader integration tests.
//!
//! Two small in-memory files: a cloud-top height product on a toy fixed
//! grid (`a = b = h = 1`) and an RSR product on a lat/lon grid.

#![allow(dead_code)]

use abi_l2_reader::{FileInfo, MemoryDataset, Variable, VariableData};

pub const HT_SCALE: f64 = 0.3052037;

/// Stored HT values: a small value, fill, and both ends of the signed range.
pub const HT_STORED: [i16; 4] = [2, -1, -32768, 32767];

/// A 2-element axis stored as `[0, 1]` and decoded with `scale`/`offset`.
pub fn packed_axis(name: &str, scale: f64, offset: f64) -> Variable {
    Variable::axis(name, VariableData::I16(vec![0, 1]))
        .with_attr("scale_factor", scale)
        .with_attr("add_offset", offset)
}

pub fn fixed_grid_projection() -> Variable {
    Variable::attributes_only("goes_imager_projection")
        .with_attr("semi_major_axis", 1.0)
        .with_attr("semi_minor_axis", 1.0)
        .with_attr("perspective_point_height", 1.0)
        .with_attr("longitude_of_projection_origin", -90.0)
        .with_attr("sweep_angle_axis", "x")
}

pub fn ht_variable() -> Variable {
    Variable::new(
        "HT",
        vec!["y".into(), "x".into()],
        vec![2, 2],
        VariableData::I16(HT_STORED.to_vec()),
    )
    .expect("2x2 HT variable")
    .with_attr("scale_factor", HT_SCALE)
    .with_attr("add_offset", 0.0)
    .with_attr("_FillValue", -1i16)
    .with_attr("_Unsigned", "True")
    .with_attr("units", "m")
}

/// Fixed-grid HT dataset with satellite subpoint scalars and time coverage.
pub fn ht_dataset() -> MemoryDataset {
    MemoryDataset::new()
        .with_variable(fixed_grid_projection())
        .with_variable(packed_axis("x", 2.0, -1.0))
        .with_variable(packed_axis("y", -2.0, 1.0))
        .with_variable(ht_variable())
        .with_variable(Variable::scalar("nominal_satellite_subpoint_lat", 0.0))
        .with_variable(Variable::scalar("nominal_satellite_subpoint_lon", -89.5))
        .with_variable(Variable::scalar("nominal_satellite_height", 35786020.0))
        .with_attr("time_coverage_start", "2017-09-20T17:30:40.8Z")
        .with_attr("time_coverage_end", "2017-09-20T17:41:17.5Z")
}

pub fn ht_file_info() -> FileInfo {
    FileInfo::new("G16", "HT", "M3")
}

pub fn latlon_projection() -> Variable {
    Variable::attributes_only("goes_lat_lon_projection")
        .with_attr("semi_major_axis", 1.0)
        .with_attr("semi_minor_axis", 1.0)
        .with_attr("inverse_flattening", 1.0)
        .with_attr("longitude_of_prime_meridian", 0.0)
}

pub fn latlon_extent() -> Variable {
    Variable::attributes_only("geospatial_lat_lon_extent")
        .with_attr("geospatial_westbound_longitude", -85.0)
        .with_attr("geospatial_eastbound_longitude", -65.0)
        .with_attr("geospatial_northbound_latitude", 20.0)
        .with_attr("geospatial_southbound_latitude", -20.0)
        .with_attr("geospatial_lat_center", 0.0)
        .with_attr("geospatial_lon_center", -75.0)
}

/// Lat/lon RSR dataset without global attributes.
pub fn rsr_dataset() -> MemoryDataset {
    let rsr = Variable::new(
        "RSR",
        vec!["lat".into(), "lon".into()],
        vec![2, 2],
        VariableData::F64(vec![1.0; 4]),
    )
    .expect("2x2 RSR variable");

    MemoryDataset::new()
        .with_variable(latlon_projection())
        .with_variable(latlon_extent())
        .with_variable(packed_axis("lon", 2.0, -1.0))
        .with_variable(packed_axis("lat", -2.0, 1.0))
        .with_variable(rsr)
}

pub fn rsr_file_info() -> FileInfo {
    FileInfo::new("G16", "RSR", "M3").with_scene("C")
}
