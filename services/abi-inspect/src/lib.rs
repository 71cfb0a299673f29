//! Inspect GOES-R ABI Level-2 products from the command line.
//!
//! The binary opens a NetCDF file (with the `netcdf` feature) or a JSON/YAML
//! dataset manifest, decodes one variable and prints its statistics and the
//! file's area definition as JSON.

pub mod inspect;

pub use inspect::{inspect, open_source, AreaSummary, DatasetSummary, InspectOptions, Summary};
