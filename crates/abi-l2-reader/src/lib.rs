//! Reader for GOES-R ABI Level-2 NetCDF products.
//!
//! Two things are provided for each file:
//!
//! - calibrated variables: stored integers are turned into physical values
//!   with `scale_factor`/`add_offset`, fill values become NaN and variables
//!   flagged `_Unsigned = "true"` are reinterpreted as unsigned first
//! - an area definition: either the geostationary fixed grid
//!   (`goes_imager_projection`) or a lat/lon grid (`goes_lat_lon_projection`)
//!
//! # Example
//!
//! ```ignore
//! use abi_l2_reader::{parse_filename, AbiL2Reader, DatasetKey, MemoryDataset};
//!
//! let dataset = MemoryDataset::from_path("ht_manifest.json")?;
//! let info = parse_filename("OR_ABI-L2-HTF-M3_G16_s20172631730408_e20172631741175_c20172631742108.nc")
//!     .expect("ABI L2 filename");
//! let reader = AbiL2Reader::with_defaults(dataset, info)?;
//!
//! let ht = reader.get_dataset(&DatasetKey::new("HT"), "HT")?;
//! let area = reader.get_area_def(None)?;
//! ```
//!
//! # Backends
//!
//! Variables come from a [`DatasetSource`]. [`MemoryDataset`] is always
//! available and loads JSON/YAML manifests. Enable the `netcdf` feature for
//! `NetCdfDataset`, which reads NetCDF-4 files through libnetcdf.

pub mod area;
pub mod config;
pub mod decode;
pub mod error;
pub mod filename;
#[cfg(feature = "netcdf")]
pub mod native;
pub mod platform;
pub mod projection;
pub mod reader;
pub mod source;
pub mod variable;

pub use area::{resolve_area, AreaDefinition, AreaExtent};
pub use config::ReaderConfig;
pub use decode::{decode_values, decode_variable, Encoding, FillValue};
pub use error::{ReaderError, ReaderResult};
pub use filename::{parse_filename, parse_goes_timestamp, FileInfo};
#[cfg(feature = "netcdf")]
pub use native::{silence_hdf5_errors, NetCdfDataset};
pub use platform::{platform_name, PLATFORM_NAMES, SENSOR};
pub use projection::{
    FixedGridProjection, LatLonProjection, ProjParams, ProjValue, ProjectionKind, SweepAxis,
};
pub use reader::{parse_coverage_time, AbiL2Reader, DataArray, DatasetAttrs, DatasetKey};
pub use source::{DatasetSource, MemoryDataset};
pub use variable::{AttrValue, Attributes, Variable, VariableData};
