//! Build a JSON-serializable summary of one ABI L2 file.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use abi_l2_reader::{
    parse_filename, AbiL2Reader, AreaDefinition, DatasetAttrs, DatasetKey, DatasetSource,
    FileInfo, MemoryDataset, ReaderConfig, ReaderError,
};

/// What to inspect and how.
#[derive(Debug, Clone)]
pub struct InspectOptions {
    /// NetCDF file or JSON/YAML manifest
    pub path: PathBuf,
    /// Variable to decode; only the area is reported when `None`
    pub variable: Option<String>,
    /// Platform shortname used when the filename does not carry one
    pub platform: String,
    /// Scan mode used when the filename does not carry one
    pub scan_mode: String,
    pub config: ReaderConfig,
}

/// Decoded variable statistics.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub file_key: String,
    pub shape: Vec<usize>,
    pub valid_count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub attrs: DatasetAttrs,
}

#[derive(Debug, Clone, Serialize)]
pub struct AreaSummary {
    #[serde(flatten)]
    pub definition: AreaDefinition,
    pub proj4: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub file: String,
    pub platform_shortname: String,
    pub platform_name: Option<String>,
    pub observation_type: String,
    pub scan_mode: String,
    pub ncols: usize,
    pub nlines: usize,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub dataset: Option<DatasetSummary>,
    pub area: Option<AreaSummary>,
    /// Set when the file carries no recognized projection
    pub area_error: Option<String>,
}

/// Open `path` as a manifest or, with the `netcdf` feature, a NetCDF file.
pub fn open_source(path: &Path) -> Result<Box<dyn DatasetSource>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("json") | Some("yaml") | Some("yml") => {
            let dataset = MemoryDataset::from_path(path)
                .with_context(|| format!("Failed to load manifest {}", path.display()))?;
            Ok(Box::new(dataset))
        }
        Some("nc") | Some("nc4") => open_netcdf(path),
        _ => bail!(
            "Unrecognized file type '{}': expected .nc, .json, .yaml or .yml",
            path.display()
        ),
    }
}

#[cfg(feature = "netcdf")]
fn open_netcdf(path: &Path) -> Result<Box<dyn DatasetSource>> {
    let dataset = abi_l2_reader::NetCdfDataset::open(path)
        .with_context(|| format!("Failed to open NetCDF file {}", path.display()))?;
    Ok(Box::new(dataset))
}

#[cfg(not(feature = "netcdf"))]
fn open_netcdf(path: &Path) -> Result<Box<dyn DatasetSource>> {
    bail!(
        "Cannot open {}: abi-inspect was built without the `netcdf` feature",
        path.display()
    )
}

/// File metadata from the filename, or from the fallbacks in `options`.
pub fn file_info_for(options: &InspectOptions) -> FileInfo {
    let name = options
        .path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    match parse_filename(name) {
        Some(info) => info,
        None => {
            let observation_type = options.variable.clone().unwrap_or_default();
            FileInfo::new(&options.platform, observation_type, &options.scan_mode)
        }
    }
}

/// Open the file, decode the requested variable and resolve the area.
pub fn inspect(options: &InspectOptions) -> Result<Summary> {
    let source = open_source(&options.path)?;
    let file_info = file_info_for(options);
    let reader = AbiL2Reader::new(source, file_info, options.config.clone())?;

    info!(
        file = %options.path.display(),
        platform = ?reader.platform_name(),
        ncols = reader.ncols(),
        nlines = reader.nlines(),
        "Inspecting ABI L2 file"
    );

    let dataset = match &options.variable {
        Some(name) => {
            let array = reader
                .get_dataset(&DatasetKey::new(name.as_str()), name)
                .with_context(|| format!("Failed to decode variable '{}'", name))?;
            Some(DatasetSummary {
                file_key: name.clone(),
                shape: array.shape.clone(),
                valid_count: array.valid_count(),
                min: array.min(),
                max: array.max(),
                mean: array.mean(),
                attrs: array.attrs,
            })
        }
        None => None,
    };

    let (area, area_error) = match reader.get_area_def(None) {
        Ok(definition) => {
            let proj4 = definition.proj4_string();
            (Some(AreaSummary { definition, proj4 }), None)
        }
        Err(e @ ReaderError::UnsupportedProjection) => {
            warn!(error = %e, "No area definition");
            (None, Some(e.to_string()))
        }
        Err(e) => return Err(e).context("Failed to resolve area definition"),
    };

    let start_time = reader.start_time().ok();
    let end_time = reader.end_time().ok();
    let info = reader.file_info().clone();

    let summary = Summary {
        file: options.path.display().to_string(),
        platform_shortname: info.platform_shortname,
        platform_name: reader.platform_name().map(str::to_string),
        observation_type: info.observation_type,
        scan_mode: info.scan_mode,
        ncols: reader.ncols(),
        nlines: reader.nlines(),
        start_time,
        end_time,
        dataset,
        area,
        area_error,
    };

    reader.close();
    Ok(summary)
}
