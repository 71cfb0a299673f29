//! The ABI L2 file handler.
//!
//! [`AbiL2Reader`] wraps an open [`DatasetSource`] together with the
//! metadata known from the filename and answers two questions: what are the
//! calibrated values of a variable ([`AbiL2Reader::get_dataset`]) and where
//! on Earth is the grid ([`AbiL2Reader::get_area_def`]).

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::area::{resolve_area, AreaDefinition};
use crate::config::ReaderConfig;
use crate::decode::{decode_values, decode_variable, Encoding};
use crate::error::{ReaderError, ReaderResult};
use crate::filename::FileInfo;
use crate::platform::platform_name;
use crate::source::DatasetSource;

const TIME_COVERAGE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Identifies a requested dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetKey {
    pub name: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
}

impl DatasetKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifiers: Vec::new(),
        }
    }
}

/// Attributes attached to a decoded dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetAttrs {
    pub name: String,
    pub modifiers: Vec<String>,
    pub platform_name: Option<String>,
    pub platform_shortname: String,
    pub scan_mode: String,
    #[serde(rename = "instrument_ID")]
    pub instrument_id: Option<String>,
    pub orbital_slot: Option<String>,
    pub production_site: Option<String>,
    pub scene_id: Option<String>,
    #[serde(rename = "timeline_ID")]
    pub timeline_id: Option<String>,
    pub sensor: String,
    pub satellite_latitude: Option<f64>,
    pub satellite_longitude: Option<f64>,
    pub satellite_altitude: Option<f64>,
    pub units: Option<String>,
}

/// A calibrated variable: physical values plus merged attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataArray {
    pub name: String,
    pub dims: Vec<String>,
    pub shape: Vec<usize>,
    /// Row-major physical values, NaN where the file holds fill
    pub data: Vec<f64>,
    pub attrs: DatasetAttrs,
}

impl DataArray {
    /// Value at `(row, col)` of a 2-D array.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        match self.shape.as_slice() {
            [nrows, ncols] if row < *nrows && col < *ncols => {
                self.data.get(row * ncols + col).copied()
            }
            _ => None,
        }
    }

    fn valid(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().copied().filter(|v| !v.is_nan())
    }

    /// Number of non-NaN values.
    pub fn valid_count(&self) -> usize {
        self.valid().count()
    }

    pub fn min(&self) -> Option<f64> {
        self.valid().reduce(f64::min)
    }

    pub fn max(&self) -> Option<f64> {
        self.valid().reduce(f64::max)
    }

    pub fn mean(&self) -> Option<f64> {
        let (sum, count) = self.valid().fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
        (count > 0).then(|| sum / count as f64)
    }
}

/// Reader for one ABI L2 file.
pub struct AbiL2Reader<S: DatasetSource> {
    source: S,
    file_info: FileInfo,
    config: ReaderConfig,
    platform_name: Option<String>,
    ncols: usize,
    nlines: usize,
}

impl<S: DatasetSource> AbiL2Reader<S> {
    /// Create a reader over an open source.
    pub fn new(source: S, file_info: FileInfo, config: ReaderConfig) -> ReaderResult<Self> {
        config.validate()?;

        let platform_name = platform_name(&file_info.platform_shortname, &config.platform_names);
        let ncols = axis_len(&source, &["x", "lon"])?;
        let nlines = axis_len(&source, &["y", "lat"])?;

        info!(
            platform = %file_info.platform_shortname,
            observation_type = %file_info.observation_type,
            scan_mode = %file_info.scan_mode,
            ncols = ncols,
            nlines = nlines,
            "Opened ABI L2 dataset"
        );

        Ok(Self {
            source,
            file_info,
            config,
            platform_name,
            ncols,
            nlines,
        })
    }

    /// Create a reader with the default configuration.
    pub fn with_defaults(source: S, file_info: FileInfo) -> ReaderResult<Self> {
        Self::new(source, file_info, ReaderConfig::default())
    }

    /// Number of grid columns (length of `x` or `lon`, 0 if neither exists).
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Number of grid rows (length of `y` or `lat`, 0 if neither exists).
    pub fn nlines(&self) -> usize {
        self.nlines
    }

    pub fn platform_name(&self) -> Option<&str> {
        self.platform_name.as_deref()
    }

    pub fn sensor(&self) -> &str {
        &self.config.sensor
    }

    pub fn file_info(&self) -> &FileInfo {
        &self.file_info
    }

    /// Start of the observation, from `time_coverage_start` or else the
    /// filename.
    pub fn start_time(&self) -> ReaderResult<DateTime<Utc>> {
        self.coverage_time("time_coverage_start", self.file_info.start_time)
    }

    /// End of the observation, from `time_coverage_end` or else the filename.
    pub fn end_time(&self) -> ReaderResult<DateTime<Utc>> {
        self.coverage_time("time_coverage_end", self.file_info.end_time)
    }

    fn coverage_time(
        &self,
        attr: &str,
        fallback: Option<DateTime<Utc>>,
    ) -> ReaderResult<DateTime<Utc>> {
        match self.source.global_attr_str(attr) {
            Some(value) => parse_coverage_time(value),
            None => fallback.ok_or_else(|| ReaderError::missing_attribute("<global>", attr)),
        }
    }

    /// Decoded values of a coordinate variable such as `x` or `lat`.
    pub fn coordinate(&self, name: &str) -> ReaderResult<Vec<f64>> {
        let var = self.source.variable(name)?;
        Ok(decode_variable(&var))
    }

    /// Load and calibrate the variable `file_key`, naming it after `key`.
    pub fn get_dataset(&self, key: &DatasetKey, file_key: &str) -> ReaderResult<DataArray> {
        let var = self.source.variable(file_key)?;

        let mut encoding = Encoding::from_variable(&var);
        if !self.config.mask_fill {
            encoding = encoding.without_fill();
        }
        let data = decode_values(&var.data, &encoding);

        debug!(
            name = %key.name,
            file_key = file_key,
            dtype = var.data.dtype(),
            scale_factor = encoding.scale_factor,
            add_offset = encoding.add_offset,
            unsigned = encoding.unsigned,
            "Decoded variable"
        );

        let attrs = DatasetAttrs {
            name: key.name.clone(),
            modifiers: key.modifiers.clone(),
            platform_name: self.platform_name.clone(),
            platform_shortname: self.file_info.platform_shortname.clone(),
            scan_mode: self.file_info.scan_mode.clone(),
            instrument_id: self.global_string("instrument_ID"),
            orbital_slot: self.global_string("orbital_slot"),
            production_site: self.global_string("production_site"),
            scene_id: self.global_string("scene_id"),
            timeline_id: self.global_string("timeline_id"),
            sensor: self.config.sensor.clone(),
            satellite_latitude: self.scalar("nominal_satellite_subpoint_lat")?,
            satellite_longitude: self.scalar("nominal_satellite_subpoint_lon")?,
            satellite_altitude: self.scalar("nominal_satellite_height")?,
            units: var.attr_str("units").map(str::to_string),
        };

        Ok(DataArray {
            name: key.name.clone(),
            dims: var.dims,
            shape: var.shape,
            data,
            attrs,
        })
    }

    /// Area definition of the file's grid. The key is accepted for API
    /// symmetry; every variable in a file shares one grid.
    pub fn get_area_def(&self, key: Option<&DatasetKey>) -> ReaderResult<AreaDefinition> {
        debug!(key = ?key.map(|k| k.name.as_str()), "Resolving area definition");
        resolve_area(&self.source, self.config.extent_decimals)
    }

    /// Release the underlying source.
    pub fn close(self) {
        self.source.close();
    }

    fn global_string(&self, key: &str) -> Option<String> {
        self.source.global_attr_str(key).map(str::to_string)
    }

    /// Decoded value of an optional scalar variable.
    fn scalar(&self, name: &str) -> ReaderResult<Option<f64>> {
        if !self.source.contains(name) {
            return Ok(None);
        }
        let var = self.source.variable(name)?;
        let values = decode_variable(&var);
        match values.as_slice() {
            [value] => Ok(Some(*value)),
            _ => Err(ReaderError::InvalidFormat(format!(
                "'{}' should be a scalar, has {} values",
                name,
                values.len()
            ))),
        }
    }
}

fn axis_len<S: DatasetSource>(source: &S, names: &[&str]) -> ReaderResult<usize> {
    for name in names {
        if source.contains(name) {
            return Ok(source.variable(name)?.len());
        }
    }
    Ok(0)
}

/// Parse `2017-09-20T17:30:40.8Z`.
pub fn parse_coverage_time(value: &str) -> ReaderResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, TIME_COVERAGE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| ReaderError::invalid_time(value, e))
}
