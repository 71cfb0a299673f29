//! Area definitions: projection, grid size and extent of a dataset.
//!
//! The projection family is chosen by which projection variable the file
//! carries. `goes_imager_projection` selects the fixed grid and
//! `goes_lat_lon_projection` selects lat/lon. If both are present the fixed
//! grid wins.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decode::decode_variable;
use crate::error::{ReaderError, ReaderResult};
use crate::projection::{
    FixedGridProjection, LatLonProjection, ProjParams, ProjectionKind, SweepAxis,
    FIXED_GRID_VARIABLE, LATLON_EXTENT_VARIABLE, LATLON_VARIABLE,
};
use crate::source::DatasetSource;
use crate::variable::Variable;

/// Outer edges of a grid in projection coordinates.
///
/// Meters for the fixed grid, degrees for lat/lon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaExtent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl AreaExtent {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// `(xmin, ymin, xmax, ymax)`
    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (self.min_x, self.min_y, self.max_x, self.max_y)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self::new(f(self.min_x), f(self.min_y), f(self.max_x), f(self.max_y))
    }
}

/// Georeferencing of a dataset's grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaDefinition {
    pub area_id: String,
    pub description: String,
    pub proj_id: String,
    pub projection: ProjectionKind,
    /// Number of columns (x / lon)
    pub ncols: usize,
    /// Number of rows (y / lat)
    pub nlines: usize,
    pub extent: AreaExtent,
}

impl AreaDefinition {
    pub fn proj_params(&self) -> ProjParams {
        self.projection.proj_params()
    }

    pub fn proj4_string(&self) -> String {
        self.projection.proj4_string()
    }

    /// Size of one pixel in projection units, `(dx, dy)`.
    pub fn pixel_size(&self) -> (f64, f64) {
        (
            self.extent.width() / self.ncols as f64,
            self.extent.height() / self.nlines as f64,
        )
    }

    /// Projection coordinates of a pixel center. Row 0 is the top
    /// (northernmost) row.
    pub fn pixel_center(&self, col: usize, row: usize) -> Option<(f64, f64)> {
        if col >= self.ncols || row >= self.nlines {
            return None;
        }
        let (dx, dy) = self.pixel_size();
        let x = self.extent.min_x + (col as f64 + 0.5) * dx;
        let y = self.extent.max_y - (row as f64 + 0.5) * dy;
        Some((x, y))
    }

    /// Geographic coordinates (lon, lat) of a pixel center, or `None` when
    /// the pixel is outside the grid or off the Earth disk.
    pub fn pixel_lonlat(&self, col: usize, row: usize) -> Option<(f64, f64)> {
        let (x, y) = self.pixel_center(col, row)?;
        match &self.projection {
            ProjectionKind::FixedGrid(p) => p.to_geographic(x, y),
            ProjectionKind::LatLon(_) => Some((x, y)),
        }
    }
}

/// Build the area definition of a dataset.
///
/// `extent_decimals` is the number of decimals fixed-grid extents are
/// rounded to after scaling by the perspective height.
pub fn resolve_area<S: DatasetSource + ?Sized>(
    source: &S,
    extent_decimals: u32,
) -> ReaderResult<AreaDefinition> {
    if source.contains(FIXED_GRID_VARIABLE) {
        resolve_fixed_grid(source, extent_decimals)
    } else if source.contains(LATLON_VARIABLE) {
        resolve_latlon(source)
    } else {
        Err(ReaderError::UnsupportedProjection)
    }
}

fn resolve_fixed_grid<S: DatasetSource + ?Sized>(
    source: &S,
    extent_decimals: u32,
) -> ReaderResult<AreaDefinition> {
    let proj_var = source.variable(FIXED_GRID_VARIABLE)?;

    let sweep_attr = proj_var.attr_str("sweep_angle_axis").ok_or_else(|| {
        ReaderError::malformed_projection(FIXED_GRID_VARIABLE, "sweep_angle_axis")
    })?;
    let sweep_angle_axis = SweepAxis::parse(sweep_attr).ok_or_else(|| {
        ReaderError::malformed_projection(FIXED_GRID_VARIABLE, "sweep_angle_axis")
    })?;

    let projection = FixedGridProjection {
        semi_major_axis: require_f64(&proj_var, "semi_major_axis")?,
        semi_minor_axis: require_f64(&proj_var, "semi_minor_axis")?,
        perspective_point_height: require_f64(&proj_var, "perspective_point_height")?,
        longitude_of_projection_origin: require_f64(
            &proj_var,
            "longitude_of_projection_origin",
        )?,
        sweep_angle_axis,
    };

    let x = source.variable("x")?;
    let y = source.variable("y")?;
    let ncols = x.len();
    let nlines = y.len();

    // Pixel centers in radians, padded by half a pixel to get the edges
    let (x_l, x_r) = axis_endpoints(&x)?;
    let (y_u, y_l) = axis_endpoints(&y)?;
    let x_half = (x_r - x_l) / (ncols - 1) as f64 / 2.0;
    let y_half = (y_u - y_l) / (nlines - 1) as f64 / 2.0;

    let h = projection.perspective_point_height;
    let extent = AreaExtent::new(x_l - x_half, y_l - y_half, x_r + x_half, y_u + y_half)
        .map(|v| round_to(v * h, extent_decimals));

    debug!(
        ncols = ncols,
        nlines = nlines,
        lon_0 = projection.longitude_of_projection_origin,
        extent = ?extent.as_tuple(),
        "Resolved fixed-grid area"
    );

    let kind = ProjectionKind::FixedGrid(projection);
    Ok(build_area(source, kind, ncols, nlines, extent))
}

fn resolve_latlon<S: DatasetSource + ?Sized>(source: &S) -> ReaderResult<AreaDefinition> {
    let proj_var = source.variable(LATLON_VARIABLE)?;
    let ext_var = source.variable(LATLON_EXTENT_VARIABLE)?;

    let projection = LatLonProjection {
        semi_major_axis: require_f64(&proj_var, "semi_major_axis")?,
        semi_minor_axis: require_f64(&proj_var, "semi_minor_axis")?,
        inverse_flattening: require_f64(&proj_var, "inverse_flattening")?,
        longitude_of_prime_meridian: require_f64(&proj_var, "longitude_of_prime_meridian")?,
        lon_center: require_f64(&ext_var, "geospatial_lon_center")?,
        lat_center: require_f64(&ext_var, "geospatial_lat_center")?,
    };

    let extent = AreaExtent::new(
        require_f64(&ext_var, "geospatial_westbound_longitude")?,
        require_f64(&ext_var, "geospatial_southbound_latitude")?,
        require_f64(&ext_var, "geospatial_eastbound_longitude")?,
        require_f64(&ext_var, "geospatial_northbound_latitude")?,
    );

    let ncols = source.variable("lon")?.len();
    let nlines = source.variable("lat")?.len();

    debug!(
        ncols = ncols,
        nlines = nlines,
        lon_0 = projection.lon_center,
        extent = ?extent.as_tuple(),
        "Resolved lat/lon area"
    );

    let kind = ProjectionKind::LatLon(projection);
    Ok(build_area(source, kind, ncols, nlines, extent))
}

fn build_area<S: DatasetSource + ?Sized>(
    source: &S,
    projection: ProjectionKind,
    ncols: usize,
    nlines: usize,
    extent: AreaExtent,
) -> AreaDefinition {
    let proj_id = projection.proj_id().to_string();
    AreaDefinition {
        area_id: source
            .global_attr_str("orbital_slot")
            .map(str::to_string)
            .unwrap_or_else(|| proj_id.clone()),
        description: source
            .global_attr_str("spatial_resolution")
            .unwrap_or("ABI file area")
            .to_string(),
        proj_id,
        projection,
        ncols,
        nlines,
        extent,
    }
}

fn require_f64(var: &Variable, key: &str) -> ReaderResult<f64> {
    var.attr_f64(key)
        .ok_or_else(|| ReaderError::malformed_projection(var.name.as_str(), key))
}

/// Decoded first and last values of a coordinate axis.
fn axis_endpoints(axis: &Variable) -> ReaderResult<(f64, f64)> {
    if axis.len() < 2 {
        return Err(ReaderError::InvalidFormat(format!(
            "coordinate '{}' needs at least 2 values, has {}",
            axis.name,
            axis.len()
        )));
    }
    let values = decode_variable(axis);
    let first = values[0];
    let last = values[values.len() - 1];
    if !first.is_finite() || !last.is_finite() {
        return Err(ReaderError::InvalidFormat(format!(
            "coordinate '{}' has non-finite endpoints",
            axis.name
        )));
    }
    Ok((first, last))
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
