//! Projection families found in ABI L2 files.
//!
//! Full disk, CONUS and mesoscale products use the GOES fixed grid: a
//! geostationary projection whose `x`/`y` coordinates are scan angles in
//! radians. Some derived products (RSR, for instance) are instead
//! gridded on regular latitude/longitude.
//!
//! # Reference
//!
//! GOES-R Product Definition and Users' Guide (PUG) Volume 4, Section 4.2.8

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of the fixed-grid projection variable.
pub const FIXED_GRID_VARIABLE: &str = "goes_imager_projection";
/// Name of the lat/lon projection variable.
pub const LATLON_VARIABLE: &str = "goes_lat_lon_projection";
/// Companion variable holding the geographic bounds of lat/lon products.
pub const LATLON_EXTENT_VARIABLE: &str = "geospatial_lat_lon_extent";

/// A single PROJ parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProjValue {
    Float(f64),
    Str(String),
}

impl fmt::Display for ProjValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjValue::Float(v) => write!(f, "{}", v),
            ProjValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<f64> for ProjValue {
    fn from(v: f64) -> Self {
        ProjValue::Float(v)
    }
}

impl From<&str> for ProjValue {
    fn from(v: &str) -> Self {
        ProjValue::Str(v.to_string())
    }
}

/// PROJ parameter mapping, ordered by key.
pub type ProjParams = BTreeMap<String, ProjValue>;

/// Sweep angle axis of a geostationary imager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SweepAxis {
    /// GOES-R series
    X,
    /// Meteosat, Himawari
    Y,
}

impl SweepAxis {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "x" | "X" => Some(SweepAxis::X),
            "y" | "Y" => Some(SweepAxis::Y),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SweepAxis::X => "x",
            SweepAxis::Y => "y",
        }
    }
}

/// GOES fixed-grid (geostationary) projection parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedGridProjection {
    /// Semi-major axis of Earth ellipsoid (meters)
    pub semi_major_axis: f64,
    /// Semi-minor axis of Earth ellipsoid (meters)
    pub semi_minor_axis: f64,
    /// Satellite height above the ellipsoid (meters)
    pub perspective_point_height: f64,
    /// Longitude of satellite nadir point (degrees)
    pub longitude_of_projection_origin: f64,
    pub sweep_angle_axis: SweepAxis,
}

impl FixedGridProjection {
    /// `{proj: geos, lon_0, a, b, h, units: m, sweep}`
    pub fn proj_params(&self) -> ProjParams {
        let mut params = ProjParams::new();
        params.insert("proj".into(), "geos".into());
        params.insert("lon_0".into(), self.longitude_of_projection_origin.into());
        params.insert("a".into(), self.semi_major_axis.into());
        params.insert("b".into(), self.semi_minor_axis.into());
        params.insert("h".into(), self.perspective_point_height.into());
        params.insert("units".into(), "m".into());
        params.insert("sweep".into(), self.sweep_angle_axis.as_str().into());
        params
    }

    /// Convert projection coordinates (meters, i.e. scan angle times `h`)
    /// to geographic (lon/lat degrees).
    ///
    /// Returns `None` when the line of sight misses the Earth.
    pub fn to_geographic(&self, x_m: f64, y_m: f64) -> Option<(f64, f64)> {
        let h = self.perspective_point_height;
        let req = self.semi_major_axis;
        let rpol = self.semi_minor_axis;
        if h == 0.0 || req == 0.0 || rpol == 0.0 {
            return None;
        }

        // Distance from Earth center to satellite, in units of req
        let radius_g = 1.0 + h / req;
        let radius_p = rpol / req;

        let x_rad = x_m / h;
        let y_rad = y_m / h;

        let (vy, vz) = match self.sweep_angle_axis {
            SweepAxis::X => {
                let vz = y_rad.tan();
                (x_rad.tan() * 1.0_f64.hypot(vz), vz)
            }
            SweepAxis::Y => {
                let vy = x_rad.tan();
                (vy, y_rad.tan() * 1.0_f64.hypot(vy))
            }
        };
        let vx = -1.0;
        let vz = vz / radius_p;

        // Quadratic for the distance along the line of sight to the ellipsoid
        let a = vx * vx + vy * vy + vz * vz;
        let b = 2.0 * radius_g * vx;
        let c = radius_g * radius_g - 1.0;
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None; // Scan angle points to space
        }
        let k = (-b - discriminant.sqrt()) / (2.0 * a);

        let sx = radius_g + k * vx;
        let sy = k * vy;
        let sz = k * vz * radius_p;

        let lon = sy.atan2(sx);
        let lat = (sz * lon.cos() / sx / (radius_p * radius_p)).atan();

        let lon_deg = lon.to_degrees() + self.longitude_of_projection_origin;
        Some((wrap_longitude(lon_deg), lat.to_degrees()))
    }

    /// Convert geographic coordinates (lon/lat degrees) to projection
    /// coordinates (meters).
    ///
    /// Returns `None` if the point is not visible from the satellite.
    pub fn from_geographic(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let h = self.perspective_point_height;
        let req = self.semi_major_axis;
        let rpol = self.semi_minor_axis;
        if h == 0.0 || req == 0.0 || rpol == 0.0 {
            return None;
        }
        let h_total = h + req;

        let lat_rad = lat.to_radians();
        let dlon = (lon - self.longitude_of_projection_origin).to_radians();

        // Geocentric latitude (accounting for Earth's oblateness)
        let phi_c = ((rpol / req).powi(2) * lat_rad.tan()).atan();

        // Radius from Earth center to surface point
        let e2 = 1.0 - (rpol / req).powi(2);
        let rc = rpol / (1.0 - e2 * phi_c.cos().powi(2)).sqrt();

        let sx = h_total - rc * phi_c.cos() * dlon.cos();
        let sy = -rc * phi_c.cos() * dlon.sin();
        let sz = rc * phi_c.sin();

        // Point must be on the satellite-facing side of the Earth
        if sx * (h_total - sx) < sy * sy + (req / rpol).powi(2) * sz * sz {
            return None;
        }

        let (x_rad, y_rad) = match self.sweep_angle_axis {
            SweepAxis::X => ((-sy).atan2(sx.hypot(sz)), sz.atan2(sx)),
            SweepAxis::Y => ((-sy).atan2(sx), sz.atan2(sx.hypot(sy))),
        };

        Some((x_rad * h, y_rad * h))
    }
}

/// Latitude/longitude projection parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLonProjection {
    pub semi_major_axis: f64,
    pub semi_minor_axis: f64,
    pub inverse_flattening: f64,
    pub longitude_of_prime_meridian: f64,
    /// From `geospatial_lon_center`
    pub lon_center: f64,
    /// From `geospatial_lat_center`
    pub lat_center: f64,
}

impl LatLonProjection {
    /// `{proj: latlong, a, b, fi, pm, lon_0, lat_0}`
    pub fn proj_params(&self) -> ProjParams {
        let mut params = ProjParams::new();
        params.insert("proj".into(), "latlong".into());
        params.insert("a".into(), self.semi_major_axis.into());
        params.insert("b".into(), self.semi_minor_axis.into());
        params.insert("fi".into(), self.inverse_flattening.into());
        params.insert("pm".into(), self.longitude_of_prime_meridian.into());
        params.insert("lon_0".into(), self.lon_center.into());
        params.insert("lat_0".into(), self.lat_center.into());
        params
    }
}

/// The projection family of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProjectionKind {
    FixedGrid(FixedGridProjection),
    LatLon(LatLonProjection),
}

impl ProjectionKind {
    pub fn proj_params(&self) -> ProjParams {
        match self {
            ProjectionKind::FixedGrid(p) => p.proj_params(),
            ProjectionKind::LatLon(p) => p.proj_params(),
        }
    }

    /// Identifier used for the projection of an area.
    pub fn proj_id(&self) -> &'static str {
        match self {
            ProjectionKind::FixedGrid(_) => "abi_geos",
            ProjectionKind::LatLon(_) => "abi_latlon",
        }
    }

    /// Render the parameters as a PROJ string, e.g.
    /// `+proj=geos +a=6378137 +b=6356752.31414 ...`.
    pub fn proj4_string(&self) -> String {
        let params = self.proj_params();
        let mut parts = Vec::with_capacity(params.len() + 1);
        // PROJ expects +proj first
        if let Some(proj) = params.get("proj") {
            parts.push(format!("+proj={}", proj));
        }
        parts.extend(
            params
                .iter()
                .filter(|(k, _)| k.as_str() != "proj")
                .map(|(k, v)| format!("+{}={}", k, v)),
        );
        parts.join(" ")
    }
}

fn wrap_longitude(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && lon > 0.0 {
        180.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goes16() -> FixedGridProjection {
        FixedGridProjection {
            semi_major_axis: 6378137.0,
            semi_minor_axis: 6356752.31414,
            perspective_point_height: 35786023.0,
            longitude_of_projection_origin: -75.0,
            sweep_angle_axis: SweepAxis::X,
        }
    }

    #[test]
    fn test_fixed_grid_params() {
        let params = goes16().proj_params();
        assert_eq!(params["proj"], ProjValue::Str("geos".into()));
        assert_eq!(params["sweep"], ProjValue::Str("x".into()));
        assert_eq!(params["units"], ProjValue::Str("m".into()));
        assert_eq!(params["h"], ProjValue::Float(35786023.0));
        assert_eq!(params.len(), 7);
    }

    #[test]
    fn test_nadir_maps_to_subpoint() {
        let (lon, lat) = goes16().to_geographic(0.0, 0.0).unwrap();
        assert!((lon - (-75.0)).abs() < 1e-9);
        assert!(lat.abs() < 1e-9);
    }

    #[test]
    fn test_geographic_roundtrip() {
        for sweep in [SweepAxis::X, SweepAxis::Y] {
            let proj = FixedGridProjection {
                sweep_angle_axis: sweep,
                ..goes16()
            };
            let (lon, lat) = (-95.0, 35.0);
            let (x, y) = proj.from_geographic(lon, lat).expect("visible point");
            let (lon2, lat2) = proj.to_geographic(x, y).expect("on disk");
            assert!((lon - lon2).abs() < 1e-6, "{:?}: {} vs {}", sweep, lon, lon2);
            assert!((lat - lat2).abs() < 1e-6, "{:?}: {} vs {}", sweep, lat, lat2);
        }
    }

    #[test]
    fn test_off_earth_is_none() {
        let proj = goes16();
        let h = proj.perspective_point_height;
        // ~0.2 rad is well beyond the limb (~0.151 rad)
        assert!(proj.to_geographic(0.2 * h, 0.0).is_none());
        // Far side of the planet
        assert!(proj.from_geographic(105.0, 0.0).is_none());
    }

    #[test]
    fn test_proj4_string_starts_with_proj() {
        let kind = ProjectionKind::LatLon(LatLonProjection {
            semi_major_axis: 1.0,
            semi_minor_axis: 1.0,
            inverse_flattening: 1.0,
            longitude_of_prime_meridian: 0.0,
            lon_center: -75.0,
            lat_center: 0.0,
        });
        let s = kind.proj4_string();
        assert!(s.starts_with("+proj=latlong "), "{}", s);
        assert!(s.contains("+lon_0=-75"));
        assert_eq!(kind.proj_id(), "abi_latlon");
    }

    #[test]
    fn test_wrap_longitude() {
        assert_eq!(wrap_longitude(190.0), -170.0);
        assert_eq!(wrap_longitude(-75.0), -75.0);
        assert_eq!(wrap_longitude(180.0), 180.0);
    }
}
