//! Constants describing real GOES-R ABI products.

/// GRS80 ellipsoid as written in ABI projection variables.
pub mod ellipsoid {
    pub const SEMI_MAJOR_AXIS: f64 = 6378137.0;
    pub const SEMI_MINOR_AXIS: f64 = 6356752.31414;
}

/// Geostationary platform parameters.
pub mod satellite {
    /// `perspective_point_height` of every GOES-R imager
    pub const PERSPECTIVE_POINT_HEIGHT: f64 = 35786023.0;

    /// GOES-East nominal longitude
    pub const GOES_EAST_LON: f64 = -75.0;
}

/// Product filenames for full disk, mesoscale and CONUS scenes.
pub mod filenames {
    pub const HT_FULL_DISK: &str =
        "OR_ABI-L2-HTF-M3_G16_s20172631730408_e20172631741175_c20172631742108.nc";

    pub const ACHA_MESO: &str =
        "OR_ABI-L2-ACHAM1-M6_G18_s20241211800210_e20241211802583_c20241211803112.nc";

    pub const CMIP_CONUS: &str =
        "OR_ABI-L2-CMIPC-M6C13_G16_s20241211801171_e20241211803544_c20241211804012.nc";
}

/// Scan-angle axes of the full-disk 2 km fixed grid (radians).
pub mod fixed_grid {
    /// Scale factor of the packed `x` coordinate
    pub const X_SCALE: f64 = 5.6e-05;
    /// Offset of the packed `x` coordinate
    pub const X_OFFSET: f64 = -0.151844;
    /// Scale factor of the packed `y` coordinate (north-up, so negative)
    pub const Y_SCALE: f64 = -5.6e-05;
    /// Offset of the packed `y` coordinate
    pub const Y_OFFSET: f64 = 0.151844;
    /// Columns and rows of the full disk at 2 km
    pub const FULL_DISK_2KM: usize = 5424;
}
