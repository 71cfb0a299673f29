//! Metadata carried in ABI L2 filenames.
//!
//! Example: `OR_ABI-L2-HTF-M3_G16_s20172631730408_e20172631741175_c20172631742108.nc`
//!
//! - `OR`: operational system, real-time data
//! - `ABI-L2-HTF`: product `HT` over scene `F` (full disk)
//! - `M3`: scan mode
//! - `G16`: platform shortname
//! - `s`/`e`/`c`: start, end and creation time as `YYYYDDDHHMMSSs`

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Information extracted from an ABI L2 filename.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    /// e.g. `G16`
    pub platform_shortname: String,
    /// Product, e.g. `HT`, `RSR`, `ACHA`
    pub observation_type: String,
    /// `F` (full disk), `C` (CONUS), `M1`/`M2` (mesoscale)
    pub scene_abbr: String,
    /// e.g. `M3`, `M6`
    pub scan_mode: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub creation_time: Option<DateTime<Utc>>,
}

impl FileInfo {
    /// File info known without a filename, e.g. for in-memory datasets.
    pub fn new(
        platform_shortname: impl Into<String>,
        observation_type: impl Into<String>,
        scan_mode: impl Into<String>,
    ) -> Self {
        Self {
            platform_shortname: platform_shortname.into(),
            observation_type: observation_type.into(),
            scene_abbr: String::new(),
            scan_mode: scan_mode.into(),
            start_time: None,
            end_time: None,
            creation_time: None,
        }
    }

    pub fn with_scene(mut self, scene_abbr: impl Into<String>) -> Self {
        self.scene_abbr = scene_abbr.into();
        self
    }
}

/// Parse an ABI L2 filename. Accepts a bare filename or a path.
pub fn parse_filename(filename: &str) -> Option<FileInfo> {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let stem = name
        .strip_suffix(".nc")
        .or_else(|| name.strip_suffix(".nc4"))
        .unwrap_or(name);

    let mut parts = stem.split('_');
    let _system = parts.next()?;
    let product_part = parts.next()?;
    let platform_shortname = parts.next()?;
    let start = parts.next()?.strip_prefix('s')?;
    let end = parts.next().and_then(|p| p.strip_prefix('e'));
    let created = parts.next().and_then(|p| p.strip_prefix('c'));

    // ABI-L2-<product><scene>-M<mode>[C<channel>]
    let rest = product_part.strip_prefix("ABI-L2-")?;
    let (product_scene, mode_part) = rest.rsplit_once('-')?;
    let scan_mode = mode_part.get(0..2)?;
    if !scan_mode.starts_with('M') {
        return None;
    }
    let (observation_type, scene_abbr) = split_scene(product_scene)?;

    if !platform_shortname.starts_with('G') {
        return None;
    }

    Some(FileInfo {
        platform_shortname: platform_shortname.to_string(),
        observation_type: observation_type.to_string(),
        scene_abbr: scene_abbr.to_string(),
        scan_mode: scan_mode.to_string(),
        start_time: Some(parse_goes_timestamp(start)?),
        end_time: end.and_then(parse_goes_timestamp),
        creation_time: created.and_then(parse_goes_timestamp),
    })
}

/// Split `HTF` into (`HT`, `F`) and `ACHAM1` into (`ACHA`, `M1`).
fn split_scene(product_scene: &str) -> Option<(&str, &str)> {
    for suffix in ["M1", "M2"] {
        if let Some(product) = product_scene.strip_suffix(suffix) {
            if !product.is_empty() {
                return Some((product, suffix));
            }
        }
    }
    for suffix in ["F", "C"] {
        if let Some(product) = product_scene.strip_suffix(suffix) {
            if !product.is_empty() {
                return Some((product, suffix));
            }
        }
    }
    None
}

/// Parse GOES timestamp format: YYYYDDDHHMMSS with an optional tenths digit.
pub fn parse_goes_timestamp(time_str: &str) -> Option<DateTime<Utc>> {
    if time_str.len() < 13 || !time_str.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year: i32 = time_str[0..4].parse().ok()?;
    let day_of_year: u32 = time_str[4..7].parse().ok()?;
    let hour: u32 = time_str[7..9].parse().ok()?;
    let minute: u32 = time_str[9..11].parse().ok()?;
    let second: u32 = time_str[11..13].parse().ok()?;
    let tenths: u32 = match time_str.get(13..14) {
        Some(d) => d.parse().ok()?,
        None => 0,
    };

    let naive_date = NaiveDate::from_yo_opt(year, day_of_year)?;
    let naive_time = NaiveTime::from_hms_milli_opt(hour, minute, second, tenths * 100)?;
    let naive_dt = NaiveDateTime::new(naive_date, naive_time);

    Some(Utc.from_utc_datetime(&naive_dt))
}
