//! Satellite platform names.

use std::collections::BTreeMap;

/// Shortnames used in ABI filenames and their full platform names.
pub const PLATFORM_NAMES: &[(&str, &str)] = &[
    ("G16", "GOES-16"),
    ("G17", "GOES-17"),
    ("G18", "GOES-18"),
    ("G19", "GOES-19"),
];

/// Instrument name attached to every ABI dataset.
pub const SENSOR: &str = "abi";

/// Look up the full platform name for a shortname such as `G16`.
///
/// Entries in `extra` take precedence over the built-in table.
pub fn platform_name(shortname: &str, extra: &BTreeMap<String, String>) -> Option<String> {
    let key = shortname.to_ascii_uppercase();
    if let Some(name) = extra.get(&key) {
        return Some(name.clone());
    }
    PLATFORM_NAMES
        .iter()
        .find(|(short, _)| *short == key)
        .map(|(_, name)| name.to_string())
}
