//! Dataset sources: where named variables and global attributes come from.
//!
//! The reader never touches files directly. It asks a [`DatasetSource`] for
//! variables by name. [`MemoryDataset`] keeps everything in memory and can be
//! loaded from a JSON or YAML manifest; the `netcdf` feature adds
//! [`crate::native::NetCdfDataset`] for real NetCDF-4 files.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ReaderError, ReaderResult};
use crate::variable::{AttrValue, Attributes, Variable};

/// Named-variable lookup over an open dataset.
///
/// Resources held by a source are released when it is dropped; `close`
/// makes the release explicit at a call site.
pub trait DatasetSource {
    /// Fetch a variable by name.
    fn variable(&self, name: &str) -> ReaderResult<Variable>;

    /// Whether a variable with this name exists.
    fn contains(&self, name: &str) -> bool;

    /// Dataset-level (global) attributes.
    fn global_attrs(&self) -> &Attributes;

    /// Release the underlying handle.
    fn close(self)
    where
        Self: Sized,
    {
        drop(self);
    }

    fn global_attr_str(&self, key: &str) -> Option<&str> {
        self.global_attrs().get(key).and_then(AttrValue::as_str)
    }
}

impl<S: DatasetSource + ?Sized> DatasetSource for Box<S> {
    fn variable(&self, name: &str) -> ReaderResult<Variable> {
        (**self).variable(name)
    }

    fn contains(&self, name: &str) -> bool {
        (**self).contains(name)
    }

    fn global_attrs(&self) -> &Attributes {
        (**self).global_attrs()
    }
}

/// An in-memory dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryDataset {
    #[serde(default)]
    pub attrs: Attributes,
    #[serde(default)]
    pub variables: BTreeMap<String, Variable>,
}

impl MemoryDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variable insertion, keyed by the variable's name.
    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.insert(variable);
        self
    }

    /// Builder-style global attribute insertion.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, variable: Variable) {
        self.variables.insert(variable.name.clone(), variable);
    }

    /// Parse a JSON manifest.
    pub fn from_json(text: &str) -> ReaderResult<Self> {
        let dataset: Self = serde_json::from_str(text)?;
        dataset.normalize()
    }

    /// Parse a YAML manifest.
    pub fn from_yaml(text: &str) -> ReaderResult<Self> {
        let dataset: Self = serde_yaml::from_str(text)?;
        dataset.normalize()
    }

    /// Load a manifest from disk; `.yaml`/`.yml` are read as YAML, anything
    /// else as JSON.
    pub fn from_path<P: AsRef<Path>>(path: P) -> ReaderResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );

        debug!(path = %path.display(), yaml = is_yaml, "Loading dataset manifest");

        if is_yaml {
            Self::from_yaml(&text)
        } else {
            Self::from_json(&text)
        }
    }

    /// Fill in the map keys as names, default 1-D shapes, and validate.
    fn normalize(mut self) -> ReaderResult<Self> {
        for (key, var) in self.variables.iter_mut() {
            if var.name.is_empty() {
                var.name = key.clone();
            } else if var.name != *key {
                return Err(ReaderError::Manifest(format!(
                    "variable stored under '{}' is named '{}'",
                    key, var.name
                )));
            }
            if var.shape.is_empty() && (var.dims.len() == 1 || var.data.is_empty()) {
                var.shape = vec![var.data.len()];
            }
            var.validate()?;
        }
        Ok(self)
    }
}

impl DatasetSource for MemoryDataset {
    fn variable(&self, name: &str) -> ReaderResult<Variable> {
        self.variables
            .get(name)
            .cloned()
            .ok_or_else(|| ReaderError::MissingVariable(name.to_string()))
    }

    fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    fn global_attrs(&self) -> &Attributes {
        &self.attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::VariableData;

    #[test]
    fn test_lookup_and_membership() {
        let ds = MemoryDataset::new()
            .with_variable(Variable::scalar("nominal_satellite_height", 35786020.0))
            .with_attr("orbital_slot", "GOES-East");

        assert!(ds.contains("nominal_satellite_height"));
        assert!(!ds.contains("HT"));
        assert!(matches!(
            ds.variable("HT"),
            Err(ReaderError::MissingVariable(name)) if name == "HT"
        ));
        assert_eq!(ds.global_attr_str("orbital_slot"), Some("GOES-East"));
    }

    #[test]
    fn test_json_manifest_names_and_shapes() {
        let json = r#"{
            "attrs": {"time_coverage_start": "2017-09-20T17:30:40.8Z"},
            "variables": {
                "x": {"dims": ["x"], "data": {"dtype": "i16", "values": [0, 1]},
                      "attrs": {"scale_factor": 2.0, "add_offset": -1.0}}
            }
        }"#;
        let ds = MemoryDataset::from_json(json).unwrap();
        let x = ds.variable("x").unwrap();
        assert_eq!(x.name, "x");
        assert_eq!(x.shape, vec![2]);
        assert_eq!(x.data, VariableData::I16(vec![0, 1]));
    }

    #[test]
    fn test_manifest_rejects_mismatched_shape() {
        let json = r#"{
            "variables": {
                "HT": {"name": "HT", "dims": ["y", "x"], "shape": [2, 2],
                       "data": {"dtype": "i16", "values": [1, 2, 3]}}
            }
        }"#;
        assert!(matches!(
            MemoryDataset::from_json(json),
            Err(ReaderError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_close_consumes_source() {
        let ds = MemoryDataset::new();
        ds.close();
    }
}
