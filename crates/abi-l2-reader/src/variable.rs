//! Raw variables and attributes as supplied by a dataset source.
//!
//! A [`Variable`] is the undecoded view of a NetCDF variable: its stored
//! values in their on-disk type, its dimension names and shape, and its
//! attributes. Attribute-only variables (such as `goes_imager_projection`)
//! carry an empty data array.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ReaderError, ReaderResult};

/// Attribute set of a variable or of the dataset itself.
pub type Attributes = BTreeMap<String, AttrValue>;

/// A single NetCDF attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Int(i64),
    Float(f64),
    Str(String),
    Ints(Vec<i64>),
    Floats(Vec<f64>),
}

impl AttrValue {
    /// Numeric view of the attribute. One-element arrays count as scalars.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Int(v) => Some(*v as f64),
            AttrValue::Float(v) => Some(*v),
            AttrValue::Ints(v) if v.len() == 1 => Some(v[0] as f64),
            AttrValue::Floats(v) if v.len() == 1 => Some(v[0]),
            _ => None,
        }
    }

    /// String view of the attribute.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Float(v)
    }
}

impl From<f32> for AttrValue {
    fn from(v: f32) -> Self {
        AttrValue::Float(v as f64)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        AttrValue::Int(v as i64)
    }
}

impl From<i16> for AttrValue {
    fn from(v: i16) -> Self {
        AttrValue::Int(v as i64)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Str(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Str(v)
    }
}

/// Stored values of a variable in their on-disk numeric type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dtype", content = "values", rename_all = "lowercase")]
pub enum VariableData {
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl Default for VariableData {
    fn default() -> Self {
        VariableData::F64(Vec::new())
    }
}

impl VariableData {
    /// Number of stored elements.
    pub fn len(&self) -> usize {
        match self {
            VariableData::I8(v) => v.len(),
            VariableData::I16(v) => v.len(),
            VariableData::I32(v) => v.len(),
            VariableData::U8(v) => v.len(),
            VariableData::U16(v) => v.len(),
            VariableData::U32(v) => v.len(),
            VariableData::F32(v) => v.len(),
            VariableData::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// NumPy-style dtype name.
    pub fn dtype(&self) -> &'static str {
        match self {
            VariableData::I8(_) => "int8",
            VariableData::I16(_) => "int16",
            VariableData::I32(_) => "int32",
            VariableData::U8(_) => "uint8",
            VariableData::U16(_) => "uint16",
            VariableData::U32(_) => "uint32",
            VariableData::F32(_) => "float32",
            VariableData::F64(_) => "float64",
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, VariableData::F32(_) | VariableData::F64(_))
    }

    /// Element at `index` widened to f64, without any decoding.
    pub fn get_f64(&self, index: usize) -> Option<f64> {
        match self {
            VariableData::I8(v) => v.get(index).map(|&x| x as f64),
            VariableData::I16(v) => v.get(index).map(|&x| x as f64),
            VariableData::I32(v) => v.get(index).map(|&x| x as f64),
            VariableData::U8(v) => v.get(index).map(|&x| x as f64),
            VariableData::U16(v) => v.get(index).map(|&x| x as f64),
            VariableData::U32(v) => v.get(index).map(|&x| x as f64),
            VariableData::F32(v) => v.get(index).map(|&x| x as f64),
            VariableData::F64(v) => v.get(index).copied(),
        }
    }
}

/// A named raw variable: stored data, dimensions and attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub dims: Vec<String>,
    #[serde(default)]
    pub shape: Vec<usize>,
    /// Absent for attribute-only variables such as projection containers
    #[serde(default)]
    pub data: VariableData,
    #[serde(default)]
    pub attrs: Attributes,
}

impl Variable {
    /// Create a variable, checking that `shape` and `dims` agree with the data.
    pub fn new(
        name: impl Into<String>,
        dims: Vec<String>,
        shape: Vec<usize>,
        data: VariableData,
    ) -> ReaderResult<Self> {
        let var = Self {
            name: name.into(),
            dims,
            shape,
            data,
            attrs: Attributes::new(),
        };
        var.validate()?;
        Ok(var)
    }

    /// A 1-D variable whose only dimension has the variable's own name.
    pub fn axis(name: impl Into<String>, data: VariableData) -> Self {
        let name = name.into();
        Self {
            dims: vec![name.clone()],
            shape: vec![data.len()],
            name,
            data,
            attrs: Attributes::new(),
        }
    }

    /// A 0-D variable holding one f64.
    pub fn scalar(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            dims: Vec::new(),
            shape: Vec::new(),
            data: VariableData::F64(vec![value]),
            attrs: Attributes::new(),
        }
    }

    /// A variable with no data, used for projection and extent metadata.
    pub fn attributes_only(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dims: Vec::new(),
            shape: vec![0],
            data: VariableData::default(),
            attrs: Attributes::new(),
        }
    }

    /// Builder-style attribute insertion.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Check that the shape matches the dimension list and element count.
    pub fn validate(&self) -> ReaderResult<()> {
        if !self.dims.is_empty() && self.dims.len() != self.shape.len() {
            return Err(ReaderError::InvalidFormat(format!(
                "variable '{}' has {} dimension names but shape {:?}",
                self.name,
                self.dims.len(),
                self.shape
            )));
        }
        let expected: usize = self.shape.iter().product();
        if expected != self.data.len() {
            return Err(ReaderError::InvalidFormat(format!(
                "variable '{}' has shape {:?} ({} elements) but {} values",
                self.name,
                self.shape,
                expected,
                self.data.len()
            )));
        }
        Ok(())
    }

    pub fn attr(&self, key: &str) -> Option<&AttrValue> {
        self.attrs.get(key)
    }

    pub fn attr_f64(&self, key: &str) -> Option<f64> {
        self.attr(key).and_then(AttrValue::as_f64)
    }

    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attr(key).and_then(AttrValue::as_str)
    }

    /// Number of stored elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
