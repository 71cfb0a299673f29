//! Scale/offset decoding with fill masking and unsigned reinterpretation.
//!
//! ABI L2 products store physical quantities as packed integers. A stored
//! value `v` decodes to `v * scale_factor + add_offset`. Elements equal to
//! `_FillValue` decode to NaN. When `_Unsigned = "true"` the stored signed
//! integers hold unsigned magnitudes, so negative values are shifted by the
//! type's modulus (`2^16` for 16-bit data) before scaling.

use serde::{Deserialize, Serialize};

use crate::variable::{AttrValue, Variable, VariableData};

/// Fill value as declared by `_FillValue`, kept in the widest matching kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FillValue {
    Int(i64),
    Float(f64),
}

/// Encoding attributes of one variable with their defaults applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Encoding {
    /// Multiplier applied to stored values (default 1.0)
    pub scale_factor: f64,
    /// Offset added after scaling (default 0.0)
    pub add_offset: f64,
    /// Stored value marking missing data (default: none)
    pub fill_value: Option<FillValue>,
    /// Reinterpret signed stored values as unsigned (default: false)
    pub unsigned: bool,
}

impl Default for Encoding {
    fn default() -> Self {
        Self {
            scale_factor: 1.0,
            add_offset: 0.0,
            fill_value: None,
            unsigned: false,
        }
    }
}

impl Encoding {
    /// Resolve the encoding of a variable from its attributes.
    pub fn from_variable(var: &Variable) -> Self {
        let defaults = Self::default();

        let fill_value = match var.attr("_FillValue") {
            Some(AttrValue::Int(v)) => Some(FillValue::Int(*v)),
            Some(AttrValue::Ints(v)) if v.len() == 1 => Some(FillValue::Int(v[0])),
            Some(other) => other.as_f64().map(FillValue::Float),
            None => None,
        };

        // Float data ignores _Unsigned
        let unsigned = !var.data.is_float()
            && var
                .attr_str("_Unsigned")
                .map(|s| s.eq_ignore_ascii_case("true"))
                .unwrap_or(false);

        Self {
            scale_factor: var.attr_f64("scale_factor").unwrap_or(defaults.scale_factor),
            add_offset: var.attr_f64("add_offset").unwrap_or(defaults.add_offset),
            fill_value,
            unsigned,
        }
    }

    /// True when decoding would only widen the values to f64.
    pub fn is_identity(&self) -> bool {
        self.scale_factor == 1.0
            && self.add_offset == 0.0
            && self.fill_value.is_none()
            && !self.unsigned
    }

    /// Same encoding with fill masking switched off.
    pub fn without_fill(self) -> Self {
        Self {
            fill_value: None,
            ..self
        }
    }

    #[inline]
    fn apply(&self, value: f64) -> f64 {
        value * self.scale_factor + self.add_offset
    }
}

/// A stored element type that can be decoded.
trait StoredValue: Copy {
    fn is_fill(self, fill: FillValue) -> bool;

    /// The stored value as a number, reinterpreted as unsigned if asked.
    fn magnitude(self, unsigned: bool) -> f64;
}

macro_rules! impl_signed {
    ($($signed:ty => $unsigned:ty),*) => {$(
        impl StoredValue for $signed {
            #[inline]
            fn is_fill(self, fill: FillValue) -> bool {
                match fill {
                    FillValue::Int(f) => self as i64 == f,
                    FillValue::Float(f) => self as f64 == f,
                }
            }

            #[inline]
            fn magnitude(self, unsigned: bool) -> f64 {
                if unsigned {
                    self as $unsigned as f64
                } else {
                    self as f64
                }
            }
        }
    )*};
}

macro_rules! impl_unsigned {
    ($($ty:ty),*) => {$(
        impl StoredValue for $ty {
            #[inline]
            fn is_fill(self, fill: FillValue) -> bool {
                match fill {
                    FillValue::Int(f) => self as i64 == f,
                    FillValue::Float(f) => self as f64 == f,
                }
            }

            #[inline]
            fn magnitude(self, _unsigned: bool) -> f64 {
                self as f64
            }
        }
    )*};
}

macro_rules! impl_float {
    ($($ty:ty),*) => {$(
        impl StoredValue for $ty {
            #[inline]
            fn is_fill(self, fill: FillValue) -> bool {
                match fill {
                    FillValue::Int(f) => self as f64 == f as f64,
                    FillValue::Float(f) if f.is_nan() => self.is_nan(),
                    FillValue::Float(f) => self as f64 == f,
                }
            }

            #[inline]
            fn magnitude(self, _unsigned: bool) -> f64 {
                self as f64
            }
        }
    )*};
}

impl_signed!(i8 => u8, i16 => u16, i32 => u32);
impl_unsigned!(u8, u16, u32);
impl_float!(f32, f64);

fn decode_slice<T: StoredValue>(values: &[T], encoding: &Encoding) -> Vec<f64> {
    values
        .iter()
        .map(|&v| match encoding.fill_value {
            Some(fill) if v.is_fill(fill) => f64::NAN,
            _ => encoding.apply(v.magnitude(encoding.unsigned)),
        })
        .collect()
}

/// Decode stored values into physical f64 values.
pub fn decode_values(data: &VariableData, encoding: &Encoding) -> Vec<f64> {
    if let (VariableData::F64(v), true) = (data, encoding.is_identity()) {
        return v.clone();
    }
    match data {
        VariableData::I8(v) => decode_slice(v, encoding),
        VariableData::I16(v) => decode_slice(v, encoding),
        VariableData::I32(v) => decode_slice(v, encoding),
        VariableData::U8(v) => decode_slice(v, encoding),
        VariableData::U16(v) => decode_slice(v, encoding),
        VariableData::U32(v) => decode_slice(v, encoding),
        VariableData::F32(v) => decode_slice(v, encoding),
        VariableData::F64(v) => decode_slice(v, encoding),
    }
}

/// Decode a variable using its own encoding attributes.
pub fn decode_variable(var: &Variable) -> Vec<f64> {
    decode_values(&var.data, &Encoding::from_variable(var))
}
