//! NetCDF-4 files through the native netcdf library.
//!
//! [`NetCdfDataset`] keeps the file open and reads a variable's raw values
//! and attributes only when asked for it. Global attributes are read once on
//! open since every dataset lookup consults them.

use std::path::Path;
use std::sync::Once;

use tracing::{debug, warn};

use crate::error::{ReaderError, ReaderResult};
use crate::source::DatasetSource;
use crate::variable::{AttrValue, Attributes, Variable, VariableData};

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints diagnostics even for errors the caller handles,
/// such as probing for an optional attribute. Safe to call more than once;
/// call it before the first file is opened.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 with null handlers is a documented way of
        // disabling the default error stack printer.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// An open NetCDF-4 file.
pub struct NetCdfDataset {
    file: netcdf::File,
    attrs: Attributes,
}

impl NetCdfDataset {
    pub fn open<P: AsRef<Path>>(path: P) -> ReaderResult<Self> {
        silence_hdf5_errors();

        let path = path.as_ref();
        let file = netcdf::open(path)?;

        let mut attrs = Attributes::new();
        for attr in file.attributes() {
            match attr.value() {
                Ok(value) => {
                    if let Some(value) = convert_attr(value) {
                        attrs.insert(attr.name().to_string(), value);
                    }
                }
                Err(e) => warn!(attribute = attr.name(), error = %e, "Skipping unreadable global attribute"),
            }
        }

        debug!(
            path = %path.display(),
            global_attrs = attrs.len(),
            "Opened NetCDF dataset"
        );

        Ok(Self { file, attrs })
    }
}

impl DatasetSource for NetCdfDataset {
    fn variable(&self, name: &str) -> ReaderResult<Variable> {
        let var = self
            .file
            .variable(name)
            .ok_or_else(|| ReaderError::MissingVariable(name.to_string()))?;

        let dims: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        let data = read_values(&var)?;

        let mut attrs = Attributes::new();
        for attr in var.attributes() {
            if let Some(value) = attr.value().ok().and_then(convert_attr) {
                attrs.insert(attr.name().to_string(), value);
            }
        }

        let mut variable = Variable::new(name, dims, shape, data)?;
        variable.attrs = attrs;
        Ok(variable)
    }

    fn contains(&self, name: &str) -> bool {
        self.file.variable(name).is_some()
    }

    fn global_attrs(&self) -> &Attributes {
        &self.attrs
    }
}

/// Read all values of a variable in its stored type.
fn read_values(var: &netcdf::Variable) -> ReaderResult<VariableData> {
    use netcdf::types::{FloatType, IntType, NcVariableType};

    let data = match var.vartype() {
        NcVariableType::Int(IntType::I8) => VariableData::I8(var.get_values(..)?),
        NcVariableType::Int(IntType::I16) => VariableData::I16(var.get_values(..)?),
        NcVariableType::Int(IntType::I32) => VariableData::I32(var.get_values(..)?),
        NcVariableType::Int(IntType::U8) => VariableData::U8(var.get_values(..)?),
        NcVariableType::Int(IntType::U16) => VariableData::U16(var.get_values(..)?),
        NcVariableType::Int(IntType::U32) => VariableData::U32(var.get_values(..)?),
        NcVariableType::Float(FloatType::F32) => VariableData::F32(var.get_values(..)?),
        NcVariableType::Float(FloatType::F64) => VariableData::F64(var.get_values(..)?),
        // Projection containers are often stored as char or int64 scalars;
        // only their attributes matter.
        other if var.dimensions().is_empty() => {
            debug!(variable = %var.name(), vartype = ?other, "Reading attributes only");
            return Ok(VariableData::F64(vec![f64::NAN]));
        }
        other => {
            return Err(ReaderError::InvalidFormat(format!(
                "variable '{}' has unsupported type {:?}",
                var.name(),
                other
            )))
        }
    };
    Ok(data)
}

fn convert_attr(value: netcdf::AttributeValue) -> Option<AttrValue> {
    use netcdf::AttributeValue as A;

    let converted = match value {
        A::Schar(v) => AttrValue::Int(v.into()),
        A::Uchar(v) => AttrValue::Int(v.into()),
        A::Short(v) => AttrValue::Int(v.into()),
        A::Ushort(v) => AttrValue::Int(v.into()),
        A::Int(v) => AttrValue::Int(v.into()),
        A::Uint(v) => AttrValue::Int(v.into()),
        A::Longlong(v) => AttrValue::Int(v),
        A::Float(v) => AttrValue::Float(v.into()),
        A::Double(v) => AttrValue::Float(v),
        A::Str(v) => AttrValue::Str(v),
        A::Schars(v) => AttrValue::Ints(v.into_iter().map(i64::from).collect()),
        A::Uchars(v) => AttrValue::Ints(v.into_iter().map(i64::from).collect()),
        A::Shorts(v) => AttrValue::Ints(v.into_iter().map(i64::from).collect()),
        A::Ushorts(v) => AttrValue::Ints(v.into_iter().map(i64::from).collect()),
        A::Ints(v) => AttrValue::Ints(v.into_iter().map(i64::from).collect()),
        A::Uints(v) => AttrValue::Ints(v.into_iter().map(i64::from).collect()),
        A::Longlongs(v) => AttrValue::Ints(v),
        A::Floats(v) => AttrValue::Floats(v.into_iter().map(f64::from).collect()),
        A::Doubles(v) => AttrValue::Floats(v),
        A::Strs(v) => AttrValue::Str(v.join(",")),
        _ => return None,
    };
    Some(converted)
}
