//! NetCDF file access
//!
//! Opens files, looks up variables and adapts [`netcdf::Variable`] to the
//! [`SliceSource`] capability set used by the typed reader. Every read fills
//! the buffer the reader allocated; the bindings never allocate a second one.

use crate::element::ElementType;
use crate::errors::{NcProbeError, Result};
use crate::reader::SliceSource;
use crate::slice::SliceRequest;
use log::debug;
use netcdf::types::{FloatType, IntType, NcVariableType};
use netcdf::{Extent, File, Variable};

/// Open a NetCDF file for reading
///
/// # Errors
///
/// [`NcProbeError::Open`] carrying the library's diagnostic.
pub fn open_file(path: &str) -> Result<File> {
    debug!("Opening {}", path);
    netcdf::open(path).map_err(|source| NcProbeError::Open {
        path: path.to_string(),
        source,
    })
}

/// Map a stored type onto the supported element types
#[must_use]
pub fn element_type_of(vartype: &NcVariableType) -> Option<ElementType> {
    match vartype {
        NcVariableType::Char => Some(ElementType::Char),
        NcVariableType::Int(IntType::I8) => Some(ElementType::Byte),
        NcVariableType::Int(IntType::U8) => Some(ElementType::UByte),
        NcVariableType::Int(IntType::I16) => Some(ElementType::Short),
        NcVariableType::Int(IntType::U16) => Some(ElementType::UShort),
        NcVariableType::Int(IntType::I32) => Some(ElementType::Int),
        NcVariableType::Int(IntType::U32) => Some(ElementType::UInt),
        NcVariableType::Float(FloatType::F32) => Some(ElementType::Float),
        NcVariableType::Float(FloatType::F64) => Some(ElementType::Double),
        _ => None,
    }
}

/// Upper-case CDL name of any stored type
#[must_use]
pub fn nc_type_name(vartype: &NcVariableType) -> &'static str {
    if let Some(element_type) = element_type_of(vartype) {
        return element_type.cdl_name();
    }
    match vartype {
        NcVariableType::Int(IntType::I64) => "INT64",
        NcVariableType::Int(IntType::U64) => "UINT64",
        NcVariableType::String => "STRING",
        NcVariableType::Compound(_) => "COMPOUND",
        NcVariableType::Opaque(_) => "OPAQUE",
        NcVariableType::Enum(_) => "ENUM",
        NcVariableType::Vlen(_) => "VLEN",
        _ => "UNKNOWN",
    }
}

/// A variable of an open file, ready for hyperslab reads
pub struct NcVariable<'f> {
    var: Variable<'f>,
    name: String,
    vartype: NcVariableType,
    shape: Vec<usize>,
}

impl<'f> NcVariable<'f> {
    /// Look up `name` in `file`
    ///
    /// # Errors
    ///
    /// [`NcProbeError::VariableNotFound`] naming the variable and `path`.
    pub fn find(file: &'f File, path: &str, name: &str) -> Result<Self> {
        let var = file
            .variable(name)
            .ok_or_else(|| NcProbeError::VariableNotFound {
                var: name.to_string(),
                path: path.to_string(),
            })?;
        let vartype = var.vartype();
        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        debug!(
            "Found {} in {}: type {}, shape {:?}",
            name,
            path,
            nc_type_name(&vartype),
            shape
        );
        Ok(Self {
            var,
            name: name.to_string(),
            vartype,
            shape,
        })
    }

    /// Declared length of every dimension, slowest-varying first
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    fn extents(request: &SliceRequest) -> Vec<Extent> {
        request
            .start
            .iter()
            .zip(&request.count)
            .map(|(&start, &count)| Extent::from(start..start + count))
            .collect()
    }

    fn read_error(&self, source: netcdf::Error) -> NcProbeError {
        NcProbeError::Read {
            var: self.name.clone(),
            source,
        }
    }
}

macro_rules! typed_read {
    ($($method:ident: $t:ty),* $(,)?) => {
        $(
            fn $method(&self, request: &SliceRequest, out: &mut [$t]) -> Result<()> {
                if out.is_empty() {
                    return Ok(());
                }
                let extents = Self::extents(request);
                self.var
                    .get_values_into::<$t, _>(out, extents.as_slice())
                    .map_err(|e| self.read_error(e))
            }
        )*
    };
}

impl SliceSource for NcVariable<'_> {
    fn name(&self) -> &str {
        &self.name
    }

    fn element_type(&self) -> Option<ElementType> {
        element_type_of(&self.vartype)
    }

    fn type_name(&self) -> String {
        nc_type_name(&self.vartype).to_string()
    }

    fn ndims(&self) -> usize {
        self.shape.len()
    }

    fn dim_length(&self, dim: usize) -> Result<usize> {
        self.shape
            .get(dim)
            .copied()
            .ok_or_else(|| NcProbeError::DimensionNotFound {
                dim: dim.to_string(),
                path: self.name.clone(),
            })
    }

    // CHAR has no numeric counterpart in the bindings, read its raw bytes
    fn read_text(&self, request: &SliceRequest, out: &mut [u8]) -> Result<()> {
        if out.is_empty() {
            return Ok(());
        }
        let extents = Self::extents(request);
        self.var
            .get_raw_values_into(out, extents.as_slice())
            .map_err(|e| self.read_error(e))
    }

    typed_read! {
        read_bytes: i8,
        read_int16: i16,
        read_int32: i32,
        read_float32: f32,
        read_float64: f64,
        read_uint8: u8,
        read_uint16: u16,
        read_uint32: u32,
    }
}
