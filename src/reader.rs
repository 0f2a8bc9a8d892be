//! Typed hyperslab reads
//!
//! [`SliceSource`] is the capability set a variable must offer: one read
//! operation per supported element type plus the dimension lookups the
//! resolver needs. [`read_slice`] resolves the element type once, allocates a
//! buffer of exactly the requested size and invokes the single matching read.

use crate::element::ElementType;
use crate::errors::{NcProbeError, Result};
use crate::slice::{self, SliceRequest};
use log::debug;

/// A variable that hyperslabs can be read from
pub trait SliceSource {
    /// Variable name, used in diagnostics
    fn name(&self) -> &str;

    /// Element type, or `None` when the stored type is not supported
    fn element_type(&self) -> Option<ElementType>;

    /// Name of the stored type, including unsupported ones
    fn type_name(&self) -> String;

    fn ndims(&self) -> usize;

    /// Declared length of dimension `dim`
    fn dim_length(&self, dim: usize) -> Result<usize>;

    fn read_bytes(&self, request: &SliceRequest, out: &mut [i8]) -> Result<()>;
    fn read_text(&self, request: &SliceRequest, out: &mut [u8]) -> Result<()>;
    fn read_int16(&self, request: &SliceRequest, out: &mut [i16]) -> Result<()>;
    fn read_int32(&self, request: &SliceRequest, out: &mut [i32]) -> Result<()>;
    fn read_float32(&self, request: &SliceRequest, out: &mut [f32]) -> Result<()>;
    fn read_float64(&self, request: &SliceRequest, out: &mut [f64]) -> Result<()>;
    fn read_uint8(&self, request: &SliceRequest, out: &mut [u8]) -> Result<()>;
    fn read_uint16(&self, request: &SliceRequest, out: &mut [u16]) -> Result<()>;
    fn read_uint32(&self, request: &SliceRequest, out: &mut [u32]) -> Result<()>;
}

/// Row-major values of one hyperslab, tagged with their element type
#[derive(Debug, Clone, PartialEq)]
pub enum TypedBuffer {
    Byte(Vec<i8>),
    Char(Vec<u8>),
    Short(Vec<i16>),
    Int(Vec<i32>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    UByte(Vec<u8>),
    UShort(Vec<u16>),
    UInt(Vec<u32>),
}

/// Apply an expression to the vector inside any [`TypedBuffer`] variant
macro_rules! with_values {
    ($buffer:expr, $values:ident => $body:expr) => {
        match $buffer {
            $crate::reader::TypedBuffer::Byte($values) => $body,
            $crate::reader::TypedBuffer::Char($values) => $body,
            $crate::reader::TypedBuffer::Short($values) => $body,
            $crate::reader::TypedBuffer::Int($values) => $body,
            $crate::reader::TypedBuffer::Float($values) => $body,
            $crate::reader::TypedBuffer::Double($values) => $body,
            $crate::reader::TypedBuffer::UByte($values) => $body,
            $crate::reader::TypedBuffer::UShort($values) => $body,
            $crate::reader::TypedBuffer::UInt($values) => $body,
        }
    };
}

pub(crate) use with_values;

impl TypedBuffer {
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Byte(_) => ElementType::Byte,
            Self::Char(_) => ElementType::Char,
            Self::Short(_) => ElementType::Short,
            Self::Int(_) => ElementType::Int,
            Self::Float(_) => ElementType::Float,
            Self::Double(_) => ElementType::Double,
            Self::UByte(_) => ElementType::UByte,
            Self::UShort(_) => ElementType::UShort,
            Self::UInt(_) => ElementType::UInt,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        with_values!(self, values => values.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolve leading indices against the source's dimensions
///
/// # Errors
///
/// See [`slice::resolve`].
pub fn request_for<S: SliceSource + ?Sized>(source: &S, indices: &[usize]) -> Result<SliceRequest> {
    slice::resolve(source.ndims(), indices, |dim| source.dim_length(dim))
}

/// Read the hyperslab described by `request` into a freshly sized buffer
///
/// The element type is checked before anything is allocated or read. On a
/// failed read the partially filled buffer is dropped and only the error is
/// returned.
///
/// # Errors
///
/// - [`NcProbeError::UnsupportedType`] for types outside [`ElementType`]
/// - [`NcProbeError::OutOfMemory`] if the buffer cannot be allocated
/// - whatever the source's read operation returns
pub fn read_slice<S: SliceSource + ?Sized>(
    source: &S,
    request: &SliceRequest,
) -> Result<TypedBuffer> {
    let element_type = source
        .element_type()
        .ok_or_else(|| NcProbeError::UnsupportedType {
            var: source.name().to_string(),
            type_name: source.type_name(),
        })?;

    let len = request
        .element_count()
        .ok_or_else(|| NcProbeError::OutOfMemory {
            var: source.name().to_string(),
            elements: request
                .count
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" x "),
        })?;

    debug!(
        "Reading {} elements of {} ({} bytes) from {} (start {:?}, count {:?})",
        len,
        element_type,
        len.saturating_mul(element_type.width()),
        source.name(),
        request.start,
        request.count
    );

    let name = source.name();
    let buffer = match element_type {
        ElementType::Byte => {
            TypedBuffer::Byte(filled(name, len, |out| source.read_bytes(request, out))?)
        }
        ElementType::Char => {
            TypedBuffer::Char(filled(name, len, |out| source.read_text(request, out))?)
        }
        ElementType::Short => {
            TypedBuffer::Short(filled(name, len, |out| source.read_int16(request, out))?)
        }
        ElementType::Int => {
            TypedBuffer::Int(filled(name, len, |out| source.read_int32(request, out))?)
        }
        ElementType::Float => {
            TypedBuffer::Float(filled(name, len, |out| source.read_float32(request, out))?)
        }
        ElementType::Double => {
            TypedBuffer::Double(filled(name, len, |out| source.read_float64(request, out))?)
        }
        ElementType::UByte => {
            TypedBuffer::UByte(filled(name, len, |out| source.read_uint8(request, out))?)
        }
        ElementType::UShort => {
            TypedBuffer::UShort(filled(name, len, |out| source.read_uint16(request, out))?)
        }
        ElementType::UInt => {
            TypedBuffer::UInt(filled(name, len, |out| source.read_uint32(request, out))?)
        }
    };

    Ok(buffer)
}

/// Read a whole variable
///
/// # Errors
///
/// See [`request_for`] and [`read_slice`].
pub fn read_all<S: SliceSource + ?Sized>(source: &S) -> Result<TypedBuffer> {
    let request = request_for(source, &[])?;
    read_slice(source, &request)
}

/// Read a one-dimensional CHAR variable as text
///
/// The text ends at the first NUL byte. Invalid UTF-8 is replaced rather than
/// rejected.
///
/// # Errors
///
/// - [`NcProbeError::NotText`] unless the variable is CHAR with one dimension
/// - see [`read_all`]
pub fn read_string<S: SliceSource + ?Sized>(source: &S) -> Result<String> {
    if source.element_type() != Some(ElementType::Char) || source.ndims() != 1 {
        return Err(NcProbeError::NotText {
            var: source.name().to_string(),
            type_name: source.type_name(),
            ndims: source.ndims(),
        });
    }
    let TypedBuffer::Char(bytes) = read_all(source)? else {
        return Err(NcProbeError::UnsupportedType {
            var: source.name().to_string(),
            type_name: source.type_name(),
        });
    };
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
}

fn filled<T, F>(var: &str, len: usize, read: F) -> Result<Vec<T>>
where
    T: Copy + Default,
    F: FnOnce(&mut [T]) -> Result<()>,
{
    let mut values = Vec::new();
    values
        .try_reserve_exact(len)
        .map_err(|_| NcProbeError::OutOfMemory {
            var: var.to_string(),
            elements: len.to_string(),
        })?;
    values.resize(len, T::default());
    read(&mut values)?;
    Ok(values)
}
