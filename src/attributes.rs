//! Attribute reads for variables and for the file itself

use crate::element::format_g;
use crate::errors::{NcProbeError, Result};
use clap::ValueEnum;
use log::debug;
use netcdf::{AttributeValue, File};
use std::fmt;

/// Owner name that selects the file's global attributes
pub const GLOBAL_OWNER: &str = "NC_GLOBAL";

/// Where an attribute lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeOwner {
    Global,
    Variable(String),
}

impl AttributeOwner {
    #[must_use]
    pub fn parse(name: &str) -> Self {
        if name == GLOBAL_OWNER {
            Self::Global
        } else {
            Self::Variable(name.to_string())
        }
    }
}

impl fmt::Display for AttributeOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str(GLOBAL_OWNER),
            Self::Variable(name) => f.write_str(name),
        }
    }
}

/// Form an attribute value is requested in
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AttributeKind {
    Text,
    Int,
    Float,
}

impl AttributeKind {
    fn expected(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Int => "a single integer",
            Self::Float => "a single number",
        }
    }
}

/// Fetch the raw value of `att` on `owner`
///
/// # Errors
///
/// - [`NcProbeError::VariableNotFound`] if the owning variable does not exist
/// - [`NcProbeError::AttributeNotFound`] if the attribute does not exist
/// - [`NcProbeError::NetCDF`] if the library cannot decode the value
pub fn get_attribute_value(
    file: &File,
    path: &str,
    owner: &AttributeOwner,
    att: &str,
) -> Result<AttributeValue> {
    let not_found = || NcProbeError::AttributeNotFound {
        att: att.to_string(),
        owner: owner.to_string(),
    };

    let value = match owner {
        AttributeOwner::Global => file.attribute(att).ok_or_else(not_found)?.value()?,
        AttributeOwner::Variable(name) => {
            let var = file
                .variable(name)
                .ok_or_else(|| NcProbeError::VariableNotFound {
                    var: name.clone(),
                    path: path.to_string(),
                })?;
            let attr = var.attribute(att).ok_or_else(not_found)?;
            attr.value()?
        }
    };
    debug!("Attribute {} of {}: {:?}", att, owner, value);
    Ok(value)
}

/// Read a text attribute
///
/// # Errors
///
/// As [`get_attribute_value`], plus [`NcProbeError::AttributeKind`] if the
/// value is not text.
pub fn read_attribute_text(
    file: &File,
    path: &str,
    owner: &AttributeOwner,
    att: &str,
) -> Result<String> {
    let value = get_attribute_value(file, path, owner, att)?;
    as_text(&value).ok_or_else(|| kind_error(att, owner, AttributeKind::Text))
}

/// Read a single integer attribute
///
/// # Errors
///
/// As [`get_attribute_value`], plus [`NcProbeError::AttributeKind`] if the
/// value is not exactly one integer.
pub fn read_attribute_int(
    file: &File,
    path: &str,
    owner: &AttributeOwner,
    att: &str,
) -> Result<i64> {
    let value = get_attribute_value(file, path, owner, att)?;
    as_int(&value).ok_or_else(|| kind_error(att, owner, AttributeKind::Int))
}

/// Read a single numeric attribute as a float
///
/// # Errors
///
/// As [`get_attribute_value`], plus [`NcProbeError::AttributeKind`] if the
/// value is not exactly one number.
pub fn read_attribute_float(
    file: &File,
    path: &str,
    owner: &AttributeOwner,
    att: &str,
) -> Result<f64> {
    let value = get_attribute_value(file, path, owner, att)?;
    as_float(&value).ok_or_else(|| kind_error(att, owner, AttributeKind::Float))
}

fn kind_error(att: &str, owner: &AttributeOwner, kind: AttributeKind) -> NcProbeError {
    NcProbeError::AttributeKind {
        att: att.to_string(),
        owner: owner.to_string(),
        expected: kind.expected(),
    }
}

/// Text content of a string attribute
#[must_use]
pub fn as_text(value: &AttributeValue) -> Option<String> {
    match value {
        AttributeValue::Str(s) => Some(s.clone()),
        AttributeValue::Strs(ss) if ss.len() == 1 => Some(ss[0].clone()),
        _ => None,
    }
}

/// Integer content of a single-valued integer attribute
///
/// A UINT64 value above `i64::MAX` has no integer form.
#[must_use]
pub fn as_int(value: &AttributeValue) -> Option<i64> {
    fn single<T: Copy>(values: &[T]) -> Option<T> {
        match values {
            [v] => Some(*v),
            _ => None,
        }
    }

    match value {
        AttributeValue::Schar(v) => Some(i64::from(*v)),
        AttributeValue::Uchar(v) => Some(i64::from(*v)),
        AttributeValue::Short(v) => Some(i64::from(*v)),
        AttributeValue::Ushort(v) => Some(i64::from(*v)),
        AttributeValue::Int(v) => Some(i64::from(*v)),
        AttributeValue::Uint(v) => Some(i64::from(*v)),
        AttributeValue::Longlong(v) => Some(*v),
        AttributeValue::Ulonglong(v) => i64::try_from(*v).ok(),
        AttributeValue::Schars(vs) => single(vs).map(i64::from),
        AttributeValue::Uchars(vs) => single(vs).map(i64::from),
        AttributeValue::Shorts(vs) => single(vs).map(i64::from),
        AttributeValue::Ushorts(vs) => single(vs).map(i64::from),
        AttributeValue::Ints(vs) => single(vs).map(i64::from),
        AttributeValue::Uints(vs) => single(vs).map(i64::from),
        AttributeValue::Longlongs(vs) => single(vs),
        AttributeValue::Ulonglongs(vs) => single(vs).and_then(|v| i64::try_from(v).ok()),
        _ => None,
    }
}

/// Numeric content of a single-valued numeric attribute
#[must_use]
pub fn as_float(value: &AttributeValue) -> Option<f64> {
    match value {
        AttributeValue::Float(v) => Some(f64::from(*v)),
        AttributeValue::Double(v) => Some(*v),
        AttributeValue::Floats(vs) if vs.len() == 1 => Some(f64::from(vs[0])),
        AttributeValue::Doubles(vs) if vs.len() == 1 => Some(vs[0]),
        AttributeValue::Ulonglong(v) => Some(*v as f64),
        AttributeValue::Ulonglongs(vs) if vs.len() == 1 => Some(vs[0] as f64),
        other => as_int(other).map(|v| v as f64),
    }
}

/// Render any attribute value, lists space-separated
#[must_use]
pub fn format_attribute_value(value: &AttributeValue) -> String {
    fn join<T: fmt::Display>(values: &[T]) -> String {
        values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    match value {
        AttributeValue::Str(s) => s.clone(),
        AttributeValue::Strs(ss) => ss.join(" "),
        AttributeValue::Float(v) => format_g(f64::from(*v)),
        AttributeValue::Floats(vs) => vs
            .iter()
            .map(|&v| format_g(f64::from(v)))
            .collect::<Vec<_>>()
            .join(" "),
        AttributeValue::Double(v) => format_g(*v),
        AttributeValue::Doubles(vs) => vs
            .iter()
            .map(|&v| format_g(v))
            .collect::<Vec<_>>()
            .join(" "),
        AttributeValue::Int(v) => v.to_string(),
        AttributeValue::Ints(vs) => join(vs),
        AttributeValue::Short(v) => v.to_string(),
        AttributeValue::Shorts(vs) => join(vs),
        AttributeValue::Uchar(v) => v.to_string(),
        AttributeValue::Uchars(vs) => join(vs),
        AttributeValue::Ushort(v) => v.to_string(),
        AttributeValue::Ushorts(vs) => join(vs),
        AttributeValue::Uint(v) => v.to_string(),
        AttributeValue::Uints(vs) => join(vs),
        AttributeValue::Schar(v) => v.to_string(),
        AttributeValue::Schars(vs) => join(vs),
        AttributeValue::Longlong(v) => v.to_string(),
        AttributeValue::Longlongs(vs) => join(vs),
        AttributeValue::Ulonglong(v) => v.to_string(),
        AttributeValue::Ulonglongs(vs) => join(vs),
    }
}

/// Read `att` and render it, optionally forced into one kind
///
/// # Errors
///
/// See [`read_attribute_text`], [`read_attribute_int`] and
/// [`read_attribute_float`].
pub fn read_attribute(
    file: &File,
    path: &str,
    owner: &AttributeOwner,
    att: &str,
    kind: Option<AttributeKind>,
) -> Result<String> {
    match kind {
        None => Ok(format_attribute_value(&get_attribute_value(
            file, path, owner, att,
        )?)),
        Some(AttributeKind::Text) => read_attribute_text(file, path, owner, att),
        Some(AttributeKind::Int) => Ok(read_attribute_int(file, path, owner, att)?.to_string()),
        Some(AttributeKind::Float) => Ok(format_g(read_attribute_float(file, path, owner, att)?)),
    }
}
