//! Subcommand implementations
//!
//! Each command reads everything it needs before writing a single byte, so a
//! failure never leaves partial output behind.

use crate::attributes::{self, AttributeKind, AttributeOwner};
use crate::errors::{NcProbeError, Result};
use crate::metadata;
use crate::netcdf_io::{open_file, NcVariable};
use crate::printer::write_flat;
use crate::reader::{read_all, read_slice, read_string, request_for, SliceSource};
use crate::slice::{element_count, parse_indices};
use crate::statistics::{compare_buffers, ComparisonReport, IgnoreThreshold, Side};
use log::info;
use std::io::Write;

/// `headers`: list dimensions and variables
pub fn run_headers<W: Write + ?Sized>(path: &str, out: &mut W) -> Result<()> {
    let file = open_file(path)?;
    let headers = metadata::read_headers(&file);
    info!(
        "{}: {} dimensions, {} variables",
        path,
        headers.dimensions.len(),
        headers.variables.len()
    );
    write!(out, "{headers}")?;
    Ok(())
}

/// `data`: print a hyperslab of `var_name`
///
/// `indices` fix the leading dimensions; the rest are read in full.
pub fn run_data<W, S>(var_name: &str, indices: &[S], path: &str, out: &mut W) -> Result<()>
where
    W: Write + ?Sized,
    S: AsRef<str>,
{
    let indices = parse_indices(indices)?;
    let file = open_file(path)?;
    let var = NcVariable::find(&file, path, var_name)?;
    let request = request_for(&var, &indices)?;
    let buffer = read_slice(&var, &request)?;
    info!("{}: read {} elements of {}", path, buffer.len(), var_name);
    write_flat(&buffer, request.line_length(), out)?;
    Ok(())
}

/// `dim`: print the length of a dimension
pub fn run_dim<W: Write + ?Sized>(dim_name: &str, path: &str, out: &mut W) -> Result<()> {
    let file = open_file(path)?;
    let dim = metadata::find_dimension(&file, path, dim_name)?;
    writeln!(out, "{}", dim.length)?;
    Ok(())
}

/// `string`: print a one-dimensional CHAR variable as a line of text
pub fn run_string<W: Write + ?Sized>(var_name: &str, path: &str, out: &mut W) -> Result<()> {
    let file = open_file(path)?;
    let var = NcVariable::find(&file, path, var_name)?;
    let text = read_string(&var)?;
    writeln!(out, "{text}")?;
    Ok(())
}

/// `attr`: print an attribute of a variable or of the file
pub fn run_attr<W: Write + ?Sized>(
    owner: &str,
    att: &str,
    path: &str,
    kind: Option<AttributeKind>,
    out: &mut W,
) -> Result<()> {
    let file = open_file(path)?;
    let owner = AttributeOwner::parse(owner);
    let text = attributes::read_attribute(&file, path, &owner, att, kind)?;
    writeln!(out, "{text}")?;
    Ok(())
}

/// Compare `field` between two files
///
/// Types and element counts are checked before either file's values are read.
pub fn compare_field(
    field: &str,
    first_path: &str,
    second_path: &str,
    threshold: IgnoreThreshold,
) -> Result<ComparisonReport> {
    let first_file = open_file(first_path)?;
    let first_var = NcVariable::find(&first_file, first_path, field)?;
    let second_file = open_file(second_path)?;
    let second_var = NcVariable::find(&second_file, second_path, field)?;

    if first_var.type_name() != second_var.type_name() {
        return Err(NcProbeError::TypeMismatch {
            var: field.to_string(),
            first: first_path.to_string(),
            second: second_path.to_string(),
        });
    }
    let element_type = first_var
        .element_type()
        .ok_or_else(|| NcProbeError::UnsupportedType {
            var: field.to_string(),
            type_name: first_var.type_name(),
        })?;

    let first_count = count_of(&first_var)?;
    let second_count = count_of(&second_var)?;
    if first_count != second_count {
        return Err(NcProbeError::ElementCountMismatch {
            var: field.to_string(),
            first: first_path.to_string(),
            first_count,
            second: second_path.to_string(),
            second_count,
        });
    }

    let first_values = read_all(&first_var)?;
    let second_values = read_all(&second_var)?;
    let summary = compare_buffers(
        field,
        Side {
            path: first_path,
            values: &first_values,
        },
        Side {
            path: second_path,
            values: &second_values,
        },
        threshold,
    )?;

    Ok(ComparisonReport {
        field: field.to_string(),
        element_type,
        element_count: first_count,
        first_path: first_path.to_string(),
        second_path: second_path.to_string(),
        threshold,
        summary,
    })
}

fn count_of(var: &NcVariable<'_>) -> Result<usize> {
    element_count(var.shape()).ok_or_else(|| NcProbeError::OutOfMemory {
        var: var.name().to_string(),
        elements: format!("{:?}", var.shape()),
    })
}

/// `nc_cmp`: compare a field and print the report
pub fn run_compare<W: Write + ?Sized>(
    field: &str,
    first_path: &str,
    second_path: &str,
    threshold: IgnoreThreshold,
    out: &mut W,
) -> Result<()> {
    let report = compare_field(field, first_path, second_path, threshold)?;
    write!(out, "{report}")?;
    Ok(())
}
