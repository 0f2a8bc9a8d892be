//! NetCDF header listing
//!
//! Collects the dimensions and variables of a file's root group, in file
//! order, and renders them as `dim` / `var` lines.

use crate::errors::{NcProbeError, Result};
use crate::netcdf_io::nc_type_name;
use netcdf::File;
use std::fmt;

/// Information about a dimension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionInfo {
    pub name: String,
    pub length: usize,
}

/// Name, stored type and dimension names of a variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableInfo {
    pub name: String,
    pub type_name: &'static str,
    pub dimensions: Vec<String>,
}

/// Everything `headers` prints for one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileHeaders {
    pub dimensions: Vec<DimensionInfo>,
    pub variables: Vec<VariableInfo>,
}

/// Read the dimensions and variables of the root group
#[must_use]
pub fn read_headers(file: &File) -> FileHeaders {
    let dimensions = file
        .dimensions()
        .map(|d| DimensionInfo {
            name: d.name().to_string(),
            length: d.len(),
        })
        .collect();

    let variables = file
        .variables()
        .map(|var| VariableInfo {
            name: var.name().to_string(),
            type_name: nc_type_name(&var.vartype()),
            dimensions: var
                .dimensions()
                .iter()
                .map(|d| d.name().to_string())
                .collect(),
        })
        .collect();

    FileHeaders {
        dimensions,
        variables,
    }
}

/// Look up a root-group dimension by name
///
/// # Errors
///
/// [`NcProbeError::DimensionNotFound`] naming the dimension and `path`.
pub fn find_dimension(file: &File, path: &str, name: &str) -> Result<DimensionInfo> {
    let dim = file
        .dimension(name)
        .ok_or_else(|| NcProbeError::DimensionNotFound {
            dim: name.to_string(),
            path: path.to_string(),
        })?;
    Ok(DimensionInfo {
        name: dim.name().to_string(),
        length: dim.len(),
    })
}

impl fmt::Display for DimensionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dim {} {}", self.name, self.length)
    }
}

impl fmt::Display for VariableInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "var {} {}", self.name, self.type_name)?;
        for dim in &self.dimensions {
            write!(f, " {dim}")?;
        }
        Ok(())
    }
}

impl fmt::Display for FileHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for dim in &self.dimensions {
            writeln!(f, "{dim}")?;
        }
        for var in &self.variables {
            writeln!(f, "{var}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_layout() {
        let headers = FileHeaders {
            dimensions: vec![
                DimensionInfo {
                    name: "time".to_string(),
                    length: 4,
                },
                DimensionInfo {
                    name: "lat".to_string(),
                    length: 3,
                },
            ],
            variables: vec![
                VariableInfo {
                    name: "temp".to_string(),
                    type_name: "FLOAT",
                    dimensions: vec!["time".to_string(), "lat".to_string()],
                },
                VariableInfo {
                    name: "scale".to_string(),
                    type_name: "DOUBLE",
                    dimensions: Vec::new(),
                },
            ],
        };
        assert_eq!(
            headers.to_string(),
            "dim time 4\ndim lat 3\nvar temp FLOAT time lat\nvar scale DOUBLE\n"
        );
    }

    #[test]
    fn test_empty_headers_print_nothing() {
        assert_eq!(FileHeaders::default().to_string(), "");
    }
}
