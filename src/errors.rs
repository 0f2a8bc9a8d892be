//! Centralized error handling for nc_probe
//!
//! Every failure a subcommand can hit is a variant here. Nothing is retried or
//! downgraded to a warning: the first error ends the invocation.

use thiserror::Error;

/// Main error type for nc_probe operations
#[derive(Debug, Error)]
pub enum NcProbeError {
    /// The NetCDF library could not open the file
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: netcdf::Error,
    },

    /// Variable not found in NetCDF file
    #[error("could not find variable named {var} in {path}")]
    VariableNotFound { var: String, path: String },

    /// Dimension not found in NetCDF file
    #[error("could not find dimension named {dim} in {path}")]
    DimensionNotFound { dim: String, path: String },

    /// Attribute not found on a variable or on the file
    #[error("could not find attribute {att} of {owner}")]
    AttributeNotFound { att: String, owner: String },

    /// Attribute exists but cannot be returned as the requested kind
    #[error("attribute {att} of {owner} is not {expected}")]
    AttributeKind {
        att: String,
        owner: String,
        expected: &'static str,
    },

    /// More indices than the variable has dimensions
    #[error("number of indices ({given}) exceeds number of dimensions ({ndims})")]
    TooManyIndices { given: usize, ndims: usize },

    /// Index token is not a non-negative integer
    #[error("expected integer for index {position}, got {token}")]
    MalformedIndex { position: usize, token: String },

    /// Index lies outside its dimension
    #[error("index {index} at position {position} is outside dimension of length {length}")]
    IndexOutOfRange {
        position: usize,
        index: usize,
        length: usize,
    },

    /// Element type outside the supported enumeration
    #[error("cannot read type {type_name} of {var}")]
    UnsupportedType { var: String, type_name: String },

    /// Buffer for the slice could not be allocated
    #[error("out of memory: could not allocate data array with {elements} elements for {var}")]
    OutOfMemory { var: String, elements: String },

    /// The NetCDF library failed while reading a hyperslab
    #[error("could not read {var}: {source}")]
    Read {
        var: String,
        #[source]
        source: netcdf::Error,
    },

    /// Variable cannot be printed as a single line of text
    #[error("{var} is not a one-dimensional text variable (type {type_name}, {ndims} dimensions)")]
    NotText {
        var: String,
        type_name: String,
        ndims: usize,
    },

    /// Same field name has different element types in the two files
    #[error("{var} not the same type in {first} and {second}")]
    TypeMismatch {
        var: String,
        first: String,
        second: String,
    },

    /// Same field name has different element counts in the two files
    #[error("{var} has different number of elements in {first} ({first_count}) and {second} ({second_count})")]
    ElementCountMismatch {
        var: String,
        first: String,
        first_count: usize,
        second: String,
        second_count: usize,
    },

    /// Every element was excluded by the ignore threshold
    #[error("no qualifying elements for {scope}")]
    NoQualifyingElements { scope: String },

    /// Writing output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other NetCDF library error
    #[error("NetCDF error: {0}")]
    NetCDF(#[from] netcdf::Error),
}

/// Result type alias for nc_probe operations
pub type Result<T> = std::result::Result<T, NcProbeError>;
