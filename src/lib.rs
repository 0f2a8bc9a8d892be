//! nc_probe: inspect, slice and compare variables of NetCDF files
//!
//! The crate backs two command-line tools. `netcdf_app` lists a file's
//! dimensions and variables, prints hyperslabs or text of a variable, and reads
//! dimension lengths and attributes. `nc_cmp` compares one field across two
//! files, reporting per-file mean and RMS and the mean square difference.
//!
//! ## Module Organization
//!
//! - [`slice`]: index parsing and start/count resolution
//! - [`element`]: the closed set of element types and value formatting
//! - [`reader`]: typed hyperslab reads behind the [`reader::SliceSource`] trait
//! - [`printer`]: row-wrapped flat output
//! - [`statistics`]: ignore threshold, single-pass accumulation and reports
//! - [`netcdf_io`]: the [`netcdf`] crate adapter
//! - [`metadata`]: header listing and dimension lookup
//! - [`attributes`]: attribute reads for variables and `NC_GLOBAL`
//! - [`commands`]: subcommands writing to any [`std::io::Write`]
//! - [`cli`]: `clap` argument definitions and logging setup
//! - [`errors`]: centralized error handling
//!
//! ## Usage
//!
//! ```rust,no_run
//! use nc_probe::prelude::*;
//!
//! let mut out = std::io::stdout();
//! // Print row 2 of `temperature`
//! run_data("temperature", &["2"][..], "data.nc", &mut out).unwrap();
//!
//! let report = compare_field("temperature", "a.nc", "b.nc", IgnoreThreshold::NONE).unwrap();
//! print!("{report}");
//! ```

pub mod attributes;
pub mod cli;
pub mod commands;
pub mod element;
pub mod errors;
pub mod metadata;
pub mod netcdf_io;
pub mod printer;
pub mod reader;
pub mod slice;
pub mod statistics;

pub use errors::{NcProbeError, Result};

pub mod prelude {
    //! Commonly used imports for convenience
    pub use crate::commands::{
        compare_field, run_attr, run_compare, run_data, run_dim, run_headers, run_string,
    };
    pub use crate::element::ElementType;
    pub use crate::errors::{NcProbeError, Result};
    pub use crate::reader::{read_slice, read_string, SliceSource, TypedBuffer};
    pub use crate::slice::SliceRequest;
    pub use crate::statistics::{ComparisonReport, IgnoreThreshold};
}
