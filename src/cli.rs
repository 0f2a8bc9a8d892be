//! Defines command-line interface options using `clap` for the netcdf_app and
//! nc_cmp binaries.

use crate::attributes::AttributeKind;
use crate::statistics::{parse_ignore_threshold, IgnoreThreshold};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};

/// Inspect and slice variables of NetCDF files
#[derive(Parser, Debug)]
#[command(name = "netcdf_app", version, about = "Inspect and slice variables of NetCDF files")]
pub struct AppArgs {
    /// Enable verbose output.
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: AppCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum AppCommand {
    /// List dimensions and variables with their types
    Headers {
        /// Path to the NetCDF file
        file: String,
    },

    /// Print values of a variable, optionally fixing leading dimensions
    #[command(allow_negative_numbers = true)]
    Data {
        /// Variable to print
        var_name: String,

        /// Indices of the leading dimensions, followed by the NetCDF file
        #[arg(value_name = "INDEX... FILE", required = true, num_args = 1..)]
        rest: Vec<String>,
    },

    /// Print the length of a dimension
    Dim {
        /// Dimension name
        dim_name: String,

        /// Path to the NetCDF file
        file: String,
    },

    /// Print a one-dimensional CHAR variable as text
    #[command(name = "string")]
    Text {
        /// Variable to print
        var_name: String,

        /// Path to the NetCDF file
        file: String,
    },

    /// Print an attribute of a variable, or of the file with NC_GLOBAL
    Attr {
        /// Variable name or NC_GLOBAL
        owner: String,

        /// Attribute name
        att_name: String,

        /// Path to the NetCDF file
        file: String,

        /// Require the value in this form
        #[arg(long = "as", value_enum)]
        kind: Option<AttributeKind>,
    },
}

impl AppCommand {
    /// Split the trailing arguments of `data` into index tokens and the file
    #[must_use]
    pub fn data_parts(rest: &[String]) -> (&[String], &str) {
        match rest.split_last() {
            Some((file, indices)) => (indices, file.as_str()),
            None => (&[], ""),
        }
    }
}

/// Names of the `netcdf_app` subcommands, in declaration order
#[must_use]
pub fn subcommand_names() -> Vec<String> {
    AppArgs::command()
        .get_subcommands()
        .map(|cmd| cmd.get_name().to_string())
        .collect()
}

/// Render a parse error for stderr
///
/// An unknown subcommand also lists the valid ones, which clap leaves out.
#[must_use]
pub fn render_parse_error(err: &clap::Error) -> String {
    let mut text = err.render().to_string();
    if err.kind() == ErrorKind::InvalidSubcommand {
        if !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str("Subcommand must be one of ");
        text.push_str(&subcommand_names().join(" "));
        text.push('\n');
    }
    text
}

/// Compare a field between two NetCDF files
#[derive(Parser, Debug)]
#[command(name = "nc_cmp", version, about = "Compare a field between two NetCDF files")]
pub struct CmpArgs {
    /// Ignore values with absolute value greater than or equal to this
    #[arg(short, long, env = "NC_CMP_IGNORE", value_parser = parse_ignore_threshold)]
    pub ignore: Option<IgnoreThreshold>,

    /// Enable verbose output.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Variable to compare
    pub field: String,

    /// First NetCDF file
    pub file1: String,

    /// Second NetCDF file
    pub file2: String,
}

impl CmpArgs {
    #[must_use]
    pub fn threshold(&self) -> IgnoreThreshold {
        self.ignore.unwrap_or_default()
    }
}

/// Start logging to stderr; `RUST_LOG` overrides the level chosen here
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    // A second initialisation (e.g. in tests) keeps the first logger
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init();
}
