//! Entry point for nc_cmp.
//! Compares one field between two NetCDF files and prints mean, RMS and
//! mean square difference.

use clap::Parser;
use nc_probe::cli::{init_logging, CmpArgs};
use nc_probe::commands::run_compare;
use nc_probe::NcProbeError;
use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = match CmpArgs::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_logging(args.verbose);

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let result = run_compare(
        &args.field,
        &args.file1,
        &args.file2,
        args.threshold(),
        &mut out,
    )
    .and_then(|()| out.flush().map_err(NcProbeError::from));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("nc_cmp: {e}");
            ExitCode::FAILURE
        }
    }
}
