//! Entry point for netcdf_app.
//! Parses the subcommand and dispatches to headers, data, dim, string or attr.

use clap::Parser;
use nc_probe::cli::{init_logging, render_parse_error, AppArgs, AppCommand};
use nc_probe::commands::{run_attr, run_data, run_dim, run_headers, run_string};
use nc_probe::NcProbeError;
use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = match AppArgs::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            eprint!("{}", render_parse_error(&e));
            return ExitCode::FAILURE;
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
    };

    init_logging(args.verbose);

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let result = run(args.command, &mut out)
        .and_then(|()| out.flush().map_err(NcProbeError::from));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("netcdf_app: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: AppCommand, out: &mut impl Write) -> nc_probe::Result<()> {
    match command {
        AppCommand::Headers { file } => run_headers(&file, out),
        AppCommand::Data { var_name, rest } => {
            let (indices, file) = AppCommand::data_parts(&rest);
            run_data(&var_name, indices, file, out)
        }
        AppCommand::Dim { dim_name, file } => run_dim(&dim_name, &file, out),
        AppCommand::Text { var_name, file } => run_string(&var_name, &file, out),
        AppCommand::Attr {
            owner,
            att_name,
            file,
            kind,
        } => run_attr(&owner, &att_name, &file, kind, out),
    }
}
