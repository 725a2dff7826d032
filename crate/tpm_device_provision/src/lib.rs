use std::{ffi::OsString, io::Write, path::Path};

use clap::{error::ErrorKind, Parser};
use cli::{usage, Cli, USAGE_EXIT_CODE};
use context::SecurityContext;
use error::Error;
use gather::{gather_registration_info, RegistrationInfo};
use log::{error, warn};
use output::{encode_endorsement_key, write_registration_files};
use prov_auth::{SecureDeviceType, SecurityProvider};

pub mod cli;
pub mod context;
pub mod error;
pub mod gather;
pub mod output;

#[cfg(test)]
mod test_utils;

/// Gather the registration information of the TPM behind `provider` and
/// write it to `ek_path` (base64 endorsement key) and `regid_path`
/// (registration id).
///
/// The security subsystem is initialized for the duration of the call and
/// torn down before returning, on success as on failure.
pub fn provision<P: SecurityProvider>(
    provider: &mut P,
    ek_path: &Path,
    regid_path: &Path,
) -> Result<RegistrationInfo, Error> {
    let mut context = SecurityContext::new(provider, SecureDeviceType::Tpm)?;

    let reg_info = gather_registration_info(&mut context)?;

    let encoded_ek = encode_endorsement_key(reg_info.endorsement_key());

    write_registration_files(ek_path, &encoded_ek, regid_path, reg_info.registration_id())?;
    println!("Device provision information written into output files successfully.");

    Ok(reg_info)
}

fn emit(out: &mut dyn Write, line: std::fmt::Arguments<'_>) {
    if let Err(e) = out.write_fmt(line) {
        warn!("failed to write to output: {e}");
    }
}

/// Command line entry point.
///
/// Parses `args` (program name first), provisions through the provider built
/// by `make_provider` and returns the process exit status. Progress lines go
/// to `out`; "All done. Exiting." is always the last one once the command
/// line was accepted.
pub fn run<I, T, P, F>(args: I, out: &mut dyn Write, make_provider: F) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
    P: SecurityProvider,
    F: FnOnce(&Cli) -> P,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

    let cli = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            emit(out, format_args!("{}", e.render()));
            return 0;
        }
        Err(e) => {
            let program = args
                .first()
                .map(|arg| arg.to_string_lossy().into_owned())
                .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_owned());
            eprint!("{}", e.render());
            emit(out, format_args!("{}\n", usage(&program)));
            return USAGE_EXIT_CODE;
        }
    };

    emit(out, format_args!("Using EK file path: '{}'\n", cli.ek_output.display()));
    emit(out, format_args!("Using Reg ID file path: '{}'\n", cli.regid_output.display()));
    emit(out, format_args!("Gathering the registration information...\n"));

    let mut provider = make_provider(&cli);
    let result = provision(&mut provider, &cli.ek_output, &cli.regid_output);
    if let Err(e) = &result {
        error!("{e}");
    }

    emit(out, format_args!("All done. Exiting.\n"));

    match result {
        Ok(_) => 0,
        Err(e) => e.exit_code(),
    }
}
