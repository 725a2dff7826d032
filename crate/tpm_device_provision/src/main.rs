use std::process::ExitCode;

use prov_auth::TpmProvider;
use tpm_device_provision::run;

fn main() -> ExitCode {
    env_logger::init();

    let status = run(std::env::args_os(), &mut std::io::stdout(), |cli| {
        TpmProvider::new(&cli.tcti, cli.ek_handle)
    });
    ExitCode::from(status)
}
