use std::path::PathBuf;

use clap::Parser;
use prov_auth::{key::TPM_EK_PERSISTENT_HANDLE, tpm::DEFAULT_TCTI};

/// Exit status for invalid command lines.
pub const USAGE_EXIT_CODE: u8 = 1;

/// Gather the TPM endorsement key and registration id of this device
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// File to store the base64 encoded endorsement key into
    #[arg(value_name = "EK_OUTPUT_FILENAME")]
    pub ek_output: PathBuf,

    /// File to store the registration id into
    #[arg(value_name = "REGID_OUTPUT_FILENAME")]
    pub regid_output: PathBuf,

    /// TCTI used to reach the TPM
    #[arg(long, env = "TCTI", default_value = DEFAULT_TCTI)]
    pub tcti: String,

    /// Persistent handle of the endorsement key (hexadecimal with `0x`, or decimal)
    #[arg(long, value_parser = parse_handle, default_value_t = TPM_EK_PERSISTENT_HANDLE)]
    pub ek_handle: u32,
}

fn parse_handle(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid handle '{s}': {e}"))
}

#[must_use]
pub fn usage(program: &str) -> String {
    format!(
        "Invalid or none argument(s) provided. USAGE: {program} <EK_OUTPUT_FILENAME> <REGID_OUTPUT_FILENAME>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_parse_two_paths() {
        let cli = Cli::try_parse_from(["tpm_device_provision", "ek.txt", "regid.txt"]).unwrap();
        assert_eq!(cli.ek_output, Path::new("ek.txt"));
        assert_eq!(cli.regid_output, Path::new("regid.txt"));
        assert_eq!(cli.ek_handle, 0x81010001);
    }

    #[test]
    fn test_parse_wrong_argument_count() {
        assert!(Cli::try_parse_from(["tpm_device_provision"]).is_err());
        assert!(Cli::try_parse_from(["tpm_device_provision", "ek.txt"]).is_err());
        assert!(Cli::try_parse_from(["tpm_device_provision", "a", "b", "c"]).is_err());
    }

    #[test]
    fn test_parse_options() {
        let cli = Cli::try_parse_from([
            "tpm_device_provision",
            "--tcti",
            "mssim:host=localhost,port=2321",
            "--ek-handle",
            "0x81000050",
            "ek.txt",
            "regid.txt",
        ])
        .unwrap();
        assert_eq!(cli.tcti, "mssim:host=localhost,port=2321");
        assert_eq!(cli.ek_handle, 0x81000050);
    }

    #[test]
    fn test_parse_handle() {
        assert_eq!(parse_handle("0x81010001"), Ok(0x81010001));
        assert_eq!(parse_handle("0X10"), Ok(16));
        assert_eq!(parse_handle("2164326401"), Ok(0x81010001));
        assert!(parse_handle("0xzz").is_err());
        assert!(parse_handle("").is_err());
    }

    #[test]
    fn test_usage() {
        assert_eq!(
            usage("prog"),
            "Invalid or none argument(s) provided. USAGE: prog <EK_OUTPUT_FILENAME> <REGID_OUTPUT_FILENAME>"
        );
    }
}
