use thiserror::Error;

use crate::SecureDeviceType;

#[derive(Error, Debug)]
pub enum Error {
    #[error("NotInitialized: {0}")]
    NotInitialized(String),
    #[error("TctiError: {0}")]
    TctiError(String),
    #[error("TpmError: {0}")]
    TpmError(String),
    #[error("Tss2Error: {0}")]
    Tss2Error(#[from] tss_esapi::Error),
    #[error("unsupported secure device type: {0}")]
    UnsupportedDeviceType(SecureDeviceType),
}
