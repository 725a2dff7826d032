use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("PlatformInitError: {0}")]
    PlatformInitError(#[source] prov_auth::error::Error),
    #[error("SecurityInitError: {0}")]
    SecurityInitError(#[source] prov_auth::error::Error),
    #[error("HandleCreationError: {0}")]
    HandleCreationError(#[source] prov_auth::error::Error),
    #[error("KeyRetrievalError: {0}")]
    KeyRetrievalError(#[source] prov_auth::error::Error),
    #[error("KeyRetrievalError: device returned an empty endorsement key")]
    EmptyEndorsementKey,
    #[error("RegistrationIdError: {0}")]
    RegistrationIdError(#[source] prov_auth::error::Error),
    #[error("FileOpenError: {path:?}: {source}")]
    FileOpenError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("FileWriteError: {path:?}: {source}")]
    FileWriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Error {
    /// Process exit status reported for this failure. `1` is kept for usage
    /// errors and `7` for the base64 encoding stage, which cannot fail.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::PlatformInitError(_) => 2,
            Error::SecurityInitError(_) => 3,
            Error::HandleCreationError(_) => 4,
            Error::KeyRetrievalError(_) | Error::EmptyEndorsementKey => 5,
            Error::RegistrationIdError(_) => 6,
            Error::FileOpenError { .. } => 8,
            Error::FileWriteError { .. } => 9,
        }
    }
}
