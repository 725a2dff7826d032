use error::Error;

pub mod error;
pub mod key;
pub mod registration;
pub mod tpm;

pub use registration::registration_id_from_endorsement_key;
pub use tpm::{TpmDevice, TpmProvider};

/// Kind of secure device backing the provisioning identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecureDeviceType {
    Tpm,
    X509,
}

impl std::fmt::Display for SecureDeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            SecureDeviceType::Tpm => write!(f, "TPM"),
            SecureDeviceType::X509 => write!(f, "X509"),
        }
    }
}

/// Access to the process-wide security subsystem.
///
/// `platform_init` must succeed before `security_init`, and the matching
/// `*_deinit` calls are expected in reverse order. Devices are created only
/// once both layers are initialized.
pub trait SecurityProvider {
    type Device: SecurityDevice;

    fn platform_init(&mut self) -> Result<(), Error>;

    fn platform_deinit(&mut self);

    fn security_init(&mut self, kind: SecureDeviceType) -> Result<(), Error>;

    fn security_deinit(&mut self);

    /// Acquire a handle on the security device.
    ///
    /// The handle is released when the returned value is dropped.
    fn create(&mut self) -> Result<Self::Device, Error>;
}

/// A handle on a security device able to report its provisioning identity.
pub trait SecurityDevice {
    /// Endorsement key of the device, as raw bytes.
    fn endorsement_key(&mut self) -> Result<Vec<u8>, Error>;

    /// Registration id the provisioning service knows the device by.
    fn registration_id(&mut self) -> Result<String, Error>;
}
