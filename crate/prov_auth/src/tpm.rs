use std::str::FromStr;

use log::{debug, warn};
use tss_esapi::{tcti_ldr::TctiNameConf, Context};

use crate::{
    error::Error,
    key::{load_endorsement_key, marshall_public_area, EndorsementKey, TPM_EK_PERSISTENT_HANDLE},
    registration::registration_id_from_endorsement_key,
    SecureDeviceType, SecurityDevice, SecurityProvider,
};

pub const DEFAULT_TCTI: &str = "device:/dev/tpmrm0";

/// Security provider backed by a TPM 2.0 reachable through a TCTI.
#[derive(Debug)]
pub struct TpmProvider {
    tcti: String,
    ek_handle: u32,
    tcti_conf: Option<TctiNameConf>,
    device_type: Option<SecureDeviceType>,
}

impl Default for TpmProvider {
    fn default() -> Self {
        TpmProvider::new(DEFAULT_TCTI, TPM_EK_PERSISTENT_HANDLE)
    }
}

impl TpmProvider {
    #[must_use]
    pub fn new(tcti: &str, ek_handle: u32) -> Self {
        TpmProvider {
            tcti: tcti.to_owned(),
            ek_handle,
            tcti_conf: None,
            device_type: None,
        }
    }
}

impl SecurityProvider for TpmProvider {
    type Device = TpmDevice;

    fn platform_init(&mut self) -> Result<(), Error> {
        let tcti_conf = TctiNameConf::from_str(&self.tcti)
            .map_err(|e| Error::TctiError(format!("invalid TCTI '{}': {e}", self.tcti)))?;
        self.tcti_conf = Some(tcti_conf);
        Ok(())
    }

    fn platform_deinit(&mut self) {
        self.tcti_conf = None;
    }

    fn security_init(&mut self, kind: SecureDeviceType) -> Result<(), Error> {
        if self.tcti_conf.is_none() {
            return Err(Error::NotInitialized("platform".to_owned()));
        }
        match kind {
            SecureDeviceType::Tpm => {
                self.device_type = Some(kind);
                Ok(())
            }
            other => Err(Error::UnsupportedDeviceType(other)),
        }
    }

    fn security_deinit(&mut self) {
        self.device_type = None;
    }

    fn create(&mut self) -> Result<TpmDevice, Error> {
        if self.device_type.is_none() {
            return Err(Error::NotInitialized("security layer".to_owned()));
        }
        let tcti_conf = self
            .tcti_conf
            .clone()
            .ok_or_else(|| Error::NotInitialized("platform".to_owned()))?;

        debug!("opening TPM context on '{}'", self.tcti);
        let mut context = Context::new(tcti_conf)?;
        let endorsement_key = load_endorsement_key(&mut context, self.ek_handle)?;

        Ok(TpmDevice {
            context,
            endorsement_key,
        })
    }
}

/// Open TPM context holding the loaded endorsement key.
pub struct TpmDevice {
    context: Context,
    endorsement_key: EndorsementKey,
}

impl SecurityDevice for TpmDevice {
    fn endorsement_key(&mut self) -> Result<Vec<u8>, Error> {
        marshall_public_area(&self.endorsement_key.public)
    }

    fn registration_id(&mut self) -> Result<String, Error> {
        let endorsement_key = marshall_public_area(&self.endorsement_key.public)?;
        Ok(registration_id_from_endorsement_key(&endorsement_key))
    }
}

impl Drop for TpmDevice {
    fn drop(&mut self) {
        if self.endorsement_key.transient {
            if let Err(e) = self
                .context
                .flush_context(self.endorsement_key.handle.into())
            {
                warn!("failed to flush transient endorsement key: {e}");
            }
        }
    }
}
