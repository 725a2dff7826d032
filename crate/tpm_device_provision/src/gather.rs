use prov_auth::{SecurityDevice, SecurityProvider};

use crate::{context::SecurityContext, error::Error};

/// Provisioning identity read from the security device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationInfo {
    endorsement_key: Vec<u8>,
    registration_id: String,
}

impl RegistrationInfo {
    #[must_use]
    pub fn endorsement_key(&self) -> &[u8] {
        &self.endorsement_key
    }

    #[must_use]
    pub fn registration_id(&self) -> &str {
        &self.registration_id
    }
}

/// Read the endorsement key and registration id from a freshly created
/// device handle.
///
/// The handle is released before returning, whatever the outcome.
pub fn gather_registration_info<P: SecurityProvider>(
    context: &mut SecurityContext<'_, P>,
) -> Result<RegistrationInfo, Error> {
    let mut device = context.provider().create().map_err(|e| {
        println!("failed creating security device handle");
        Error::HandleCreationError(e)
    })?;

    let endorsement_key = device.endorsement_key().map_err(|e| {
        println!("failed getting endorsement key from device");
        Error::KeyRetrievalError(e)
    })?;
    if endorsement_key.is_empty() {
        println!("failed getting endorsement key from device");
        return Err(Error::EmptyEndorsementKey);
    }

    let registration_id = device.registration_id().map_err(|e| {
        println!("failed getting registration id from device");
        Error::RegistrationIdError(e)
    })?;

    Ok(RegistrationInfo {
        endorsement_key,
        registration_id,
    })
}
