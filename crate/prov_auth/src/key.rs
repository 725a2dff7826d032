use crate::error::Error;

use log::debug;
use tss_esapi::{
    abstraction::{ek, DefaultKey},
    handles::{KeyHandle, PersistentTpmHandle, TpmHandle},
    interface_types::algorithm::AsymmetricAlgorithm,
    structures::Public,
    traits::Marshall,
    Context,
};

/// Persistent handle reserved for the RSA endorsement key (TCG EK Credential Profile).
pub const TPM_EK_PERSISTENT_HANDLE: u32 = 0x81010001;

/// Endorsement key loaded in a TPM context.
#[derive(Debug)]
pub struct EndorsementKey {
    pub handle: KeyHandle,
    pub public: Public,
    /// Whether the key was created for this session and must be flushed.
    pub transient: bool,
}

pub(crate) fn get_key_from_persistent_handle(
    context: &mut Context,
    index: u32,
) -> Result<(KeyHandle, Public), Error> {
    let tpm_handle = TpmHandle::Persistent(PersistentTpmHandle::new(index)?);
    let key_handle: KeyHandle = context.tr_from_tpm_public(tpm_handle)?.into();

    let (public, _, _) = context.read_public(key_handle)?;

    Ok((key_handle, public))
}

/// Create the default RSA endorsement key in the endorsement hierarchy.
pub(crate) fn create_endorsement_key(context: &mut Context) -> Result<(KeyHandle, Public), Error> {
    let key_handle = context.execute_with_nullauth_session(|ctx| {
        ek::create_ek_object(ctx, AsymmetricAlgorithm::Rsa, DefaultKey)
    })?;

    let (public, _, _) = context.read_public(key_handle)?;

    Ok((key_handle, public))
}

/// Load the endorsement key stored at `persistent_handle`, or create a
/// transient one when nothing is persisted there.
pub fn load_endorsement_key(
    context: &mut Context,
    persistent_handle: u32,
) -> Result<EndorsementKey, Error> {
    match get_key_from_persistent_handle(context, persistent_handle) {
        Ok((handle, public)) => {
            debug!("using persisted endorsement key at {persistent_handle:#010x}");
            Ok(EndorsementKey {
                handle,
                public,
                transient: false,
            })
        }
        Err(e) => {
            debug!("no endorsement key at {persistent_handle:#010x} ({e}), creating one");
            let (handle, public) = create_endorsement_key(context)?;
            Ok(EndorsementKey {
                handle,
                public,
                transient: true,
            })
        }
    }
}

/// Marshall a public area as a `TPM2B_PUBLIC`: big-endian size followed by the `TPMT_PUBLIC`.
pub fn marshall_public_area(public: &Public) -> Result<Vec<u8>, Error> {
    let public_area = public.marshall()?;
    let size = u16::try_from(public_area.len()).map_err(|_| {
        Error::TpmError(format!(
            "public area too large to marshall: {} bytes",
            public_area.len()
        ))
    })?;

    let mut buffer = Vec::with_capacity(2 + public_area.len());
    buffer.extend_from_slice(&size.to_be_bytes());
    buffer.extend_from_slice(&public_area);
    Ok(buffer)
}
