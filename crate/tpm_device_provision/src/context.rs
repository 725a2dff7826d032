use prov_auth::{SecureDeviceType, SecurityProvider};

use crate::error::Error;

/// Initialized security subsystem.
///
/// Construction runs the platform then security initialization; dropping the
/// context runs the matching deinitializations in reverse order. When the
/// security layer fails to initialize, only the platform is torn down.
pub struct SecurityContext<'a, P: SecurityProvider> {
    provider: &'a mut P,
}

impl<'a, P: SecurityProvider> SecurityContext<'a, P> {
    pub fn new(provider: &'a mut P, kind: SecureDeviceType) -> Result<Self, Error> {
        if let Err(e) = provider.platform_init() {
            println!("Failed calling platform_init");
            return Err(Error::PlatformInitError(e));
        }

        if let Err(e) = provider.security_init(kind) {
            println!("Failed calling prov_dev_security_init");
            provider.platform_deinit();
            return Err(Error::SecurityInitError(e));
        }

        Ok(SecurityContext { provider })
    }

    pub fn provider(&mut self) -> &mut P {
        self.provider
    }
}

impl<P: SecurityProvider> Drop for SecurityContext<'_, P> {
    fn drop(&mut self) {
        self.provider.security_deinit();
        self.provider.platform_deinit();
    }
}
