use std::{cell::RefCell, rc::Rc};

use prov_auth::{error::Error, SecureDeviceType, SecurityDevice, SecurityProvider};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    PlatformInit,
    PlatformDeinit,
    SecurityInit(SecureDeviceType),
    SecurityDeinit,
    Create,
    Destroy,
}

/// In-memory security provider recording every call made on it.
#[derive(Default)]
pub(crate) struct MockProvider {
    pub fail_platform_init: bool,
    pub fail_security_init: bool,
    pub fail_create: bool,
    pub fail_endorsement_key: bool,
    pub fail_registration_id: bool,
    pub endorsement_key: Vec<u8>,
    pub registration_id: String,
    pub(crate) events: Rc<RefCell<Vec<Event>>>,
}

impl MockProvider {
    pub fn new(endorsement_key: &[u8], registration_id: &str) -> Self {
        MockProvider {
            endorsement_key: endorsement_key.to_vec(),
            registration_id: registration_id.to_owned(),
            ..Default::default()
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    fn record(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}

fn failure(what: &str) -> Error {
    Error::TpmError(format!("mock {what} failure"))
}

impl SecurityProvider for MockProvider {
    type Device = MockDevice;

    fn platform_init(&mut self) -> Result<(), Error> {
        self.record(Event::PlatformInit);
        if self.fail_platform_init {
            return Err(failure("platform_init"));
        }
        Ok(())
    }

    fn platform_deinit(&mut self) {
        self.record(Event::PlatformDeinit);
    }

    fn security_init(&mut self, kind: SecureDeviceType) -> Result<(), Error> {
        self.record(Event::SecurityInit(kind));
        if self.fail_security_init {
            return Err(failure("security_init"));
        }
        Ok(())
    }

    fn security_deinit(&mut self) {
        self.record(Event::SecurityDeinit);
    }

    fn create(&mut self) -> Result<MockDevice, Error> {
        self.record(Event::Create);
        if self.fail_create {
            return Err(failure("create"));
        }
        Ok(MockDevice {
            endorsement_key: (!self.fail_endorsement_key).then(|| self.endorsement_key.clone()),
            registration_id: (!self.fail_registration_id).then(|| self.registration_id.clone()),
            events: Rc::clone(&self.events),
        })
    }
}

pub(crate) struct MockDevice {
    endorsement_key: Option<Vec<u8>>,
    registration_id: Option<String>,
    events: Rc<RefCell<Vec<Event>>>,
}

impl SecurityDevice for MockDevice {
    fn endorsement_key(&mut self) -> Result<Vec<u8>, Error> {
        self.endorsement_key
            .clone()
            .ok_or_else(|| failure("endorsement_key"))
    }

    fn registration_id(&mut self) -> Result<String, Error> {
        self.registration_id
            .clone()
            .ok_or_else(|| failure("registration_id"))
    }
}

impl Drop for MockDevice {
    fn drop(&mut self) {
        self.events.borrow_mut().push(Event::Destroy);
    }
}
