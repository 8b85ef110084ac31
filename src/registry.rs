//! Registration of a text device with its host environment: a device number, a device class, a
//! device node and the character device itself. Each is acquired in that order, and whatever has
//! been acquired is released in the reverse order when the `Registration` goes away, whether
//! that happens because a later step failed or because the device is detached.

use log::{debug, error, info};

use crate::error::{AttachError, HostError};

/// One host-side resource backing a device node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resource {
    DeviceNumber,
    Class,
    DeviceNode,
    CharDev,
}

impl Resource {
    /// Acquisition order. Release runs the other way.
    pub const ALL: [Resource; 4] = [
        Resource::DeviceNumber,
        Resource::Class,
        Resource::DeviceNode,
        Resource::CharDev,
    ];
}

/// Names the host registers a device under: the device number region, the class, and the node
/// (which becomes `/dev/<node>` on Linux).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceNames {
    pub region: &'static str,
    pub class: &'static str,
    pub node: &'static str,
}

impl DeviceNames {
    pub const fn new(region: &'static str, class: &'static str, node: &'static str) -> Self {
        DeviceNames {
            region,
            class,
            node,
        }
    }
}

/// The host side of device registration.
pub trait Host {
    fn acquire(&mut self, resource: Resource, names: &DeviceNames) -> Result<(), HostError>;
    fn release(&mut self, resource: Resource, names: &DeviceNames);
}

/// A set of acquired host resources, released in reverse acquisition order on drop.
pub struct Registration<H>
where
    H: Host,
{
    host: H,
    names: DeviceNames,
    acquired: usize,
}

impl<H> Registration<H>
where
    H: Host,
{
    /// Acquire every resource in `Resource::ALL` order. If one fails, the ones before it are
    /// released again before the error is returned.
    pub fn register(host: H, names: DeviceNames) -> Result<Self, AttachError> {
        let mut reg = Registration {
            host,
            names,
            acquired: 0,
        };
        for &resource in Resource::ALL.iter() {
            reg.host.acquire(resource, &reg.names).map_err(|e| {
                error!("cannot register {:?} for {}: {}", resource, names.node, e);
                AttachError::Registration(resource, e)
            })?;
            debug!("{}: acquired {:?}", names.node, resource);
            reg.acquired += 1;
        }
        info!("{}: registered", names.node);
        Ok(reg)
    }

    pub fn names(&self) -> &DeviceNames {
        &self.names
    }
}

impl<H> Drop for Registration<H>
where
    H: Host,
{
    fn drop(&mut self) {
        for &resource in Resource::ALL[..self.acquired].iter().rev() {
            self.host.release(resource, &self.names);
            debug!("{}: released {:?}", self.names.node, resource);
        }
        self.acquired = 0;
    }
}

#[cfg(test)]
pub mod test_host {
    //! A host that records every acquire and release, with one resource optionally refusing.

    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    use super::{DeviceNames, Host, Resource};
    use crate::error::HostError;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum Event {
        Acquire(Resource),
        Release(Resource),
    }

    #[derive(Clone, Default)]
    pub struct TestHost {
        events: Rc<RefCell<Vec<Event>>>,
        names: Rc<RefCell<Option<DeviceNames>>>,
        refuse: Option<Resource>,
    }

    impl TestHost {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn refusing(resource: Resource) -> Self {
            TestHost {
                refuse: Some(resource),
                ..Self::default()
            }
        }

        pub fn events(&self) -> Vec<Event> {
            self.events.borrow().clone()
        }

        pub fn last_names(&self) -> Option<DeviceNames> {
            *self.names.borrow()
        }
    }

    impl Host for TestHost {
        fn acquire(&mut self, resource: Resource, names: &DeviceNames) -> Result<(), HostError> {
            *self.names.borrow_mut() = Some(*names);
            if self.refuse == Some(resource) {
                return Err(HostError(-16));
            }
            self.events.borrow_mut().push(Event::Acquire(resource));
            Ok(())
        }

        fn release(&mut self, resource: Resource, _names: &DeviceNames) {
            self.events.borrow_mut().push(Event::Release(resource));
        }
    }
}
