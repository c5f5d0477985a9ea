//! Node configuration.
//!
//! A [`Config`] fixes a node's identity and role for the lifetime of the
//! node. Role selection is a runtime value: the same binary can run either
//! side of the protocol, which keeps simulation and fleet provisioning
//! simple. All validation happens at construction so the round logic never
//! sees an out-of-range identifier or payload length.

use crate::types::{Error, Id, MAX_DATA_LENGTH};

/// Role a node plays within a collection round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Produces a fixed-size payload and relays its children's payloads
    /// toward the collector.
    Sensor {
        /// Payload byte count, fixed per round.
        data_length: usize,
    },
    /// Tree root; drains every subtree and dispatches payloads to the
    /// user callback.
    Collector,
}

/// Validated per-node configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    id: Id,
    role: Role,
}

impl Config {
    /// Configuration for a sensor with the given payload size.
    pub fn sensor(id: Id, data_length: usize) -> Result<Self, Error> {
        if id == 0 {
            return Err(Error::ReservedId);
        }
        if data_length > MAX_DATA_LENGTH {
            return Err(Error::PayloadTooLarge);
        }
        Ok(Self {
            id,
            role: Role::Sensor { data_length },
        })
    }

    /// Configuration for the collector.
    pub fn collector(id: Id) -> Result<Self, Error> {
        if id == 0 {
            return Err(Error::ReservedId);
        }
        Ok(Self {
            id,
            role: Role::Collector,
        })
    }

    /// This node's identifier.
    pub fn id(&self) -> Id {
        self.id
    }

    /// This node's role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Sensor payload length; 0 for the collector.
    pub fn data_length(&self) -> usize {
        match self.role {
            Role::Sensor { data_length } => data_length,
            Role::Collector => 0,
        }
    }
}
