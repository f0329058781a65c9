//! Capability contract for capturable scan events.
//!
//! An external registry keys [`EventType`] values by `type_name` and uses
//! `empty_instance` to allocate a record before populating it from
//! structured data.

use std::any::Any;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EventError, Result};

/// Registration entry for one kind of event record.
#[derive(Clone, Copy)]
pub struct EventType {
    /// Stable identifier used to route serialized records.
    pub type_name: &'static str,
    /// Factory for a zero-value instance.
    pub empty_instance: fn() -> Box<dyn EventData>,
}

impl EventType {
    /// Reconstruct a record of this type from structured data.
    pub fn decode(&self, value: Value) -> Result<Box<dyn EventData>> {
        let mut event = (self.empty_instance)();
        event.merge_json(value)?;
        Ok(event)
    }
}

impl fmt::Debug for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventType")
            .field("type_name", &self.type_name)
            .finish()
    }
}

impl PartialEq for EventType {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name
    }
}

impl Eq for EventType {}

/// Data carried by a captured event.
pub trait EventData: fmt::Debug + Send + Sync {
    /// Registration entry for this record's type.
    fn event_type(&self) -> EventType;

    /// Structured encoding of the record.
    fn to_json(&self) -> Result<Value>;

    /// Populate this record from structured data.
    fn merge_json(&mut self, value: Value) -> Result<()>;

    /// Downcast access to the concrete record.
    fn as_any(&self) -> &dyn Any;
}

/// A record tagged with its type identifier, as stored in event logs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaggedEvent {
    #[serde(rename = "type")]
    pub type_name: String,
    pub data: Value,
}

impl TaggedEvent {
    /// Tag and encode a record.
    pub fn from_event(event: &dyn EventData) -> Result<Self> {
        Ok(Self {
            type_name: event.event_type().type_name.to_string(),
            data: event.to_json()?,
        })
    }

    /// Decode with the registration entry resolved for `type_name`.
    pub fn into_event(self, event_type: &EventType) -> Result<Box<dyn EventData>> {
        if self.type_name != event_type.type_name {
            return Err(EventError::TypeMismatch {
                expected: event_type.type_name,
                found: self.type_name,
            });
        }
        event_type.decode(self.data)
    }
}
