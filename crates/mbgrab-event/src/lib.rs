//! Captured Modbus exchange records.
//!
//! A [`ModbusEvent`] wraps the function code and raw payload of a decoded
//! response so that scan loggers can store it alongside other event kinds.
//! This crate does not own an event registry; it exposes the
//! [`EventType`] entry a registry needs to route and rebuild records.

pub mod error;
pub mod event;
pub mod modbus;

pub use error::{EventError, Result};
pub use event::{EventData, EventType, TaggedEvent};
pub use modbus::{ModbusEvent, CONNECTION_EVENT_MODBUS, MODBUS_EVENT_TYPE};
