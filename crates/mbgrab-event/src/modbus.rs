use std::any::Any;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use mbgrab_frame::{FunctionCode, ModbusResponse};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::Result;
use crate::event::{EventData, EventType};

/// Type identifier of captured Modbus exchanges.
pub const CONNECTION_EVENT_MODBUS: &str = "modbus";

/// Registration entry for [`ModbusEvent`].
pub const MODBUS_EVENT_TYPE: EventType = EventType {
    type_name: CONNECTION_EVENT_MODBUS,
    empty_instance: empty_modbus_event,
};

fn empty_modbus_event() -> Box<dyn EventData> {
    Box::new(ModbusEvent::default())
}

/// A captured Modbus response: function code plus raw payload.
///
/// Missing fields decode to their zero values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModbusEvent {
    #[serde(rename = "function_code", default, with = "function_code")]
    pub function: FunctionCode,
    #[serde(default, with = "base64_bytes")]
    pub response: Vec<u8>,
}

impl ModbusEvent {
    pub fn new(function: FunctionCode, response: impl Into<Vec<u8>>) -> Self {
        Self {
            function,
            response: response.into(),
        }
    }
}

impl From<&ModbusResponse> for ModbusEvent {
    fn from(response: &ModbusResponse) -> Self {
        Self {
            function: response.function,
            response: response.data.to_vec(),
        }
    }
}

impl From<ModbusResponse> for ModbusEvent {
    fn from(response: ModbusResponse) -> Self {
        Self::from(&response)
    }
}

impl EventData for ModbusEvent {
    fn event_type(&self) -> EventType {
        MODBUS_EVENT_TYPE
    }

    fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    fn merge_json(&mut self, value: Value) -> Result<()> {
        let decoded: ModbusEvent = serde_json::from_value(value)?;
        tracing::trace!(
            function = %decoded.function,
            size = decoded.response.len(),
            "decoded modbus event"
        );
        *self = decoded;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

mod function_code {
    use super::*;

    pub fn serialize<S: Serializer>(
        code: &FunctionCode,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(code.as_u8())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<FunctionCode, D::Error> {
        u8::deserialize(deserializer).map(FunctionCode)
    }
}

// Byte payloads are standard base64 strings; `null` decodes as empty.
mod base64_bytes {
    use super::*;

    pub fn serialize<S: Serializer>(
        bytes: &[u8],
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Vec<u8>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(encoded) => STANDARD
                .decode(encoded.as_bytes())
                .map_err(serde::de::Error::custom),
            None => Ok(Vec::new()),
        }
    }
}
