use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};
use crate::function::{ExceptionCode, FunctionCode, ModbusException};

/// Frame header: marker (4) + length (2) = 6 bytes.
pub const HEADER_SIZE: usize = 6;

/// Offset of the reserved unit byte.
pub const UNIT_OFFSET: usize = 6;

/// Offset of the function code byte.
pub const FUNCTION_OFFSET: usize = 7;

/// Offset of the first payload byte.
pub const PAYLOAD_OFFSET: usize = 8;

/// Bytes counted by the length field besides the payload (unit + function).
pub const LENGTH_OVERHEAD: usize = 2;

/// Largest payload whose declared length still fits the 16-bit field.
pub const MAX_PAYLOAD: usize = u16::MAX as usize - LENGTH_OVERHEAD;

/// Longest frame a 16-bit declared length can describe.
pub const MAX_FRAME_SIZE: usize = HEADER_SIZE + u16::MAX as usize;

/// Header marker bytes.
///
/// The first two bytes only need to match between request and response;
/// the last two must be zero.
pub const MODBUS_HEADER_MARKER: [u8; 4] = [0x13, 0x37, 0x00, 0x00];

/// Default decode scratch capacity, larger than any expected scan response.
pub const DEFAULT_SCRATCH_CAPACITY: usize = 1024;

/// A Modbus request to be framed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModbusRequest {
    pub function: FunctionCode,
    pub data: Bytes,
}

impl ModbusRequest {
    /// Create a new request.
    pub fn new(function: FunctionCode, data: impl Into<Bytes>) -> Self {
        Self {
            function,
            data: data.into(),
        }
    }

    /// The total wire size of this request.
    pub fn wire_size(&self) -> usize {
        PAYLOAD_OFFSET + self.data.len()
    }

    /// Encode with the default header marker into a fresh buffer.
    pub fn to_frame(&self) -> Result<Bytes> {
        let mut dst = BytesMut::with_capacity(self.wire_size());
        encode_request(self, &MODBUS_HEADER_MARKER, &mut dst)?;
        Ok(dst.freeze())
    }
}

/// A decoded Modbus response.
///
/// `data` starts right after the function code and runs to the last byte
/// read from the stream (see [`PayloadExtent`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModbusResponse {
    pub function: FunctionCode,
    pub data: Bytes,
}

impl ModbusResponse {
    /// Returns true if the response function code has the exception bit set.
    pub fn is_exception(&self) -> bool {
        self.function.is_exception()
    }

    /// Exception body, if this is an exception response carrying a reason byte.
    pub fn exception(&self) -> Option<ModbusException> {
        if !self.is_exception() {
            return None;
        }
        let reason = *self.data.first()?;
        Some(ModbusException {
            function: self.function.exception_function_code(),
            exception_type: ExceptionCode(reason),
        })
    }
}

/// Encode a request into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────────┬───────────┬──────────┬──────────┬──────────────┐
/// │ Marker (4B)  │ Length    │ Unit     │ Function │ Payload      │
/// │ 13 37 00 00  │ (2B BE)   │ (1B, 0)  │ (1B)     │ (Length - 2) │
/// └──────────────┴───────────┴──────────┴──────────┴──────────────┘
/// ```
pub fn encode_request(
    request: &ModbusRequest,
    marker: &[u8; 4],
    dst: &mut BytesMut,
) -> Result<()> {
    if request.data.len() > MAX_PAYLOAD {
        return Err(FrameError::PayloadTooLarge {
            size: request.data.len(),
            max: MAX_PAYLOAD,
        });
    }
    dst.reserve(request.wire_size());
    dst.put_slice(marker);
    dst.put_u16((request.data.len() + LENGTH_OVERHEAD) as u16);
    dst.put_u8(0);
    dst.put_u8(request.function.as_u8());
    dst.put_slice(&request.data);
    Ok(())
}

/// Validate a 6-byte header and return its declared length.
pub fn parse_header(header: &[u8], marker: &[u8; 4]) -> Result<u16> {
    if header.len() < HEADER_SIZE {
        return Err(FrameError::BufferTooSmall {
            required: HEADER_SIZE,
            capacity: header.len(),
        });
    }

    if header[0..4] != marker[..] {
        return Err(FrameError::ProtocolMismatch);
    }

    let declared = u16::from_be_bytes([header[4], header[5]]);
    if usize::from(declared) < LENGTH_OVERHEAD {
        return Err(FrameError::InvalidLength(declared));
    }
    Ok(declared)
}

/// How far the decoded payload extends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PayloadExtent {
    /// Reads may fill any free scratch capacity, and the payload covers every
    /// byte received, including bytes past the declared length.
    #[default]
    Received,
    /// Reads stop at the declared frame end and the payload is exactly
    /// `declared - 2` bytes.
    Declared,
}

/// Configuration for the frame codec.
#[derive(Debug, Clone)]
pub struct CodecConfig {
    /// Header marker written on encode and verified on decode.
    pub marker: [u8; 4],
    /// Decode scratch buffer size in bytes. Default: 1024.
    pub scratch_capacity: usize,
    /// Payload extent policy. Default: [`PayloadExtent::Received`].
    pub payload_extent: PayloadExtent,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            marker: MODBUS_HEADER_MARKER,
            scratch_capacity: DEFAULT_SCRATCH_CAPACITY,
            payload_extent: PayloadExtent::default(),
        }
    }
}
