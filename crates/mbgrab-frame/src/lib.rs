//! Modbus-over-stream request/response framing.
//!
//! Every frame carries:
//! - A 4-byte marker for stream synchronization
//! - A 2-byte big-endian length counting the unit byte, function code and payload
//! - A reserved unit byte and a one-byte function code
//!
//! Reads are blocking and exact; callers always get complete frames.

pub mod codec;
pub mod error;
pub mod function;
pub mod reader;
pub mod writer;

pub use codec::{
    encode_request, parse_header, CodecConfig, ModbusRequest, ModbusResponse, PayloadExtent,
    DEFAULT_SCRATCH_CAPACITY, HEADER_SIZE, MAX_FRAME_SIZE, MAX_PAYLOAD, MODBUS_HEADER_MARKER,
};
pub use error::{FrameError, Result};
pub use function::{
    ExceptionCode, ExceptionFunctionCode, FunctionCode, ModbusException, EXCEPTION_BIT,
    EXCEPTION_STRIP_MASK,
};
pub use reader::{decode_response, read_exact, read_min, ResponseReader};
pub use writer::RequestWriter;
