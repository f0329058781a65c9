use std::io::{ErrorKind, Read};

use bytes::BytesMut;

use crate::codec::{
    parse_header, CodecConfig, ModbusResponse, PayloadExtent, FUNCTION_OFFSET, HEADER_SIZE,
    MAX_FRAME_SIZE, PAYLOAD_OFFSET,
};
use crate::error::{FrameError, Result};
use crate::function::FunctionCode;

/// Read from `stream` into `buf[filled..]` until at least `required` bytes
/// are present in `buf`, returning the total filled count.
///
/// Never writes past `buf.len()`, so a buffer of exactly `required` bytes
/// is filled exactly. Fails with [`FrameError::BufferTooSmall`] when `buf` is
/// full before `required` is reached and with [`FrameError::ConnectionClosed`]
/// on EOF. I/O errors are returned as-is; only `Interrupted` reissues the read.
pub fn read_min<R: Read + ?Sized>(
    stream: &mut R,
    buf: &mut [u8],
    mut filled: usize,
    required: usize,
) -> Result<usize> {
    while filled < required {
        if filled >= buf.len() {
            tracing::warn!(
                required,
                capacity = buf.len(),
                "modbus read buffer exhausted"
            );
            return Err(FrameError::BufferTooSmall {
                required,
                capacity: buf.len(),
            });
        }

        let read = match stream.read(&mut buf[filled..]) {
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(FrameError::Io(err)),
        };

        if read == 0 {
            return Err(FrameError::ConnectionClosed);
        }

        filled += read;
    }

    Ok(filled)
}

/// Fill all of `buf` from `stream`.
pub fn read_exact<R: Read + ?Sized>(stream: &mut R, buf: &mut [u8]) -> Result<()> {
    read_min(stream, buf, 0, buf.len()).map(|_| ())
}

/// Read and decode one response frame from `stream` (blocking).
///
/// The scratch buffer is allocated per call; the returned payload shares it.
/// Capacity beyond [`MAX_FRAME_SIZE`] is never allocated.
pub fn decode_response<R: Read + ?Sized>(
    stream: &mut R,
    config: &CodecConfig,
) -> Result<ModbusResponse> {
    let capacity = config.scratch_capacity.min(MAX_FRAME_SIZE);
    let mut scratch = BytesMut::zeroed(capacity);

    let header_limit = match config.payload_extent {
        PayloadExtent::Received => capacity,
        PayloadExtent::Declared => HEADER_SIZE.min(capacity),
    };
    let mut filled = read_min(stream, &mut scratch[..header_limit], 0, HEADER_SIZE)?;

    let declared = match parse_header(&scratch[..HEADER_SIZE], &config.marker) {
        Ok(declared) => declared,
        Err(err) => {
            tracing::warn!(header = ?&scratch[..HEADER_SIZE], "rejected modbus header");
            return Err(err);
        }
    };

    let frame_len = HEADER_SIZE + usize::from(declared);
    let body_limit = match config.payload_extent {
        PayloadExtent::Received => capacity,
        PayloadExtent::Declared => frame_len.min(capacity),
    };
    filled = read_min(stream, &mut scratch[..body_limit], filled, frame_len)?;

    if filled > frame_len {
        tracing::trace!(
            slack = filled - frame_len,
            "modbus payload includes bytes past declared length"
        );
    }

    scratch.truncate(filled);
    let frame = scratch.freeze();
    let function = FunctionCode(frame[FUNCTION_OFFSET]);

    tracing::debug!(%function, declared, received = filled, "decoded modbus response");

    Ok(ModbusResponse {
        function,
        data: frame.slice(PAYLOAD_OFFSET..),
    })
}

/// Reads complete Modbus responses from any `Read` stream.
///
/// Handles partial reads internally — callers always get complete frames.
pub struct ResponseReader<T> {
    inner: T,
    config: CodecConfig,
}

impl<T: Read> ResponseReader<T> {
    /// Create a new response reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, CodecConfig::default())
    }

    /// Create a new response reader with explicit configuration.
    pub fn with_config(inner: T, config: CodecConfig) -> Self {
        Self { inner, config }
    }

    /// Read the next complete response (blocking).
    pub fn read_response(&mut self) -> Result<ModbusResponse> {
        decode_response(&mut self.inner, &self.config)
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current response reader configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }
}
