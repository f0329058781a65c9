/// Errors that can occur during Modbus frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The frame header does not start with the expected marker bytes.
    #[error("not a modbus response (header marker mismatch)")]
    ProtocolMismatch,

    /// The scratch buffer filled up before the required byte count was read.
    #[error("modbus response buffer too small ({required} bytes required, capacity {capacity})")]
    BufferTooSmall { required: usize, capacity: usize },

    /// The declared length cannot hold the unit and function bytes.
    #[error("invalid declared length {0} (minimum 2)")]
    InvalidLength(u16),

    /// The request payload does not fit the 16-bit length field.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("modbus I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream reached EOF before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
