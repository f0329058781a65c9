use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::codec::{encode_request, CodecConfig, ModbusRequest};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 256;

/// Writes complete Modbus request frames to any `Write` stream.
pub struct RequestWriter<T> {
    inner: T,
    buf: BytesMut,
    config: CodecConfig,
}

impl<T: Write> RequestWriter<T> {
    /// Create a new request writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, CodecConfig::default())
    }

    /// Create a new request writer with explicit configuration.
    pub fn with_config(inner: T, config: CodecConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Encode and send a request (blocking).
    pub fn send(&mut self, request: &ModbusRequest) -> Result<()> {
        self.buf.clear();
        encode_request(request, &self.config.marker, &mut self.buf)?;

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        tracing::debug!(
            function = %request.function,
            size = self.buf.len(),
            "sent modbus request"
        );

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current request writer configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::codec::{MAX_PAYLOAD, MODBUS_HEADER_MARKER};
    use crate::function::FunctionCode;
    use crate::reader::decode_response;

    #[test]
    fn write_single_request() {
        let mut writer = RequestWriter::new(Cursor::new(Vec::<u8>::new()));
        writer
            .send(&ModbusRequest::new(FunctionCode(0x03), b"\x00\x00\x00\x01".to_vec()))
            .unwrap();

        let wire = writer.into_inner().into_inner();
        assert_eq!(
            wire,
            vec![0x13, 0x37, 0x00, 0x00, 0x00, 0x06, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]
        );
    }

    #[test]
    fn write_multiple_requests() {
        let mut writer = RequestWriter::new(Cursor::new(Vec::<u8>::new()));
        writer
            .send(&ModbusRequest::new(FunctionCode(0x01), b"a".to_vec()))
            .unwrap();
        writer
            .send(&ModbusRequest::new(FunctionCode(0x02), b"bc".to_vec()))
            .unwrap();

        let wire = writer.into_inner().into_inner();
        let mut stream = Cursor::new(wire);
        let config = CodecConfig {
            payload_extent: crate::codec::PayloadExtent::Declared,
            ..CodecConfig::default()
        };

        let first = decode_response(&mut stream, &config).unwrap();
        let second = decode_response(&mut stream, &config).unwrap();
        assert_eq!((first.function.as_u8(), first.data.as_ref()), (0x01, b"a".as_ref()));
        assert_eq!((second.function.as_u8(), second.data.as_ref()), (0x02, b"bc".as_ref()));
    }

    #[test]
    fn write_uses_configured_marker() {
        let config = CodecConfig {
            marker: [0xAB, 0xCD, 0x00, 0x00],
            ..CodecConfig::default()
        };
        let mut writer = RequestWriter::with_config(Cursor::new(Vec::<u8>::new()), config);
        writer
            .send(&ModbusRequest::new(FunctionCode(0x2B), Vec::new()))
            .unwrap();

        let wire = writer.into_inner().into_inner();
        assert_eq!(&wire[..4], &[0xAB, 0xCD, 0x00, 0x00]);
        assert_ne!(&wire[..4], &MODBUS_HEADER_MARKER);
    }

    #[test]
    fn write_payload_too_large_writes_nothing() {
        let mut writer = RequestWriter::new(Cursor::new(Vec::<u8>::new()));
        let err = writer
            .send(&ModbusRequest::new(FunctionCode(0x10), vec![0u8; MAX_PAYLOAD + 1]))
            .unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { .. }));
        assert!(writer.get_ref().get_ref().is_empty());
    }

    #[test]
    fn partial_writes_complete() {
        let mut writer = RequestWriter::new(ShortWriter {
            written: Vec::new(),
            max_chunk: 3,
        });
        writer
            .send(&ModbusRequest::new(FunctionCode(0x04), b"\x00\x10\x00\x02".to_vec()))
            .unwrap();
        assert_eq!(writer.get_ref().written.len(), 12);
    }

    #[test]
    fn zero_write_is_connection_closed() {
        let mut writer = RequestWriter::new(ShortWriter {
            written: Vec::new(),
            max_chunk: 0,
        });
        let err = writer
            .send(&ModbusRequest::new(FunctionCode(0x04), Vec::new()))
            .unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn write_error_is_not_retried() {
        let mut writer = RequestWriter::new(FailingWriter { calls: 0 });
        let err = writer
            .send(&ModbusRequest::new(FunctionCode(0x03), Vec::new()))
            .unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::BrokenPipe));
        assert_eq!(writer.get_ref().calls, 1);
    }

    struct ShortWriter {
        written: Vec<u8>,
        max_chunk: usize,
    }

    impl Write for ShortWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            let n = buf.len().min(self.max_chunk);
            self.written.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct FailingWriter {
        calls: usize,
    }

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            self.calls += 1;
            Err(std::io::Error::from(ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
