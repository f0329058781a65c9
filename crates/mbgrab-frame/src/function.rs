//! Function codes and the exception-signaling convention.
//!
//! A response whose function byte has bit 0x80 set is an exception response.
//! Its first payload byte is the exception code.

use std::fmt;

/// Bit that marks a function code as an exception response.
pub const EXCEPTION_BIT: u8 = 0x80;

/// Mask applied when stripping the exception bit.
///
/// Note that `0x79` also clears bits 0x04 and 0x02, so stripping is not the
/// inverse of [`FunctionCode::exception_function_code`] for every code.
pub const EXCEPTION_STRIP_MASK: u8 = 0x79;

/// One-byte Modbus function code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionCode(pub u8);

impl FunctionCode {
    pub const READ_COILS: Self = Self(0x01);
    pub const READ_DISCRETE_INPUTS: Self = Self(0x02);
    pub const READ_HOLDING_REGISTERS: Self = Self(0x03);
    pub const READ_INPUT_REGISTERS: Self = Self(0x04);
    pub const WRITE_SINGLE_COIL: Self = Self(0x05);
    pub const WRITE_SINGLE_REGISTER: Self = Self(0x06);
    pub const WRITE_MULTIPLE_COILS: Self = Self(0x0F);
    pub const WRITE_MULTIPLE_REGISTERS: Self = Self(0x10);
    pub const MASK_WRITE_REGISTER: Self = Self(0x16);
    pub const READ_WRITE_MULTIPLE_REGISTERS: Self = Self(0x17);
    /// Encapsulated interface transport, used for device identification.
    pub const ENCAPSULATED_INTERFACE: Self = Self(0x2B);

    /// Raw byte value.
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Returns true if the exception bit is set.
    pub const fn is_exception(self) -> bool {
        (self.0 & EXCEPTION_BIT) == EXCEPTION_BIT
    }

    /// The code as it appears in an exception response (exception bit set).
    pub const fn exception_function_code(self) -> ExceptionFunctionCode {
        ExceptionFunctionCode(self.0 | EXCEPTION_BIT)
    }
}

impl From<u8> for FunctionCode {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl fmt::Display for FunctionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x}", self.0)
    }
}

/// Function code carried by an exception response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ExceptionFunctionCode(pub u8);

impl ExceptionFunctionCode {
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Recover a plain function code using [`EXCEPTION_STRIP_MASK`].
    pub const fn function_code(self) -> FunctionCode {
        FunctionCode(self.0 & EXCEPTION_STRIP_MASK)
    }
}

impl fmt::Display for ExceptionFunctionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x}", self.0)
    }
}

/// Reason byte of an exception response. Carried, not interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ExceptionCode(pub u8);

impl ExceptionCode {
    pub const fn as_u8(self) -> u8 {
        self.0
    }
}

impl fmt::Display for ExceptionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x}", self.0)
    }
}

/// Body of an exception response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModbusException {
    pub function: ExceptionFunctionCode,
    pub exception_type: ExceptionCode,
}
