use core::fmt::{Display, Formatter, Result as FmtResult};

/// One wire communication error type.
#[derive(Debug)]
pub enum OneWireError<E> {
    /// Encapsulates the error type from the underlying bus driver.
    Bus(E),
    /// Indicates that no device is present on the bus.
    NoDevicePresent,
    /// CRC of data read back from a device is invalid.
    InvalidCrc,
    /// Computed CRC of the ROM is invalid.
    InvalidRomCrc,
    /// The device at the address belongs to another family.
    FamilyMismatch {
        /// Family code the driver handles.
        expected: u8,
        /// Family code of the address.
        found: u8,
    },
}

impl<E> From<E> for OneWireError<E> {
    fn from(other: E) -> Self {
        Self::Bus(other)
    }
}

impl<E: Display> Display for OneWireError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Bus(e) => write!(f, "bus error: {e}"),
            Self::NoDevicePresent => f.write_str("no device present on the bus"),
            Self::InvalidCrc => f.write_str("invalid CRC in device response"),
            Self::InvalidRomCrc => f.write_str("invalid ROM CRC"),
            Self::FamilyMismatch { expected, found } => {
                write!(f, "family code mismatch: expected {expected:#04x}, found {found:#04x}")
            }
        }
    }
}

impl<E: core::error::Error + 'static> core::error::Error for OneWireError<E> {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Bus(e) => Some(e),
            _ => None,
        }
    }
}
