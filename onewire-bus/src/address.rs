use crate::OneWireCrc;
use core::fmt::{Display, Formatter, LowerHex, Result as FmtResult};

/// 64-bit ROM address of a 1-Wire device.
///
/// | Bit   | Description |
/// |-------|-------------|
/// | 0-7   | Family code (e.g., 0x28 for DS18B20) |
/// | 8-55  | 48-bit serial number |
/// | 56-63 | CRC-8 |
///
/// The little-endian byte order of the value is the order in which the ROM goes over
/// the wire: family code first, CRC last.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Address(u64);

impl Address {
    /// The length of device address in bytes
    pub const BYTES: usize = 8;

    /// Mask of the 48-bit serial number once shifted down.
    const SERIAL_MASK: u64 = 0xffff_ffff_ffff;

    /// Creates an address from its raw 64-bit value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw 64-bit value.
    pub const fn raw(&self) -> u64 {
        self.0
    }

    /// Family code, the least significant byte.
    pub const fn family(&self) -> u8 {
        self.0 as u8
    }

    /// The 48-bit serial number.
    pub const fn serial(&self) -> u64 {
        (self.0 >> 8) & Self::SERIAL_MASK
    }

    /// The CRC byte, the most significant byte.
    pub const fn crc(&self) -> u8 {
        (self.0 >> 56) as u8
    }

    /// Builds an address from a serial number and a family code, computing the CRC
    /// over `serial ‖ family` in big-endian order.
    pub fn from_parts(serial: u64, family: u8) -> Self {
        let body = ((serial & Self::SERIAL_MASK) << 8) | family as u64;
        let crc = OneWireCrc::compute(&body.to_be_bytes()[1..]);
        Self(((crc as u64) << 56) | body)
    }

    /// Whether the CRC byte matches the 7 bytes below it.
    pub fn has_valid_crc(&self) -> bool {
        OneWireCrc::compute(&self.0.to_be_bytes()[1..]) == self.crc()
    }

    /// Wire order bytes.
    pub const fn to_le_bytes(&self) -> [u8; Self::BYTES] {
        self.0.to_le_bytes()
    }

    /// Address from wire order bytes.
    pub const fn from_le_bytes(bytes: [u8; Self::BYTES]) -> Self {
        Self(u64::from_le_bytes(bytes))
    }
}

impl From<u64> for Address {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<Address> for u64 {
    fn from(addr: Address) -> u64 {
        addr.0
    }
}

impl LowerHex for Address {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        LowerHex::fmt(&self.0, f)
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{:016x}", self.0)
    }
}
