//! Conversion between device addresses and the directory names the kernel creates
//! for them, e.g. `0xc104170328afff28` ⇄ `"28-04170328afff"`.
//!
//! The directory name carries no CRC; decoding regenerates it.

use crate::DecodeError;
use onewire_bus::Address;

const FAMILY_DIGITS: usize = 2;
const SERIAL_DIGITS: usize = 12;
const SEPARATOR: u8 = b'-';

/// Length of a device directory name.
pub const DIR_NAME_LEN: usize = FAMILY_DIGITS + 1 + SERIAL_DIGITS;

/// Renders `address` as the kernel names its directory. The CRC byte is dropped.
pub fn encode_dir_name(address: Address) -> String {
    format!("{:02x}-{:012x}", address.family(), address.serial())
}

/// Parses a device directory name into an address with a freshly computed CRC.
pub fn decode_dir_name(name: &str) -> Result<Address, DecodeError> {
    let bytes = name.as_bytes();
    if bytes.len() != DIR_NAME_LEN {
        return Err(DecodeError::Length(bytes.len()));
    }
    let (family, rest) = bytes.split_at(FAMILY_DIGITS);
    let (sep, serial) = rest.split_at(1);
    if sep[0] != SEPARATOR {
        return Err(DecodeError::Separator(char::from(sep[0])));
    }
    let family = parse_hex(family).ok_or(DecodeError::Family)? as u8;
    let serial = parse_hex(serial).ok_or(DecodeError::Serial)?;
    Ok(Address::from_parts(serial, family))
}

fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Big-endian value of at most 16 hex digits.
fn parse_hex(digits: &[u8]) -> Option<u64> {
    digits
        .iter()
        .try_fold(0u64, |acc, &c| Some((acc << 4) | hex_value(c)? as u64))
}
