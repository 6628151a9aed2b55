//! Command constants for 1-Wire communication.

/// Command to match a specific ROM address (non-overdrive mode).
///
/// Every transfer frame handed to [OneWireBus::tx](crate::OneWireBus::tx) starts with
/// this byte.
pub const ONEWIRE_MATCH_ROM_CMD: u8 = 0x55;

/// Command to skip ROM address (non-overdrive mode).
pub const ONEWIRE_SKIP_ROM_CMD: u8 = 0xcc;

/// Command to read the ROM of the single device on the bus.
pub const ONEWIRE_READ_ROM_CMD: u8 = 0x33;

/// Command to search for devices on the 1-Wire bus.
pub const ONEWIRE_SEARCH_CMD: u8 = 0xf0;

/// Command to search for devices in alarm state on the 1-Wire bus.
pub const ONEWIRE_CONDITIONAL_SEARCH_CMD: u8 = 0xec;

/// Length of a Match ROM frame header: the command byte and the 8 address bytes.
pub const ONEWIRE_FRAME_HEADER_LEN: usize = 9;
