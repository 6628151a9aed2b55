use crate::Address;
use alloc::vec::Vec;

/// Pull-up applied to the bus while a transfer is in progress.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Pullup {
    /// Regular (resistive) pull-up.
    #[default]
    Normal,
    /// Strong pull-up, needed to power parasitic devices during conversions
    /// or EEPROM writes.
    Strong,
}

/// Trait for transaction-level 1-Wire communication.
///
/// Implementors perform whole transfers: reset, device selection, writing the payload
/// and reading the response are one operation.
pub trait OneWireBus {
    /// The error type returned by the operations of this trait.
    type BusError;

    /// Performs one transfer.
    ///
    /// # Arguments
    /// * `write` - A Match ROM frame: [`ONEWIRE_MATCH_ROM_CMD`](crate::consts::ONEWIRE_MATCH_ROM_CMD),
    ///   the 8 address bytes in wire (little-endian) order, then the payload.
    /// * `read` - Buffer receiving the device response.
    /// * `pullup` - Pull-up mode to apply for this transfer.
    ///
    /// # Errors
    /// Returns an error if the frame is malformed or the transfer fails.
    fn tx(&mut self, write: &[u8], read: &mut [u8], pullup: Pullup) -> Result<(), Self::BusError>;

    /// Lists the devices currently present on the bus.
    ///
    /// # Arguments
    /// * `alarm_only` - Restrict the search to devices in alarm state, if the
    ///   implementation supports it.
    ///
    /// # Errors
    /// Returns an error if no device is present or the search fails.
    fn search(&mut self, alarm_only: bool) -> Result<Vec<Address>, Self::BusError>;
}

/// A [OneWireBus] that can be closed.
pub trait OneWireBusCloser: OneWireBus {
    /// Releases the bus.
    fn close(&mut self) -> Result<(), Self::BusError>;
}

/// Registry seam for bus drivers.
///
/// A driver discovering buses hands each one to a `Registrar` together with an
/// `opener` that produces a bus handle on demand. What the registry does with them is
/// up to the application.
pub trait Registrar<O> {
    /// Error returned when a registration is refused.
    type Error;

    /// Registers a bus.
    ///
    /// # Arguments
    /// * `name` - Unique bus name.
    /// * `aliases` - Alternative names, may be empty.
    /// * `number` - Bus number.
    /// * `opener` - Opens the bus.
    fn register(
        &mut self,
        name: &str,
        aliases: &[&str],
        number: u32,
        opener: O,
    ) -> Result<(), Self::Error>;
}
