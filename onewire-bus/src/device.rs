use crate::{
    Address, OneWireBus, Pullup,
    consts::{ONEWIRE_FRAME_HEADER_LEN, ONEWIRE_MATCH_ROM_CMD},
};
use alloc::vec::Vec;

/// A device on a bus, addressed with Match ROM.
pub struct Device<'a, B> {
    bus: &'a mut B,
    address: Address,
}

impl<'a, B: OneWireBus> Device<'a, B> {
    /// Binds `address` on `bus`.
    pub fn new(bus: &'a mut B, address: Address) -> Self {
        Self { bus, address }
    }

    /// Address of the device.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Sends `write` to the device and reads the response into `read`.
    pub fn tx(&mut self, write: &[u8], read: &mut [u8]) -> Result<(), B::BusError> {
        self.tx_with(write, read, Pullup::Normal)
    }

    /// Like [tx](Device::tx), with strong pull-up held during the transfer.
    pub fn tx_power(&mut self, write: &[u8], read: &mut [u8]) -> Result<(), B::BusError> {
        self.tx_with(write, read, Pullup::Strong)
    }

    fn tx_with(&mut self, write: &[u8], read: &mut [u8], pullup: Pullup) -> Result<(), B::BusError> {
        let frame = frame(self.address, write);
        self.bus.tx(&frame, read, pullup)
    }
}

/// Builds a Match ROM frame for `address` carrying `payload`.
pub(crate) fn frame(address: Address, payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(ONEWIRE_FRAME_HEADER_LEN + payload.len());
    frame.push(ONEWIRE_MATCH_ROM_CMD);
    frame.extend_from_slice(&address.to_le_bytes());
    frame.extend_from_slice(payload);
    frame
}
