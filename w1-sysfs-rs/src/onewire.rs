use crate::{SysfsIo, W1Sysfs, W1SysfsError};
use onewire_bus::{Address, OneWireBus, OneWireBusCloser, Pullup};

impl<F: SysfsIo> OneWireBus for W1Sysfs<F> {
    type BusError = W1SysfsError;

    fn tx(&mut self, write: &[u8], read: &mut [u8], pullup: Pullup) -> Result<(), Self::BusError> {
        W1Sysfs::tx(self, write, read, pullup)
    }

    fn search(&mut self, alarm_only: bool) -> Result<Vec<Address>, Self::BusError> {
        W1Sysfs::search(self, alarm_only)
    }
}

impl<F: SysfsIo> OneWireBusCloser for W1Sysfs<F> {
    fn close(&mut self) -> Result<(), Self::BusError> {
        W1Sysfs::close(self)
    }
}
