#![no_std]
use core::iter::zip;
use embedded_hal::delay::DelayNs;
use fixed::types::I12F4;
use onewire_bus::{Address, Device, OneWireBus, OneWireCrc, OneWireError, OneWireResult};

/// Up to `N` temperature sensors sharing one bus.
#[derive(Debug)]
pub struct Ds18b20Group<const N: usize> {
    devices: usize,
    roms: [Address; N],
    temps: [Temperature; N],
    resolution: ReadoutResolution,
    low: i8,
    high: i8,
}

impl<const N: usize> Default for Ds18b20Group<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Ds18b20Group<N> {
    /// Family codes handled: DS18B20 and DS28EA00 share the scratchpad layout.
    pub const FAMILIES: [u8; 2] = [FAMILY_DS18B20, FAMILY_DS28EA00];

    fn new() -> Self {
        Self {
            devices: 0,
            roms: [Address::default(); N],
            temps: [Temperature::ZERO; N],
            resolution: ReadoutResolution::default(),
            low: -40,
            high: 85,
        }
    }

    pub fn with_resolution(mut self, resolution: ReadoutResolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_t_low(mut self, temp: i8) -> Self {
        self.low = temp;
        self
    }

    pub fn with_t_high(mut self, temp: i8) -> Self {
        self.high = temp;
        self
    }

    /// Addresses found by the last [enumerate](Self::enumerate).
    pub fn roms(&self) -> &[Address] {
        &self.roms[..self.devices]
    }

    /// Finds the sensors on `bus` and writes the alarm thresholds and resolution
    /// to each of them.
    pub fn enumerate<B: OneWireBus>(&mut self, bus: &mut B) -> OneWireResult<usize, B::BusError> {
        self.devices = 0;
        for rom in bus.search(false)? {
            if !Self::FAMILIES.contains(&rom.family()) {
                continue;
            }
            if !rom.has_valid_crc() {
                return Err(OneWireError::InvalidRomCrc);
            }
            if self.devices == N {
                break;
            }
            self.roms[self.devices] = rom;
            self.devices += 1;
        }
        if self.devices == 0 {
            return Err(OneWireError::NoDevicePresent);
        }
        for &rom in self.roms() {
            // TH, TL, configuration
            Device::new(bus, rom).tx(
                &[DS18B20_WRITE_SCRATCH, self.high as _, self.low as _, self.resolution as _],
                &mut [],
            )?;
        }
        Ok(self.devices)
    }

    /// Starts a conversion on every sensor and waits for it to finish.
    ///
    /// Strong pull-up is held while converting so parasite-powered sensors work.
    pub fn trigger_temperature_conversion<B: OneWireBus, D: DelayNs>(
        &self,
        bus: &mut B,
        delay: &mut D,
    ) -> OneWireResult<(), B::BusError> {
        for &rom in self.roms() {
            Device::new(bus, rom).tx_power(&[DS18B20_START_CONV], &mut [])?;
        }
        delay.delay_us(self.resolution.delay_us()); // wait till conversion is finished
        Ok(())
    }

    /// Reads the scratchpad of every sensor.
    pub fn read_temperatures<B: OneWireBus>(
        &mut self,
        bus: &mut B,
    ) -> OneWireResult<&[Temperature], B::BusError> {
        for (rom, temp) in zip(
            self.roms[..self.devices].iter(),
            self.temps[..self.devices].iter_mut(),
        ) {
            let mut buf = [0; 9];
            Device::new(bus, *rom).tx(&[DS18B20_READ_SCRATCH], &mut buf)?;
            if !OneWireCrc::validate(&buf) {
                return Err(OneWireError::InvalidCrc);
            }
            *temp = I12F4::from_le_bytes([buf[0], buf[1]]);
        }
        Ok(&self.temps[..self.devices])
    }
}

pub const FAMILY_DS18B20: u8 = 0x28;
pub const FAMILY_DS28EA00: u8 = 0x42;

const DS18B20_READ_SCRATCH: u8 = 0xbe;
const DS18B20_WRITE_SCRATCH: u8 = 0x4e;
const DS18B20_START_CONV: u8 = 0x44;

pub type Temperature = I12F4;

#[repr(u8)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ReadoutResolution {
    Resolution9bit = 0x1f,
    Resolution10bit = 0x3f,
    Resolution11bit = 0x5f,
    #[default]
    Resolution12bit = 0x7f,
}

impl ReadoutResolution {
    pub(crate) fn delay_us(&self) -> u32 {
        use ReadoutResolution::*;
        match self {
            Resolution9bit => 93750,
            Resolution10bit => 187500,
            Resolution11bit => 375000,
            Resolution12bit => 750000,
        }
    }
}

impl TryFrom<u8> for ReadoutResolution {
    type Error = &'static str;

    /// Accepts either the configuration register value or the bit count.
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use ReadoutResolution::*;
        match value {
            0x1f | 9 => Ok(Resolution9bit),
            0x3f | 10 => Ok(Resolution10bit),
            0x5f | 11 => Ok(Resolution11bit),
            0x7f | 12 => Ok(Resolution12bit),
            _ => Err("Invalid readout resolution"),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use onewire_bus::Pullup;
    use std::{vec, vec::Vec};

    const SENSOR: Address = Address::new(0xc104170328afff28);

    struct MockBus {
        devices: Vec<Address>,
        frames: Vec<(Vec<u8>, Pullup)>,
        scratchpad: [u8; 9],
    }

    impl MockBus {
        fn new(devices: Vec<Address>) -> Self {
            // 25.0625 °C, TH 85, TL -40, 12 bit
            let mut scratchpad = [0x91, 0x01, 0x55, 0xd8, 0x7f, 0xff, 0x0c, 0x10, 0];
            scratchpad[8] = OneWireCrc::compute(&scratchpad[..8]);
            Self {
                devices,
                frames: Vec::new(),
                scratchpad,
            }
        }
    }

    impl OneWireBus for MockBus {
        type BusError = ();

        fn tx(&mut self, write: &[u8], read: &mut [u8], pullup: Pullup) -> Result<(), ()> {
            self.frames.push((write.to_vec(), pullup));
            if write[9..] == [DS18B20_READ_SCRATCH] {
                read.copy_from_slice(&self.scratchpad);
            }
            Ok(())
        }

        fn search(&mut self, _alarm_only: bool) -> Result<Vec<Address>, ()> {
            Ok(self.devices.clone())
        }
    }

    #[derive(Default)]
    struct Elapsed(u64);

    impl DelayNs for Elapsed {
        fn delay_ns(&mut self, ns: u32) {
            self.0 += ns as u64;
        }
    }

    #[test]
    fn enumerate_skips_other_families() {
        let mut bus = MockBus::new(vec![Address::from_parts(0x0000000001aa, 0x10), SENSOR]);
        let mut group = Ds18b20Group::<4>::default();
        assert_eq!(group.enumerate(&mut bus).unwrap(), 1);
        assert_eq!(group.roms(), [SENSOR]);
        assert_eq!(
            bus.frames,
            [(
                vec![0x55u8, 0x28, 0xff, 0xaf, 0x28, 0x03, 0x17, 0x04, 0xc1, 0x4e, 85, 0xd8, 0x7f],
                Pullup::Normal
            )]
        );
    }

    #[test]
    fn enumerate_without_sensors() {
        let mut bus = MockBus::new(vec![Address::from_parts(0x0000000001aa, 0x10)]);
        let mut group = Ds18b20Group::<4>::default();
        assert!(matches!(
            group.enumerate(&mut bus),
            Err(OneWireError::NoDevicePresent)
        ));
    }

    #[test]
    fn enumerate_stops_at_capacity() {
        let second = Address::from_parts(0x0000000001aa, FAMILY_DS28EA00);
        let mut bus = MockBus::new(vec![SENSOR, second]);
        let mut group = Ds18b20Group::<1>::default();
        assert_eq!(group.enumerate(&mut bus).unwrap(), 1);
        assert_eq!(group.roms(), [SENSOR]);

        let mut group = Ds18b20Group::<0>::default();
        assert!(matches!(
            group.enumerate(&mut bus),
            Err(OneWireError::NoDevicePresent)
        ));
        assert!(group.roms().is_empty());
    }

    #[test]
    fn enumerate_rejects_bad_rom_crc() {
        let mut bus = MockBus::new(vec![Address::new(0x0004170328afff28)]);
        let mut group = Ds18b20Group::<4>::default();
        assert!(matches!(
            group.enumerate(&mut bus),
            Err(OneWireError::InvalidRomCrc)
        ));
    }

    #[test]
    fn conversion_uses_strong_pullup() {
        let mut bus = MockBus::new(vec![SENSOR]);
        let mut group =
            Ds18b20Group::<2>::default().with_resolution(ReadoutResolution::Resolution9bit);
        group.enumerate(&mut bus).unwrap();
        let mut delay = Elapsed::default();
        group
            .trigger_temperature_conversion(&mut bus, &mut delay)
            .unwrap();
        assert_eq!(delay.0, 93_750_000);
        let (frame, pullup) = bus.frames.last().unwrap();
        assert_eq!(frame[9..], [DS18B20_START_CONV]);
        assert_eq!(*pullup, Pullup::Strong);
    }

    #[test]
    fn reads_temperature() {
        let mut bus = MockBus::new(vec![SENSOR]);
        let mut group = Ds18b20Group::<1>::default();
        group.enumerate(&mut bus).unwrap();
        let temps = group.read_temperatures(&mut bus).unwrap();
        assert_eq!(temps, [Temperature::from_bits(401)]);
    }

    #[test]
    fn corrupt_scratchpad_is_rejected() {
        let mut bus = MockBus::new(vec![SENSOR]);
        bus.scratchpad[0] ^= 0x01;
        let mut group = Ds18b20Group::<1>::default();
        group.enumerate(&mut bus).unwrap();
        assert!(matches!(
            group.read_temperatures(&mut bus),
            Err(OneWireError::InvalidCrc)
        ));
    }

    #[test]
    fn resolution_from_bits() {
        assert_eq!(ReadoutResolution::try_from(10), Ok(ReadoutResolution::Resolution10bit));
        assert_eq!(ReadoutResolution::try_from(0x7f), Ok(ReadoutResolution::Resolution12bit));
        assert!(ReadoutResolution::try_from(13).is_err());
    }
}
