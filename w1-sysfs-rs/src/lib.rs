#![deny(missing_docs)]

/*! # w1-sysfs
 *
 * 1-Wire bus masters through the Linux `w1` sysfs interface.
 *
 * The kernel enumerates each master as `/sys/devices/w1_bus_master<N>` and every
 * device it finds as a `<family>-<serial>` directory below it. A transfer sets
 * `w1_master_pullup`, writes the payload to the device's `rw` file and reads the
 * answer back from it; the kernel handles reset and Match ROM.
 *
 * [`W1Sysfs`] implements [`OneWireBus`](onewire_bus::OneWireBus) on top of that.
 */

pub use onewire_bus::{Address, OneWireBus, OneWireBusCloser, Pullup, Registrar};
mod bus;
pub mod codec;
mod error;
mod io;
mod onewire;

pub use bus::{Platform, W1_SYSFS_ROOT, W1Sysfs, W1SysfsBuilder, W1SysfsOpener};
pub use error::{DecodeError, W1SysfsError};
pub use io::{HostIo, SysfsIo};

/// Results of sysfs driver calls.
pub type W1SysfsResult<T> = Result<T, W1SysfsError>;
