#![no_std]
#![deny(missing_docs)]
//! # onewire-bus
//! A no-std, transaction-level view of a 1-Wire bus.
//!
//! Where a bit-banged or bridge-based master exposes reset/read/write time slots, a
//! host-side master (such as the Linux `w1` subsystem) only exposes whole transfers.
//! The [OneWireBus] trait models that: a transfer is a Match ROM frame
//! (`0x55` followed by the little-endian device [Address]) plus a payload, sent with a
//! chosen [Pullup] mode, and device discovery returns complete addresses.
//!
//! The crate also provides the 1-Wire CRC-8 ([OneWireCrc]), a [Device] helper that
//! builds Match ROM frames, and the [Registrar] seam through which bus drivers hand
//! their buses to whatever registry the application composes.

extern crate alloc;

mod address;
pub mod consts;
mod device;
mod error;
mod traits;
mod utils;

pub use address::Address;
pub use device::Device;
pub use error::OneWireError;
pub use traits::{OneWireBus, OneWireBusCloser, Pullup, Registrar};
pub use utils::OneWireCrc;

/// Result of 1-Wire operations carrying a [OneWireError].
pub type OneWireResult<T, E> = Result<T, OneWireError<E>>;
