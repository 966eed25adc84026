#![no_std]
#![deny(missing_docs)]
//! # onewire-core
//! A no-std abstraction of the 1-Wire bus.
//!
//! This crate provides a trait-based interface for 1-Wire communication, so that the same
//! device code runs against any bus master, whether a bit-banged GPIO line or an I2C
//! bridge chip such as the DS2482-100.
//! The [OneWire] trait defines the bus primitives: resetting the bus, writing and reading
//! bytes and bits (optionally with strong pullup), and the triplet operation used during
//! device discovery.
//!
//! Device enumeration is implemented by [OneWireSearch], a stateful session over a mutable
//! borrow of the bus that yields one 64-bit ROM per call. The Dallas/Maxim CRC-8 that
//! protects every ROM lives in [crc].

pub mod crc;
mod error;
mod search;
mod traits;

pub use crc::{OneWireCrc, crc8};
pub use error::OneWireError;
pub use search::{OneWireSearch, OneWireSearchKind};
pub use traits::{OneWire, OneWireStatus};

/// Result type for 1-Wire operations.
pub type OneWireResult<T, E> = Result<T, OneWireError<E>>;

/// Command to address one specific ROM on the bus. Must be followed by the
/// 64-bit ROM sequence, transmitted least-significant byte first.
pub const ONEWIRE_MATCH_ROM_CMD: u8 = 0x55;

/// Command to address every device on the bus at once. Only safe when a single
/// device (or a single device class, for broadcast-tolerant commands) is expected
/// to respond.
pub const ONEWIRE_SKIP_ROM_CMD: u8 = 0xcc;

/// Command to start a ROM search pass on the 1-Wire bus.
pub const ONEWIRE_SEARCH_CMD: u8 = 0xf0;

/// Command to start a ROM search pass restricted to devices in alarm state.
pub const ONEWIRE_CONDITIONAL_SEARCH_CMD: u8 = 0xec;
