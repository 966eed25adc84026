#![no_std]
#![deny(missing_docs)]

/*! # DS2482-100
 *
 * A no-std driver for the Analog Devices DS2482-100 I2C to 1-Wire bridge.
 *
 * The bridge translates register-level I2C commands into 1-Wire electrical
 * signaling; this crate drives those registers and exposes the result through
 * the [`OneWire`] trait from `onewire-core`, so device code and the ROM search
 * run unchanged against it.
 *
 * Hard I/O failures (a transaction not acknowledged, an I2C bus error) surface
 * as [`Ds2482Error`]. Advisory protocol conditions the datasheet expects a
 * long-running host to tolerate, such as a stuck 1-Wire line or a shorted bus,
 * are recorded as a sticky [`Fault`] on
 * the handle instead of failing the operation; check
 * [`last_fault`](Ds2482::last_fault) after any operation whose correctness
 * matters.
 */

pub use onewire_core::{OneWire, OneWireError, OneWireResult};

mod error;
mod onewire;
mod registers;
mod traits;

pub use error::Ds2482Error;
pub use registers::{DeviceConfiguration, DeviceStatus, Ds2482Builder};
pub use traits::{Addressing, Interact};

/// Results of DS2482-specific function calls.
pub type Ds2482Result<T, E> = Result<T, Ds2482Error<E>>;

/// I2C base address; the AD1/AD0 pins fold a 2-bit offset into the low bits,
/// so up to four bridges can share one bus.
pub(crate) const BASE_ADDRESS: u8 = 0x18;

/// Advisory fault conditions recorded on the [`Ds2482`] handle.
///
/// Faults are sticky: a recorded fault stays until the next operation that
/// detects a (possibly different) fault overwrites it, or until
/// [`clear_fault`](Ds2482::clear_fault). They are never raised as errors;
/// transient bus noise must not take down a monitoring loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// The busy-wait poll budget was exhausted with the 1-Wire line still busy.
    Timeout,
    /// The 1-Wire line was held low abnormally during a reset/presence-detect cycle.
    ShortCircuit,
    /// A configuration write read back a value other than the one requested.
    ConfigMismatch,
}

/// A DS2482-100 I2C to 1-Wire bridge device.
///
/// Takes ownership of an I2C bus (implementing the [`I2c`](embedded_hal::i2c::I2c)
/// trait) and a timer object implementing the [`DelayNs`](embedded_hal::delay::DelayNs)
/// trait. All operations are synchronous and blocking; the handle is the single
/// point of serialization for the bridge it addresses.
pub struct Ds2482<I, D> {
    pub(crate) i2c: I,
    pub(crate) addr: u8,
    pub(crate) delay: D,
    pub(crate) retries: u16,
    pub(crate) fault: Option<Fault>,
}

impl<I, D> Ds2482<I, D> {
    /// Creates a new `Ds2482` with the given I2C interface, at the base address
    /// (AD1/AD0 strapped low). Performs no bus traffic; use
    /// [`Ds2482Builder`] to reset and configure the bridge on construction.
    pub fn new(i2c: I, delay: D) -> Self {
        Ds2482 {
            i2c,
            addr: BASE_ADDRESS,
            delay,
            retries: 1000,
            fault: None,
        }
    }

    /// Set the busy-wait poll budget.
    ///
    /// Bounds how long the host polls the status register before an operation
    /// on the 1-Wire bus is considered timed out. The budget is a poll count,
    /// not a wall-clock deadline.
    pub fn with_retries(mut self, retries: u16) -> Self {
        self.retries = retries;
        self
    }

    /// The I2C address this handle talks to.
    pub fn address(&self) -> u8 {
        self.addr
    }

    /// The most recently recorded advisory fault, if any.
    pub fn last_fault(&self) -> Option<Fault> {
        self.fault
    }

    /// Clears the recorded fault.
    pub fn clear_fault(&mut self) {
        self.fault = None;
    }

    pub(crate) fn note_fault(&mut self, fault: Fault) {
        self.fault = Some(fault);
    }
}
