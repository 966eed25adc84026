use crate::{Ds2482, Ds2482Error};
use embedded_hal::{
    delay::DelayNs,
    i2c::{I2c, SevenBitAddress},
};

/// Addresses of registers in the DS2482.
pub trait Addressing {
    /// Command byte that writes this register, if it is writable.
    const WRITE_CMD: u8;
    /// Pointer code selecting this register for a read.
    const READ_PTR: u8;
}

/// Trait for moving register values between the host and the DS2482.
///
/// Every read re-selects the register with a Set Read Pointer command before
/// fetching it, so reads are valid regardless of where a previous command left
/// the read pointer.
pub trait Interact: Addressing {
    /// Read the register value from the DS2482.
    fn read<I: I2c<SevenBitAddress>, D: DelayNs>(
        &mut self,
        dev: &mut Ds2482<I, D>,
    ) -> Result<(), Ds2482Error<I::Error>>;
    /// Write the register value to the DS2482.
    fn write<I: I2c<SevenBitAddress>, D: DelayNs>(
        &mut self,
        dev: &mut Ds2482<I, D>,
    ) -> Result<(), Ds2482Error<I::Error>>;
}
