use crate::{Ds2482, Ds2482Error, Fault, registers::DeviceStatus};
use embedded_hal::{
    delay::DelayNs,
    i2c::{I2c, SevenBitAddress},
};
use onewire_core::{OneWire, OneWireResult, OneWireStatus};

pub(crate) const ONEWIRE_RESET_CMD: u8 = 0xb4;
pub(crate) const ONEWIRE_WRITE_BYTE_CMD: u8 = 0xa5;
pub(crate) const ONEWIRE_READ_BYTE_CMD: u8 = 0x96;
pub(crate) const ONEWIRE_SINGLE_BIT_CMD: u8 = 0x87;
pub(crate) const ONEWIRE_TRIPLET_CMD: u8 = 0x78;

impl<I2C: I2c<SevenBitAddress>, D: DelayNs> OneWire for Ds2482<I2C, D> {
    type Status = DeviceStatus;

    type BusError = Ds2482Error<I2C::Error>;

    /// Generates a 1-Wire reset/presence-detect cycle.
    ///
    /// The strong pullup is cleared first: the datasheet notes that an armed
    /// SPU bit corrupts presence-detect sampling and can violate device
    /// absolute maximum ratings. A detected short records
    /// [`Fault::ShortCircuit`]; presence is reported through the returned
    /// status.
    fn reset(&mut self) -> OneWireResult<Self::Status, Self::BusError> {
        self.wait_on_busy()?;
        // clear_strong_pullup waits for not-busy again before the config write.
        self.clear_strong_pullup()?;
        self.i2c
            .write(self.addr, &[ONEWIRE_RESET_CMD])
            .map_err(Ds2482Error::from)?;
        let status = self.wait_on_busy()?;
        if status.shortcircuit() {
            self.note_fault(Fault::ShortCircuit);
        }
        Ok(status)
    }

    fn write_byte_powered(&mut self, byte: u8, power: bool) -> OneWireResult<(), Self::BusError> {
        self.wait_on_busy()?;
        if power {
            self.set_strong_pullup()?;
        }
        self.i2c
            .write(self.addr, &[ONEWIRE_WRITE_BYTE_CMD, byte])
            .map_err(Ds2482Error::from)?;
        Ok(())
    }

    /// Generates eight read time slots; the bridge collects the byte in its
    /// data register, which is fetched once the line goes idle.
    fn read_byte(&mut self) -> OneWireResult<u8, Self::BusError> {
        self.wait_on_busy()?;
        self.i2c
            .write(self.addr, &[ONEWIRE_READ_BYTE_CMD])
            .map_err(Ds2482Error::from)?;
        self.wait_on_busy()?;
        Ok(self.read_data()?)
    }

    fn write_bit_powered(&mut self, bit: bool, power: bool) -> OneWireResult<(), Self::BusError> {
        self.wait_on_busy()?;
        if power {
            self.set_strong_pullup()?;
        }
        self.i2c
            .write(
                self.addr,
                &[ONEWIRE_SINGLE_BIT_CMD, if bit { 0x80 } else { 0x00 }],
            )
            .map_err(Ds2482Error::from)?;
        Ok(())
    }

    /// A read is a write-one time slot: the single-bit command simultaneously
    /// drives and samples the line, and SBR reports what was sampled.
    fn read_bit(&mut self) -> OneWireResult<bool, Self::BusError> {
        self.write_bit(true)?;
        Ok(self.wait_on_busy()?.single_bit_result())
    }

    fn triplet(&mut self, direction: bool) -> OneWireResult<(bool, bool, bool), Self::BusError> {
        self.wait_on_busy()?;
        self.i2c
            .write(
                self.addr,
                &[ONEWIRE_TRIPLET_CMD, if direction { 0x80 } else { 0x00 }],
            )
            .map_err(Ds2482Error::from)?;
        let status = self.wait_on_busy()?;
        Ok((
            status.single_bit_result(),
            status.triplet_second_bit(),
            status.branch_dir_taken(),
        ))
    }
}
