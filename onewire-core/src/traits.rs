use crate::{ONEWIRE_MATCH_ROM_CMD, ONEWIRE_SKIP_ROM_CMD, OneWireResult};

/// Status snapshot of the 1-Wire line, produced by [`OneWire::reset`] and by the
/// bus master after bit-level operations.
///
/// Implementations are transient read-only views; a fresh value is produced on
/// every status read and nothing is persisted.
pub trait OneWireStatus {
    /// The bus master is still executing a 1-Wire command.
    fn busy(&self) -> bool;
    /// A presence pulse was detected during the last reset/presence-detect cycle.
    fn presence(&self) -> bool;
    /// The line was held low abnormally during the last reset/presence-detect cycle.
    fn shortcircuit(&self) -> bool;
    /// The line level sampled during the last single-bit (or first triplet) time slot.
    fn single_bit(&self) -> bool;
    /// The current logic level of the line, if the master reports it.
    fn logic_level(&self) -> Option<bool> {
        None
    }
    /// The branch direction taken by the last triplet command, if the master reports it.
    fn direction(&self) -> Option<bool> {
        None
    }
}

/// Trait for 1-Wire bus masters.
///
/// This trait defines the operations required to drive a 1-Wire bus: resetting the
/// bus, writing and reading bytes and bits, and the triplet operation used by the
/// [search algorithm](crate::OneWireSearch). All operations are synchronous and
/// blocking; the implementation is expected to serialize them internally.
pub trait OneWire {
    /// The status type returned by the reset operation.
    /// This type must implement the [OneWireStatus] trait.
    type Status: OneWireStatus;
    /// The error type of the underlying bus master hardware.
    type BusError;

    /// Generates a reset/presence-detect cycle on the bus.
    ///
    /// Must precede every new transaction sequence that addresses a device.
    ///
    /// # Returns
    /// The bus status after the cycle; [`OneWireStatus::presence`] reports whether
    /// any device answered.
    fn reset(&mut self) -> OneWireResult<Self::Status, Self::BusError>;

    /// Writes a byte to the bus, optionally arming the strong pullup for this
    /// transaction. The pullup stays armed until explicitly cleared or until the
    /// next transaction that does not request it.
    ///
    /// # Arguments
    /// * `byte` - The byte to transmit.
    /// * `power` - Arm the strong pullup so parasitically powered devices can draw
    ///   extra current after this byte.
    fn write_byte_powered(&mut self, byte: u8, power: bool) -> OneWireResult<(), Self::BusError>;

    /// Writes a byte to the bus without strong pullup.
    fn write_byte(&mut self, byte: u8) -> OneWireResult<(), Self::BusError> {
        self.write_byte_powered(byte, false)
    }

    /// Generates eight read time slots and returns the byte sampled from the bus.
    fn read_byte(&mut self) -> OneWireResult<u8, Self::BusError>;

    /// Generates a single write time slot, optionally arming the strong pullup
    /// (see [`OneWire::write_byte_powered`]).
    fn write_bit_powered(&mut self, bit: bool, power: bool) -> OneWireResult<(), Self::BusError>;

    /// Generates a single write time slot without strong pullup.
    fn write_bit(&mut self, bit: bool) -> OneWireResult<(), Self::BusError> {
        self.write_bit_powered(bit, false)
    }

    /// Generates a single read time slot and returns the bit sampled from the bus.
    ///
    /// On the wire this is a write-one time slot: the master releases the line and
    /// samples whether a device pulled it low.
    fn read_bit(&mut self) -> OneWireResult<bool, Self::BusError>;

    /// Generates two read time slots followed by one write time slot, as used by the
    /// [ROM search](crate::OneWireSearch). The two reads sample a ROM bit and its
    /// complement from every still-participating device; the write drives the branch
    /// decision. When the reads disagree the master follows the actual bit and
    /// `direction` is ignored; when both read 0 (a discrepancy) the master drives
    /// `direction`.
    ///
    /// # Returns
    /// `(id_bit, complement_bit, direction_taken)`.
    fn triplet(&mut self, direction: bool) -> OneWireResult<(bool, bool, bool), Self::BusError>;

    /// Broadcasts the skip-ROM command, addressing every device on the bus.
    ///
    /// Use only when exactly one device is expected to respond to what follows.
    /// The bus must have been [reset](OneWire::reset) first.
    fn skip(&mut self) -> OneWireResult<(), Self::BusError> {
        self.write_byte(ONEWIRE_SKIP_ROM_CMD)
    }

    /// Addresses one device by its 64-bit ROM (match-ROM command followed by the
    /// ROM, least-significant byte first). The bus must have been
    /// [reset](OneWire::reset) first.
    fn select(&mut self, rom: u64) -> OneWireResult<(), Self::BusError> {
        self.write_byte(ONEWIRE_MATCH_ROM_CMD)?;
        for b in rom.to_le_bytes() {
            self.write_byte(b)?;
        }
        Ok(())
    }
}
