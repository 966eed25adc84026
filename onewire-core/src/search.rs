use crate::{
    ONEWIRE_CONDITIONAL_SEARCH_CMD, ONEWIRE_SEARCH_CMD, OneWire, OneWireStatus,
    error::OneWireError,
};

/// A device-enumeration session on a 1-Wire bus.
///
/// Implements the [1-Wire search algorithm](https://www.analog.com/en/resources/app-notes/1wire-search-algorithm.html):
/// a depth-first walk of the binary tree of 64-bit ROMs actually populated by
/// responding devices. Each call to [`next`](OneWireSearch::next) resolves one
/// full ROM in exactly 64 triplet operations, using the bit/complement-bit pair
/// to detect branch points without addressing devices individually.
///
/// The session borrows the bus mutably for its lifetime, so independent searches
/// against different bus masters cannot interfere; all discovery state lives in
/// the session, not in the bus.
pub struct OneWireSearch<'a, T> {
    onewire: &'a mut T,
    cmd: u8,
    family: u8,
    last_device: bool,
    /// Bit position of the most recent branch point taken low, 0..=64.
    last_discrepancy: u8,
    /// The most recently resolved (or partially resolved) 64-bit path,
    /// LSB-first across the 8 bytes.
    rom: [u8; 8],
}

#[repr(u8)]
/// Type of search performed by an [`OneWireSearch`] session.
pub enum OneWireSearchKind {
    /// Enumerate every device on the bus.
    Normal = ONEWIRE_SEARCH_CMD,
    /// Enumerate only devices currently in alarm state.
    Alarmed = ONEWIRE_CONDITIONAL_SEARCH_CMD,
}

impl<'a, T> OneWireSearch<'a, T> {
    /// Creates a new search session over all devices on the bus.
    ///
    /// # Arguments
    /// * `onewire` - A mutable reference to the bus master.
    /// * `cmd` - The kind of search to perform.
    pub fn new(onewire: &'a mut T, cmd: OneWireSearchKind) -> Self {
        Self {
            onewire,
            cmd: cmd as _,
            family: 0,
            last_device: false,
            last_discrepancy: 0,
            rom: [0; 8],
        }
    }

    /// Creates a search session restricted to one device family.
    ///
    /// Seeds the ROM with the family code and points the discrepancy marker past
    /// the last bit, so the walk replays the family bits and descends into the
    /// family subtree first. Devices outside the family terminate the session.
    ///
    /// Note: this follows the general 1-Wire targeted-search convention; the
    /// restriction is best-effort and a bus whose family bits branch below the
    /// target family may terminate early.
    pub fn with_family(onewire: &'a mut T, cmd: OneWireSearchKind, family: u8) -> Self {
        Self {
            onewire,
            cmd: cmd as _,
            family,
            last_device: false,
            last_discrepancy: 64,
            rom: [family, 0, 0, 0, 0, 0, 0, 0],
        }
    }

    /// Resets the session to its initial state.
    ///
    /// The next call to [`next`](OneWireSearch::next) re-discovers the first
    /// device, in the same order as a fresh session.
    pub fn reset(&mut self) {
        self.last_device = false;
        self.last_discrepancy = if self.family != 0 { 64 } else { 0 };
        self.rom = [self.family, 0, 0, 0, 0, 0, 0, 0];
    }
}

impl<T: OneWire> OneWireSearch<'_, T> {
    /// Discovers the next device on the bus.
    ///
    /// Call repeatedly to enumerate every device; once the tree is exhausted the
    /// session returns `Ok(None)` immediately, without touching the bus, until
    /// [`reset`](OneWireSearch::reset) is called.
    ///
    /// # Returns
    /// The 64-bit ROM of the discovered device, or `None` when no device answered
    /// the presence-detect cycle or every branch has been visited.
    ///
    /// | Bits  | Content |
    /// |-------|-------------------------------------------|
    /// | 0-7   | Family code (e.g. 0x28 for the DS18B20)   |
    /// | 8-55  | Serial number                             |
    /// | 56-63 | CRC-8 of the preceding bytes              |
    ///
    /// The ROM is returned as a copy; callers validate it with
    /// [`OneWireCrc::validate`](crate::OneWireCrc::validate) or
    /// [`crc8`](crate::crc8).
    ///
    /// # Errors
    /// [`ShortCircuit`](OneWireError::ShortCircuit) if the presence-detect cycle
    /// saw the line shorted, [`SearchConflict`](OneWireError::SearchConflict) if a
    /// triplet saw no participating device mid-pass (a bus error, distinct from
    /// an exhausted search).
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<Option<u64>, OneWireError<T::BusError>> {
        if self.last_device {
            return Ok(None);
        }
        let status = self.onewire.reset()?;
        if status.shortcircuit() {
            return Err(OneWireError::ShortCircuit);
        }
        if !status.presence() {
            return Ok(None);
        }
        self.onewire.write_byte(self.cmd)?;
        let mut last_zero: u8 = 0;
        for bit in 0u8..64 {
            let idx = (bit / 8) as usize;
            let mask = 1u8 << (bit % 8);
            // Replay the already-resolved branch below the last discrepancy;
            // at the discrepancy itself take the high branch, beyond it the low.
            let direction = if bit < self.last_discrepancy {
                self.rom[idx] & mask != 0
            } else {
                bit == self.last_discrepancy
            };
            let (id_bit, complement_bit, taken) = self.onewire.triplet(direction)?;
            if id_bit && complement_bit {
                // Nothing responded in this time slot; the pass is unusable.
                return Err(OneWireError::SearchConflict);
            }
            if !id_bit && !complement_bit && !taken {
                // A branch point whose low side we are on; the last one seen
                // this pass becomes the resume point.
                last_zero = bit;
            }
            if taken {
                self.rom[idx] |= mask;
            } else {
                self.rom[idx] &= !mask;
            }
        }
        self.last_discrepancy = last_zero;
        if last_zero == 0 {
            // No unexplored branch point remains below: this was the last device.
            self.last_device = true;
        }
        if self.family != 0 && self.rom[0] != self.family {
            // Walked past the family subtree; the targeted search is exhausted.
            self.last_device = true;
            return Ok(None);
        }
        Ok(Some(u64::from_le_bytes(self.rom)))
    }
}
