//! Search-algorithm tests against a simulated multi-drop bus.
//!
//! The simulation models the open-drain line: a read time slot samples 0 if any
//! participating device transmits 0, and devices drop out of a search pass as
//! soon as the driven branch bit disagrees with their ROM.

use core::convert::Infallible;
use onewire_core::{
    ONEWIRE_SEARCH_CMD, OneWire, OneWireError, OneWireResult, OneWireSearch, OneWireSearchKind,
    OneWireStatus, crc8,
};

#[derive(Debug, Clone, Copy, Default)]
struct SimStatus {
    presence: bool,
    short: bool,
}

impl OneWireStatus for SimStatus {
    fn busy(&self) -> bool {
        false
    }
    fn presence(&self) -> bool {
        self.presence
    }
    fn shortcircuit(&self) -> bool {
        self.short
    }
    fn single_bit(&self) -> bool {
        false
    }
}

struct SimBus {
    roms: Vec<u64>,
    /// Devices still participating in the current search pass.
    active: Vec<u64>,
    bit: u8,
    in_search: bool,
    /// Answer the presence-detect cycle even with no devices attached, to
    /// provoke the no-participant triplet case.
    ghost_presence: bool,
    resets: u32,
}

impl SimBus {
    fn new(roms: &[u64]) -> Self {
        SimBus {
            roms: roms.to_vec(),
            active: Vec::new(),
            bit: 0,
            in_search: false,
            ghost_presence: false,
            resets: 0,
        }
    }
}

impl OneWire for SimBus {
    type Status = SimStatus;
    type BusError = Infallible;

    fn reset(&mut self) -> OneWireResult<SimStatus, Infallible> {
        self.resets += 1;
        self.in_search = false;
        Ok(SimStatus {
            presence: self.ghost_presence || !self.roms.is_empty(),
            short: false,
        })
    }

    fn write_byte_powered(&mut self, byte: u8, _power: bool) -> OneWireResult<(), Infallible> {
        if byte == ONEWIRE_SEARCH_CMD {
            self.in_search = true;
            self.active = self.roms.clone();
            self.bit = 0;
        }
        Ok(())
    }

    fn read_byte(&mut self) -> OneWireResult<u8, Infallible> {
        Ok(0xff)
    }

    fn write_bit_powered(&mut self, _bit: bool, _power: bool) -> OneWireResult<(), Infallible> {
        Ok(())
    }

    fn read_bit(&mut self) -> OneWireResult<bool, Infallible> {
        Ok(true)
    }

    fn triplet(&mut self, direction: bool) -> OneWireResult<(bool, bool, bool), Infallible> {
        assert!(self.in_search, "triplet issued outside a search pass");
        let pos = self.bit;
        // Wired-AND: the slot reads 1 only if every participant transmits 1.
        // With no participants at all, both slots read 1.
        let id_bit = self.active.iter().all(|rom| rom >> pos & 1 == 1);
        let complement_bit = self.active.iter().all(|rom| rom >> pos & 1 == 0);
        let taken = match (id_bit, complement_bit) {
            (false, false) => direction,
            (id, _) => id,
        };
        self.active.retain(|rom| (rom >> pos & 1 == 1) == taken);
        self.bit += 1;
        Ok((id_bit, complement_bit, taken))
    }
}

fn rom(family: u8, serial: [u8; 6]) -> u64 {
    let mut bytes = [0u8; 8];
    bytes[0] = family;
    bytes[1..7].copy_from_slice(&serial);
    bytes[7] = crc8(&bytes[..7]);
    u64::from_le_bytes(bytes)
}

fn collect(search: &mut OneWireSearch<'_, SimBus>) -> Vec<u64> {
    let mut found = Vec::new();
    while let Some(rom) = search.next().unwrap() {
        found.push(rom);
    }
    found
}

#[test]
fn empty_bus_finds_nothing() {
    let mut bus = SimBus::new(&[]);
    let mut search = OneWireSearch::new(&mut bus, OneWireSearchKind::Normal);
    assert_eq!(search.next().unwrap(), None);
}

#[test]
fn single_device_end_to_end() {
    let dev = rom(0x28, [0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
    assert_eq!(dev.to_le_bytes()[7], 0x9e);
    let mut bus = SimBus::new(&[dev]);
    {
        let mut search = OneWireSearch::new(&mut bus, OneWireSearchKind::Normal);
        assert_eq!(search.next().unwrap(), Some(dev));
        // Exhausted: no further bus traffic, no reset-retry storm.
        assert_eq!(search.next().unwrap(), None);
        assert_eq!(search.next().unwrap(), None);
    }
    assert_eq!(bus.resets, 1);
}

#[test]
fn enumerates_every_device_exactly_once() {
    let devs = vec![
        rom(0x28, [0x01, 0x02, 0x03, 0x04, 0x05, 0x06]),
        rom(0x28, [0xa1, 0xb2, 0xc3, 0xd4, 0xe5, 0xf6]),
        rom(0x28, [0x10, 0x20, 0x30, 0x40, 0x50, 0x60]),
        rom(0x28, [0xff, 0xff, 0xff, 0xff, 0xff, 0xff]),
        rom(0x28, [0x00, 0x00, 0x00, 0x00, 0x00, 0x01]),
    ];
    let mut bus = SimBus::new(&devs);
    let mut search = OneWireSearch::new(&mut bus, OneWireSearchKind::Normal);
    let mut found = collect(&mut search);
    assert_eq!(found.len(), devs.len());
    found.sort_unstable();
    let mut expected = devs.clone();
    expected.sort_unstable();
    assert_eq!(found, expected);
}

#[test]
fn resolves_addresses_differing_in_one_bit() {
    let a = rom(0x28, [0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
    let b = a ^ (1 << 40);
    let mut bus = SimBus::new(&[a, b]);
    let mut search = OneWireSearch::new(&mut bus, OneWireSearchKind::Normal);
    let mut found = collect(&mut search);
    found.sort_unstable();
    let mut expected = vec![a, b];
    expected.sort_unstable();
    assert_eq!(found, expected);
}

#[test]
fn traversal_order_is_deterministic() {
    let devs = vec![
        rom(0x28, [0x09, 0x08, 0x07, 0x06, 0x05, 0x04]),
        rom(0x28, [0x99, 0x88, 0x77, 0x66, 0x55, 0x44]),
        rom(0x28, [0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc]),
    ];
    let run = |devs: &[u64]| {
        let mut bus = SimBus::new(devs);
        let mut search = OneWireSearch::new(&mut bus, OneWireSearchKind::Normal);
        collect(&mut search)
    };
    assert_eq!(run(&devs), run(&devs));
}

#[test]
fn reset_restarts_enumeration_from_the_beginning() {
    let devs = vec![
        rom(0x28, [0x01, 0x02, 0x03, 0x04, 0x05, 0x06]),
        rom(0x28, [0x61, 0x52, 0x43, 0x34, 0x25, 0x16]),
        rom(0x28, [0xa1, 0xb2, 0xc3, 0xd4, 0xe5, 0xf6]),
    ];
    let mut bus = SimBus::new(&devs);
    let mut search = OneWireSearch::new(&mut bus, OneWireSearchKind::Normal);
    let fresh = collect(&mut search);
    assert_eq!(fresh.len(), devs.len());

    // Abandon a partial enumeration, then reset and go again.
    search.reset();
    let _ = search.next().unwrap();
    search.reset();
    assert_eq!(collect(&mut search), fresh);
}

#[test]
fn vanished_devices_surface_as_conflict() {
    let mut bus = SimBus::new(&[]);
    bus.ghost_presence = true;
    let mut search = OneWireSearch::new(&mut bus, OneWireSearchKind::Normal);
    assert!(matches!(search.next(), Err(OneWireError::SearchConflict)));
}

#[test]
fn family_targeted_search_stays_in_family() {
    let thermometers = [
        rom(0x28, [0x01, 0x02, 0x03, 0x04, 0x05, 0x06]),
        rom(0x28, [0x61, 0x52, 0x43, 0x34, 0x25, 0x16]),
    ];
    let other = rom(0x10, [0x0b, 0x51, 0x0c, 0x00, 0x00, 0x00]);
    let mut devs = thermometers.to_vec();
    devs.push(other);
    let mut bus = SimBus::new(&devs);
    let mut search = OneWireSearch::with_family(&mut bus, OneWireSearchKind::Normal, 0x28);
    let mut found = collect(&mut search);
    found.sort_unstable();
    let mut expected = thermometers.to_vec();
    expected.sort_unstable();
    assert_eq!(found, expected);
}
