use onewire_core::crc::{crc8, crc8_bitwise, crc8_table};
use onewire_core::OneWireCrc;

/// ROM code from Maxim application note 27, CRC = 0xA2.
const AN27_ROM: [u8; 8] = [0x02, 0x1c, 0xb8, 0x01, 0x00, 0x00, 0x00, 0xa2];

#[test]
fn known_vectors() {
    assert_eq!(crc8(&AN27_ROM[..7]), 0xa2);
    assert_eq!(crc8(&[0x28, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06]), 0x9e);
    assert_eq!(crc8(&[]), 0x00);
}

#[test]
fn rom_self_check() {
    let mut rom = [0x28, 0xff, 0x64, 0x1d, 0x8f, 0xcc, 0x02, 0x00];
    rom[7] = crc8(&rom[..7]);
    assert_eq!(rom[7], 0x9b);
    assert!(OneWireCrc::validate(&rom));

    // A single corrupted byte must break the checksum.
    for i in 0..8 {
        let mut bad = rom;
        bad[i] ^= 0x40;
        assert!(!OneWireCrc::validate(&bad), "corruption at byte {i} undetected");
    }
}

#[test]
fn table_agrees_with_bitwise_on_all_single_bytes() {
    for b in 0..=255u8 {
        assert_eq!(crc8_table(&[b]), crc8_bitwise(&[b]), "mismatch for 0x{b:02x}");
    }
}

#[test]
fn table_agrees_with_bitwise_on_sequences() {
    let sequences: &[&[u8]] = &[
        &[],
        &AN27_ROM,
        &[0x28, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06],
        &[0xff; 16],
        &[0x00; 16],
        &[0xde, 0xad, 0xbe, 0xef, 0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd],
    ];
    for seq in sequences {
        assert_eq!(crc8_table(seq), crc8_bitwise(seq));
    }
    // A long pseudo-random run, generated without pulling in an RNG.
    let run: Vec<u8> = (0u32..4096)
        .map(|i| (i.wrapping_mul(2654435761) >> 24) as u8)
        .collect();
    assert_eq!(crc8_table(&run), crc8_bitwise(&run));
}

#[test]
fn incremental_accumulator_matches_oneshot() {
    let data = [0x28, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06];
    let mut crc = OneWireCrc::default();
    for &b in &data {
        crc.update(b);
    }
    assert_eq!(crc.value(), crc8(&data));
}
