//! Dallas/Maxim CRC-8 (polynomial x^8 + x^5 + x^4 + 1, bit-reversed 0x8C),
//! as used in 1-Wire ROMs and scratchpad registers.
//!
//! Two bit-identical implementations are provided: a 256-entry lookup table
//! (one flash page, one table access per input byte) and a bit-serial
//! computation (8 shifts per byte, no table). The `crc-table` feature selects
//! which one backs [`crc8`] and [`OneWireCrc`]; the choice trades space for
//! speed and is not observable in the output.

/// Lookup table for the Dallas CRC-8, indexed by `crc ^ byte`.
#[cfg(feature = "crc-table")]
const CRC8_TABLE: [u8; 256] = [
    0, 94, 188, 226, 97, 63, 221, 131, 194, 156, 126, 32, 163, 253, 31, 65, 157, 195, 33, 127,
    252, 162, 64, 30, 95, 1, 227, 189, 62, 96, 130, 220, 35, 125, 159, 193, 66, 28, 254, 160, 225,
    191, 93, 3, 128, 222, 60, 98, 190, 224, 2, 92, 223, 129, 99, 61, 124, 34, 192, 158, 29, 67,
    161, 255, 70, 24, 250, 164, 39, 121, 155, 197, 132, 218, 56, 102, 229, 187, 89, 7, 219, 133,
    103, 57, 186, 228, 6, 88, 25, 71, 165, 251, 120, 38, 196, 154, 101, 59, 217, 135, 4, 90, 184,
    230, 167, 249, 27, 69, 198, 152, 122, 36, 248, 166, 68, 26, 153, 199, 37, 123, 58, 100, 134,
    216, 91, 5, 231, 185, 140, 210, 48, 110, 237, 179, 81, 15, 78, 16, 242, 172, 47, 113, 147,
    205, 17, 79, 173, 243, 112, 46, 204, 146, 211, 141, 111, 49, 178, 236, 14, 80, 175, 241, 19,
    77, 206, 144, 114, 44, 109, 51, 209, 143, 12, 82, 176, 238, 50, 108, 142, 208, 83, 13, 239,
    177, 240, 174, 76, 18, 145, 207, 45, 115, 202, 148, 118, 40, 171, 245, 23, 73, 8, 86, 180,
    234, 105, 55, 213, 139, 87, 9, 235, 181, 54, 104, 138, 212, 149, 203, 41, 119, 244, 170, 72,
    22, 233, 183, 85, 11, 136, 214, 52, 106, 43, 117, 151, 201, 74, 20, 246, 168, 116, 42, 200,
    150, 21, 75, 169, 247, 182, 232, 10, 84, 215, 137, 107, 53,
];

/// Computes the CRC-8 of `data` with the precomputed lookup table.
///
/// Bit-identical to [`crc8_bitwise`]; larger code, fewer cycles per byte.
#[cfg(feature = "crc-table")]
pub fn crc8_table(data: &[u8]) -> u8 {
    data.iter()
        .fold(0, |crc, &byte| CRC8_TABLE[(crc ^ byte) as usize])
}

/// Computes the CRC-8 of `data` bit-serially.
///
/// Bit-identical to [`crc8_table`](crate::crc::crc8_table); smaller code,
/// eight shift/XOR steps per byte.
pub fn crc8_bitwise(data: &[u8]) -> u8 {
    data.iter().fold(0, |crc, &byte| {
        let mut crc = crc ^ byte;
        for _ in 0..8 {
            crc = if crc & 0x1 != 0 {
                (crc >> 1) ^ 0x8c
            } else {
                crc >> 1
            };
        }
        crc
    })
}

/// Computes the Dallas/Maxim CRC-8 of `data`.
///
/// A valid 1-Wire ROM satisfies `crc8(&rom[..7]) == rom[7]`.
#[cfg(feature = "crc-table")]
pub fn crc8(data: &[u8]) -> u8 {
    crc8_table(data)
}

/// Computes the Dallas/Maxim CRC-8 of `data`.
///
/// A valid 1-Wire ROM satisfies `crc8(&rom[..7]) == rom[7]`.
#[cfg(not(feature = "crc-table"))]
pub fn crc8(data: &[u8]) -> u8 {
    crc8_bitwise(data)
}

/// Incremental Dallas/Maxim CRC-8 accumulator, for checksumming a byte stream
/// as it is read off the bus.
#[derive(Debug, Default)]
pub struct OneWireCrc(u8);

impl OneWireCrc {
    /// Get the current CRC value.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Update the CRC with the incoming byte.
    pub fn update(&mut self, byte: u8) {
        // One CRC step over a single byte, seeded with the running value.
        self.0 = crc8(&[self.0 ^ byte]);
    }

    /// Validates a byte sequence whose last byte is the CRC-8 of the preceding
    /// bytes, such as a complete 8-byte ROM.
    pub fn validate(sequence: &[u8]) -> bool {
        crc8(sequence) == 0
    }
}
