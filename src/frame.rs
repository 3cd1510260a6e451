//! Response frame decoding.
//!
//! The sensor answers with 3-byte words: a big-endian `u16` followed by the
//! CRC-8 of those two bytes. Each reading type has its own policy for words
//! that fail the check.

use log::warn;

// SGP30 datasheet, section 6.6
const CRC_INIT: u8 = 0xff;
const CRC_POLYNOMIAL: u8 = 0x31;

/// CRC-8 as computed by the sensor (init 0xff, polynomial 0x31, no reflection).
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc = CRC_INIT;

    for byte in data {
        crc ^= byte;

        for _ in 0..8 {
            if crc & 0x80 != 0 {
                crc = (crc << 1) ^ CRC_POLYNOMIAL;
            } else {
                crc <<= 1;
            }
        }
    }

    crc
}

/// One decoded word of a response.
#[derive(Clone, Copy, Hash, Debug, PartialEq, Eq)]
pub enum Field {
    Valid(u16),
    ChecksumInvalid,
}

impl Field {
    pub fn value(self) -> Option<u16> {
        match self {
            Self::Valid(value) => Some(value),
            Self::ChecksumInvalid => None,
        }
    }

    pub fn is_valid(self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// Splits a 3-byte word into its value and whether the CRC byte matched.
fn split_word(word: &[u8; 3]) -> (u16, bool) {
    let value = u16::from_be_bytes([word[0], word[1]]);
    let crc_ok = crc8(&word[..2]) == word[2];

    if !crc_ok {
        warn!(
            "checksum mismatch on word {:#06x}: got {:#04x}, expected {:#04x}",
            value,
            word[2],
            crc8(&word[..2])
        );
    }

    (value, crc_ok)
}

pub fn decode_word(word: &[u8; 3]) -> Field {
    match split_word(word) {
        (value, true) => Field::Valid(value),
        (_, false) => Field::ChecksumInvalid,
    }
}

/// The sensor's 48-bit serial id, as three words.
#[derive(Clone, Copy, Hash, Debug, PartialEq, Eq)]
pub struct SerialNumber([u16; 3]);

impl SerialNumber {
    pub fn words(&self) -> [u16; 3] {
        self.0
    }

    pub fn as_u64(&self) -> u64 {
        (self.0[0] as u64) << 32 | (self.0[1] as u64) << 16 | (self.0[2] as u64)
    }
}

/// Serial numbers are all-or-nothing: one bad word rejects the whole id.
pub fn decode_serial_number(frame: &[u8; 9]) -> Option<SerialNumber> {
    let [a0, a1, a2, b0, b1, b2, c0, c1, c2] = *frame;
    let mut words = [0u16; 3];

    for (slot, word) in words.iter_mut().zip([[a0, a1, a2], [b0, b1, b2], [c0, c1, c2]]) {
        *slot = decode_word(&word).value()?;
    }

    Some(SerialNumber(words))
}

/// An air quality reading. Each field is checked on its own, so one may be
/// invalid while the other is still usable.
#[derive(Clone, Copy, Hash, Debug, PartialEq, Eq)]
pub struct Measurement {
    /// CO2 equivalent, ppm.
    pub co2eq: Field,
    /// Total VOC, ppb.
    pub tvoc: Field,
}

impl Measurement {
    /// Values the sensor reports while its baseline is still settling.
    pub const WARMUP_CO2EQ_PPM: u16 = 400;
    pub const WARMUP_TVOC_PPB: u16 = 0;

    pub fn co2eq_ppm(&self) -> Option<u16> {
        self.co2eq.value()
    }

    pub fn tvoc_ppb(&self) -> Option<u16> {
        self.tvoc.value()
    }

    /// True when the reading is exactly the sensor's power-up default
    /// (400 ppm CO2eq, 0 ppb TVOC).
    ///
    /// This is a heuristic. A real reading of 400/0 is indistinguishable
    /// from a sensor that has not finished warming up.
    pub fn is_warmup(&self) -> bool {
        self.co2eq == Field::Valid(Self::WARMUP_CO2EQ_PPM)
            && self.tvoc == Field::Valid(Self::WARMUP_TVOC_PPB)
    }
}

pub fn decode_measurement(frame: &[u8; 6]) -> Measurement {
    let [c0, c1, c2, t0, t1, t2] = *frame;

    Measurement {
        co2eq: decode_word(&[c0, c1, c2]),
        tvoc: decode_word(&[t0, t1, t2]),
    }
}

/// Raw sensor ticks for the H2 and ethanol signals.
#[derive(Clone, Copy, Hash, Debug, PartialEq, Eq)]
pub struct RawSignals {
    pub h2: u16,
    pub ethanol: u16,
}

/// Decodes raw signals. With `verify` unset the CRC bytes are read but do
/// not gate the result; mismatches are only logged.
pub fn decode_raw_signals(frame: &[u8; 6], verify: bool) -> Option<RawSignals> {
    let [h0, h1, hc, e0, e1, ec] = *frame;
    let (h2, h2_ok) = split_word(&[h0, h1, hc]);
    let (ethanol, ethanol_ok) = split_word(&[e0, e1, ec]);

    if verify && !(h2_ok && ethanol_ok) {
        return None;
    }

    Some(RawSignals { h2, ethanol })
}
