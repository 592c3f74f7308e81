//! Embedded link control: a full LC split into four 32-bit fragments and
//! carried one fragment per voice burst's embedded-signalling field,
//! protected by Hamming(16,11,4) rows and a column parity check plus a
//! 5-bit CRC over the reassembled 72-bit payload.

use crate::bits::{bits_to_byte_be, byte_to_bits_be};
use crate::crc::{check_five_bit, encode_five_bit};
use crate::fec::hamming;

use super::lc::{Flco, Lc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LcState {
    None,
    First,
    Second,
    Third,
}

/// Bit-weight convention for the 5 CRC bits scattered at `{42,58,74,90,106}`
/// in the deinterleaved 128-bit matrix. Firmware implementations have been
/// observed to disagree on which end carries the MSB; both are supported
/// rather than picked once and hard-coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddedLcCrcBitOrder {
    /// `data[42]` is the CRC's MSB, `data[106]` its LSB. Matches
    /// `crc::check_five_bit`'s own bit convention elsewhere in this codec
    /// family.
    MsbFirst,
    /// `data[42]` is the CRC's LSB, `data[106]` its MSB.
    LsbFirst,
}

impl Default for EmbeddedLcCrcBitOrder {
    fn default() -> Self {
        EmbeddedLcCrcBitOrder::MsbFirst
    }
}

/// Reassembles a 4-fragment embedded LC from successive voice bursts, or
/// fragments an `Lc` for transmission one burst at a time.
pub struct EmbeddedData {
    valid: bool,
    flco: Flco,
    state: LcState,
    raw: [bool; 128],
    data: [bool; 72],
    crc_bit_order: EmbeddedLcCrcBitOrder,
}

impl EmbeddedData {
    pub fn new(crc_bit_order: EmbeddedLcCrcBitOrder) -> Self {
        EmbeddedData {
            valid: false,
            flco: Flco::GroupVoice,
            state: LcState::None,
            raw: [false; 128],
            data: [false; 72],
            crc_bit_order,
        }
    }

    /// Feeds one 5-byte embedded-LC fragment (bytes 14..19 of a voice
    /// burst) tagged with its `lcss` (link-control start/stop) code.
    /// Returns `true` once all four fragments have arrived and passed
    /// their integrity checks.
    pub fn add_data(&mut self, data: &[u8; 5]) -> bool {
        self.add_data_with_lcss(data, self.next_expected_lcss())
    }

    /// Feeds a fragment with an explicit `lcss`, matching the on-air field
    /// rather than internal sequencing assumptions.
    pub fn add_data_with_lcss(&mut self, data: &[u8; 5], lcss: u8) -> bool {
        let mut raw_data = [false; 40];
        for (i, &byte) in data.iter().enumerate() {
            let mut bits = [false; 8];
            byte_to_bits_be(byte, &mut bits);
            raw_data[i * 8..i * 8 + 8].copy_from_slice(&bits);
        }

        match (lcss, self.state) {
            (1, _) => {
                self.raw[0..32].copy_from_slice(&raw_data[4..36]);
                self.state = LcState::First;
                self.valid = false;
                false
            }
            (3, LcState::First) => {
                self.raw[32..64].copy_from_slice(&raw_data[4..36]);
                self.state = LcState::Second;
                false
            }
            (3, LcState::Second) => {
                self.raw[64..96].copy_from_slice(&raw_data[4..36]);
                self.state = LcState::Third;
                false
            }
            (2, LcState::Third) => {
                self.raw[96..128].copy_from_slice(&raw_data[4..36]);
                self.state = LcState::None;
                self.decode_embedded_data();
                if self.valid {
                    self.encode_embedded_data();
                }
                self.valid
            }
            _ => false,
        }
    }

    fn next_expected_lcss(&self) -> u8 {
        match self.state {
            LcState::None => 1,
            LcState::First => 3,
            LcState::Second => 3,
            LcState::Third => 2,
        }
    }

    /// Returns fragment `n` (1..=4) of the currently loaded LC, packed into
    /// the burst's 5-byte embedded field layout, plus the `lcss` code for
    /// that fragment (0 if `n` is out of range).
    pub fn get_data(&self, dest: &mut [u8; 5], n: u8) -> u8 {
        if (1..=4).contains(&n) {
            let n = (n - 1) as usize;
            let mut bits = [false; 40];
            bits[4..36].copy_from_slice(&self.raw[n * 32..n * 32 + 32]);

            let mut bytes = [0u8; 5];
            for i in 0..5 {
                bytes[i] = bits_to_byte_be(&bits[i * 8..i * 8 + 8].try_into().unwrap());
            }
            dest[0] = (dest[0] & 0xF0) | (bytes[0] & 0x0F);
            dest[1] = bytes[1];
            dest[2] = bytes[2];
            dest[3] = bytes[3];
            dest[4] = (dest[4] & 0x0F) | (bytes[4] & 0xF0);

            match n {
                0 => 1,
                3 => 2,
                _ => 3,
            }
        } else {
            dest[0] &= 0xF0;
            dest[1] = 0;
            dest[2] = 0;
            dest[3] = 0;
            dest[4] &= 0x0F;
            0
        }
    }

    /// Loads an `Lc` to be fragmented for transmission.
    pub fn set_lc(&mut self, lc: &Lc) {
        let bytes = lc.to_bytes();
        for (i, &byte) in bytes.iter().enumerate() {
            let mut bits = [false; 8];
            byte_to_bits_be(byte, &mut bits);
            self.data[i * 8..i * 8 + 8].copy_from_slice(&bits);
        }
        self.flco = lc.flco;
        self.valid = true;
        self.encode_embedded_data();
    }

    /// Returns the currently loaded LC, if one is both valid and one of the
    /// two voice FLCOs embedded LC carries.
    pub fn get_lc(&self) -> Option<Lc> {
        if !self.valid {
            return None;
        }
        match self.flco {
            Flco::GroupVoice | Flco::PrivateVoice => {
                let mut bytes = [0u8; 9];
                for i in 0..9 {
                    bytes[i] = bits_to_byte_be(&self.data[i * 8..i * 8 + 8].try_into().unwrap());
                }
                Some(Lc::from_bytes(&bytes))
            }
            Flco::Other(_) => None,
        }
    }

    /// Returns the raw 9-byte payload of the currently loaded LC.
    pub fn get_raw_data(&self) -> Option<[u8; 9]> {
        if !self.valid {
            return None;
        }
        let mut bytes = [0u8; 9];
        for i in 0..9 {
            bytes[i] = bits_to_byte_be(&self.data[i * 8..i * 8 + 8].try_into().unwrap());
        }
        Some(bytes)
    }

    pub fn reset(&mut self) {
        self.state = LcState::None;
        self.valid = false;
    }

    /// Unpacks the four fragments stored in `raw` (column-interleaved),
    /// Hamming-corrects each of the seven data rows, checks column parity,
    /// then checks the embedded 5-bit CRC before accepting the payload.
    fn decode_embedded_data(&mut self) {
        let mut data = [false; 128];
        let mut b = 0usize;
        for &bit in self.raw.iter() {
            data[b] = bit;
            b += 16;
            if b > 127 {
                b -= 127;
            }
        }

        for row_start in (0..112).step_by(16) {
            let mut row: [bool; 16] = data[row_start..row_start + 16].try_into().unwrap();
            if !hamming::decode_16114(&mut row) {
                return;
            }
            data[row_start..row_start + 16].copy_from_slice(&row);
        }

        for col in 0..16 {
            let parity = (0..8).fold(false, |acc, row| acc ^ data[row * 16 + col]);
            if parity {
                return;
            }
        }

        let mut payload = [false; 72];
        let mut b = 0usize;
        for &(start, len) in &EMBEDDED_FIELD_RANGES {
            payload[b..b + len].copy_from_slice(&data[start..start + len]);
            b += len;
        }

        let crc = match self.crc_bit_order {
            EmbeddedLcCrcBitOrder::MsbFirst => {
                (u8::from(data[42]) << 4)
                    | (u8::from(data[58]) << 3)
                    | (u8::from(data[74]) << 2)
                    | (u8::from(data[90]) << 1)
                    | u8::from(data[106])
            }
            EmbeddedLcCrcBitOrder::LsbFirst => {
                (u8::from(data[106]) << 4)
                    | (u8::from(data[90]) << 3)
                    | (u8::from(data[74]) << 2)
                    | (u8::from(data[58]) << 1)
                    | u8::from(data[42])
            }
        };

        if !check_five_bit(&payload, crc) {
            return;
        }

        self.data = payload;
        self.valid = true;
        let flco_byte = bits_to_byte_be(&self.data[0..8].try_into().unwrap());
        self.flco = Flco::from_bits_pub(flco_byte);
    }

    /// Packs the 72-bit payload plus its 5-bit CRC into the 8x16 matrix,
    /// Hamming-encodes the seven data rows, derives the 8th (parity) row,
    /// and re-interleaves into `raw`.
    fn encode_embedded_data(&mut self) {
        let crc = encode_five_bit(&self.data);

        let mut data = [false; 128];
        match self.crc_bit_order {
            EmbeddedLcCrcBitOrder::MsbFirst => {
                data[106] = crc & 0x01 != 0;
                data[90] = crc & 0x02 != 0;
                data[74] = crc & 0x04 != 0;
                data[58] = crc & 0x08 != 0;
                data[42] = crc & 0x10 != 0;
            }
            EmbeddedLcCrcBitOrder::LsbFirst => {
                data[42] = crc & 0x01 != 0;
                data[58] = crc & 0x02 != 0;
                data[74] = crc & 0x04 != 0;
                data[90] = crc & 0x08 != 0;
                data[106] = crc & 0x10 != 0;
            }
        }

        let mut b = 0usize;
        for &(start, len) in &EMBEDDED_FIELD_RANGES {
            data[start..start + len].copy_from_slice(&self.data[b..b + len]);
            b += len;
        }

        for row_start in (0..112).step_by(16) {
            let mut data_bits = [false; 11];
            data_bits.copy_from_slice(&data[row_start..row_start + 11]);
            let codeword = hamming::encode_16114(&data_bits);
            data[row_start..row_start + 16].copy_from_slice(&codeword);
        }

        for col in 0..16 {
            data[112 + col] = (0..7).fold(false, |acc, row| acc ^ data[row * 16 + col]);
        }

        let mut b = 0usize;
        for &bit in data.iter() {
            self.raw[b] = bit;
            b += 16;
            if b > 127 {
                b -= 127;
            }
        }
    }
}

impl Default for EmbeddedData {
    fn default() -> Self {
        Self::new(EmbeddedLcCrcBitOrder::default())
    }
}

/// `(start, len)` ranges within the 128-bit deinterleaved matrix that hold
/// the 72-bit payload (skipping the 5-bit CRC slot at the end of each row
/// and the final parity row).
const EMBEDDED_FIELD_RANGES: [(usize, usize); 7] = [
    (0, 11),
    (16, 11),
    (32, 10),
    (48, 10),
    (64, 10),
    (80, 10),
    (96, 10),
];

impl Flco {
    /// Exposes `Flco::from_bits` (private to `lc`) for the embedded-LC
    /// decode path.
    fn from_bits_pub(v: u8) -> Flco {
        match v & 0x3F {
            0x00 => Flco::GroupVoice,
            0x03 => Flco::PrivateVoice,
            other => Flco::Other(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_lc() -> Lc {
        Lc {
            flco: Flco::GroupVoice,
            fid: 0x10,
            emergency: false,
            privacy: false,
            broadcast: false,
            ovcm: false,
            dst_id: 0x00_1234,
            src_id: 0x00_5678,
        }
    }

    #[test]
    fn fragment_reassembly_roundtrip() {
        let mut tx = EmbeddedData::new(EmbeddedLcCrcBitOrder::default());
        tx.set_lc(&sample_lc());

        let mut rx = EmbeddedData::new(EmbeddedLcCrcBitOrder::default());
        let mut done = false;
        for n in 1..=4u8 {
            let mut frag = [0u8; 5];
            let lcss = tx.get_data(&mut frag, n);
            done = rx.add_data_with_lcss(&frag, lcss);
        }

        assert!(done);
        assert_eq!(rx.get_lc(), Some(sample_lc()));
    }

    #[test]
    fn lsb_first_bit_order_also_roundtrips() {
        let mut tx = EmbeddedData::new(EmbeddedLcCrcBitOrder::LsbFirst);
        tx.set_lc(&sample_lc());

        let mut rx = EmbeddedData::new(EmbeddedLcCrcBitOrder::LsbFirst);
        let mut done = false;
        for n in 1..=4u8 {
            let mut frag = [0u8; 5];
            let lcss = tx.get_data(&mut frag, n);
            done = rx.add_data_with_lcss(&frag, lcss);
        }

        assert!(done);
        assert_eq!(rx.get_lc(), Some(sample_lc()));
    }

    #[test]
    fn mismatched_bit_order_fails_crc_check() {
        let mut tx = EmbeddedData::new(EmbeddedLcCrcBitOrder::MsbFirst);
        tx.set_lc(&sample_lc());

        let mut rx = EmbeddedData::new(EmbeddedLcCrcBitOrder::LsbFirst);
        let mut done = false;
        for n in 1..=4u8 {
            let mut frag = [0u8; 5];
            let lcss = tx.get_data(&mut frag, n);
            done = rx.add_data_with_lcss(&frag, lcss);
        }

        assert!(!done, "decoding with the wrong bit-order convention must not validate");
        assert_eq!(rx.get_lc(), None);
    }

    #[test]
    fn incomplete_sequence_never_completes() {
        let mut tx = EmbeddedData::new(EmbeddedLcCrcBitOrder::default());
        tx.set_lc(&sample_lc());

        let mut rx = EmbeddedData::new(EmbeddedLcCrcBitOrder::default());
        let mut frag1 = [0u8; 5];
        let lcss1 = tx.get_data(&mut frag1, 1);
        assert!(!rx.add_data_with_lcss(&frag1, lcss1));
        assert_eq!(rx.get_lc(), None);
    }
}
