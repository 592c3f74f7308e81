//! DMR link control: the 9-byte payload carried (FEC-protected) in voice LC
//! headers, terminators, and embedded LC bursts.

use crate::bits::{bits_to_bytes, bytes_to_bits};
use crate::fec::bptc19696;
use crate::fec::rs1293;
use crate::crc::ccitt16_kind2;

use super::{PI_HEADER_CRC_MASK, TERMINATOR_WITH_LC_CRC_MASK, VOICE_LC_HEADER_CRC_MASK};

/// Full link control opcode, identifying which group of fields `Lc` holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flco {
    GroupVoice,
    PrivateVoice,
    Other(u8),
}

impl Flco {
    fn to_bits(self) -> u8 {
        match self {
            Flco::GroupVoice => 0x00,
            Flco::PrivateVoice => 0x03,
            Flco::Other(v) => v & 0x3F,
        }
    }

    fn from_bits(v: u8) -> Self {
        match v & 0x3F {
            0x00 => Flco::GroupVoice,
            0x03 => Flco::PrivateVoice,
            other => Flco::Other(other),
        }
    }
}

/// Burst type the LC is being embedded into, selecting which CRC mask to
/// apply before the RS(12,9,4) checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    VoiceLcHeader,
    TerminatorWithLc,
}

/// A decoded full link control header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lc {
    pub flco: Flco,
    pub fid: u8,
    pub emergency: bool,
    pub privacy: bool,
    pub broadcast: bool,
    pub ovcm: bool,
    pub dst_id: u32,
    pub src_id: u32,
}

impl Lc {
    /// Packs the LC into its 9-byte on-air representation.
    pub fn to_bytes(&self) -> [u8; 9] {
        let mut out = [0u8; 9];
        out[0] = self.flco.to_bits();
        out[1] = self.fid;
        out[2] = (u8::from(self.emergency) << 7)
            | (u8::from(self.privacy) << 6)
            | (u8::from(self.broadcast) << 5)
            | (u8::from(self.ovcm) << 4);
        out[3] = (self.dst_id >> 16) as u8;
        out[4] = (self.dst_id >> 8) as u8;
        out[5] = self.dst_id as u8;
        out[6] = (self.src_id >> 16) as u8;
        out[7] = (self.src_id >> 8) as u8;
        out[8] = self.src_id as u8;
        out
    }

    /// Unpacks an LC from its 9-byte on-air representation.
    pub fn from_bytes(data: &[u8; 9]) -> Self {
        Lc {
            flco: Flco::from_bits(data[0]),
            fid: data[1],
            emergency: data[2] & 0x80 != 0,
            privacy: data[2] & 0x40 != 0,
            broadcast: data[2] & 0x20 != 0,
            ovcm: data[2] & 0x10 != 0,
            dst_id: ((data[3] as u32) << 16) | ((data[4] as u32) << 8) | data[5] as u32,
            src_id: ((data[6] as u32) << 16) | ((data[7] as u32) << 8) | data[8] as u32,
        }
    }
}

/// A decoded privacy-indicator header (voice-privacy FLCO companion block).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivacyLc {
    pub algo_id: u8,
    pub key_id: u8,
    pub dst_id: u32,
}

impl PrivacyLc {
    pub fn to_bytes(&self) -> [u8; 9] {
        let mut out = [0u8; 9];
        out[0] = self.algo_id;
        out[1] = self.key_id;
        out[6] = (self.dst_id >> 16) as u8;
        out[7] = (self.dst_id >> 8) as u8;
        out[8] = self.dst_id as u8;
        out
    }

    pub fn from_bytes(data: &[u8; 9]) -> Self {
        PrivacyLc {
            algo_id: data[0],
            key_id: data[1],
            dst_id: ((data[6] as u32) << 16) | ((data[7] as u32) << 8) | data[8] as u32,
        }
    }
}

fn crc_mask_for(data_type: DataType) -> [u8; 3] {
    match data_type {
        DataType::VoiceLcHeader => VOICE_LC_HEADER_CRC_MASK,
        DataType::TerminatorWithLc => TERMINATOR_WITH_LC_CRC_MASK,
    }
}

/// Codec for full link control bursts: BPTC(196,96) deinterleave/interleave
/// plus the RS(12,9,4) checksum that guards against a BPTC false-correct.
pub struct FullLc;

impl FullLc {
    /// Decodes one burst's worth of raw bits (`196` dibit-carrying bits as
    /// produced by the modem) into an `Lc`, or `None` if BPTC or the RS
    /// checksum rejects it.
    pub fn decode(burst_bits: &[bool; bptc19696::TOTAL_BITS], data_type: DataType) -> Option<Lc> {
        let info_bits = bptc19696::decode(burst_bits)?;
        let mut lc_data: [u8; 12] = bits_to_bytes(&info_bits).try_into().unwrap();
        let mask = crc_mask_for(data_type);
        lc_data[9] ^= mask[0];
        lc_data[10] ^= mask[1];
        lc_data[11] ^= mask[2];

        if !rs1293::check(&lc_data) {
            return None;
        }

        let payload: [u8; 9] = lc_data[0..9].try_into().unwrap();
        Some(Lc::from_bytes(&payload))
    }

    /// Encodes an `Lc` into a fresh burst's worth of bits.
    pub fn encode(lc: &Lc, data_type: DataType) -> [bool; bptc19696::TOTAL_BITS] {
        let data = lc.to_bytes();
        let parity = rs1293::encode(&data);

        let mask = crc_mask_for(data_type);
        let mut lc_data = [0u8; 12];
        lc_data[0..9].copy_from_slice(&data);
        lc_data[9] = parity[0] ^ mask[0];
        lc_data[10] = parity[1] ^ mask[1];
        lc_data[11] = parity[2] ^ mask[2];

        let info_bits: [bool; bptc19696::INFO_BITS] =
            bytes_to_bits(&lc_data).try_into().unwrap();
        bptc19696::encode(&info_bits)
    }

    /// Decodes a privacy-indicator burst. The network is known to zero the
    /// trailing CRC bytes on some firmwares, so a zeroed trailer is accepted
    /// without a CRC check (matching field behavior, not the written
    /// standard).
    pub fn decode_pi(burst_bits: &[bool; bptc19696::TOTAL_BITS]) -> Option<PrivacyLc> {
        let info_bits = bptc19696::decode(burst_bits)?;
        let mut lc_data: [u8; 12] = bits_to_bytes(&info_bits).try_into().unwrap();

        if lc_data[10] != 0 || lc_data[11] != 0 {
            lc_data[10] ^= PI_HEADER_CRC_MASK[0];
            lc_data[11] ^= PI_HEADER_CRC_MASK[1];
            if ccitt16_kind2(&lc_data[0..10]) != u16::from_be_bytes([lc_data[10], lc_data[11]]) {
                return None;
            }
            lc_data[10] ^= PI_HEADER_CRC_MASK[0];
            lc_data[11] ^= PI_HEADER_CRC_MASK[1];
        }

        let payload: [u8; 9] = lc_data[0..9].try_into().unwrap();
        Some(PrivacyLc::from_bytes(&payload))
    }

    /// Encodes a privacy-indicator burst, appending a masked CRC-CCITT 16.
    pub fn encode_pi(lc: &PrivacyLc) -> [bool; bptc19696::TOTAL_BITS] {
        let data = lc.to_bytes();
        let mut lc_data = [0u8; 12];
        lc_data[0..9].copy_from_slice(&data);

        lc_data[10] ^= PI_HEADER_CRC_MASK[0];
        lc_data[11] ^= PI_HEADER_CRC_MASK[1];
        let crc = ccitt16_kind2(&lc_data[0..10]);
        lc_data[10] = (crc >> 8) as u8;
        lc_data[11] = crc as u8;
        lc_data[10] ^= PI_HEADER_CRC_MASK[0];
        lc_data[11] ^= PI_HEADER_CRC_MASK[1];

        let info_bits: [bool; bptc19696::INFO_BITS] =
            bytes_to_bits(&lc_data).try_into().unwrap();
        bptc19696::encode(&info_bits)
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
    fn full_lc_roundtrip_voice_header() {
        let lc = sample_lc();
        let burst = FullLc::encode(&lc, DataType::VoiceLcHeader);
        let decoded = FullLc::decode(&burst, DataType::VoiceLcHeader).expect("decode");
        assert_eq!(decoded, lc);
    }

    #[test]
    fn full_lc_roundtrip_terminator() {
        let lc = sample_lc();
        let burst = FullLc::encode(&lc, DataType::TerminatorWithLc);
        let decoded = FullLc::decode(&burst, DataType::TerminatorWithLc).expect("decode");
        assert_eq!(decoded, lc);
    }

    #[test]
    fn wrong_data_type_mask_fails_checksum() {
        let lc = sample_lc();
        let burst = FullLc::encode(&lc, DataType::VoiceLcHeader);
        assert!(FullLc::decode(&burst, DataType::TerminatorWithLc).is_none());
    }

    #[test]
    fn privacy_lc_roundtrip() {
        let lc = PrivacyLc {
            algo_id: 0xAA,
            key_id: 0x02,
            dst_id: 0x00_4321,
        };
        let burst = FullLc::encode_pi(&lc);
        let decoded = FullLc::decode_pi(&burst).expect("decode");
        assert_eq!(decoded, lc);
    }

    #[test]
    fn privacy_lc_zeroed_trailer_accepted() {
        let lc = PrivacyLc {
            algo_id: 0xAA,
            key_id: 0x02,
            dst_id: 0x00_4321,
        };
        let data = lc.to_bytes();
        let mut lc_data = [0u8; 12];
        lc_data[0..9].copy_from_slice(&data);
        let info_bits: [bool; bptc19696::INFO_BITS] =
            bytes_to_bits(&lc_data).try_into().unwrap();
        let burst = bptc19696::encode(&info_bits);
        let decoded = FullLc::decode_pi(&burst).expect("decode with zeroed trailer");
        assert_eq!(decoded, lc);
    }
}
