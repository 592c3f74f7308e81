//! NXDN Common Access Channel: the control message carried on RCCH
//! (trunking) and embedded in RTCH call setup, decoded by deinterleaving,
//! Viterbi-decoding the K=5 rate-1/2 convolutional code, then checking a
//! CRC-16 over the short-form message length.

use crate::crc::ccitt16_kind1;
use crate::fec::convolution;

const CAC_INFO_BITS: usize = 56;
const CAC_CODED_BITS: usize = (CAC_INFO_BITS + 4) * 2;

/// Deinterleaves a received CAC burst: NXDN interleaves coded bits across
/// 4 columns before transmission. `raw` must hold exactly
/// `CAC_CODED_BITS` bits.
fn deinterleave(raw: &[bool]) -> Vec<bool> {
    let cols = 4;
    let rows = raw.len() / cols;
    let mut out = vec![false; raw.len()];
    for (i, bit) in raw.iter().enumerate() {
        let col = i % cols;
        let row = i / cols;
        out[col * rows + row] = *bit;
    }
    out
}

fn interleave(bits: &[bool]) -> Vec<bool> {
    let cols = 4;
    let rows = bits.len() / cols;
    let mut out = vec![false; bits.len()];
    for (i, bit) in bits.iter().enumerate() {
        let col = i / rows;
        let row = i % rows;
        out[row * cols + col] = *bit;
    }
    out
}

/// One decoded CAC message. `Other` carries the raw 5-byte information
/// field for RCCH opcodes this crate does not interpret further.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacMessage {
    VoiceCallAssignment {
        group: bool,
        dst_id: u16,
        src_id: u16,
    },
    IdleBeacon {
        site_id: u16,
    },
    Other {
        raw: [u8; 5],
    },
}

/// A decoded CAC frame: message type plus the RAN it was sent under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cac {
    pub ran: u8,
    pub message: CacMessage,
}

fn pack_info(ran: u8, message: &CacMessage) -> [u8; 7] {
    let mut out = [0u8; 7];
    out[0] = ran & 0x3F;
    match message {
        CacMessage::VoiceCallAssignment {
            group,
            dst_id,
            src_id,
        } => {
            out[1] = 0x01;
            out[2] = (u8::from(*group) << 7) | ((dst_id >> 8) as u8 & 0x7F);
            out[3] = *dst_id as u8;
            out[4] = (src_id >> 8) as u8;
            out[5] = *src_id as u8;
        }
        CacMessage::IdleBeacon { site_id } => {
            out[1] = 0x02;
            out[2] = (site_id >> 8) as u8;
            out[3] = *site_id as u8;
        }
        CacMessage::Other { raw } => {
            out[1] = 0x00;
            out[2..7].copy_from_slice(raw);
        }
    }
    out
}

fn unpack_info(raw: &[u8; 7]) -> Cac {
    let ran = raw[0] & 0x3F;
    let message = match raw[1] {
        0x01 => CacMessage::VoiceCallAssignment {
            group: raw[2] & 0x80 != 0,
            dst_id: (((raw[2] & 0x7F) as u16) << 8) | raw[3] as u16,
            src_id: ((raw[4] as u16) << 8) | raw[5] as u16,
        },
        0x02 => CacMessage::IdleBeacon {
            site_id: ((raw[2] as u16) << 8) | raw[3] as u16,
        },
        _ => CacMessage::Other {
            raw: raw[2..7].try_into().unwrap(),
        },
    };
    Cac { ran, message }
}

impl Cac {
    /// Encodes this CAC message: pack info bits, append CRC-16, convolve,
    /// interleave. Returns the coded bit stream ready for framing into the
    /// 48-byte NXDN on-air frame alongside its LICH byte.
    pub fn encode(&self) -> Vec<bool> {
        let info = pack_info(self.ran, &self.message);
        let crc = ccitt16_kind1(&info);
        let mut bits = crate::bits::bytes_to_bits(&info);
        bits.truncate(CAC_INFO_BITS - 16);
        let mut crc_bits = Vec::with_capacity(16);
        for i in (0..16).rev() {
            crc_bits.push((crc >> i) & 1 != 0);
        }
        bits.extend(crc_bits);
        let coded = convolution::encode(&bits);
        interleave(&coded)
    }

    /// Decodes a deinterleaved-and-Viterbi-decoded CAC burst, checking the
    /// CRC-16 over the short-form length before unpacking fields.
    pub fn decode(raw: &[bool]) -> Option<Cac> {
        if raw.len() != CAC_CODED_BITS {
            return None;
        }
        let deinterleaved = deinterleave(raw);
        let bits = convolution::decode(&deinterleaved, CAC_INFO_BITS)?;
        if bits.len() < CAC_INFO_BITS {
            return None;
        }
        let (info_bits, crc_bits) = bits.split_at(CAC_INFO_BITS - 16);
        let mut info = crate::bits::bits_to_bytes(info_bits);
        info.resize(7, 0);
        let info: [u8; 7] = info[0..7].try_into().ok()?;

        let mut crc_received = 0u16;
        for bit in crc_bits {
            crc_received = (crc_received << 1) | (*bit as u16);
        }
        if ccitt16_kind1(&info) != crc_received {
            return None;
        }
        Some(unpack_info(&info))
    }
}
