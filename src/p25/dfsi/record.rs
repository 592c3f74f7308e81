//! DFSI on-wire voice/trunk record framing (spec §4.7).
//!
//! Every record starts with a frame-type byte; the remaining length is
//! fixed per type rather than length-prefixed, so a reader only needs the
//! type byte to know how many more bytes to pull off the stream.

use crate::error::CodecError;

/// Frame-type byte values, per the DFSI record table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameType {
    Vhdr1,
    Vhdr2,
    Ldu1Voice1,
    Voice2,
    Voice3,
    Voice4,
    Voice5,
    Voice6,
    Voice7,
    Voice8,
    Voice9,
    Tsbk,
    StartStop,
}

impl FrameType {
    pub fn to_byte(self) -> u8 {
        match self {
            FrameType::Vhdr1 => 0x70,
            FrameType::Vhdr2 => 0x71,
            FrameType::Ldu1Voice1 => 0x62,
            FrameType::Voice2 => 0x63,
            FrameType::Voice3 => 0x64,
            FrameType::Voice4 => 0x65,
            FrameType::Voice5 => 0x66,
            FrameType::Voice6 => 0x67,
            FrameType::Voice7 => 0x68,
            FrameType::Voice8 => 0x69,
            FrameType::Voice9 => 0x6A,
            FrameType::Tsbk => 0x6B,
            FrameType::StartStop => 0x72,
        }
    }

    pub fn from_byte(b: u8) -> Option<FrameType> {
        Some(match b {
            0x70 => FrameType::Vhdr1,
            0x71 => FrameType::Vhdr2,
            0x62 => FrameType::Ldu1Voice1,
            0x63 => FrameType::Voice2,
            0x64 => FrameType::Voice3,
            0x65 => FrameType::Voice4,
            0x66 => FrameType::Voice5,
            0x67 => FrameType::Voice6,
            0x68 => FrameType::Voice7,
            0x69 => FrameType::Voice8,
            0x6A => FrameType::Voice9,
            0x6B => FrameType::Tsbk,
            0x72 => FrameType::StartStop,
            _ => return None,
        })
    }

    /// Fixed body length following the type byte, in bytes.
    pub fn body_len(self) -> usize {
        match self {
            FrameType::Vhdr1 => 30,
            FrameType::Vhdr2 => 22,
            FrameType::Ldu1Voice1 => 22,
            FrameType::Voice2 => 14,
            FrameType::Voice3
            | FrameType::Voice4
            | FrameType::Voice5
            | FrameType::Voice6
            | FrameType::Voice7
            | FrameType::Voice8 => 17,
            FrameType::Voice9 => 16,
            FrameType::Tsbk => 25,
            FrameType::StartStop => 2,
        }
    }
}

/// A single framed DFSI record: type byte plus its fixed-length body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub frame_type: FrameType,
    pub body: Vec<u8>,
}

impl Record {
    pub fn new(frame_type: FrameType, body: Vec<u8>) -> Result<Record, CodecError> {
        let need = frame_type.body_len();
        if body.len() != need {
            return Err(CodecError::TooShort {
                need,
                got: body.len(),
            });
        }
        Ok(Record { frame_type, body })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.body.len());
        out.push(self.frame_type.to_byte());
        out.extend_from_slice(&self.body);
        out
    }

    /// Decodes one record from the front of `buf`, returning it plus the
    /// number of bytes consumed. Returns `None` if `buf` doesn't yet hold
    /// a full record (caller should wait for more bytes).
    pub fn decode(buf: &[u8]) -> Result<Option<(Record, usize)>, CodecError> {
        let Some(&type_byte) = buf.first() else {
            return Ok(None);
        };
        let frame_type = FrameType::from_byte(type_byte).ok_or(CodecError::UnknownOpcode(type_byte))?;
        let total = 1 + frame_type.body_len();
        if buf.len() < total {
            return Ok(None);
        }
        Ok(Some((
            Record {
                frame_type,
                body: buf[1..total].to_vec(),
            },
            total,
        )))
    }
}

/// Reassembles the 9 per-block DFSI voice sub-records of an LDU1 into the
/// 11-byte IMBE slots at their fixed byte offsets inside a 225-byte LDU1
/// buffer (spec §4.5 "Network LDU1 path").
pub const LDU1_IMBE_OFFSETS: [usize; 9] = [10, 26, 55, 80, 105, 130, 155, 180, 204];

#[derive(Debug, Default)]
pub struct Ldu1Reassembler {
    imbe: [[u8; 11]; 9],
    have: [bool; 9],
}

impl Ldu1Reassembler {
    pub fn new() -> Self {
        Ldu1Reassembler::default()
    }

    /// Accepts one voice sub-record body and stashes its 11-byte IMBE
    /// payload at the matching slot. `index` is 0-based (VOICE1 = 0).
    pub fn accept(&mut self, index: usize, imbe: [u8; 11]) {
        self.imbe[index] = imbe;
        self.have[index] = true;
    }

    pub fn complete(&self) -> bool {
        self.have.iter().all(|&h| h)
    }

    /// Regenerates the 225-byte on-air LDU1 buffer once all 9 sub-records
    /// have arrived.
    pub fn into_ldu1(self) -> Option<[u8; 225]> {
        if !self.complete() {
            return None;
        }
        let mut buf = [0u8; 225];
        for (i, &offset) in LDU1_IMBE_OFFSETS.iter().enumerate() {
            buf[offset..offset + 11].copy_from_slice(&self.imbe[i]);
        }
        Some(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_roundtrip() {
        let record = Record::new(FrameType::Voice2, vec![0xAB; 14]).unwrap();
        let encoded = record.encode();
        assert_eq!(encoded.len(), 15);
        let (decoded, consumed) = Record::decode(&encoded).unwrap().unwrap();
        assert_eq!(consumed, encoded.len());
        assert_eq!(decoded, record);
    }

    #[test]
    fn wrong_body_length_rejected() {
        assert!(Record::new(FrameType::Voice9, vec![0u8; 10]).is_err());
    }

    #[test]
    fn decode_waits_for_more_bytes() {
        let partial = [FrameType::Tsbk.to_byte(); 1];
        assert_eq!(Record::decode(&partial).unwrap(), None);
    }

    #[test]
    fn unknown_type_byte_rejected() {
        assert!(Record::decode(&[0xFF]).is_err());
    }

    #[test]
    fn ldu1_reassembles_from_nine_slots() {
        let mut reassembler = Ldu1Reassembler::new();
        for i in 0..9 {
            assert!(!reassembler.complete());
            reassembler.accept(i, [i as u8; 11]);
        }
        assert!(reassembler.complete());
        let buf = reassembler.into_ldu1().unwrap();
        for (i, &offset) in LDU1_IMBE_OFFSETS.iter().enumerate() {
            assert_eq!(&buf[offset..offset + 11], &[i as u8; 11][..]);
        }
    }
}
