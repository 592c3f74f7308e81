//! P25 Link Control: the 9-byte record carried (RS-protected) in an HDU and
//! in every LDU1, plus the Low Speed Data pair carried alongside it in
//! every LDU.

use crate::fec::reed_solomon::{self, Gf64, RS_24_12_13, RS_24_16_9};

/// A decoded P25 link control record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lc {
    pub lco: u8,
    pub mfid: u8,
    pub src_id: u32,
    pub dst_id: u32,
    pub group: bool,
    pub emergency: bool,
    pub encrypted: bool,
    pub priority: u8,
    pub algo_id: u8,
    pub key_id: u16,
    pub mi: [u8; 9],
}

impl Lc {
    /// Packs this LC's fixed fields plus a 9-byte manufacturer/link-control
    /// info block into the `(24,12,13)` RS codeword's 12 data symbols.
    /// Each symbol is 6 bits (GF(2^6)), so the 12-byte link-control content
    /// is repacked into 12 six-bit symbols before RS-encoding.
    fn to_symbols(&self) -> [u8; 12] {
        let mut symbols = [0u8; 12];
        symbols[0] = self.lco & 0x3F;
        symbols[1] = self.mfid & 0x3F;
        symbols[2] = (u8::from(self.group) << 5)
            | (u8::from(self.emergency) << 4)
            | (u8::from(self.encrypted) << 3)
            | (self.priority & 0x07);
        symbols[3] = ((self.dst_id >> 18) & 0x3F) as u8;
        symbols[4] = ((self.dst_id >> 12) & 0x3F) as u8;
        symbols[5] = ((self.dst_id >> 6) & 0x3F) as u8;
        symbols[6] = (self.dst_id & 0x3F) as u8;
        symbols[7] = ((self.src_id >> 18) & 0x3F) as u8;
        symbols[8] = ((self.src_id >> 12) & 0x3F) as u8;
        symbols[9] = ((self.src_id >> 6) & 0x3F) as u8;
        symbols[10] = (self.src_id & 0x3F) as u8;
        symbols[11] = self.algo_id & 0x3F;
        symbols
    }

    fn from_symbols(symbols: &[u8; 12], mi: [u8; 9], key_id: u16) -> Lc {
        let dst_id = ((symbols[3] as u32) << 18)
            | ((symbols[4] as u32) << 12)
            | ((symbols[5] as u32) << 6)
            | symbols[6] as u32;
        let src_id = ((symbols[7] as u32) << 18)
            | ((symbols[8] as u32) << 12)
            | ((symbols[9] as u32) << 6)
            | symbols[10] as u32;
        Lc {
            lco: symbols[0],
            mfid: symbols[1],
            group: symbols[2] & 0x20 != 0,
            emergency: symbols[2] & 0x10 != 0,
            encrypted: symbols[2] & 0x08 != 0,
            priority: symbols[2] & 0x07,
            dst_id,
            src_id,
            algo_id: symbols[11],
            key_id,
            mi,
        }
    }

    /// Encodes this LC as a `(24,12,13)` RS codeword (24 six-bit symbols).
    pub fn encode_rs(&self) -> Vec<u8> {
        let gf = Gf64::new();
        reed_solomon::encode(&gf, RS_24_12_13, &self.to_symbols())
    }

    /// Decodes a received `(24,12,13)` RS codeword, correcting up to 6
    /// symbol errors, returning `None` if uncorrectable. `mi` and `key_id`
    /// are out-of-band context the LC field layout does not itself carry
    /// in the RS-protected symbols (they ride in the surrounding LDU1
    /// structure, which is out of scope here).
    pub fn decode_rs(received: &[u8], mi: [u8; 9], key_id: u16) -> Option<Lc> {
        let gf = Gf64::new();
        let symbols = reed_solomon::decode(&gf, RS_24_12_13, received)?;
        let symbols: [u8; 12] = symbols.try_into().ok()?;
        Some(Lc::from_symbols(&symbols, mi, key_id))
    }
}

/// The 16-bit encryption-sync block carried in LDU2, RS-protected the same
/// way LC is but with a weaker `(24,16,9)` code (fewer data symbols need
/// protecting, so more parity is available per symbol).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionSync {
    pub mi: [u8; 9],
    pub algo_id: u8,
    pub key_id: u16,
}

impl EncryptionSync {
    fn to_symbols(&self) -> [u8; 16] {
        let mut symbols = [0u8; 16];
        for i in 0..9 {
            symbols[i] = self.mi[i] & 0x3F;
        }
        symbols[9] = self.algo_id & 0x3F;
        symbols[10] = ((self.key_id >> 10) & 0x3F) as u8;
        symbols[11] = ((self.key_id >> 4) & 0x3F) as u8;
        symbols[12] = ((self.key_id << 2) & 0x3F) as u8;
        symbols
    }

    fn from_symbols(symbols: &[u8; 16]) -> EncryptionSync {
        let mut mi = [0u8; 9];
        mi[..9].copy_from_slice(&symbols[0..9]);
        let key_id = ((symbols[10] as u16) << 10)
            | ((symbols[11] as u16) << 4)
            | ((symbols[12] as u16) >> 2);
        EncryptionSync {
            mi,
            algo_id: symbols[9],
            key_id,
        }
    }

    pub fn encode_rs(&self) -> Vec<u8> {
        let gf = Gf64::new();
        reed_solomon::encode(&gf, RS_24_16_9, &self.to_symbols())
    }

    pub fn decode_rs(received: &[u8]) -> Option<EncryptionSync> {
        let gf = Gf64::new();
        let symbols = reed_solomon::decode(&gf, RS_24_16_9, received)?;
        let symbols: [u8; 16] = symbols.try_into().ok()?;
        Some(EncryptionSync::from_symbols(&symbols))
    }
}

/// Low Speed Data: two bytes of user data carried uncoded alongside every
/// LDU, most often used for unit ID broadcast on analog-paired repeaters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lsd {
    pub lsd1: u8,
    pub lsd2: u8,
}

impl Lsd {
    pub fn to_bytes(self) -> [u8; 2] {
        [self.lsd1, self.lsd2]
    }

    pub fn from_bytes(data: [u8; 2]) -> Lsd {
        Lsd {
            lsd1: data[0],
            lsd2: data[1],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_lc() -> Lc {
        Lc {
            lco: 0,
            mfid: 0,
            src_id: 9_000_001,
            dst_id: 10_001,
            group: true,
            emergency: false,
            encrypted: false,
            priority: 2,
            algo_id: 0x80,
            key_id: 0,
            mi: [0; 9],
        }
    }

    #[test]
    fn lc_rs_roundtrip_no_error() {
        let lc = sample_lc();
        let code = lc.encode_rs();
        let decoded = Lc::decode_rs(&code, lc.mi, lc.key_id).expect("decode");
        assert_eq!(decoded, lc);
    }

    #[test]
    fn lc_rs_corrects_single_symbol_error() {
        let lc = sample_lc();
        let mut code = lc.encode_rs();
        code[4] ^= 0x15;
        let decoded = Lc::decode_rs(&code, lc.mi, lc.key_id).expect("decode with error");
        assert_eq!(decoded, lc);
    }

    #[test]
    fn encryption_sync_roundtrip() {
        let es = EncryptionSync {
            mi: [1, 2, 3, 4, 5, 6, 7, 8, 9],
            algo_id: 0xAA,
            key_id: 0x1234,
        };
        let code = es.encode_rs();
        let decoded = EncryptionSync::decode_rs(&code).expect("decode");
        assert_eq!(decoded, es);
    }

    #[test]
    fn lsd_roundtrip() {
        let lsd = Lsd {
            lsd1: 0xAB,
            lsd2: 0xCD,
        };
        assert_eq!(Lsd::from_bytes(lsd.to_bytes()), lsd);
    }
}
