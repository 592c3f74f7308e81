//! Shortened RS(12,9,4) checksum used to validate DMR full link-control
//! headers. Three parity bytes over GF(2^8) give single-byte error
//! detection; callers only need the verify direction (the air interface's
//! FEC already comes from BPTC(196,96) — this is a supplementary checksum
//! so a partially corrupted header can be rejected before use).

const GF_PRIM: u16 = 0x11D; // x^8 + x^4 + x^3 + x^2 + 1

struct Gf256 {
    exp: [u8; 512],
    log: [u8; 256],
}

impl Gf256 {
    fn new() -> Self {
        let mut exp = [0u8; 512];
        let mut log = [0u8; 256];
        let mut x: u16 = 1;
        for i in 0..255 {
            exp[i] = x as u8;
            log[x as usize] = i as u8;
            x <<= 1;
            if x & 0x100 != 0 {
                x ^= GF_PRIM;
            }
        }
        for i in 255..512 {
            exp[i] = exp[i - 255];
        }
        Gf256 { exp, log }
    }

    fn mul(&self, a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        let la = self.log[a as usize] as usize;
        let lb = self.log[b as usize] as usize;
        self.exp[la + lb]
    }

    fn pow_alpha(&self, e: usize) -> u8 {
        self.exp[e % 255]
    }
}

/// Computes the 3-byte parity for a 9-byte data block, roots alpha^0..alpha^2.
pub fn encode(data: &[u8; 9]) -> [u8; 3] {
    let gf = Gf256::new();
    // Generator g(x) = (x - a^0)(x - a^1)(x - a^2), built the same way the
    // P25 LC codes build their generator in `reed_solomon.rs`.
    let mut gen = vec![1u8];
    for i in 0..3 {
        let root = gf.pow_alpha(i);
        let mut new_gen = vec![0u8; gen.len() + 1];
        for (j, &coeff) in gen.iter().enumerate() {
            new_gen[j] ^= coeff;
            new_gen[j + 1] ^= gf.mul(coeff, root);
        }
        gen = new_gen;
    }

    let mut remainder = [0u8; 3];
    for &d in data {
        let feedback = d ^ remainder[0];
        remainder[0] = remainder[1] ^ gf.mul(feedback, gen[2]);
        remainder[1] = remainder[2] ^ gf.mul(feedback, gen[1]);
        remainder[2] = gf.mul(feedback, gen[0]);
    }
    remainder
}

/// Verifies a 12-byte block (9 data bytes followed by 3 parity bytes).
pub fn check(block: &[u8; 12]) -> bool {
    let data: [u8; 9] = block[0..9].try_into().unwrap();
    encode(&data) == block[9..12]
}
