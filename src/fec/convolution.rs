//! K=5, rate-1/2 convolutional code used by NXDN, decoded with a classic
//! Viterbi algorithm.
//!
//! Encoder polynomials are the NXDN-standard `G1 = 0x19`, `G2 = 0x17`
//! (octal 31/23), constraint length 5 (16 states).

const CONSTRAINT_LEN: u32 = 5;
const NUM_STATES: usize = 1 << (CONSTRAINT_LEN - 1);
const POLY_G1: u8 = 0b1_1001; // 0x19
const POLY_G2: u8 = 0b1_0111; // 0x17

fn parity(mut v: u8) -> u8 {
    let mut p = 0u8;
    while v != 0 {
        p ^= v & 1;
        v >>= 1;
    }
    p
}

/// Encodes a bit stream into a rate-1/2 convolutional code, flushing with
/// `CONSTRAINT_LEN - 1` zero bits at the end so the decoder can chain back
/// to a known state.
pub fn encode(bits: &[bool]) -> Vec<bool> {
    let mut shift_reg: u8 = 0;
    let mut out = Vec::with_capacity(bits.len() * 2 + (CONSTRAINT_LEN as usize - 1) * 2);
    let flushed = bits
        .iter()
        .copied()
        .chain(std::iter::repeat(false).take(CONSTRAINT_LEN as usize - 1));
    for bit in flushed {
        shift_reg = ((shift_reg << 1) | (bit as u8)) & 0x1F;
        out.push(parity(shift_reg & POLY_G1) != 0);
        out.push(parity(shift_reg & POLY_G2) != 0);
    }
    out
}

#[derive(Clone, Copy)]
struct PathMetric {
    cost: u32,
    prev_state: u8,
    bit: bool,
}

/// Viterbi-decodes a rate-1/2 convolutional stream back into the original
/// bit sequence, chaining back over the full received length. `data_len`
/// is the number of *information* bits to recover (excluding the
/// flush tail the encoder appended).
pub fn decode(received: &[bool], data_len: usize) -> Option<Vec<bool>> {
    if received.len() % 2 != 0 {
        return None;
    }
    let num_steps = received.len() / 2;
    let mut metrics = vec![u32::MAX; NUM_STATES];
    metrics[0] = 0;
    let mut history: Vec<[Option<PathMetric>; NUM_STATES]> = Vec::with_capacity(num_steps);

    for step in 0..num_steps {
        let r1 = received[step * 2];
        let r2 = received[step * 2 + 1];
        let mut new_metrics = vec![u32::MAX; NUM_STATES];
        let mut step_hist: [Option<PathMetric>; NUM_STATES] = [None; NUM_STATES];

        for state in 0..NUM_STATES {
            if metrics[state] == u32::MAX {
                continue;
            }
            for &bit in &[false, true] {
                let shift_reg = (((state as u8) << 1) | (bit as u8)) & 0x1F;
                let e1 = parity(shift_reg & POLY_G1) != 0;
                let e2 = parity(shift_reg & POLY_G2) != 0;
                let branch_cost = (e1 != r1) as u32 + (e2 != r2) as u32;
                let next_state = (shift_reg & 0x0F) as usize;
                let cost = metrics[state] + branch_cost;
                if cost < new_metrics[next_state] {
                    new_metrics[next_state] = cost;
                    step_hist[next_state] = Some(PathMetric {
                        cost,
                        prev_state: state as u8,
                        bit,
                    });
                }
            }
        }
        metrics = new_metrics;
        history.push(step_hist);
    }

    // The encoder flushes to state 0, so chain back from there.
    let mut state = 0usize;
    let mut bits = vec![false; num_steps];
    for step in (0..num_steps).rev() {
        let entry = history[step][state]?;
        bits[step] = entry.bit;
        state = entry.prev_state as usize;
    }
    bits.truncate(data_len);
    Some(bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_no_errors() {
        let bits: Vec<bool> = (0..40).map(|i| i % 4 < 2).collect();
        let encoded = encode(&bits);
        let decoded = decode(&encoded, bits.len()).expect("decode");
        assert_eq!(decoded, bits);
    }

    #[test]
    fn corrects_scattered_errors() {
        let bits: Vec<bool> = (0..40).map(|i| i % 7 == 0).collect();
        let mut encoded = encode(&bits);
        // Flip a handful of isolated bits; Viterbi should still recover
        // the maximum-likelihood path.
        encoded[5] = !encoded[5];
        encoded[30] = !encoded[30];
        let decoded = decode(&encoded, bits.len()).expect("decode");
        assert_eq!(decoded, bits);
    }
}
