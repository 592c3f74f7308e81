//! DMR BPTC(196,96): a block product turbo code interleaving 13 rows of
//! Hamming(15,11,3) with column parity over Hamming(13,9,3), protecting the
//! 96 information bits of a DMR full/embedded LC or CSBK payload.

use super::hamming;

const ROWS: usize = 13;
const COLS: usize = 15;
pub const TOTAL_BITS: usize = ROWS * COLS; // 196
pub const INFO_BITS: usize = 96;

/// Column-first read, row-first store de-interleave permutation: bit `i`
/// of the 196-bit codeword maps to row `i % 13`, column `i / 13`.
fn deinterleave(raw: &[bool; TOTAL_BITS]) -> [[bool; COLS]; ROWS] {
    let mut matrix = [[false; COLS]; ROWS];
    for i in 0..TOTAL_BITS {
        let row = i % ROWS;
        let col = i / ROWS;
        matrix[row][col] = raw[i];
    }
    matrix
}

fn interleave(matrix: &[[bool; COLS]; ROWS]) -> [bool; TOTAL_BITS] {
    let mut raw = [false; TOTAL_BITS];
    for i in 0..TOTAL_BITS {
        let row = i % ROWS;
        let col = i / ROWS;
        raw[i] = matrix[row][col];
    }
    raw
}

/// Decodes a 196-bit BPTC codeword into 96 information bits. Returns
/// `None` if any row or column is uncorrectable.
pub fn decode(raw: &[bool; TOTAL_BITS]) -> Option<[bool; INFO_BITS]> {
    let mut matrix = deinterleave(raw);

    for row in matrix.iter_mut().take(ROWS - 1) {
        let mut codeword: [bool; COLS] = (*row)[0..COLS].try_into().unwrap();
        if !hamming::decode_15113(&mut codeword) {
            return None;
        }
        row.copy_from_slice(&codeword);
    }

    for col in 0..COLS {
        let mut column: [bool; ROWS] = [false; ROWS];
        for (r, slot) in column.iter_mut().enumerate() {
            *slot = matrix[r][col];
        }
        let mut codeword13: [bool; 13] = column;
        if ROWS == 13 {
            // Hamming(13,9,3) expects exactly 13 bits; ROWS already is 13.
            if !hamming::decode_1393(&mut codeword13) {
                return None;
            }
            for (r, slot) in codeword13.iter().enumerate() {
                matrix[r][col] = *slot;
            }
        }
    }

    let mut info = [false; INFO_BITS];
    let mut idx = 0;
    for row in matrix.iter().take(ROWS - 1) {
        for &bit in row.iter().take(11) {
            if idx < INFO_BITS {
                info[idx] = bit;
                idx += 1;
            }
        }
    }
    Some(info)
}

/// Encodes 96 information bits into a 196-bit BPTC codeword: fills the
/// 11 data columns of each of the first 12 rows, computes row parity via
/// Hamming(15,11,3), computes column parity via Hamming(13,9,3), and
/// re-interleaves.
pub fn encode(info: &[bool; INFO_BITS]) -> [bool; TOTAL_BITS] {
    let mut matrix = [[false; COLS]; ROWS];
    let mut idx = 0;
    for row in matrix.iter_mut().take(ROWS - 1) {
        let mut data = [false; 11];
        for slot in data.iter_mut() {
            if idx < INFO_BITS {
                *slot = info[idx];
                idx += 1;
            }
        }
        let codeword = hamming::encode_15113(&data);
        row[0..COLS].copy_from_slice(&codeword);
    }

    for col in 0..COLS {
        let mut data = [false; 9];
        for (r, slot) in data.iter_mut().enumerate() {
            *slot = matrix[r][col];
        }
        let codeword = hamming::encode_1393(&data);
        for (r, &bit) in codeword.iter().enumerate() {
            matrix[r][col] = bit;
        }
    }

    interleave(&matrix)
}
