//! Forward error correction primitives.
//!
//! Everything here is pure, total and deterministic: codecs report failure
//! by returning `false`/`None`, never by panicking.

pub mod bptc19696;
pub mod convolution;
pub mod hamming;
pub mod reed_solomon;
pub mod rs1293;
pub mod trellis;
