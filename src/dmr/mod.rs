//! DMR (ETSI TS 102 361) protocol layer: link control, embedded LC, and
//! control signalling block (CSBK) codecs layered over the FEC primitives
//! in [`crate::fec`].

pub mod csbk;
pub mod embedded_data;
pub mod lc;
pub mod slot_type;

pub use csbk::{Csbk, CsbkCopyQuirk, CsbkOpcode};
pub use embedded_data::EmbeddedData;
pub use lc::{DataType, Flco, FullLc, Lc, PrivacyLc};
pub use slot_type::{Cach, SlotType};

/// DMR link control payload length, in bytes, before FEC/CRC framing.
pub const LC_HEADER_LENGTH_BYTES: usize = 12;
/// DMR CSBK payload length, in bytes, before BPTC framing.
pub const CSBK_LENGTH_BYTES: usize = 12;

/// CRC mask XORed into the last three bytes of a voice LC header before the
/// RS(12,9) parity check, per ETSI TS 102 361-1.
pub const VOICE_LC_HEADER_CRC_MASK: [u8; 3] = [0x96, 0x96, 0x96];
/// CRC mask for a terminator-with-LC.
pub const TERMINATOR_WITH_LC_CRC_MASK: [u8; 3] = [0x99, 0x99, 0x99];
/// CRC mask for a privacy-indicator header.
pub const PI_HEADER_CRC_MASK: [u8; 2] = [0x69, 0x69];
/// CRC mask XORed into a CSBK before/after its CCITT-16 check.
pub const CSBK_CRC_MASK: [u8; 2] = [0xA5, 0xA5];
