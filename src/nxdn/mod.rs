//! NXDN protocol layer: LICH preamble, SACCH, CAC (Common Access Channel)
//! codecs, and the trunk processor built on them.

pub mod cac;
pub mod lich;
pub mod sacch;
pub mod trunk;

pub use cac::{Cac, CacMessage};
pub use lich::{Lich, LichDirection, LichFunction};
pub use sacch::Sacch;
pub use trunk::NxdnTrunkProcessor;
