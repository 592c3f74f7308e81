//! P25 Phase-1 protocol layer: link control, trunking signalling, PDU data
//! headers, and the voice/trunk call processors built on top of them.

pub mod data_header;
#[cfg(feature = "dfsi")]
pub mod dfsi;
pub mod lc;
pub mod trunk;
pub mod tsbk;
pub mod voice;

pub use data_header::{DataHeader, Format};
pub use lc::{EncryptionSync, Lc, Lsd};
pub use trunk::{GrantOutcome, TrunkProcessor};
pub use tsbk::{RegResponse, TsbkHeader, TsbkVariant};
pub use voice::{Duid, LduVoice, RfOutcome, VoiceProcessor};
