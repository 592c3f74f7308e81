//! DFSI (Digital Fixed Station Interface) conveyance: the parallel
//! record-framed transport a fixed-station peer uses instead of RF,
//! plus the FSC control protocol that selects its channel (spec §4.7).

pub mod fsc;
pub mod record;
pub mod start_stop;

pub use fsc::{AckResponse, FscHeader, FscMessage, FscSession};
pub use record::{FrameType, Ldu1Reassembler, Record};
pub use start_stop::{RtFlag, StartStopKind, StartStopRecord, StopGuard};
