//! DFSI Start/Stop-of-stream record (spec §4.7).
//!
//! Shares the `StartStop` frame type with [`super::record`]; this module
//! only interprets its 2-byte body. Per spec, a Stop must be transmitted
//! twice — [`StopGuard`] tracks that so the link layer can't forget.

use super::record::{FrameType, Record};
use crate::error::CodecError;

pub const RT_ENABLED: u8 = 0x02;
pub const RT_DISABLED: u8 = 0x04;
pub const START: u8 = 0x0C;
pub const STOP: u8 = 0x25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RtFlag {
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartStopKind {
    Start,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartStopRecord {
    pub kind: StartStopKind,
    pub rt: RtFlag,
}

impl StartStopRecord {
    pub fn encode(&self) -> Record {
        let kind_byte = match self.kind {
            StartStopKind::Start => START,
            StartStopKind::Stop => STOP,
        };
        let rt_byte = match self.rt {
            RtFlag::Enabled => RT_ENABLED,
            RtFlag::Disabled => RT_DISABLED,
        };
        Record::new(FrameType::StartStop, vec![kind_byte, rt_byte])
            .expect("StartStop body is always 2 bytes")
    }

    pub fn decode(record: &Record) -> Result<StartStopRecord, CodecError> {
        if record.frame_type != FrameType::StartStop {
            return Err(CodecError::UnknownOpcode(record.frame_type.to_byte()));
        }
        let kind = match record.body[0] {
            START => StartStopKind::Start,
            STOP => StartStopKind::Stop,
            other => return Err(CodecError::UnknownOpcode(other)),
        };
        let rt = match record.body[1] {
            RT_ENABLED => RtFlag::Enabled,
            RT_DISABLED => RtFlag::Disabled,
            other => return Err(CodecError::UnknownOpcode(other)),
        };
        Ok(StartStopRecord { kind, rt })
    }
}

/// Enforces the "Stop must be sent twice" rule on the transmit side: the
/// first `Stop` queued is held back until a second one is requested, at
/// which point both are emitted back-to-back.
#[derive(Debug, Default)]
pub struct StopGuard {
    pending: u8,
}

impl StopGuard {
    pub fn new() -> Self {
        StopGuard::default()
    }

    /// Registers a stop request; returns `true` once the second one has
    /// arrived and both are ready to transmit.
    pub fn note_stop(&mut self) -> bool {
        self.pending += 1;
        self.pending >= 2
    }

    pub fn reset(&mut self) {
        self.pending = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_roundtrip() {
        let rec = StartStopRecord {
            kind: StartStopKind::Start,
            rt: RtFlag::Enabled,
        };
        let encoded = rec.encode();
        assert_eq!(StartStopRecord::decode(&encoded).unwrap(), rec);
    }

    #[test]
    fn stop_roundtrip() {
        let rec = StartStopRecord {
            kind: StartStopKind::Stop,
            rt: RtFlag::Disabled,
        };
        let encoded = rec.encode();
        assert_eq!(StartStopRecord::decode(&encoded).unwrap(), rec);
    }

    #[test]
    fn single_stop_is_not_enough() {
        let mut guard = StopGuard::new();
        assert!(!guard.note_stop());
        assert!(guard.note_stop());
    }

    #[test]
    fn guard_resets_after_pair() {
        let mut guard = StopGuard::new();
        guard.note_stop();
        guard.note_stop();
        guard.reset();
        assert!(!guard.note_stop());
    }
}
