//! Per-protocol call state shared by the RF and network halves of a call.
//! One `CallSession` lives per protocol slot/channel for the life of the
//! process; voice/trunk processors mutate it, nothing else does.

/// Which side of a call is active: idle, receiving from the RF side, or
/// receiving from the network side. Traffic collision is caught by trying
/// to move from one active state directly to the other active state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Idle,
    Rf,
    Net,
}

/// Tracks one call's RF/network state, frame/error counters, and hang
/// timers. The voice processor's `process_rf`/`process_network` entry
/// points are the only code that should mutate this.
#[derive(Debug, Clone)]
pub struct CallSession {
    pub rf_state: CallState,
    pub net_state: CallState,
    pub last_duid: u8,
    pub rf_last_dst: u32,
    pub net_last_dst: u32,
    pub rf_frames: u64,
    pub rf_errs: u64,
    pub rf_bits: u64,
    pub net_frames: u64,
    pub net_lost: u64,
    pub voc_ldu1_count: u32,
    pub roam_ldu1_count: u32,
    pub tg_hang_timer_ms: u64,
    pub timeout_timer_ms: u64,
}

impl CallSession {
    pub fn new() -> Self {
        CallSession {
            rf_state: CallState::Idle,
            net_state: CallState::Idle,
            last_duid: 0,
            rf_last_dst: 0,
            net_last_dst: 0,
            rf_frames: 0,
            rf_errs: 0,
            rf_bits: 0,
            net_frames: 0,
            net_lost: 0,
            voc_ldu1_count: 0,
            roam_ldu1_count: 0,
            tg_hang_timer_ms: 0,
            timeout_timer_ms: 0,
        }
    }

    /// Bit error rate over the RF call so far, as a percentage. `0.0` when
    /// no RF bits have been counted yet (call hasn't started).
    pub fn ber_percent(&self) -> f64 {
        if self.rf_bits == 0 {
            0.0
        } else {
            (self.rf_errs as f64 / self.rf_bits as f64) * 100.0
        }
    }

    /// Resets per-call counters at the start of a new RF call, keeping the
    /// hang timers (those outlive the call that set them).
    pub fn reset_rf_call(&mut self) {
        self.rf_frames = 0;
        self.rf_errs = 0;
        self.rf_bits = 0;
        self.voc_ldu1_count = 0;
        self.roam_ldu1_count = 0;
    }

    /// The network-side counterpart to `reset_rf_call`.
    pub fn reset_net_call(&mut self) {
        self.net_frames = 0;
        self.net_lost = 0;
        self.roam_ldu1_count = 0;
    }

    /// True if the RF side is mid-call and the network side tries to start
    /// a different call: the condition the voice processor must drop new
    /// network traffic for.
    pub fn rf_net_collision(&self) -> bool {
        self.rf_state == CallState::Rf && self.net_state == CallState::Net
    }
}

impl Default for CallSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ber_percent_zero_before_any_bits() {
        let session = CallSession::new();
        assert_eq!(session.ber_percent(), 0.0);
    }

    #[test]
    fn ber_percent_computes_ratio() {
        let mut session = CallSession::new();
        session.rf_bits = 1000;
        session.rf_errs = 25;
        assert!((session.ber_percent() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn collision_detected_when_both_sides_active() {
        let mut session = CallSession::new();
        session.rf_state = CallState::Rf;
        session.net_state = CallState::Net;
        assert!(session.rf_net_collision());
    }
}
