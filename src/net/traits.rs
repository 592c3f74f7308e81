//! The `Network` capability: everything the voice/trunk processors need
//! from the peer-protocol layer, which is explicitly out of scope per
//! spec §1 (keepalive, auth handshake, peer lists are someone else's
//! problem; the core only calls these methods).

use crate::p25;

pub trait Network {
    fn write_p25_ldu1(&mut self, lc: &p25::lc::Lc, lsd: &p25::lc::Lsd, frame: &[u8]) -> bool;
    fn write_p25_ldu2(&mut self, lc: &p25::lc::Lc, lsd: &p25::lc::Lsd, frame: &[u8]) -> bool;
    fn write_p25_tdu(&mut self, lc: &p25::lc::Lc) -> bool;
    fn write_p25_tsdu(&mut self, frame: &[u8]) -> bool;
    fn write_dmr(&mut self, slot: u8, frame: &[u8]) -> bool;
    fn write_nxdn(&mut self, frame: &[u8]) -> bool;
    fn reset_p25(&mut self);
    fn reset_dmr(&mut self);
    fn reset_nxdn(&mut self);
}

/// The RF-side counterpart to `Network`: what the voice processor needs to
/// regenerate a network-originated call back out toward the RF side (spec
/// §4.5's network LDU1/LDU2/TDU path). Kept separate from `Network` because
/// the two sides are driven by different call legs and a peer may implement
/// only one.
pub trait RfOutput {
    fn write_p25_ldu1(&mut self, lc: &p25::lc::Lc, lsd: &p25::lc::Lsd, frame: &[u8]) -> bool;
    fn write_p25_ldu2(&mut self, lc: &p25::lc::Lc, lsd: &p25::lc::Lsd, frame: &[u8]) -> bool;
    fn write_p25_tdu(&mut self, lc: &p25::lc::Lc) -> bool;
}

/// In-memory `RfOutput` double used by tests, mirroring `RecordingNetwork`.
#[derive(Debug, Default)]
pub struct RecordingRfOutput {
    pub ldu1_writes: Vec<(p25::lc::Lc, Vec<u8>)>,
    pub ldu2_writes: Vec<(p25::lc::Lc, Vec<u8>)>,
    pub tdu_writes: Vec<p25::lc::Lc>,
}

impl RfOutput for RecordingRfOutput {
    fn write_p25_ldu1(&mut self, lc: &p25::lc::Lc, _lsd: &p25::lc::Lsd, frame: &[u8]) -> bool {
        self.ldu1_writes.push((lc.clone(), frame.to_vec()));
        true
    }

    fn write_p25_ldu2(&mut self, lc: &p25::lc::Lc, _lsd: &p25::lc::Lsd, frame: &[u8]) -> bool {
        self.ldu2_writes.push((lc.clone(), frame.to_vec()));
        true
    }

    fn write_p25_tdu(&mut self, lc: &p25::lc::Lc) -> bool {
        self.tdu_writes.push(lc.clone());
        true
    }
}

/// In-memory `Network` double used by tests: records every write instead
/// of transmitting it, so scenario tests can assert on call sequences
/// (spec §8 scenario S4 in particular).
#[derive(Debug, Default)]
pub struct RecordingNetwork {
    pub ldu1_writes: Vec<(p25::lc::Lc, Vec<u8>)>,
    pub ldu2_writes: Vec<(p25::lc::Lc, Vec<u8>)>,
    pub tdu_writes: Vec<p25::lc::Lc>,
    pub tsdu_writes: Vec<Vec<u8>>,
    pub dmr_writes: Vec<(u8, Vec<u8>)>,
    pub nxdn_writes: Vec<Vec<u8>>,
    pub p25_resets: u32,
    pub dmr_resets: u32,
    pub nxdn_resets: u32,
}

impl Network for RecordingNetwork {
    fn write_p25_ldu1(&mut self, lc: &p25::lc::Lc, _lsd: &p25::lc::Lsd, frame: &[u8]) -> bool {
        self.ldu1_writes.push((lc.clone(), frame.to_vec()));
        true
    }

    fn write_p25_ldu2(&mut self, lc: &p25::lc::Lc, _lsd: &p25::lc::Lsd, frame: &[u8]) -> bool {
        self.ldu2_writes.push((lc.clone(), frame.to_vec()));
        true
    }

    fn write_p25_tdu(&mut self, lc: &p25::lc::Lc) -> bool {
        self.tdu_writes.push(lc.clone());
        true
    }

    fn write_p25_tsdu(&mut self, frame: &[u8]) -> bool {
        self.tsdu_writes.push(frame.to_vec());
        true
    }

    fn write_dmr(&mut self, slot: u8, frame: &[u8]) -> bool {
        self.dmr_writes.push((slot, frame.to_vec()));
        true
    }

    fn write_nxdn(&mut self, frame: &[u8]) -> bool {
        self.nxdn_writes.push(frame.to_vec());
        true
    }

    fn reset_p25(&mut self) {
        self.p25_resets += 1;
    }

    fn reset_dmr(&mut self) {
        self.dmr_resets += 1;
    }

    fn reset_nxdn(&mut self) {
        self.nxdn_resets += 1;
    }
}
