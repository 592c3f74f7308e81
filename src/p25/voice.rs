//! P25 voice processor: dispatches on DUID, drives the call session state
//! machine, validates admission, and regenerates frames toward the
//! network. Takes its collaborators (`Network`, `Acl`, `Affiliations`) by
//! mutable reference at each call rather than holding back-pointers to a
//! shared `Control` the way the original source's per-protocol processors
//! did.

use crate::acl::Acl;
use crate::affiliations::Affiliations;
use crate::core::{CallSession, CallState};
use crate::net::Network;

use super::lc::{Lc, Lsd};
use super::trunk::TrunkProcessor;

#[cfg(feature = "dfsi")]
use super::dfsi::record::{FrameType, Ldu1Reassembler};
#[cfg(feature = "dfsi")]
use crate::net::RfOutput;
#[cfg(feature = "dfsi")]
use crate::site::SiteData;

/// P25 Phase-1 data unit ID, identifying which kind of frame follows the
/// frame sync + NID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Duid {
    Hdu,
    Ldu1,
    Tdu,
    Ldu2,
    Tdulc,
    Tsdu,
    Pdu,
}

impl Duid {
    pub fn from_nibble(v: u8) -> Option<Duid> {
        match v {
            0x0 => Some(Duid::Hdu),
            0x5 => Some(Duid::Ldu1),
            0x3 => Some(Duid::Tdu),
            0xA => Some(Duid::Ldu2),
            0xF => Some(Duid::Tdulc),
            0x7 => Some(Duid::Tsdu),
            0xC => Some(Duid::Pdu),
            _ => None,
        }
    }
}

/// Placeholder IMBE vector inserted in place of audio once the RF error
/// rate crosses `silence_threshold`, matching the unencrypted and
/// encrypted "comfort noise" vectors the air interface defines.
pub const P25_NULL_IMBE: [u8; 11] = [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
pub const P25_ENCRYPTED_NULL_IMBE: [u8; 11] =
    [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];

/// Re-embed `RFSS_STS_BCAST` every this many accepted LDU1s while operating
/// voice-on-control (`TrunkProcessor::note_ldu1`).
pub const VOC_LDU1_COUNT: u32 = 3;

/// Embed `EXPLICIT_SOURCE_ID` every `ROAM_LDU1_COUNT + 1` accepted network
/// LDU1s when the peer is on a foreign WACN/system.
pub const ROAM_LDU1_COUNT: u32 = 1;

/// LC opcode for the `EXPLICIT_SOURCE_ID` variant, carried instead of the
/// usual group/unit addressing when relaying a call from a foreign system.
const EXPLICIT_SOURCE_ID_LCO: u8 = 0x09;

/// One LDU's worth of voice frames: 9 IMBE vectors (11 bytes each) plus
/// the LC/encryption-sync and LSD that ride alongside them. The exact
/// interleave/offset layout of a transmitted 216-byte LDU burst is a
/// modem-level concern (`ModemLink`'s province); this is the decoded
/// shape the voice processor operates on.
#[derive(Debug, Clone)]
pub struct LduVoice {
    pub imbe: [[u8; 11]; 9],
}

impl LduVoice {
    pub fn ber(&self, reference: &LduVoice) -> (u64, u64) {
        let mut errs = 0u64;
        let mut bits = 0u64;
        for (a, b) in self.imbe.iter().zip(reference.imbe.iter()) {
            for (x, y) in a.iter().zip(b.iter()) {
                errs += (x ^ y).count_ones() as u64;
                bits += 8;
            }
        }
        (errs, bits)
    }
}

/// Decision the voice processor reached for one received frame, RF or net.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RfOutcome {
    Accepted,
    RejectedAcl,
    RejectedAffiliation,
    RejectedCollision,
    DuplicateLdu1Dropped,
    CallEnded,
}

/// Clocks a 9-byte Message Indicator 64 times through the air interface's
/// LFSR (polynomial taps at bits 7,5 of byte 0; 5 of byte 2; 5 of byte 3; 2
/// of byte 4; 6 of byte 6). Byte index 8 is never part of the shift
/// register and passes through unchanged — this mirrors the reference
/// decoder exactly, which only ever operates on the first 8 bytes of the
/// 9-byte MI field.
pub fn advance_mi(mi: [u8; 9]) -> [u8; 9] {
    let mut next = mi;
    for _ in 0..64 {
        let carry = ((next[0] >> 7)
            ^ (next[0] >> 5)
            ^ (next[2] >> 5)
            ^ (next[3] >> 5)
            ^ (next[4] >> 2)
            ^ (next[6] >> 6))
            & 0x01;
        for i in 0..7 {
            next[i] = ((next[i] & 0x7F) << 1) | (next[i + 1] >> 7);
        }
        next[7] = ((next[7] & 0x7F) << 1) | carry;
    }
    next
}

#[cfg(feature = "dfsi")]
fn ldu_voice_index(frame_type: FrameType) -> Option<usize> {
    match frame_type {
        FrameType::Ldu1Voice1 => Some(0),
        FrameType::Voice2 => Some(1),
        FrameType::Voice3 => Some(2),
        FrameType::Voice4 => Some(3),
        FrameType::Voice5 => Some(4),
        FrameType::Voice6 => Some(5),
        FrameType::Voice7 => Some(6),
        FrameType::Voice8 => Some(7),
        FrameType::Voice9 => Some(8),
        _ => None,
    }
}

/// Per-site P25 voice processor state. `rf_lc`/`net_lc` track the most
/// recently accepted link control on each side so LDU2-without-LC
/// (undecodable LC) can reuse it after advancing the MI, and so a call
/// starting on the other side can be preempted and torn down cleanly.
pub struct VoiceProcessor {
    pub session: CallSession,
    pub rf_lc: Option<Lc>,
    pub net_lc: Option<Lc>,
    pub lsd: Lsd,
    /// Non-authoritative sites only admit RF HDUs addressed to this
    /// talkgroup/unit; ignored when `authoritative` is set.
    pub permitted_dst_id: u32,
    pub rf_last_hdu: u32,
    pub silence_threshold: f64,
    pub verify_affiliation: bool,
    pub authoritative: bool,
    #[cfg(feature = "dfsi")]
    net_ldu1_reassembler: Ldu1Reassembler,
    #[cfg(feature = "dfsi")]
    net_ldu2_reassembler: Ldu1Reassembler,
}

impl VoiceProcessor {
    pub fn new(
        silence_threshold: f64,
        verify_affiliation: bool,
        authoritative: bool,
        permitted_dst_id: u32,
    ) -> Self {
        VoiceProcessor {
            session: CallSession::new(),
            rf_lc: None,
            net_lc: None,
            lsd: Lsd::default(),
            permitted_dst_id,
            rf_last_hdu: 0,
            silence_threshold,
            verify_affiliation,
            authoritative,
            #[cfg(feature = "dfsi")]
            net_ldu1_reassembler: Ldu1Reassembler::new(),
            #[cfg(feature = "dfsi")]
            net_ldu2_reassembler: Ldu1Reassembler::new(),
        }
    }

    /// Processes one RF-side DUID. `acl`/`affiliations`/`network` are the
    /// capabilities this call needs, threaded in per call rather than
    /// stored. `trunk` receives the periodic `RFSS_STS_BCAST` hook on
    /// accepted LDU1s (voice-on-control only).
    #[allow(clippy::too_many_arguments)]
    pub fn process_rf(
        &mut self,
        duid: Duid,
        lc: Option<Lc>,
        lsd: Lsd,
        voice: Option<LduVoice>,
        acl: &dyn Acl,
        affiliations: &mut dyn Affiliations,
        network: &mut dyn Network,
        trunk: &mut TrunkProcessor,
    ) -> RfOutcome {
        match duid {
            Duid::Hdu => {
                let Some(lc) = lc else {
                    return RfOutcome::RejectedAcl;
                };

                if !self.authoritative && lc.dst_id != self.permitted_dst_id {
                    return RfOutcome::RejectedAcl;
                }

                if self.session.net_state != CallState::Idle {
                    if self.session.net_last_dst == lc.dst_id {
                        return RfOutcome::RejectedCollision;
                    }

                    if let Some(net_lc) = &self.net_lc {
                        if !self.authoritative {
                            affiliations.release_grant(net_lc.dst_id);
                        }
                        network.write_p25_tdu(net_lc);
                    }
                    self.session.net_state = CallState::Idle;
                    self.net_lc = None;
                }

                self.session.reset_rf_call();
                self.session.rf_state = CallState::Rf;
                self.session.last_duid = duid_code(Duid::Hdu);
                self.rf_last_hdu = lc.dst_id;
                RfOutcome::Accepted
            }
            Duid::Ldu1 => {
                let Some(lc) = lc else {
                    return RfOutcome::RejectedAcl;
                };

                if self.session.rf_net_collision() {
                    return RfOutcome::RejectedCollision;
                }

                if !acl.validate_src_id(lc.src_id) || !acl.validate_tg_id(lc.dst_id) {
                    return RfOutcome::RejectedAcl;
                }

                if lc.group && self.verify_affiliation && !affiliations.is_group_aff(lc.src_id, lc.dst_id)
                {
                    return RfOutcome::RejectedAffiliation;
                }

                if self.session.last_duid == duid_code(Duid::Ldu1)
                    && self.session.rf_last_dst == lc.dst_id
                {
                    return RfOutcome::DuplicateLdu1Dropped;
                }

                self.session.voc_ldu1_count += 1;
                self.session.rf_last_dst = lc.dst_id;
                self.session.last_duid = duid_code(Duid::Ldu1);
                self.session.rf_frames += 1;

                if lc.group {
                    affiliations.touch_grant(lc.dst_id);
                }

                if trunk.note_ldu1() {
                    trunk.emit_rfss_sts_bcast(network);
                }

                let mut voice = voice;
                if let Some(ref mut v) = voice {
                    if self.session.ber_percent() > self.silence_threshold {
                        let filler = if lc.encrypted {
                            P25_ENCRYPTED_NULL_IMBE
                        } else {
                            P25_NULL_IMBE
                        };
                        for slot in v.imbe.iter_mut() {
                            *slot = filler;
                        }
                    }
                }

                let frame = voice.map(|v| v.imbe.concat()).unwrap_or_default();
                network.write_p25_ldu1(&lc, &lsd, &frame);
                self.rf_lc = Some(lc);
                self.lsd = lsd;
                RfOutcome::Accepted
            }
            Duid::Ldu2 => {
                let lc = lc.or_else(|| {
                    self.rf_lc.clone().map(|mut lc| {
                        lc.mi = advance_mi(lc.mi);
                        lc
                    })
                });
                let Some(lc) = lc else {
                    return RfOutcome::RejectedAcl;
                };

                self.session.rf_frames += 1;
                self.session.last_duid = duid_code(Duid::Ldu2);

                let frame = voice.map(|v| v.imbe.concat()).unwrap_or_default();
                network.write_p25_ldu2(&lc, &lsd, &frame);
                self.rf_lc = Some(lc);
                self.lsd = lsd;
                RfOutcome::Accepted
            }
            Duid::Tdu | Duid::Tdulc => {
                if let Some(lc) = &self.rf_lc {
                    if !self.authoritative {
                        affiliations.release_grant(lc.dst_id);
                    }
                    network.write_p25_tdu(lc);
                }
                self.session.rf_state = CallState::Idle;
                self.session.last_duid = duid_code(duid);
                RfOutcome::CallEnded
            }
            Duid::Tsdu | Duid::Pdu => RfOutcome::Accepted,
        }
    }

    /// Processes one network-side DUID arriving over DFSI conveyance.
    /// `frame_type`/`imbe` identify which of the 9 per-LDU voice
    /// sub-records this call carries (`None` for non-voice DUIDs); once
    /// all 9 have arrived for the active LDU, the regenerated frame is
    /// written out to `rf_output`. `local_site`/`peer_net_id`/
    /// `peer_sys_id` drive the `EXPLICIT_SOURCE_ID` embedding for roamers.
    #[cfg(feature = "dfsi")]
    #[allow(clippy::too_many_arguments)]
    pub fn process_network(
        &mut self,
        duid: Duid,
        frame_type: Option<FrameType>,
        lc: Option<Lc>,
        lsd: Lsd,
        imbe: Option<[u8; 11]>,
        local_site: &SiteData,
        peer_net_id: u32,
        peer_sys_id: u16,
        acl: &dyn Acl,
        affiliations: &mut dyn Affiliations,
        rf_output: &mut dyn RfOutput,
    ) -> RfOutcome {
        match duid {
            Duid::Hdu => {
                let Some(lc) = lc else {
                    return RfOutcome::RejectedAcl;
                };

                if self.session.rf_state != CallState::Idle {
                    if self.session.rf_last_dst == lc.dst_id {
                        return RfOutcome::RejectedCollision;
                    }

                    if let Some(rf_lc) = &self.rf_lc {
                        if !self.authoritative {
                            affiliations.release_grant(rf_lc.dst_id);
                        }
                        rf_output.write_p25_tdu(rf_lc);
                    }
                    self.session.rf_state = CallState::Idle;
                    self.rf_lc = None;
                }

                self.session.reset_net_call();
                self.session.net_state = CallState::Net;
                self.session.net_last_dst = lc.dst_id;
                self.net_lc = Some(lc);
                self.net_ldu1_reassembler = Ldu1Reassembler::new();
                self.net_ldu2_reassembler = Ldu1Reassembler::new();
                RfOutcome::Accepted
            }
            Duid::Ldu1 => {
                let Some(mut lc) = lc.or_else(|| self.net_lc.clone()) else {
                    return RfOutcome::RejectedAcl;
                };

                if !acl.validate_src_id(lc.src_id) || !acl.validate_tg_id(lc.dst_id) {
                    return RfOutcome::RejectedAcl;
                }

                if lc.group && self.verify_affiliation && !affiliations.is_group_aff(lc.src_id, lc.dst_id)
                {
                    return RfOutcome::RejectedAffiliation;
                }

                self.session.net_frames += 1;
                self.session.net_last_dst = lc.dst_id;

                if lc.group {
                    affiliations.touch_grant(lc.dst_id);
                }

                if local_site.is_foreign(peer_net_id, peer_sys_id) {
                    self.session.roam_ldu1_count += 1;
                    if self.session.roam_ldu1_count > ROAM_LDU1_COUNT {
                        self.session.roam_ldu1_count = 0;
                        lc.lco = EXPLICIT_SOURCE_ID_LCO;
                    }
                }

                if let (Some(frame_type), Some(imbe)) = (frame_type, imbe) {
                    if let Some(index) = ldu_voice_index(frame_type) {
                        self.net_ldu1_reassembler.accept(index, imbe);
                    }
                }

                if self.net_ldu1_reassembler.complete() {
                    let buf = std::mem::take(&mut self.net_ldu1_reassembler)
                        .into_ldu1()
                        .unwrap_or([0u8; 225]);
                    rf_output.write_p25_ldu1(&lc, &lsd, &buf);
                }

                self.net_lc = Some(lc);
                self.lsd = lsd;
                RfOutcome::Accepted
            }
            Duid::Ldu2 => {
                let lc = lc.or_else(|| {
                    self.net_lc.clone().map(|mut lc| {
                        lc.mi = advance_mi(lc.mi);
                        lc
                    })
                });
                let Some(lc) = lc else {
                    return RfOutcome::RejectedAcl;
                };

                self.session.net_frames += 1;

                if let (Some(frame_type), Some(imbe)) = (frame_type, imbe) {
                    if let Some(index) = ldu_voice_index(frame_type) {
                        self.net_ldu2_reassembler.accept(index, imbe);
                    }
                }

                if self.net_ldu2_reassembler.complete() {
                    let buf = std::mem::take(&mut self.net_ldu2_reassembler)
                        .into_ldu1()
                        .unwrap_or([0u8; 225]);
                    rf_output.write_p25_ldu2(&lc, &lsd, &buf);
                }

                self.net_lc = Some(lc);
                self.lsd = lsd;
                RfOutcome::Accepted
            }
            Duid::Tdu | Duid::Tdulc => {
                if let Some(lc) = &self.net_lc {
                    if !self.authoritative {
                        affiliations.release_grant(lc.dst_id);
                    }
                    rf_output.write_p25_tdu(lc);
                }
                self.session.net_state = CallState::Idle;
                RfOutcome::CallEnded
            }
            Duid::Tsdu | Duid::Pdu => RfOutcome::Accepted,
        }
    }
}

fn duid_code(duid: Duid) -> u8 {
    match duid {
        Duid::Hdu => 0x0,
        Duid::Ldu1 => 0x5,
        Duid::Tdu => 0x3,
        Duid::Ldu2 => 0xA,
        Duid::Tdulc => 0xF,
        Duid::Tsdu => 0x7,
        Duid::Pdu => 0xC,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acl::PermitAll;
    use crate::affiliations::MemoryAffiliations;
    use crate::net::traits::RecordingNetwork;
    use crate::site::SiteData;

    fn sample_lc(group: bool, encrypted: bool) -> Lc {
        Lc {
            lco: 0,
            mfid: 0,
            src_id: 9_000_001,
            dst_id: 10_001,
            group,
            emergency: false,
            encrypted,
            priority: 2,
            algo_id: 0x80,
            key_id: 0,
            mi: [0; 9],
        }
    }

    fn sample_voice() -> LduVoice {
        LduVoice {
            imbe: [[0xAB; 11]; 9],
        }
    }

    fn trunk() -> TrunkProcessor {
        TrunkProcessor::new(SiteData::new(0x12345, 0x123, 1, 1, 1))
    }

    #[test]
    fn ldu1_accepted_and_written_to_network() {
        let mut proc = VoiceProcessor::new(5.0, false, false, 10_001);
        let acl = PermitAll;
        let mut affs = MemoryAffiliations::new();
        let mut net = RecordingNetwork::default();
        let mut trk = trunk();

        let lc = sample_lc(true, false);
        let outcome = proc.process_rf(
            Duid::Hdu,
            Some(lc.clone()),
            Lsd::default(),
            None,
            &acl,
            &mut affs,
            &mut net,
            &mut trk,
        );
        assert_eq!(outcome, RfOutcome::Accepted);

        let outcome = proc.process_rf(
            Duid::Ldu1,
            Some(lc.clone()),
            Lsd::default(),
            Some(sample_voice()),
            &acl,
            &mut affs,
            &mut net,
            &mut trk,
        );
        assert_eq!(outcome, RfOutcome::Accepted);
        assert_eq!(net.ldu1_writes.len(), 1);
        assert!(affs.is_granted(lc.dst_id));
    }

    #[test]
    fn repeated_ldu1_same_dst_dropped() {
        let mut proc = VoiceProcessor::new(5.0, false, false, 10_001);
        let acl = PermitAll;
        let mut affs = MemoryAffiliations::new();
        let mut net = RecordingNetwork::default();
        let mut trk = trunk();
        let lc = sample_lc(true, false);

        proc.process_rf(
            Duid::Hdu,
            Some(lc.clone()),
            Lsd::default(),
            None,
            &acl,
            &mut affs,
            &mut net,
            &mut trk,
        );
        proc.process_rf(
            Duid::Ldu1,
            Some(lc.clone()),
            Lsd::default(),
            None,
            &acl,
            &mut affs,
            &mut net,
            &mut trk,
        );
        let outcome = proc.process_rf(
            Duid::Ldu1,
            Some(lc.clone()),
            Lsd::default(),
            None,
            &acl,
            &mut affs,
            &mut net,
            &mut trk,
        );
        assert_eq!(outcome, RfOutcome::DuplicateLdu1Dropped);
    }

    #[test]
    fn tdu_releases_grant_when_not_authoritative() {
        let mut proc = VoiceProcessor::new(5.0, false, false, 10_001);
        let acl = PermitAll;
        let mut affs = MemoryAffiliations::new();
        let mut net = RecordingNetwork::default();
        let mut trk = trunk();
        let lc = sample_lc(true, false);

        proc.process_rf(
            Duid::Hdu,
            Some(lc.clone()),
            Lsd::default(),
            None,
            &acl,
            &mut affs,
            &mut net,
            &mut trk,
        );
        proc.process_rf(
            Duid::Ldu1,
            Some(lc.clone()),
            Lsd::default(),
            None,
            &acl,
            &mut affs,
            &mut net,
            &mut trk,
        );
        assert!(affs.is_granted(lc.dst_id));

        proc.process_rf(
            Duid::Tdu,
            None,
            Lsd::default(),
            None,
            &acl,
            &mut affs,
            &mut net,
            &mut trk,
        );
        assert!(!affs.is_granted(lc.dst_id));
        assert_eq!(net.tdu_writes.len(), 1);
    }

    #[test]
    fn hdu_rejected_when_not_authoritative_and_dst_not_permitted() {
        let mut proc = VoiceProcessor::new(5.0, false, false, 10_001);
        let acl = PermitAll;
        let mut affs = MemoryAffiliations::new();
        let mut net = RecordingNetwork::default();
        let mut trk = trunk();

        let lc = sample_lc(true, false);
        let outcome = proc.process_rf(
            Duid::Hdu,
            Some(Lc { dst_id: 99_999, ..lc }),
            Lsd::default(),
            None,
            &acl,
            &mut affs,
            &mut net,
            &mut trk,
        );
        assert_eq!(outcome, RfOutcome::RejectedAcl);
    }

    #[test]
    fn rf_hdu_preempts_an_active_network_call_on_a_different_dst() {
        let mut proc = VoiceProcessor::new(5.0, false, true, 0);
        let acl = PermitAll;
        let mut affs = MemoryAffiliations::new();
        let mut net = RecordingNetwork::default();
        let mut trk = trunk();

        proc.net_lc = Some(sample_lc(true, false));
        proc.session.net_state = CallState::Net;
        proc.session.net_last_dst = 10_001;

        let rf_lc = Lc {
            dst_id: 20_002,
            ..sample_lc(true, false)
        };
        let outcome = proc.process_rf(
            Duid::Hdu,
            Some(rf_lc),
            Lsd::default(),
            None,
            &acl,
            &mut affs,
            &mut net,
            &mut trk,
        );
        assert_eq!(outcome, RfOutcome::Accepted);
        assert_eq!(net.tdu_writes.len(), 1, "the preempted network call gets a TDU");
        assert_eq!(proc.session.net_state, CallState::Idle);
    }

    #[test]
    fn rf_hdu_on_same_dst_as_active_network_call_is_a_collision() {
        let mut proc = VoiceProcessor::new(5.0, false, true, 0);
        let acl = PermitAll;
        let mut affs = MemoryAffiliations::new();
        let mut net = RecordingNetwork::default();
        let mut trk = trunk();

        proc.session.net_state = CallState::Net;
        proc.session.net_last_dst = 10_001;

        let outcome = proc.process_rf(
            Duid::Hdu,
            Some(sample_lc(true, false)),
            Lsd::default(),
            None,
            &acl,
            &mut affs,
            &mut net,
            &mut trk,
        );
        assert_eq!(outcome, RfOutcome::RejectedCollision);
    }

    #[test]
    fn every_third_ldu1_embeds_rfss_sts_bcast() {
        let mut proc = VoiceProcessor::new(5.0, false, true, 0);
        let acl = PermitAll;
        let mut affs = MemoryAffiliations::new();
        let mut net = RecordingNetwork::default();
        let mut trk = trunk();
        let lc = sample_lc(true, false);

        proc.process_rf(
            Duid::Hdu,
            Some(lc.clone()),
            Lsd::default(),
            None,
            &acl,
            &mut affs,
            &mut net,
            &mut trk,
        );
        for dst in [10_001u32, 10_002, 10_003] {
            proc.process_rf(
                Duid::Ldu1,
                Some(Lc { dst_id: dst, ..lc.clone() }),
                Lsd::default(),
                None,
                &acl,
                &mut affs,
                &mut net,
                &mut trk,
            );
        }
        // one grant-adjacent write per LDU1 plus one RFSS_STS_BCAST on the third
        assert_eq!(net.tsdu_writes.len(), 1);
    }

    #[test]
    fn ldu2_with_undecodable_lc_reuses_last_lc_with_advanced_mi() {
        let mut proc = VoiceProcessor::new(5.0, false, true, 0);
        let acl = PermitAll;
        let mut affs = MemoryAffiliations::new();
        let mut net = RecordingNetwork::default();
        let mut trk = trunk();
        let lc = sample_lc(true, false);

        proc.process_rf(
            Duid::Hdu,
            Some(lc.clone()),
            Lsd::default(),
            None,
            &acl,
            &mut affs,
            &mut net,
            &mut trk,
        );
        proc.process_rf(
            Duid::Ldu1,
            Some(lc.clone()),
            Lsd::default(),
            None,
            &acl,
            &mut affs,
            &mut net,
            &mut trk,
        );

        let outcome = proc.process_rf(
            Duid::Ldu2,
            None,
            Lsd::default(),
            None,
            &acl,
            &mut affs,
            &mut net,
            &mut trk,
        );
        assert_eq!(outcome, RfOutcome::Accepted);
        assert_eq!(net.ldu2_writes.len(), 1);
        let (written_lc, _) = &net.ldu2_writes[0];
        assert_eq!(written_lc.mi, advance_mi(lc.mi));
        assert_ne!(written_lc.mi, lc.mi);
    }

    #[test]
    fn advance_mi_is_deterministic_from_a_known_seed() {
        let seed = [0x01u8; 9];
        let next = advance_mi(seed);
        assert_eq!(
            next,
            [0x27, 0x27, 0x6b, 0x6f, 0x37, 0xae, 0x06, 0x8f, 0x01]
        );
        // byte 8 is never part of the shift register
        let seed2 = [0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0xAB];
        assert_eq!(advance_mi(seed2)[8], 0xAB);
    }
}
