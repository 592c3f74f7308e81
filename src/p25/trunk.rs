//! P25 trunk processor: TSBK/AMBT channel-grant admission, affiliation,
//! and the control-channel broadcasts that go with them. The core treats
//! `Affiliations` mutation as this processor's exclusive privilege.

use crate::acl::Acl;
use crate::affiliations::Affiliations;
use crate::net::Network;
use crate::site::{IdenTable, SiteData};

use super::tsbk::{RegResponse, TsbkHeader, TsbkVariant};

const GRP_VCH_GRANT_LCO: u8 = 0x00;
const UU_VCH_GRANT_LCO: u8 = 0x04;
const SITE_INFO_LCO: u8 = 0x3B;
const SRV_INFO_LCO: u8 = 0x38;
const RFSS_STS_BCAST_LCO: u8 = 0x3A;
const U_REG_CMD_LCO: u8 = 0x2D;
const U_REG_RSP_LCO: u8 = 0x2C;
const LOC_REG_RSP_LCO: u8 = 0x2B;
const GRP_AFF_RSP_LCO: u8 = 0x28;

fn broadcast_header(lco: u8) -> TsbkHeader {
    TsbkHeader {
        last_block: true,
        protect: false,
        lco,
        mfid: 0,
    }
}

/// Disposition the trunk processor reached for one channel request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantOutcome {
    Granted { channel_no: u16 },
    Denied,
    Queued,
    NoChannelAvailable,
}

/// Processes TSBK/AMBT channel requests and owns the affiliation table on
/// the trunk processor's behalf.
pub struct TrunkProcessor {
    pub site: SiteData,
    pub voc_ldu1_count: u32,
    /// Control channel parameters the periodic broadcasts advertise.
    /// Voice-on-control deployments set these once at startup; left at
    /// zero otherwise (the broadcasts are simply never emitted).
    pub control_channel_no: u16,
    pub lra: u8,
    pub service_class: u8,
}

impl TrunkProcessor {
    pub fn new(site: SiteData) -> Self {
        TrunkProcessor {
            site,
            voc_ldu1_count: 0,
            control_channel_no: 0,
            lra: 0,
            service_class: 0,
        }
    }

    /// Handles an inbound `GRP_VCH_REQ`: validates ACL, resolves a free
    /// channel via `idens`, grants or denies, and regenerates the grant
    /// TSBK toward the network.
    pub fn process_group_request(
        &mut self,
        req: &TsbkVariant,
        channel_id: u8,
        acl: &dyn Acl,
        affiliations: &mut dyn Affiliations,
        idens: &dyn IdenTable,
        network: &mut dyn Network,
    ) -> GrantOutcome {
        let TsbkVariant::IospGrpVchReq {
            service_options,
            group_id,
            src_id,
            ..
        } = req
        else {
            return GrantOutcome::Denied;
        };

        if !acl.validate_src_id(*src_id) || !acl.validate_tg_id(*group_id as u32) {
            return GrantOutcome::Denied;
        }

        if affiliations.is_granted(*group_id as u32) {
            return GrantOutcome::Queued;
        }

        let Some(entry) = idens.lookup(channel_id) else {
            return GrantOutcome::NoChannelAvailable;
        };
        let channel_no = (channel_id as u16) << 12;
        let _ = entry;

        affiliations.touch_grant(*group_id as u32);

        let grant = TsbkVariant::OspGrpVchGrant {
            header: TsbkHeader {
                last_block: true,
                protect: false,
                lco: GRP_VCH_GRANT_LCO,
                mfid: 0,
            },
            service_options: *service_options,
            channel_no,
            group_id: *group_id,
            src_id: *src_id,
        };
        network.write_p25_tsdu(&grant.to_bytes());

        GrantOutcome::Granted { channel_no }
    }

    /// Handles an inbound unit-to-unit request the same way, without
    /// consulting group affiliation (unit calls aren't group-affiliated).
    pub fn process_unit_request(
        &mut self,
        dst_id: u32,
        src_id: u32,
        service_options: u8,
        channel_id: u8,
        acl: &dyn Acl,
        idens: &dyn IdenTable,
        network: &mut dyn Network,
    ) -> GrantOutcome {
        if !acl.validate_src_id(src_id) || !acl.validate_tg_id(dst_id) {
            return GrantOutcome::Denied;
        }

        let Some(entry) = idens.lookup(channel_id) else {
            return GrantOutcome::NoChannelAvailable;
        };
        let channel_no = (channel_id as u16) << 12;
        let _ = entry;

        let grant = TsbkVariant::OspUuVchGrant {
            header: TsbkHeader {
                last_block: true,
                protect: false,
                lco: UU_VCH_GRANT_LCO,
                mfid: 0,
            },
            service_options,
            channel_no,
            dst_id,
            src_id,
        };
        network.write_p25_tsdu(&grant.to_bytes());

        GrantOutcome::Granted { channel_no }
    }

    /// Releases a group's grant at call end (TDU/TDULC), per spec's
    /// cancellation order: stop timers, release grant, reset LC, reset
    /// queues. This processor is only responsible for the grant release
    /// step.
    pub fn release(&mut self, tg_id: u32, affiliations: &mut dyn Affiliations) {
        affiliations.release_grant(tg_id);
    }

    /// Called once per accepted LDU1 by the voice processor; every
    /// `VOC_LDU1_COUNT` calls, the caller should additionally embed an
    /// `RFSS_STS_BCAST` (voice-on-control operation only).
    pub fn note_ldu1(&mut self) -> bool {
        self.voc_ldu1_count += 1;
        self.voc_ldu1_count % 3 == 0
    }

    /// Broadcasts `SITE_INFO`: this site's system id, RFSS/site id, and the
    /// control channel number.
    pub fn emit_site_info(&self, network: &mut dyn Network) {
        let tsbk = TsbkVariant::SiteInfo {
            header: broadcast_header(SITE_INFO_LCO),
            lra: self.lra,
            sys_id: self.site.sys_id,
            rfss_id: self.site.rfss_id,
            site_id: self.site.site_id,
            channel_no: self.control_channel_no,
        };
        network.write_p25_tsdu(&tsbk.to_bytes());
    }

    /// Broadcasts `SRV_INFO`: which services this system advertises.
    pub fn emit_srv_info(&self, network: &mut dyn Network) {
        let tsbk = TsbkVariant::SrvInfo {
            header: broadcast_header(SRV_INFO_LCO),
            service_class: self.service_class,
            sys_id: self.site.sys_id,
        };
        network.write_p25_tsdu(&tsbk.to_bytes());
    }

    /// Broadcasts `RFSS_STS_BCAST`, re-embedded every `VOC_LDU1_COUNT` LDU1s
    /// during voice-on-control per `note_ldu1`'s return value.
    pub fn emit_rfss_sts_bcast(&self, network: &mut dyn Network) {
        let tsbk = TsbkVariant::RfssStsBcast {
            header: broadcast_header(RFSS_STS_BCAST_LCO),
            lra: self.lra,
            sys_id: self.site.sys_id,
            rfss_id: self.site.rfss_id,
            site_id: self.site.site_id,
            channel_no: self.control_channel_no,
            service_class: self.service_class,
        };
        network.write_p25_tsdu(&tsbk.to_bytes());
    }

    /// Commands a unit to register.
    pub fn emit_u_reg_cmd(&self, dst_id: u32, network: &mut dyn Network) {
        let tsbk = TsbkVariant::URegCmd {
            header: broadcast_header(U_REG_CMD_LCO),
            dst_id,
        };
        network.write_p25_tsdu(&tsbk.to_bytes());
    }

    /// Responds to a unit registration request, validated against `acl`.
    pub fn process_unit_registration(
        &self,
        src_id: u32,
        acl: &dyn Acl,
        network: &mut dyn Network,
    ) -> RegResponse {
        let response = if acl.validate_src_id(src_id) {
            RegResponse::Accept
        } else {
            RegResponse::Refused
        };
        let tsbk = TsbkVariant::URegRsp {
            header: broadcast_header(U_REG_RSP_LCO),
            response,
            src_id,
            net_id: self.site.net_id,
            sys_id: self.site.sys_id,
        };
        network.write_p25_tsdu(&tsbk.to_bytes());
        response
    }

    /// Responds to a location registration request, validated against `acl`.
    pub fn process_location_registration(
        &self,
        src_id: u32,
        group_id: u16,
        acl: &dyn Acl,
        network: &mut dyn Network,
    ) -> RegResponse {
        let response = if acl.validate_src_id(src_id) {
            RegResponse::Accept
        } else {
            RegResponse::Refused
        };
        let tsbk = TsbkVariant::LocRegRsp {
            header: broadcast_header(LOC_REG_RSP_LCO),
            response,
            rfss_id: self.site.rfss_id,
            site_id: self.site.site_id,
            group_id,
            src_id,
        };
        network.write_p25_tsdu(&tsbk.to_bytes());
        response
    }

    /// Responds to a group affiliation request, validated against `acl` and
    /// recorded in `affiliations` on success.
    pub fn process_group_affiliation(
        &self,
        src_id: u32,
        group_id: u16,
        announcement_group_id: u16,
        acl: &dyn Acl,
        affiliations: &mut dyn Affiliations,
        network: &mut dyn Network,
    ) -> RegResponse {
        let response = if !acl.validate_src_id(src_id) {
            RegResponse::Refused
        } else if !acl.validate_tg_id(group_id as u32) {
            RegResponse::Deny
        } else {
            affiliations.touch_grant(group_id as u32);
            RegResponse::Accept
        };
        let tsbk = TsbkVariant::GrpAffRsp {
            header: broadcast_header(GRP_AFF_RSP_LCO),
            response,
            group_id,
            announcement_group_id,
            src_id,
        };
        network.write_p25_tsdu(&tsbk.to_bytes());
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acl::PermitAll;
    use crate::affiliations::MemoryAffiliations;
    use crate::net::traits::RecordingNetwork;
    use crate::site::IdenEntry;

    struct OneChannel(IdenEntry);

    impl IdenTable for OneChannel {
        fn lookup(&self, _channel_id: u8) -> Option<IdenEntry> {
            Some(self.0)
        }
    }

    fn idens() -> OneChannel {
        OneChannel(IdenEntry {
            channel_id: 1,
            base_frequency_hz: 851_000_000,
            channel_spacing_hz: 12_500,
            tx_offset_hz: -45_000_000,
            bandwidth_khz: 12,
        })
    }

    fn site() -> SiteData {
        SiteData::new(0x12345, 0x123, 1, 1, 1)
    }

    #[test]
    fn grants_channel_and_affiliates() {
        let mut trunk = TrunkProcessor::new(site());
        let acl = PermitAll;
        let mut affs = MemoryAffiliations::new();
        let mut net = RecordingNetwork::default();

        let req = TsbkVariant::IospGrpVchReq {
            header: TsbkHeader {
                last_block: true,
                protect: false,
                lco: 0,
                mfid: 0,
            },
            service_options: 0x20,
            group_id: 10_001,
            src_id: 9_000_001,
        };

        let outcome =
            trunk.process_group_request(&req, 1, &acl, &mut affs, &idens(), &mut net);
        assert!(matches!(outcome, GrantOutcome::Granted { .. }));
        assert!(affs.is_granted(10_001));
        assert_eq!(net.tsdu_writes.len(), 1);
    }

    #[test]
    fn already_granted_group_is_queued() {
        let mut trunk = TrunkProcessor::new(site());
        let acl = PermitAll;
        let mut affs = MemoryAffiliations::new();
        affs.touch_grant(10_001);
        let mut net = RecordingNetwork::default();

        let req = TsbkVariant::IospGrpVchReq {
            header: TsbkHeader {
                last_block: true,
                protect: false,
                lco: 0,
                mfid: 0,
            },
            service_options: 0x20,
            group_id: 10_001,
            src_id: 9_000_001,
        };

        let outcome =
            trunk.process_group_request(&req, 1, &acl, &mut affs, &idens(), &mut net);
        assert_eq!(outcome, GrantOutcome::Queued);
        assert!(net.tsdu_writes.is_empty());
    }

    #[test]
    fn release_clears_affiliation() {
        let mut trunk = TrunkProcessor::new(site());
        let mut affs = MemoryAffiliations::new();
        affs.touch_grant(10_001);
        trunk.release(10_001, &mut affs);
        assert!(!affs.is_granted(10_001));
    }

    #[test]
    fn every_third_ldu1_triggers_site_broadcast() {
        let mut trunk = TrunkProcessor::new(site());
        assert!(!trunk.note_ldu1());
        assert!(!trunk.note_ldu1());
        assert!(trunk.note_ldu1());
    }

    #[test]
    fn rfss_sts_bcast_written_to_network() {
        let mut trunk = TrunkProcessor::new(site());
        trunk.control_channel_no = 0x0102;
        trunk.service_class = 0x38;
        let mut net = RecordingNetwork::default();
        trunk.emit_rfss_sts_bcast(&mut net);
        assert_eq!(net.tsdu_writes.len(), 1);
        let decoded =
            TsbkVariant::from_bytes(&net.tsdu_writes[0].clone().try_into().unwrap()).unwrap();
        assert!(matches!(decoded, TsbkVariant::RfssStsBcast { .. }));
    }

    #[test]
    fn unit_registration_accepted_for_permitted_unit() {
        let trunk = TrunkProcessor::new(site());
        let acl = PermitAll;
        let mut net = RecordingNetwork::default();
        let response = trunk.process_unit_registration(9_000_001, &acl, &mut net);
        assert_eq!(response, crate::p25::tsbk::RegResponse::Accept);
        assert_eq!(net.tsdu_writes.len(), 1);
    }

    #[test]
    fn group_affiliation_accepted_records_grant() {
        let trunk = TrunkProcessor::new(site());
        let acl = PermitAll;
        let mut affs = MemoryAffiliations::new();
        let mut net = RecordingNetwork::default();
        let response =
            trunk.process_group_affiliation(9_000_001, 10_001, 10_000, &acl, &mut affs, &mut net);
        assert_eq!(response, crate::p25::tsbk::RegResponse::Accept);
        assert!(affs.is_granted(10_001));
    }
}
