//! NXDN trunk processor: RCCH admission built on the same `Affiliations`
//! capability the P25 trunk processor uses, since the policy (one grant
//! per active group, ACL-gated) is protocol-agnostic.

use crate::acl::Acl;
use crate::affiliations::Affiliations;
use crate::net::Network;

use super::cac::{Cac, CacMessage};

/// Disposition reached for one RCCH voice call request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NxdnGrantOutcome {
    Granted,
    Denied,
    Queued,
}

pub struct NxdnTrunkProcessor {
    pub ran: u8,
}

impl NxdnTrunkProcessor {
    pub fn new(ran: u8) -> Self {
        NxdnTrunkProcessor { ran }
    }

    /// Handles an inbound `VoiceCallAssignment` request the way the P25
    /// trunk processor handles `GRP_VCH_REQ`: ACL check, then admit if no
    /// grant already stands for the group.
    pub fn process_request(
        &self,
        cac: &Cac,
        acl: &dyn Acl,
        affiliations: &mut dyn Affiliations,
        network: &mut dyn Network,
    ) -> NxdnGrantOutcome {
        let CacMessage::VoiceCallAssignment {
            group,
            dst_id,
            src_id,
        } = cac.message
        else {
            return NxdnGrantOutcome::Denied;
        };

        if !acl.validate_src_id(src_id as u32) || !acl.validate_tg_id(dst_id as u32) {
            return NxdnGrantOutcome::Denied;
        }

        if group && affiliations.is_granted(dst_id as u32) {
            return NxdnGrantOutcome::Queued;
        }

        if group {
            affiliations.touch_grant(dst_id as u32);
        }

        let grant = Cac {
            ran: self.ran,
            message: CacMessage::VoiceCallAssignment {
                group,
                dst_id,
                src_id,
            },
        };
        let coded = grant.encode();
        let frame = crate::bits::bits_to_bytes(&coded);
        network.write_nxdn(&frame);

        NxdnGrantOutcome::Granted
    }

    pub fn release(&self, tg_id: u32, affiliations: &mut dyn Affiliations) {
        affiliations.release_grant(tg_id);
    }
}
