//! ACL capability. Lookup table storage is out of scope (spec §1); the
//! core only calls into whatever the embedder provides.
pub trait Acl {
    fn validate_src_id(&self, src_id: u32) -> bool;
    fn validate_tg_id(&self, tg_id: u32) -> bool;
}

/// Permit-all ACL used by tests and examples where admission policy is not
/// under test.
#[derive(Debug, Default, Clone, Copy)]
pub struct PermitAll;

impl Acl for PermitAll {
    fn validate_src_id(&self, _src_id: u32) -> bool {
        true
    }

    fn validate_tg_id(&self, _tg_id: u32) -> bool {
        true
    }
}
