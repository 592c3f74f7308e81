//! # A host-side digital voice radio gateway core
//!
//! Implements the frame-level protocol state machines and forward-error-
//! correction codecs for three land-mobile-radio protocols — DMR (ETSI TS
//! 102 361), P25 Phase-1 (TIA-102), and NXDN — plus a DFSI-style peer for
//! fixed-station conveyance. Decodes bit-exact RF frames from a modem,
//! regenerates them, enforces trunked-call admission and affiliation
//! policy, and relays frames to and from an IP network peer.
//!
//! Everything the core needs from its environment — the physical serial
//! transport, ACL/affiliation storage, site identity, and the network
//! peer protocol — is an injected capability trait (`modem::ModemPort`,
//! `acl::Acl`, `affiliations::Affiliations`, `net::Network`). This crate
//! owns none of that state; it only calls into it.

pub mod acl;
pub mod affiliations;
pub mod bits;
pub mod clock;
pub mod config;
pub mod core;
pub mod crc;
#[cfg(feature = "dmr")]
pub mod dmr;
pub mod error;
pub mod fec;
pub mod logging;
pub mod modem;
pub mod net;
#[cfg(feature = "nxdn")]
pub mod nxdn;
#[cfg(feature = "p25")]
pub mod p25;
pub mod ring_buffer;
pub mod site;

pub use crate::error::{CodecError, GatewayError, ModemError, ModemNakReason};
pub use crate::logging::init_logger;
