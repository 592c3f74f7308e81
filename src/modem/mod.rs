//! Modem transport: the `ModemPort` capability boundary and the
//! `ModemLink` framed command/response protocol built on top of it.

pub mod link;
pub mod port;

pub use link::{ConfigMismatch, ModemLink, ModemOpcode, ModemStatus, RfParams};
pub use port::ModemPort;
