//! Shared call bookkeeping used by every protocol's voice and trunk
//! processors.

pub mod call_session;

pub use call_session::{CallSession, CallState};
