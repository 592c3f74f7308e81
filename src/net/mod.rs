//! Network collaborator surface and outbound frame queue.
pub mod frame_queue;
pub mod traits;

pub use frame_queue::{FneFunction, FrameQueue, PayloadType};
pub use traits::{Network, RfOutput};
