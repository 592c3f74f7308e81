//! The `ModemPort` capability: an abstract blocking byte transport. The
//! physical serial driver is out of scope (spec §1); the core only calls
//! this trait.

/// Blocking byte transport to the modem. Implementations must make `read`
/// respect a short inner timeout so a single-threaded clock loop polling
/// it is never starved (spec §5: "non-zero timeout: read-one-byte with a
/// short inner timeout").
pub trait ModemPort {
    fn open(&mut self) -> std::io::Result<()>;
    fn close(&mut self) -> std::io::Result<()>;
    /// Reads up to `buf.len()` bytes, returning the number read. `0` means
    /// the timeout elapsed with nothing available, not EOF.
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize>;
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize>;
}
