//! # Gateway Error Handling
//!
//! Crate-wide error taxonomy. Matches spec §7: parse errors are always
//! recoverable (the modem framing state machine resynchronizes), FEC/CRC
//! failures drop a frame without tearing down the call, and only port loss
//! or watchdog expiry are session-fatal.

use thiserror::Error;

/// Errors from the modem link layer (framing, opcode handshake, watchdog).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModemError {
    /// Indicates a frame arrived with fewer bytes than its declared length.
    #[error("frame too short: need {need} bytes, got {got}")]
    ParseTooShort { need: usize, got: usize },

    /// Indicates the leading frame byte was not the `0xFE` magic.
    #[error("bad frame magic byte: 0x{0:02X}")]
    ParseBadMagic(u8),

    /// Indicates a frame declared a length outside the valid range.
    #[error("bad frame length: {0}")]
    ParseBadLength(usize),

    /// Indicates the modem port is closed or otherwise unavailable.
    #[error("modem port closed or unavailable")]
    PortLost,

    /// Indicates no valid response arrived within the watchdog interval.
    #[error("no valid response from modem for {0} ms")]
    WatchdogExpired(u64),

    /// Indicates the modem replied with a NAK.
    #[error("modem NAK: {0:?}")]
    Nak(ModemNakReason),

    /// Indicates `GET_VERSION` reported a protocol version we don't speak.
    #[error("unsupported protocol version {0}")]
    UnsupportedVersion(u8),

    /// Indicates the flash configuration block failed its CRC check.
    #[error("flash configuration CRC mismatch")]
    FlashConfigCrc,

    /// Wraps a transport-level I/O failure.
    #[error("i/o error: {0}")]
    Io(String),
}

/// Modem NAK reason codes. spec.md's opcode table names a representative
/// handful (`RSN_INVALID_*`, `RSN_HS_NO_DUAL_MODE`); this enumerates the
/// fuller table the firmware reports (see SPEC_FULL.md §D).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModemNakReason {
    InvalidRequest,
    InvalidDmrFrameLength,
    InvalidP25FrameLength,
    InvalidNxdnFrameLength,
    RingBufferFull,
    InvalidMode,
    InvalidConfig,
    InvalidFdmaPreamble,
    InvalidModeForSlot,
    HsNoDualMode,
    Other(u8),
}

impl From<u8> for ModemNakReason {
    fn from(value: u8) -> Self {
        match value {
            0x01 => ModemNakReason::InvalidRequest,
            0x02 => ModemNakReason::InvalidDmrFrameLength,
            0x03 => ModemNakReason::InvalidP25FrameLength,
            0x04 => ModemNakReason::InvalidNxdnFrameLength,
            0x05 => ModemNakReason::RingBufferFull,
            0x06 => ModemNakReason::InvalidMode,
            0x07 => ModemNakReason::InvalidConfig,
            0x08 => ModemNakReason::InvalidFdmaPreamble,
            0x09 => ModemNakReason::InvalidModeForSlot,
            0x0A => ModemNakReason::HsNoDualMode,
            other => ModemNakReason::Other(other),
        }
    }
}

/// Errors from protocol PDU codecs (FEC/CRC/field decode failures).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Indicates the FEC stage could not correct the received errors.
    #[error("FEC uncorrectable")]
    FecUncorrectable,

    /// Indicates a CRC check failed after FEC correction.
    #[error("CRC mismatch")]
    CrcMismatch,

    /// Indicates the input buffer was shorter than the codec requires.
    #[error("buffer too short: need {need}, got {got}")]
    TooShort { need: usize, got: usize },

    /// Indicates an opcode/LCO value this codec does not recognize.
    #[error("unknown opcode/LCO 0x{0:02X}")]
    UnknownOpcode(u8),

    /// Indicates a structurally invalid header field (e.g. zero blocks).
    #[error("malformed header field")]
    MalformedHeader,
}

/// Top-level error type returned by the processors in this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error(transparent)]
    Modem(#[from] ModemError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Indicates an ACL or affiliation check rejected a call.
    #[error("access denied for src={src:#08X} dst={dst:#08X}")]
    AccessDenied { src: u32, dst: u32 },

    /// Indicates a frame arrived that violates the protocol's sequencing
    /// rules (e.g. two consecutive LDU1s).
    #[error("state machine violation: {0}")]
    StateMachineViolation(&'static str),
}
