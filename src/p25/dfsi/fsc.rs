//! Fixed Station Control (FSC): a request/ack protocol running over the
//! DFSI peer's TCP-style control transport (spec §4.7).
//!
//! Every message shares a `{message_id, version, correlation_tag}` header;
//! `Ack` additionally carries the id of the message it acknowledges and a
//! response code. This mirrors the common-header-plus-variant shape used
//! for P25 TSBKs rather than per-message classes.

use crate::error::CodecError;

pub const FSC_VERSION: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FscHeader {
    pub message_id: u8,
    pub version: u8,
    pub correlation_tag: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckResponse {
    Ok,
    NotAuthorized,
    BadMode,
    Unsupported,
}

impl AckResponse {
    fn to_byte(self) -> u8 {
        match self {
            AckResponse::Ok => 0x00,
            AckResponse::NotAuthorized => 0x01,
            AckResponse::BadMode => 0x02,
            AckResponse::Unsupported => 0x03,
        }
    }

    fn from_byte(b: u8) -> Option<AckResponse> {
        Some(match b {
            0x00 => AckResponse::Ok,
            0x01 => AckResponse::NotAuthorized,
            0x02 => AckResponse::BadMode,
            _ => AckResponse::Unsupported,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FscMessage {
    Connect {
        header: FscHeader,
    },
    Heartbeat {
        header: FscHeader,
    },
    Ack {
        header: FscHeader,
        acked_message_id: u8,
        response: AckResponse,
    },
    ReportSelModes {
        header: FscHeader,
        modes_bitmap: u8,
    },
    SelChannel {
        header: FscHeader,
        channel_no: u16,
    },
    Disconnect {
        header: FscHeader,
    },
}

const TYPE_CONNECT: u8 = 0x01;
const TYPE_HEARTBEAT: u8 = 0x02;
const TYPE_ACK: u8 = 0x03;
const TYPE_REPORT_SEL_MODES: u8 = 0x04;
const TYPE_SEL_CHANNEL: u8 = 0x05;
const TYPE_DISCONNECT: u8 = 0x06;

impl FscMessage {
    pub fn header(&self) -> FscHeader {
        match *self {
            FscMessage::Connect { header }
            | FscMessage::Heartbeat { header }
            | FscMessage::Ack { header, .. }
            | FscMessage::ReportSelModes { header, .. }
            | FscMessage::SelChannel { header, .. }
            | FscMessage::Disconnect { header } => header,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let header = self.header();
        let mut out = vec![0u8, header.message_id, header.version, header.correlation_tag];
        match *self {
            FscMessage::Connect { .. } => out[0] = TYPE_CONNECT,
            FscMessage::Heartbeat { .. } => out[0] = TYPE_HEARTBEAT,
            FscMessage::Ack {
                acked_message_id,
                response,
                ..
            } => {
                out[0] = TYPE_ACK;
                out.push(acked_message_id);
                out.push(response.to_byte());
            }
            FscMessage::ReportSelModes { modes_bitmap, .. } => {
                out[0] = TYPE_REPORT_SEL_MODES;
                out.push(modes_bitmap);
            }
            FscMessage::SelChannel { channel_no, .. } => {
                out[0] = TYPE_SEL_CHANNEL;
                out.extend_from_slice(&channel_no.to_be_bytes());
            }
            FscMessage::Disconnect { .. } => out[0] = TYPE_DISCONNECT,
        }
        out
    }

    pub fn decode(buf: &[u8]) -> Result<FscMessage, CodecError> {
        if buf.len() < 4 {
            return Err(CodecError::TooShort {
                need: 4,
                got: buf.len(),
            });
        }
        let header = FscHeader {
            message_id: buf[1],
            version: buf[2],
            correlation_tag: buf[3],
        };
        Ok(match buf[0] {
            TYPE_CONNECT => FscMessage::Connect { header },
            TYPE_HEARTBEAT => FscMessage::Heartbeat { header },
            TYPE_ACK => {
                if buf.len() < 6 {
                    return Err(CodecError::TooShort {
                        need: 6,
                        got: buf.len(),
                    });
                }
                FscMessage::Ack {
                    header,
                    acked_message_id: buf[4],
                    response: AckResponse::from_byte(buf[5])
                        .ok_or(CodecError::MalformedHeader)?,
                }
            }
            TYPE_REPORT_SEL_MODES => {
                if buf.len() < 5 {
                    return Err(CodecError::TooShort {
                        need: 5,
                        got: buf.len(),
                    });
                }
                FscMessage::ReportSelModes {
                    header,
                    modes_bitmap: buf[4],
                }
            }
            TYPE_SEL_CHANNEL => {
                if buf.len() < 6 {
                    return Err(CodecError::TooShort {
                        need: 6,
                        got: buf.len(),
                    });
                }
                FscMessage::SelChannel {
                    header,
                    channel_no: u16::from_be_bytes([buf[4], buf[5]]),
                }
            }
            TYPE_DISCONNECT => FscMessage::Disconnect { header },
            other => return Err(CodecError::UnknownOpcode(other)),
        })
    }
}

/// Tracks outstanding FSC requests awaiting an `Ack`, keyed by message id.
/// One instance per control connection.
#[derive(Debug, Default)]
pub struct FscSession {
    next_message_id: u8,
    pending: std::collections::HashSet<u8>,
}

impl FscSession {
    pub fn new() -> Self {
        FscSession::default()
    }

    /// Allocates the next message id and header for an outgoing request.
    pub fn next_header(&mut self, correlation_tag: u8) -> FscHeader {
        let message_id = self.next_message_id;
        self.next_message_id = self.next_message_id.wrapping_add(1);
        self.pending.insert(message_id);
        FscHeader {
            message_id,
            version: FSC_VERSION,
            correlation_tag,
        }
    }

    /// Records an incoming `Ack`, returning `true` if it matched a
    /// request this session is still waiting on.
    pub fn note_ack(&mut self, acked_message_id: u8) -> bool {
        self.pending.remove(&acked_message_id)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
