//! RTP-framed datagram queue toward the `Network` collaborator (spec §4.8).
//!
//! Wire shape per outgoing datagram: RTP header (12 bytes) + a 4-byte RTP
//! extension + a 16-byte FNE header + payload. This module only builds and
//! parses that framing; actually sending bytes over UDP is the `Network`
//! collaborator's job.

use crate::crc::ccitt16_kind2;

pub const RTP_HEADER_LEN: usize = 12;
pub const RTP_EXTENSION_LEN: usize = 4;
pub const FNE_HEADER_LEN: usize = 16;
pub const RTP_GENERIC_CLOCK_RATE: u32 = 8_000;
pub const RTP_END_OF_CALL_SEQ: u16 = 0xFFFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadType {
    Voice,
    Control,
}

impl PayloadType {
    fn as_u8(self) -> u8 {
        match self {
            PayloadType::Voice => 0x56,
            PayloadType::Control => 0x57,
        }
    }

    fn from_u8(v: u8) -> Option<Self> {
        match v {
            0x56 => Some(PayloadType::Voice),
            0x57 => Some(PayloadType::Control),
            _ => None,
        }
    }
}

/// FNE sub-function/function opcode pair carried in the FNE header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FneFunction {
    pub function: u8,
    pub sub_function: u8,
}

/// Per-stream sequencing state: one instance per (peer, call) stream.
#[derive(Debug)]
struct StreamState {
    sequence: u16,
    timestamp: u32,
}

impl StreamState {
    fn new() -> Self {
        StreamState {
            sequence: 0,
            timestamp: 0,
        }
    }

    fn next(&mut self) -> (u16, u32) {
        let seq = self.sequence;
        let ts = self.timestamp;
        self.sequence = self.sequence.wrapping_add(1);
        self.timestamp = self
            .timestamp
            .wrapping_add(RTP_GENERIC_CLOCK_RATE / 133);
        (seq, ts)
    }
}

/// Builds and parses the RTP+FNE framing used toward the network peer.
pub struct FrameQueue {
    peer_id: u32,
    streams: std::collections::HashMap<u32, StreamState>,
}

impl FrameQueue {
    pub fn new(peer_id: u32) -> Self {
        FrameQueue {
            peer_id,
            streams: std::collections::HashMap::new(),
        }
    }

    /// Encodes one outgoing datagram for `stream_id` carrying `payload`.
    pub fn encode(
        &mut self,
        stream_id: u32,
        payload_type: PayloadType,
        func: FneFunction,
        payload: &[u8],
    ) -> Vec<u8> {
        let state = self
            .streams
            .entry(stream_id)
            .or_insert_with(StreamState::new);
        let (seq, ts) = state.next();

        let mut out = Vec::with_capacity(RTP_HEADER_LEN + RTP_EXTENSION_LEN + FNE_HEADER_LEN + payload.len());

        // RTP header (12 bytes): V=2,P=0,X=1,CC=0 | M=0,PT | seq | ts | ssrc
        out.push(0b1001_0000); // V=2, X=1 (extension present)
        out.push(payload_type.as_u8() & 0x7F);
        out.extend_from_slice(&seq.to_be_bytes());
        out.extend_from_slice(&ts.to_be_bytes());
        out.extend_from_slice(&self.peer_id.to_be_bytes()); // SSRC = peer_id

        // RTP extension header (4 bytes): profile id + length (in words)
        out.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);

        // FNE header (16 bytes)
        let crc = ccitt16_kind2(payload);
        out.extend_from_slice(&crc.to_be_bytes());
        out.extend_from_slice(&stream_id.to_be_bytes());
        out.extend_from_slice(&self.peer_id.to_be_bytes());
        out.extend_from_slice(&(payload.len() as u16).to_be_bytes());
        out.push(func.function);
        out.push(func.sub_function);
        out.extend_from_slice(&[0u8; 4]); // reserved/pad to 16 bytes

        out.extend_from_slice(payload);
        out
    }

    /// Encodes the end-of-call marker for `stream_id` (sequence forced to
    /// `RTP_END_OF_CALL_SEQ`, state is not advanced further afterward).
    pub fn encode_end_of_call(&mut self, stream_id: u32, func: FneFunction) -> Vec<u8> {
        self.streams.remove(&stream_id);
        let mut out = Vec::with_capacity(RTP_HEADER_LEN + RTP_EXTENSION_LEN + FNE_HEADER_LEN);
        out.push(0b1001_0000);
        out.push(PayloadType::Control.as_u8() & 0x7F);
        out.extend_from_slice(&RTP_END_OF_CALL_SEQ.to_be_bytes());
        out.extend_from_slice(&0u32.to_be_bytes());
        out.extend_from_slice(&self.peer_id.to_be_bytes());
        out.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
        let crc = ccitt16_kind2(&[]);
        out.extend_from_slice(&crc.to_be_bytes());
        out.extend_from_slice(&stream_id.to_be_bytes());
        out.extend_from_slice(&self.peer_id.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.push(func.function);
        out.push(func.sub_function);
        out.extend_from_slice(&[0u8; 4]);
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDatagram {
    pub sequence: u16,
    pub timestamp: u32,
    pub ssrc: u32,
    pub payload_type: PayloadType,
    pub stream_id: u32,
    pub peer_id: u32,
    pub func: FneFunction,
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    TooShort,
    BadPayloadType,
    CrcMismatch,
}

/// Parses an incoming datagram, verifying the FNE CRC and the RTP payload
/// type field.
pub fn parse(data: &[u8]) -> Result<ParsedDatagram, ParseError> {
    let min_len = RTP_HEADER_LEN + RTP_EXTENSION_LEN + FNE_HEADER_LEN;
    if data.len() < min_len {
        return Err(ParseError::TooShort);
    }
    let payload_type =
        PayloadType::from_u8(data[1] & 0x7F).ok_or(ParseError::BadPayloadType)?;
    let sequence = u16::from_be_bytes([data[2], data[3]]);
    let timestamp = u32::from_be_bytes([data[4], data[5], data[6], data[7]]);
    let ssrc = u32::from_be_bytes([data[8], data[9], data[10], data[11]]);

    let fne = &data[RTP_HEADER_LEN + RTP_EXTENSION_LEN..min_len];
    let crc = u16::from_be_bytes([fne[0], fne[1]]);
    let stream_id = u32::from_be_bytes([fne[2], fne[3], fne[4], fne[5]]);
    let peer_id = u32::from_be_bytes([fne[6], fne[7], fne[8], fne[9]]);
    let message_length = u16::from_be_bytes([fne[10], fne[11]]) as usize;
    let func = FneFunction {
        function: fne[12],
        sub_function: fne[13],
    };

    let payload = &data[min_len..];
    if payload.len() < message_length {
        return Err(ParseError::TooShort);
    }
    let payload = &payload[..message_length];
    if ccitt16_kind2(payload) != crc {
        return Err(ParseError::CrcMismatch);
    }

    Ok(ParsedDatagram {
        sequence,
        timestamp,
        ssrc,
        payload_type,
        stream_id,
        peer_id,
        func,
        payload: payload.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_parse_roundtrip() {
        let mut queue = FrameQueue::new(0x1122_3344);
        let func = FneFunction {
            function: 3,
            sub_function: 1,
        };
        let payload = [0xAAu8, 0xBB, 0xCC];
        let datagram = queue.encode(0x5566_7788, PayloadType::Voice, func, &payload);
        let parsed = parse(&datagram).expect("parse");
        assert_eq!(parsed.sequence, 0);
        assert_eq!(parsed.ssrc, 0x1122_3344);
        assert_eq!(parsed.peer_id, 0x1122_3344);
        assert_eq!(parsed.stream_id, 0x5566_7788);
        assert_eq!(parsed.payload_type, PayloadType::Voice);
        assert_eq!(parsed.payload, payload);
    }

    #[test]
    fn sequence_numbers_are_monotonic_per_stream() {
        let mut queue = FrameQueue::new(1);
        let func = FneFunction {
            function: 0,
            sub_function: 0,
        };
        let d1 = queue.encode(7, PayloadType::Voice, func, &[1]);
        let d2 = queue.encode(7, PayloadType::Voice, func, &[2]);
        let p1 = parse(&d1).unwrap();
        let p2 = parse(&d2).unwrap();
        assert_eq!(p2.sequence, p1.sequence + 1);
    }

    #[test]
    fn corrupted_payload_fails_crc() {
        let mut queue = FrameQueue::new(1);
        let func = FneFunction {
            function: 0,
            sub_function: 0,
        };
        let mut datagram = queue.encode(7, PayloadType::Control, func, &[9, 9, 9]);
        let last = datagram.len() - 1;
        datagram[last] ^= 0xFF;
        assert_eq!(parse(&datagram), Err(ParseError::CrcMismatch));
    }

    #[test]
    fn end_of_call_uses_reserved_sequence() {
        let mut queue = FrameQueue::new(1);
        let func = FneFunction {
            function: 0,
            sub_function: 0,
        };
        let datagram = queue.encode_end_of_call(7, func);
        let parsed = parse(&datagram).unwrap();
        assert_eq!(parsed.sequence, RTP_END_OF_CALL_SEQ);
    }
}
