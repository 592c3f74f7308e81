//! Framed command/response protocol over a `ModemPort`: frame parsing,
//! the `GET_VERSION`/flash-config open handshake, status polling with
//! per-protocol TX space accounting, and the inactivity watchdog.

use crate::crc::ccitt16_kind2;
use crate::error::{ModemError, ModemNakReason};
use crate::ring_buffer::RingBuffer;

use super::port::ModemPort;

const FRAME_MAGIC: u8 = 0xFE;
const DVM_CONF_AREA_LEN: usize = 246;
const DVM_CONF_AREA_VER: u8 = 4;
const FLASH_CONFIG_LEN: usize = 249;

/// Modem command/response opcodes (spec §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModemOpcode {
    GetVersion,
    GetStatus,
    SetConfig,
    SetMode,
    SetSymLvlAdj,
    SetRxLevel,
    SetRfParams,
    FlashRead,
    SendCwId,
    Dmr1Data,
    Dmr2Data,
    Dmr1Lost,
    Dmr2Lost,
    DmrShortLc,
    DmrStart,
    DmrAbort,
    DmrCachAtCtrl,
    P25Data,
    P25Lost,
    P25Clear,
    NxdnData,
    NxdnLost,
    Ack,
    Nak,
    Debug(u8),
    DebugDump,
    Other(u8),
}

impl ModemOpcode {
    fn to_byte(self) -> u8 {
        match self {
            ModemOpcode::GetVersion => 0x00,
            ModemOpcode::GetStatus => 0x01,
            ModemOpcode::SetConfig => 0x02,
            ModemOpcode::SetMode => 0x03,
            ModemOpcode::SetSymLvlAdj => 0x05,
            ModemOpcode::SetRfParams => 0x06,
            ModemOpcode::SetRxLevel => 0x08,
            ModemOpcode::SendCwId => 0x0A,
            ModemOpcode::Dmr1Data => 0x18,
            ModemOpcode::Dmr2Data => 0x1A,
            ModemOpcode::Dmr1Lost => 0x19,
            ModemOpcode::Dmr2Lost => 0x1B,
            ModemOpcode::DmrShortLc => 0x1C,
            ModemOpcode::DmrStart => 0x1D,
            ModemOpcode::DmrAbort => 0x1E,
            ModemOpcode::DmrCachAtCtrl => 0x1F,
            ModemOpcode::FlashRead => 0x60,
            ModemOpcode::P25Data => 0x31,
            ModemOpcode::P25Lost => 0x32,
            ModemOpcode::P25Clear => 0x33,
            ModemOpcode::NxdnData => 0x41,
            ModemOpcode::NxdnLost => 0x42,
            ModemOpcode::Ack => 0x70,
            ModemOpcode::Nak => 0x7F,
            ModemOpcode::DebugDump => 0xFA,
            ModemOpcode::Debug(n) => 0xF0 + n,
            ModemOpcode::Other(b) => b,
        }
    }

    fn from_byte(b: u8) -> ModemOpcode {
        match b {
            0x00 => ModemOpcode::GetVersion,
            0x01 => ModemOpcode::GetStatus,
            0x02 => ModemOpcode::SetConfig,
            0x03 => ModemOpcode::SetMode,
            0x05 => ModemOpcode::SetSymLvlAdj,
            0x06 => ModemOpcode::SetRfParams,
            0x08 => ModemOpcode::SetRxLevel,
            0x0A => ModemOpcode::SendCwId,
            0x18 => ModemOpcode::Dmr1Data,
            0x1A => ModemOpcode::Dmr2Data,
            0x19 => ModemOpcode::Dmr1Lost,
            0x1B => ModemOpcode::Dmr2Lost,
            0x1C => ModemOpcode::DmrShortLc,
            0x1D => ModemOpcode::DmrStart,
            0x1E => ModemOpcode::DmrAbort,
            0x1F => ModemOpcode::DmrCachAtCtrl,
            0x60 => ModemOpcode::FlashRead,
            0x31 => ModemOpcode::P25Data,
            0x32 => ModemOpcode::P25Lost,
            0x33 => ModemOpcode::P25Clear,
            0x41 => ModemOpcode::NxdnData,
            0x42 => ModemOpcode::NxdnLost,
            0x70 => ModemOpcode::Ack,
            0x7F => ModemOpcode::Nak,
            0xFA => ModemOpcode::DebugDump,
            0xF1..=0xF5 => ModemOpcode::Debug(b - 0xF0),
            other => ModemOpcode::Other(other),
        }
    }
}

/// Builds one on-wire frame: single-length form below 255 bytes of
/// payload, double-length form (`[0xFE, 0x00, LEN2, CMD, ...]`) above it.
fn build_frame(opcode: ModemOpcode, payload: &[u8]) -> Vec<u8> {
    let body_len = payload.len() + 1; // + opcode byte
    let mut out = Vec::with_capacity(body_len + 4);
    out.push(FRAME_MAGIC);
    if body_len + 2 < 255 {
        out.push((body_len + 2) as u8);
        out.push(opcode.to_byte());
    } else {
        out.push(0x00);
        out.push(((body_len + 4) >> 8) as u8);
        out.push((body_len + 4) as u8);
        out.push(opcode.to_byte());
    }
    out.extend_from_slice(payload);
    out
}

/// One parsed frame: opcode plus payload (magic/length stripped).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFrame {
    pub opcode: ModemOpcode,
    pub payload: Vec<u8>,
}

/// Parses exactly one frame from the front of `buf`, returning the frame
/// and the number of bytes it consumed. Per spec §7, malformed length
/// (declared length >= 250 in the single-byte form) is a fatal parse
/// error the caller must treat as cause to reset the link.
fn parse_frame(buf: &[u8]) -> Result<Option<(ParsedFrame, usize)>, ModemError> {
    if buf.is_empty() {
        return Ok(None);
    }
    if buf[0] != FRAME_MAGIC {
        return Err(ModemError::ParseBadMagic(buf[0]));
    }
    if buf.len() < 2 {
        return Ok(None);
    }
    if buf[1] == 0x00 {
        if buf.len() < 4 {
            return Ok(None);
        }
        let len = ((buf[2] as usize) << 8) | buf[3] as usize;
        if len < 4 {
            return Err(ModemError::ParseBadLength(len));
        }
        if buf.len() < len {
            return Ok(None);
        }
        let opcode = ModemOpcode::from_byte(buf[4]);
        let payload = buf[5..len].to_vec();
        Ok(Some((ParsedFrame { opcode, payload }, len)))
    } else {
        let len = buf[1] as usize;
        if len >= 250 {
            return Err(ModemError::ParseBadLength(len));
        }
        if len < 3 {
            return Err(ModemError::ParseTooShort { need: 3, got: len });
        }
        if buf.len() < len {
            return Ok(None);
        }
        let opcode = ModemOpcode::from_byte(buf[2]);
        let payload = buf[3..len].to_vec();
        Ok(Some((ParsedFrame { opcode, payload }, len)))
    }
}

/// Per-protocol TX space counters, in bytes. Refreshed authoritatively by
/// every `GET_STATUS` poll; decremented locally on every write so a burst
/// of writes between polls doesn't overrun the modem's own buffers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModemStatus {
    pub dmr_space_1: u32,
    pub dmr_space_2: u32,
    pub p25_space: u32,
    pub nxdn_space: u32,
    pub adc_overflow: u16,
    pub dac_overflow: u16,
}

/// RF transmit parameters sent via `SET_RFPARAMS`. Named fields instead of
/// a raw buffer sidesteps the original `buffer[13..16]` overlap ambiguity
/// entirely (see SPEC_FULL.md Open Question 2).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RfParams {
    pub tx_level: u8,
    pub p25_corr_count: u8,
    pub rx_level: u8,
}

/// One field that disagreed between the locally configured value and the
/// modem's flash-stored configuration, surfaced instead of only logged
/// (SPEC_FULL.md §D).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigMismatch {
    pub field: &'static str,
    pub local: u8,
    pub flash: u8,
}

/// Framed command/response link to the modem. Owns the `ModemPort`
/// exclusively (spec §5) and the per-protocol RX ring buffers.
pub struct ModemLink<P: ModemPort> {
    port: P,
    protocol_version: u8,
    status: ModemStatus,
    rx_buf: Vec<u8>,
    pub dmr_rx: RingBuffer,
    pub p25_rx: RingBuffer,
    pub nxdn_rx: RingBuffer,
    last_response_ms: u64,
}

impl<P: ModemPort> ModemLink<P> {
    pub fn new(port: P, ring_capacity: usize) -> Self {
        ModemLink {
            port,
            protocol_version: 0,
            status: ModemStatus::default(),
            rx_buf: Vec::new(),
            dmr_rx: RingBuffer::new(ring_capacity),
            p25_rx: RingBuffer::new(ring_capacity),
            nxdn_rx: RingBuffer::new(ring_capacity),
            last_response_ms: 0,
        }
    }

    pub fn status(&self) -> ModemStatus {
        self.status
    }

    /// Sends a framed command and reads back one response frame, retrying
    /// once on NAK (the open handshake calls this twice on failure per
    /// spec §4.3).
    fn send_and_read(&mut self, opcode: ModemOpcode, payload: &[u8]) -> Result<ParsedFrame, ModemError> {
        let frame = build_frame(opcode, payload);
        self.port
            .write(&frame)
            .map_err(|e| ModemError::Io(e.to_string()))?;
        self.read_one_frame()
    }

    fn read_one_frame(&mut self) -> Result<ParsedFrame, ModemError> {
        let mut scratch = [0u8; 256];
        loop {
            if let Some((frame, consumed)) = parse_frame(&self.rx_buf)? {
                self.rx_buf.drain(0..consumed);
                if frame.opcode == ModemOpcode::Nak {
                    let reason = ModemNakReason::from(*frame.payload.first().unwrap_or(&0));
                    return Err(ModemError::Nak(reason));
                }
                return Ok(frame);
            }
            let n = self
                .port
                .read(&mut scratch)
                .map_err(|e| ModemError::Io(e.to_string()))?;
            if n == 0 {
                return Err(ModemError::PortLost);
            }
            self.rx_buf.extend_from_slice(&scratch[0..n]);
        }
    }

    /// Runs the modem open handshake per spec §4.3: version check, flash
    /// config read + CRC + cross-check, `SET_RFPARAMS`/`SET_CONFIG`
    /// (retried once each), `SET_SYMLVLADJ`. Returns the list of
    /// local-vs-flash field mismatches instead of only logging them.
    pub fn open(
        &mut self,
        rf_params: RfParams,
        local_config: &[u8; DVM_CONF_AREA_LEN],
    ) -> Result<Vec<ConfigMismatch>, ModemError> {
        self.port.open().map_err(|e| ModemError::Io(e.to_string()))?;

        let version_frame = self.send_and_read(ModemOpcode::GetVersion, &[])?;
        let version = *version_frame.payload.first().ok_or(ModemError::ParseTooShort {
            need: 1,
            got: 0,
        })?;
        if version != 2 && version != 3 {
            return Err(ModemError::UnsupportedVersion(version));
        }
        self.protocol_version = version;

        let flash_frame = self.send_and_read(ModemOpcode::FlashRead, &[])?;
        if flash_frame.payload.len() < FLASH_CONFIG_LEN {
            return Err(ModemError::ParseTooShort {
                need: FLASH_CONFIG_LEN,
                got: flash_frame.payload.len(),
            });
        }
        let flash_config = &flash_frame.payload[0..DVM_CONF_AREA_LEN];
        let stored_crc = u16::from_be_bytes([
            flash_frame.payload[DVM_CONF_AREA_LEN],
            flash_frame.payload[DVM_CONF_AREA_LEN + 1],
        ]);
        if ccitt16_kind2(flash_config) != stored_crc {
            return Err(ModemError::FlashConfigCrc);
        }
        let version_byte = flash_frame.payload[DVM_CONF_AREA_LEN + 2];
        let flash_erased = version_byte & 0x80 != 0;
        let flash_version = version_byte & 0x7F;
        if !flash_erased && flash_version != DVM_CONF_AREA_VER {
            return Err(ModemError::UnsupportedVersion(flash_version));
        }

        let mismatches: Vec<ConfigMismatch> = local_config
            .iter()
            .zip(flash_config.iter())
            .enumerate()
            .filter(|(_, (l, f))| l != f)
            .map(|(i, (l, f))| ConfigMismatch {
                field: config_field_name(i),
                local: *l,
                flash: *f,
            })
            .collect();

        self.send_with_retry(
            ModemOpcode::SetRfParams,
            &[rf_params.tx_level, rf_params.p25_corr_count, rf_params.rx_level],
        )?;
        self.send_with_retry(ModemOpcode::SetConfig, local_config)?;
        self.send_and_read(ModemOpcode::SetSymLvlAdj, &[])?;

        Ok(mismatches)
    }

    fn send_with_retry(&mut self, opcode: ModemOpcode, payload: &[u8]) -> Result<(), ModemError> {
        match self.send_and_read(opcode, payload) {
            Ok(_) => Ok(()),
            Err(_) => self.send_and_read(opcode, payload).map(|_| ()),
        }
    }

    /// Polls `GET_STATUS`, refreshing TX space counters and overflow
    /// tallies to authoritative values.
    pub fn poll_status(&mut self) -> Result<ModemStatus, ModemError> {
        let frame = self.send_and_read(ModemOpcode::GetStatus, &[])?;
        if frame.payload.len() < 10 {
            return Err(ModemError::ParseTooShort {
                need: 10,
                got: frame.payload.len(),
            });
        }
        self.status = ModemStatus {
            dmr_space_1: frame.payload[0] as u32 * 12,
            dmr_space_2: frame.payload[1] as u32 * 12,
            p25_space: frame.payload[2] as u32 * 12,
            nxdn_space: frame.payload[3] as u32 * 12,
            adc_overflow: u16::from_be_bytes([frame.payload[4], frame.payload[5]]),
            dac_overflow: u16::from_be_bytes([frame.payload[6], frame.payload[7]]),
        };
        Ok(self.status)
    }

    /// Writes a DMR/P25/NXDN data frame, decrementing the appropriate TX
    /// space counter by the frame length. Returns `false` without writing
    /// if there isn't enough space accounted for.
    pub fn write_dmr(&mut self, slot: u8, frame: &[u8]) -> Result<bool, ModemError> {
        let opcode = if slot == 1 {
            ModemOpcode::Dmr1Data
        } else {
            ModemOpcode::Dmr2Data
        };
        let space = if slot == 1 {
            &mut self.status.dmr_space_1
        } else {
            &mut self.status.dmr_space_2
        };
        if (frame.len() as u32) > *space {
            return Ok(false);
        }
        *space -= frame.len() as u32;
        let out = build_frame(opcode, frame);
        self.port
            .write(&out)
            .map_err(|e| ModemError::Io(e.to_string()))?;
        Ok(true)
    }

    pub fn write_p25(&mut self, frame: &[u8]) -> Result<bool, ModemError> {
        if (frame.len() as u32) > self.status.p25_space {
            return Ok(false);
        }
        self.status.p25_space -= frame.len() as u32;
        let out = build_frame(ModemOpcode::P25Data, frame);
        self.port
            .write(&out)
            .map_err(|e| ModemError::Io(e.to_string()))?;
        Ok(true)
    }

    pub fn write_nxdn(&mut self, frame: &[u8]) -> Result<bool, ModemError> {
        if (frame.len() as u32) > self.status.nxdn_space {
            return Ok(false);
        }
        self.status.nxdn_space -= frame.len() as u32;
        let out = build_frame(ModemOpcode::NxdnData, frame);
        self.port
            .write(&out)
            .map_err(|e| ModemError::Io(e.to_string()))?;
        Ok(true)
    }

    /// Pads `callsign` into a `SEND_CWID` payload and transmits it.
    pub fn send_cwid(&mut self, callsign: &str) -> Result<(), ModemError> {
        let mut payload = callsign.as_bytes().to_vec();
        payload.resize(16, b' ');
        self.send_and_read(ModemOpcode::SendCwId, &payload)?;
        Ok(())
    }

    /// True once `now_ms - last_response_ms` exceeds the watchdog
    /// interval, per spec §7's ">4s firmware reply famine" trigger.
    pub fn watchdog_expired(&self, now_ms: u64, watchdog_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_response_ms) > watchdog_ms
    }

    pub fn note_response(&mut self, now_ms: u64) {
        self.last_response_ms = now_ms;
    }
}

fn config_field_name(index: usize) -> &'static str {
    match index {
        0 => "mode",
        1 => "iden",
        2 => "callsign",
        _ => "config_byte",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct MockPort {
        inbound: VecDeque<u8>,
        pub outbound: Vec<u8>,
        opened: bool,
    }

    impl MockPort {
        fn new() -> Self {
            MockPort {
                inbound: VecDeque::new(),
                outbound: Vec::new(),
                opened: false,
            }
        }

        fn queue_frame(&mut self, opcode: ModemOpcode, payload: &[u8]) {
            self.inbound.extend(build_frame(opcode, payload));
        }
    }

    impl ModemPort for MockPort {
        fn open(&mut self) -> std::io::Result<()> {
            self.opened = true;
            Ok(())
        }

        fn close(&mut self) -> std::io::Result<()> {
            self.opened = false;
            Ok(())
        }

        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = buf.len().min(self.inbound.len());
            for slot in buf.iter_mut().take(n) {
                *slot = self.inbound.pop_front().unwrap();
            }
            Ok(n)
        }

        fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
            self.outbound.extend_from_slice(data);
            Ok(data.len())
        }
    }

    #[test]
    fn frame_roundtrip_single_length() {
        let frame = build_frame(ModemOpcode::GetVersion, &[1, 2, 3]);
        let (parsed, consumed) = parse_frame(&frame).unwrap().unwrap();
        assert_eq!(consumed, frame.len());
        assert_eq!(parsed.opcode, ModemOpcode::GetVersion);
        assert_eq!(parsed.payload, vec![1, 2, 3]);
    }

    #[test]
    fn bad_magic_rejected() {
        assert!(matches!(
            parse_frame(&[0x00, 0x01, 0x02]),
            Err(ModemError::ParseBadMagic(0x00))
        ));
    }

    #[test]
    fn open_rejects_unsupported_version() {
        let mut port = MockPort::new();
        port.queue_frame(ModemOpcode::Ack, &[9]);
        let mut link = ModemLink::new(port, 1024);
        let local_config = [0u8; DVM_CONF_AREA_LEN];
        let result = link.open(RfParams::default(), &local_config);
        assert!(matches!(result, Err(ModemError::UnsupportedVersion(9))));
    }

    #[test]
    fn open_full_handshake_succeeds() {
        let mut port = MockPort::new();
        port.queue_frame(ModemOpcode::Ack, &[2]);

        let local_config = [0x11u8; DVM_CONF_AREA_LEN];
        let mut flash_payload = local_config.to_vec();
        flash_payload[5] = 0xAB; // one intentional mismatch
        let crc = ccitt16_kind2(&local_config[0..DVM_CONF_AREA_LEN].iter().enumerate().map(|(i, b)| if i == 5 { 0xAB } else { *b }).collect::<Vec<u8>>());
        flash_payload.push((crc >> 8) as u8);
        flash_payload.push(crc as u8);
        flash_payload.push(DVM_CONF_AREA_VER);
        port.queue_frame(ModemOpcode::Ack, &flash_payload);

        port.queue_frame(ModemOpcode::Ack, &[]); // SET_RFPARAMS
        port.queue_frame(ModemOpcode::Ack, &[]); // SET_CONFIG
        port.queue_frame(ModemOpcode::Ack, &[]); // SET_SYMLVLADJ

        let mut link = ModemLink::new(port, 1024);
        let mismatches = link.open(RfParams::default(), &local_config).expect("open");
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].local, 0x11);
        assert_eq!(mismatches[0].flash, 0xAB);
    }

    #[test]
    fn status_poll_refreshes_space_counters() {
        let mut port = MockPort::new();
        port.queue_frame(ModemOpcode::Ack, &[10, 20, 30, 40, 0, 0, 0, 0, 0, 0]);
        let mut link = ModemLink::new(port, 1024);
        let status = link.poll_status().expect("status");
        assert_eq!(status.dmr_space_1, 120);
        assert_eq!(status.p25_space, 360);
    }

    #[test]
    fn write_dmr_respects_space_accounting() {
        let port = MockPort::new();
        let mut link = ModemLink::new(port, 1024);
        link.status.dmr_space_1 = 2;
        let wrote = link.write_dmr(1, &[1, 2, 3]).expect("write");
        assert!(!wrote);
        link.status.dmr_space_1 = 10;
        let wrote = link.write_dmr(1, &[1, 2, 3]).expect("write");
        assert!(wrote);
        assert_eq!(link.status.dmr_space_1, 7);
    }
}
