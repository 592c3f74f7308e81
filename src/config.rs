//! Gateway configuration.
//!
//! Parsing a config file from disk is explicitly out of scope (spec §1);
//! this struct is still a typed, serde-capable value the embedder builds
//! programmatically, matching the teacher's `SerialConfig`/`WMBusConfig`
//! shape rather than threading a dozen loose arguments through every
//! constructor.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::site::SiteData;

/// Per-protocol enable flags, backing the `dmr`/`p25`/`nxdn`/`dfsi` Cargo
/// features with a runtime toggle (a build can carry all four codec
/// families but a given deployment may only enable one).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProtocolFlags {
    pub dmr: bool,
    pub p25: bool,
    pub nxdn: bool,
}

impl Default for ProtocolFlags {
    fn default() -> Self {
        ProtocolFlags {
            dmr: true,
            p25: true,
            nxdn: true,
        }
    }
}

/// Timers and thresholds referenced throughout spec §4.5/§4.6/§7.
#[derive(Debug, Clone)]
pub struct TimerConfig {
    pub tg_hang: Duration,
    pub net_tg_hang: Duration,
    pub rf_timeout: Duration,
    pub net_timeout: Duration,
    pub inactivity_watchdog: Duration,
    pub reconnect_interval: Duration,
    pub status_poll_interval: Duration,
}

impl Default for TimerConfig {
    fn default() -> Self {
        TimerConfig {
            tg_hang: Duration::from_secs(3),
            net_tg_hang: Duration::from_secs(3),
            rf_timeout: Duration::from_secs(120),
            net_timeout: Duration::from_secs(120),
            inactivity_watchdog: Duration::from_secs(4),
            reconnect_interval: Duration::from_secs(5),
            status_poll_interval: Duration::from_millis(250),
        }
    }
}

/// `Duration` does not implement `Serialize`/`Deserialize` directly; store
/// each field as whole milliseconds instead, mirroring how the teacher
/// persists numeric tunables in its own `serde`-backed config structs.
mod duration_ms_map {
    use super::*;
    use serde::de::Error as DeError;
    use serde::{Deserializer, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Millis {
        tg_hang_ms: u64,
        net_tg_hang_ms: u64,
        rf_timeout_ms: u64,
        net_timeout_ms: u64,
        inactivity_watchdog_ms: u64,
        reconnect_interval_ms: u64,
        status_poll_interval_ms: u64,
    }

    pub fn serialize<S: Serializer>(cfg: &TimerConfig, ser: S) -> Result<S::Ok, S::Error> {
        Millis {
            tg_hang_ms: cfg.tg_hang.as_millis() as u64,
            net_tg_hang_ms: cfg.net_tg_hang.as_millis() as u64,
            rf_timeout_ms: cfg.rf_timeout.as_millis() as u64,
            net_timeout_ms: cfg.net_timeout.as_millis() as u64,
            inactivity_watchdog_ms: cfg.inactivity_watchdog.as_millis() as u64,
            reconnect_interval_ms: cfg.reconnect_interval.as_millis() as u64,
            status_poll_interval_ms: cfg.status_poll_interval.as_millis() as u64,
        }
        .serialize(ser)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<TimerConfig, D::Error> {
        let m = Millis::deserialize(de).map_err(D::Error::custom)?;
        Ok(TimerConfig {
            tg_hang: Duration::from_millis(m.tg_hang_ms),
            net_tg_hang: Duration::from_millis(m.net_tg_hang_ms),
            rf_timeout: Duration::from_millis(m.rf_timeout_ms),
            net_timeout: Duration::from_millis(m.net_timeout_ms),
            inactivity_watchdog: Duration::from_millis(m.inactivity_watchdog_ms),
            reconnect_interval: Duration::from_millis(m.reconnect_interval_ms),
            status_poll_interval: Duration::from_millis(m.status_poll_interval_ms),
        })
    }
}

impl Serialize for TimerConfig {
    fn serialize<S: serde::Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        duration_ms_map::serialize(self, ser)
    }
}

impl<'de> Deserialize<'de> for TimerConfig {
    fn deserialize<D: serde::Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        duration_ms_map::deserialize(de)
    }
}

/// Top-level gateway configuration, owned by the embedder and passed by
/// reference to each processor at construction (spec §9: no process-wide
/// globals).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub site: SiteDataConfig,
    pub protocols: ProtocolFlags,
    pub timers: TimerConfig,
    /// Whether the gateway accepts calls to any destination (`false`) or
    /// only the one configured at `permitted_dst_id` (`true` means
    /// authoritative over its own destination list).
    pub authoritative: bool,
    pub permitted_dst_id: Option<u32>,
    /// Downgrade PDU-header CRC mismatches to a warning instead of
    /// dropping the frame (spec §7).
    pub warn_crc: bool,
    /// Disable the automatic modem reset on overflow-counter saturation
    /// (spec §4.3).
    pub disable_overflow_reset: bool,
    pub verify_affiliation: bool,
    pub voice_on_control: bool,
    pub silence_threshold: u32,
}

/// Serializable mirror of [`crate::site::SiteData`] (which intentionally
/// has no `Serialize` derive of its own, since the live struct is meant to
/// be constructed once and handed around, not round-tripped through JSON).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SiteDataConfig {
    pub net_id: u32,
    pub sys_id: u16,
    pub color_code: u8,
    pub rfss_id: u8,
    pub site_id: u8,
}

impl From<SiteDataConfig> for SiteData {
    fn from(c: SiteDataConfig) -> Self {
        SiteData::new(c.net_id, c.sys_id, c.color_code, c.rfss_id, c.site_id)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            site: SiteDataConfig {
                net_id: 0,
                sys_id: 0,
                color_code: 1,
                rfss_id: 1,
                site_id: 1,
            },
            protocols: ProtocolFlags::default(),
            timers: TimerConfig::default(),
            authoritative: false,
            permitted_dst_id: None,
            warn_crc: false,
            disable_overflow_reset: false,
            verify_affiliation: true,
            voice_on_control: false,
            silence_threshold: 8,
        }
    }
}
