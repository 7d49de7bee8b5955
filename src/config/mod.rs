//! Runtime configuration.
//!
//! Everything comes from `PUNCHLOG_*` environment variables with typed
//! defaults. A value that does not parse falls back to its default and is
//! reported with a warning.

use std::env;
use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};

pub const DEFAULT_UPSTREAM_BASE_URL: &str = "http://www.solutioncloud.co.id";
pub const DEFAULT_LOGIN_PATH: &str = "/sc_pro.asp";
pub const DEFAULT_LISTING_PATH: &str = "/view.asp";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_USER_AGENT: &str = concat!("punchlog/", env!("CARGO_PKG_VERSION"));

/// Where the legacy portal lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub login_path: String,
    pub listing_path: String,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            listing_path: DEFAULT_LISTING_PATH.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl UpstreamConfig {
    pub fn login_url(&self) -> String {
        join_url(&self.base_url, &self.login_path)
    }

    pub fn listing_url(&self) -> String {
        join_url(&self.base_url, &self.listing_path)
    }
}

/// Full service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub upstream: UpstreamConfig,
    pub bind_addr: String,
    /// Collapse records sharing employee code and punch time.
    pub dedupe: bool,
    /// Offset applied to timestamps the portal prints without a zone.
    pub device_utc_offset: FixedOffset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upstream: UpstreamConfig::default(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            dedupe: true,
            device_utc_offset: utc(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Config::default();
        let offset_minutes = env_i32("PUNCHLOG_DEVICE_UTC_OFFSET_MINUTES", 0);
        let device_utc_offset = offset_from_minutes(offset_minutes).unwrap_or_else(|| {
            log::warn!(
                "CONFIG_INVALID key=PUNCHLOG_DEVICE_UTC_OFFSET_MINUTES value={} using=0",
                offset_minutes
            );
            utc()
        });

        Self {
            upstream: UpstreamConfig {
                base_url: env_string("PUNCHLOG_UPSTREAM_BASE_URL", &defaults.upstream.base_url),
                login_path: env_string("PUNCHLOG_LOGIN_PATH", &defaults.upstream.login_path),
                listing_path: env_string("PUNCHLOG_LISTING_PATH", &defaults.upstream.listing_path),
                request_timeout: Duration::from_millis(env_u64(
                    "PUNCHLOG_REQUEST_TIMEOUT_MS",
                    DEFAULT_REQUEST_TIMEOUT_MS,
                )),
                user_agent: env_string("PUNCHLOG_USER_AGENT", &defaults.upstream.user_agent),
            },
            bind_addr: env_string("PUNCHLOG_BIND_ADDR", &defaults.bind_addr),
            dedupe: env_bool("PUNCHLOG_DEDUPE", defaults.dedupe),
            device_utc_offset,
        }
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}

/// Offsets beyond +/-24h are not representable.
pub fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    minutes.checked_mul(60).and_then(FixedOffset::east_opt)
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn env_string(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_bool(name: &str, default: bool) -> bool {
    let Ok(raw) = env::var(name) else {
        return default;
    };
    parse_bool(&raw).unwrap_or_else(|| {
        log::warn!("CONFIG_INVALID key={} value={:?} using={}", name, raw, default);
        default
    })
}

fn env_u64(name: &str, default: u64) -> u64 {
    let Ok(raw) = env::var(name) else {
        return default;
    };
    raw.trim().parse::<u64>().unwrap_or_else(|_| {
        log::warn!("CONFIG_INVALID key={} value={:?} using={}", name, raw, default);
        default
    })
}

fn env_i32(name: &str, default: i32) -> i32 {
    let Ok(raw) = env::var(name) else {
        return default;
    };
    raw.trim().parse::<i32>().unwrap_or_else(|_| {
        log::warn!("CONFIG_INVALID key={} value={:?} using={}", name, raw, default);
        default
    })
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
