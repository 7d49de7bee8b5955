//! Data models for attendance records and devices.
//!
//! Wire names follow the portal dashboard's JSON (`sn`, `empCode`,
//! `punchTime`, ...) so existing callers can consume the envelope unchanged.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Device credentials forwarded to the portal login.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    #[serde(rename = "sn")]
    pub serial_number: String,
    pub password: String,
}

impl Credentials {
    pub fn new(serial_number: &str, password: &str) -> Self {
        Self {
            serial_number: serial_number.to_string(),
            password: password.to_string(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("serial_number", &self.serial_number)
            .field("password", &"***")
            .finish()
    }
}

/// Body of a fetch-attendance call.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchRequest {
    pub sn: String,
    pub password: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl FetchRequest {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.sn, &self.password)
    }
}

impl fmt::Debug for FetchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchRequest")
            .field("sn", &self.sn)
            .field("password", &"***")
            .field("start_date", &self.start_date)
            .field("end_date", &self.end_date)
            .finish()
    }
}

/// One punch event extracted from the portal listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: String,
    #[serde(rename = "sn")]
    pub serial_number: String,
    #[serde(rename = "empCode")]
    pub employee_code: String,
    #[serde(with = "iso_millis")]
    pub punch_time: DateTime<Utc>,
    pub verify_type: i64,
    pub status: i64,
    pub work_code: i64,
}

impl AttendanceRecord {
    /// Content key used for cross-strategy deduplication.
    pub fn content_key(&self) -> (String, DateTime<Utc>) {
        (self.employee_code.clone(), self.punch_time)
    }
}

/// Uniform result of one fetch-attendance invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub success: bool,
    pub records: Vec<AttendanceRecord>,
    pub count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResultEnvelope {
    pub fn success(records: Vec<AttendanceRecord>) -> Self {
        Self {
            success: true,
            count: records.len(),
            records,
            error: None,
        }
    }

    pub fn failure(message: &str) -> Self {
        let message = if message.trim().is_empty() {
            "Unknown error".to_string()
        } else {
            message.to_string()
        };
        Self {
            success: false,
            records: Vec::new(),
            count: 0,
            error: Some(message),
        }
    }
}

/// Connection state of a registered device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceStatus {
    Connected,
    Failed,
    Processing,
    Idle,
}

/// A registered time-clock device.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: String,
    pub sn: String,
    pub password: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    pub status: DeviceStatus,
    pub last_records: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<DateTime<Utc>>,
}

impl Device {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.sn, &self.password)
    }

    /// Build a fetch request from the device's stored window.
    pub fn fetch_request(&self) -> FetchRequest {
        FetchRequest {
            sn: self.sn.clone(),
            password: self.password.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
        }
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("id", &self.id)
            .field("sn", &self.sn)
            .field("status", &self.status)
            .field("last_records", &self.last_records)
            .field("last_sync", &self.last_sync)
            .finish_non_exhaustive()
    }
}

/// Input for registering a device.
#[derive(Debug, Clone, Default)]
pub struct NewDevice {
    pub sn: String,
    pub password: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Partial update applied to a device; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct DeviceUpdate {
    pub password: Option<String>,
    pub start_date: Option<Option<String>>,
    pub end_date: Option<Option<String>>,
    pub status: Option<DeviceStatus>,
    pub last_records: Option<usize>,
    pub last_sync: Option<Option<DateTime<Utc>>>,
}

/// Overview counters across the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStats {
    pub total_devices: usize,
    pub connected_devices: usize,
    pub total_records: usize,
    pub last_sync: Option<DateTime<Utc>>,
}

/// ISO-8601 UTC with millisecond precision, e.g. `2024-01-05T08:00:00.000Z`.
pub mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }

    pub fn format(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}
