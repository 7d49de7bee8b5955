//! Registry-driven device operations.
//!
//! Wraps the fetch pipeline with device status bookkeeping:
//! `Processing` while a call is in flight, then `Connected` or `Failed`.

use chrono::Utc;

use crate::error::SyncError;
use crate::storage::models::{Credentials, DeviceStatus, DeviceUpdate};
use crate::storage::registry::DeviceRegistry;
use crate::transport::session::AttendanceSource;

use super::attendance::{fetch_attendance, FetchOptions};
use super::context::FetchContext;

/// Run only the login handshake. True when the portal accepts the
/// credentials.
pub async fn test_connection<S: AttendanceSource>(source: &S, credentials: &Credentials) -> bool {
    let ctx = FetchContext::new(&credentials.serial_number).log_context();
    match source.authenticate(credentials, &ctx).await {
        Ok(_) => {
            log::info!("{} CONNECTION_OK", ctx);
            true
        }
        Err(e) => {
            log::warn!(
                "{} CONNECTION_FAILED kind={} phase={} error={}",
                ctx,
                e.kind(),
                e.phase(),
                e
            );
            false
        }
    }
}

/// Test a registered device's credentials and record the outcome on it.
pub async fn check_device<S: AttendanceSource>(
    registry: &DeviceRegistry,
    source: &S,
    device_id: &str,
) -> Result<bool, SyncError> {
    let device = registry
        .set_status(device_id, DeviceStatus::Processing)
        .ok_or_else(|| SyncError::UnknownDevice(device_id.to_string()))?;

    let connected = test_connection(source, &device.credentials()).await;
    let update = if connected {
        DeviceUpdate {
            status: Some(DeviceStatus::Connected),
            last_sync: Some(Some(Utc::now())),
            ..DeviceUpdate::default()
        }
    } else {
        DeviceUpdate {
            status: Some(DeviceStatus::Failed),
            ..DeviceUpdate::default()
        }
    };
    registry
        .update_device(device_id, update)
        .ok_or_else(|| SyncError::UnknownDevice(device_id.to_string()))?;
    Ok(connected)
}

/// Fetch a registered device's records over its stored window, append them
/// to the registry and return how many were added.
pub async fn sync_device<S: AttendanceSource>(
    registry: &DeviceRegistry,
    source: &S,
    device_id: &str,
    options: &FetchOptions,
) -> Result<usize, SyncError> {
    let device = registry
        .set_status(device_id, DeviceStatus::Processing)
        .ok_or_else(|| SyncError::UnknownDevice(device_id.to_string()))?;

    let envelope = fetch_attendance(source, &device.fetch_request(), options).await;
    if !envelope.success {
        registry.set_status(device_id, DeviceStatus::Failed);
        let message = envelope.error.unwrap_or_default();
        log::warn!("DEVICE_SYNC_FAILED id={} sn={} error={}", device_id, device.sn, message);
        return Err(SyncError::Fetch(message));
    }

    // The device may have been deleted while the fetch was in flight.
    let count = envelope.count;
    let gone = || {
        log::warn!("DEVICE_SYNC_DISCARDED id={} sn={} records={}", device_id, device.sn, count);
        SyncError::UnknownDevice(device_id.to_string())
    };
    if !registry.add_device_records(device_id, envelope.records) {
        return Err(gone());
    }
    registry
        .update_device(
            device_id,
            DeviceUpdate {
                status: Some(DeviceStatus::Connected),
                last_records: Some(count),
                last_sync: Some(Some(Utc::now())),
                ..DeviceUpdate::default()
            },
        )
        .ok_or_else(gone)?;
    log::info!("DEVICE_SYNC_OK id={} sn={} records={}", device_id, device.sn, count);
    Ok(count)
}
