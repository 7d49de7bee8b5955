//! In-memory device and record registry.
//!
//! An explicit long-lived service object: construct one at startup and pass
//! it by reference to whatever needs it. Mutations notify subscribers after
//! the state lock is released, so listeners may read the registry freely.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

use super::models::{
    AttendanceRecord, Device, DeviceStatus, DeviceUpdate, NewDevice, SystemStats,
};

/// Change notification delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    DeviceAdded(String),
    DeviceUpdated(String),
    DeviceDeleted(String),
    RecordsAdded(usize),
    RecordsCleared,
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&RegistryEvent) + Send + Sync>;

#[derive(Debug, Default)]
struct RegistryState {
    devices: Vec<Device>,
    records: Vec<AttendanceRecord>,
}

/// Device list plus the records fetched for them.
#[derive(Default)]
pub struct DeviceRegistry {
    state: RwLock<RegistryState>,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_subscription: AtomicU64,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for every mutation.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&RegistryEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(sid, _)| *sid != id);
        listeners.len() != before
    }

    fn notify(&self, event: RegistryEvent) {
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in listeners {
            listener(&event);
        }
    }

    pub fn devices(&self) -> Vec<Device> {
        self.state.read().devices.clone()
    }

    pub fn device(&self, id: &str) -> Option<Device> {
        self.state.read().devices.iter().find(|d| d.id == id).cloned()
    }

    pub fn add_device(&self, new: NewDevice) -> Device {
        let device = Device {
            id: Uuid::new_v4().to_string(),
            sn: new.sn,
            password: new.password,
            start_date: new.start_date,
            end_date: new.end_date,
            status: DeviceStatus::Idle,
            last_records: 0,
            last_sync: None,
        };
        self.state.write().devices.push(device.clone());
        log::info!("DEVICE_ADDED id={} sn={}", device.id, device.sn);
        self.notify(RegistryEvent::DeviceAdded(device.id.clone()));
        device
    }

    /// Apply a partial update. Returns the updated device, or `None` if the
    /// id is unknown.
    pub fn update_device(&self, id: &str, update: DeviceUpdate) -> Option<Device> {
        let updated = {
            let mut state = self.state.write();
            let device = state.devices.iter_mut().find(|d| d.id == id)?;
            if let Some(password) = update.password {
                device.password = password;
            }
            if let Some(start_date) = update.start_date {
                device.start_date = start_date;
            }
            if let Some(end_date) = update.end_date {
                device.end_date = end_date;
            }
            if let Some(status) = update.status {
                device.status = status;
            }
            if let Some(last_records) = update.last_records {
                device.last_records = last_records;
            }
            if let Some(last_sync) = update.last_sync {
                device.last_sync = last_sync;
            }
            device.clone()
        };
        self.notify(RegistryEvent::DeviceUpdated(id.to_string()));
        Some(updated)
    }

    pub fn set_status(&self, id: &str, status: DeviceStatus) -> Option<Device> {
        self.update_device(
            id,
            DeviceUpdate {
                status: Some(status),
                ..DeviceUpdate::default()
            },
        )
    }

    /// Remove a device and every record fetched from its serial number.
    pub fn delete_device(&self, id: &str) -> bool {
        let removed = {
            let mut state = self.state.write();
            let Some(pos) = state.devices.iter().position(|d| d.id == id) else {
                return false;
            };
            let device = state.devices.remove(pos);
            state.records.retain(|r| r.serial_number != device.sn);
            device
        };
        log::info!("DEVICE_DELETED id={} sn={}", removed.id, removed.sn);
        self.notify(RegistryEvent::DeviceDeleted(id.to_string()));
        true
    }

    pub fn records(&self) -> Vec<AttendanceRecord> {
        self.state.read().records.clone()
    }

    pub fn add_records(&self, records: Vec<AttendanceRecord>) {
        let added = records.len();
        self.state.write().records.extend(records);
        self.notify(RegistryEvent::RecordsAdded(added));
    }

    /// Append records fetched for device `id`. Returns `false`, storing
    /// nothing, when the device no longer exists.
    pub fn add_device_records(&self, id: &str, records: Vec<AttendanceRecord>) -> bool {
        let added = records.len();
        {
            let mut state = self.state.write();
            if !state.devices.iter().any(|d| d.id == id) {
                return false;
            }
            state.records.extend(records);
        }
        self.notify(RegistryEvent::RecordsAdded(added));
        true
    }

    pub fn clear_records(&self) {
        self.state.write().records.clear();
        self.notify(RegistryEvent::RecordsCleared);
    }

    pub fn stats(&self) -> SystemStats {
        let state = self.state.read();
        let last_sync: Option<DateTime<Utc>> =
            state.devices.iter().filter_map(|d| d.last_sync).max();
        SystemStats {
            total_devices: state.devices.len(),
            connected_devices: state
                .devices
                .iter()
                .filter(|d| d.status == DeviceStatus::Connected)
                .count(),
            total_records: state.records.len(),
            last_sync,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn new_device(sn: &str) -> NewDevice {
        NewDevice {
            sn: sn.to_string(),
            password: "pw".to_string(),
            start_date: Some("2024-01-01".to_string()),
            end_date: None,
        }
    }

    fn record(sn: &str, code: &str) -> AttendanceRecord {
        AttendanceRecord {
            id: Uuid::new_v4().to_string(),
            serial_number: sn.to_string(),
            employee_code: code.to_string(),
            punch_time: Utc.with_ymd_and_hms(2024, 1, 5, 8, 0, 0).unwrap(),
            verify_type: 1,
            status: 0,
            work_code: 1,
        }
    }

    #[test]
    fn test_add_device_starts_idle() {
        let registry = DeviceRegistry::new();
        let device = registry.add_device(new_device("SN1"));
        assert_eq!(device.status, DeviceStatus::Idle);
        assert_eq!(device.last_records, 0);
        assert_eq!(registry.devices().len(), 1);
        assert!(registry.device(&device.id).is_some());
    }

    #[test]
    fn test_update_unknown_device() {
        let registry = DeviceRegistry::new();
        assert!(registry.set_status("missing", DeviceStatus::Failed).is_none());
    }

    #[test]
    fn test_delete_cascades_records() {
        let registry = DeviceRegistry::new();
        let a = registry.add_device(new_device("SN-A"));
        registry.add_device(new_device("SN-B"));
        registry.add_records(vec![record("SN-A", "1"), record("SN-B", "2")]);

        assert!(registry.delete_device(&a.id));
        let records = registry.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].serial_number, "SN-B");
        assert!(!registry.delete_device(&a.id));
    }

    #[test]
    fn test_device_records_dropped_for_deleted_device() {
        let registry = DeviceRegistry::new();
        let a = registry.add_device(new_device("SN-A"));
        assert!(registry.add_device_records(&a.id, vec![record("SN-A", "1")]));
        assert_eq!(registry.records().len(), 1);

        registry.delete_device(&a.id);
        assert!(!registry.add_device_records(&a.id, vec![record("SN-A", "2")]));
        assert!(registry.records().is_empty());
    }

    #[test]
    fn test_stats() {
        let registry = DeviceRegistry::new();
        let a = registry.add_device(new_device("SN-A"));
        registry.add_device(new_device("SN-B"));
        let synced = Utc.with_ymd_and_hms(2024, 2, 1, 10, 0, 0).unwrap();
        registry.update_device(
            &a.id,
            DeviceUpdate {
                status: Some(DeviceStatus::Connected),
                last_sync: Some(Some(synced)),
                ..DeviceUpdate::default()
            },
        );
        registry.add_records(vec![record("SN-A", "1")]);

        let stats = registry.stats();
        assert_eq!(stats.total_devices, 2);
        assert_eq!(stats.connected_devices, 1);
        assert_eq!(stats.total_records, 1);
        assert_eq!(stats.last_sync, Some(synced));
    }

    #[test]
    fn test_subscribers_see_mutations_and_can_unsubscribe() {
        let registry = DeviceRegistry::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = registry.subscribe(move |event| sink.lock().push(event.clone()));

        let device = registry.add_device(new_device("SN1"));
        registry.add_records(vec![record("SN1", "7")]);
        registry.clear_records();
        assert!(registry.unsubscribe(id));
        registry.delete_device(&device.id);

        let events = seen.lock().clone();
        assert_eq!(
            events,
            vec![
                RegistryEvent::DeviceAdded(device.id.clone()),
                RegistryEvent::RecordsAdded(1),
                RegistryEvent::RecordsCleared,
            ]
        );
        assert!(!registry.unsubscribe(id));
    }

    #[test]
    fn test_listener_may_read_registry() {
        let registry = Arc::new(DeviceRegistry::new());
        let counts = Arc::new(Mutex::new(Vec::new()));
        let (reg, sink) = (Arc::clone(&registry), Arc::clone(&counts));
        registry.subscribe(move |_| sink.lock().push(reg.devices().len()));

        registry.add_device(new_device("SN1"));
        assert_eq!(*counts.lock(), vec![1]);
    }
}
