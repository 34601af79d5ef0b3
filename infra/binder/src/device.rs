use fxhash::FxHashMap;
use std::any::{Any, TypeId, type_name};
use std::sync::Arc;

/// A type-erased, shareable device.
pub type DeviceHandle = Arc<dyn Any + Send + Sync>;

/// Source of named device handles (the host's hardware map).
pub trait DeviceRegistry {
    fn lookup(&self, name: &str) -> Option<DeviceHandle>;
}

/// A field that can hold a device of one concrete type.
pub trait DeviceSlot {
    fn device_type(&self) -> &'static str;

    fn device_type_id(&self) -> TypeId;

    fn is_bound(&self) -> bool;

    /// Stores `handle` if it is of the slot's device type. Returns whether it did.
    fn assign(&mut self, handle: &DeviceHandle) -> bool;
}

impl<T: Any + Send + Sync> DeviceSlot for Option<Arc<T>> {
    fn device_type(&self) -> &'static str {
        type_name::<T>()
    }

    fn device_type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn is_bound(&self) -> bool {
        self.is_some()
    }

    fn assign(&mut self, handle: &DeviceHandle) -> bool {
        match Arc::clone(handle).downcast::<T>() {
            Ok(device) => {
                *self = Some(device);
                true
            },
            Err(_) => false,
        }
    }
}

/// Devices keyed by exact name.
#[derive(Default)]
pub struct DeviceMap {
    devices: FxHashMap<String, DeviceHandle>,
}

impl DeviceMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `device` under `name`, replacing any previous entry.
    pub fn insert<T: Any + Send + Sync>(&mut self, name: impl Into<String>, device: T) -> Arc<T> {
        let device = Arc::new(device);
        self.insert_arc(name, Arc::clone(&device));
        device
    }

    pub fn insert_arc<T: Any + Send + Sync>(&mut self, name: impl Into<String>, device: Arc<T>) {
        self.devices.insert(name.into(), device);
    }

    /// Typed lookup; `None` if absent or of another type.
    #[must_use]
    pub fn get<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.devices.get(name).and_then(|handle| Arc::clone(handle).downcast::<T>().ok())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.devices.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.devices.keys().map(String::as_str)
    }
}

impl DeviceRegistry for DeviceMap {
    fn lookup(&self, name: &str) -> Option<DeviceHandle> {
        self.devices.get(name).cloned()
    }
}

impl std::fmt::Debug for DeviceMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("DeviceMap").field("devices", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Motor(u8);

    #[derive(Debug)]
    struct Sensor;

    #[test]
    fn typed_lookup_downcasts() {
        let mut map = DeviceMap::new();
        map.insert("left", Motor(1));
        map.insert("eye", Sensor);

        assert_eq!(map.get::<Motor>("left").as_deref(), Some(&Motor(1)));
        assert!(map.get::<Motor>("eye").is_none());
        assert!(map.get::<Motor>("right").is_none());
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn slot_assigns_only_matching_type() {
        let mut map = DeviceMap::new();
        let motor = map.insert("left", Motor(3));
        map.insert("eye", Sensor);

        let mut slot: Option<Arc<Motor>> = None;
        assert!(!slot.assign(&map.lookup("eye").unwrap()));
        assert!(!slot.is_bound());

        assert!(slot.assign(&map.lookup("left").unwrap()));
        assert!(Arc::ptr_eq(slot.as_ref().unwrap(), &motor));
        assert_eq!(slot.device_type_id(), TypeId::of::<Motor>());
    }
}
