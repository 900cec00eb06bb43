use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::ScopeError;
use crate::naming::validate_pv_name;
use crate::types::PvValue;

/// Callback invoked on every value update. May run on the transport's
/// delivery thread, never on the UI loop.
pub type UpdateCallback = Box<dyn Fn(&PvValue) + Send + Sync + 'static>;

/// One named, remotely observable/writable signal. The wire transport behind
/// it is an implementation detail of the connector.
pub trait ProcessVariable: Send + Sync {
    fn name(&self) -> &str;

    /// Most recent value, if any has been delivered yet.
    fn value(&self) -> Option<PvValue>;

    /// Engineering unit string reported by the record. Empty if unknown.
    fn unit(&self) -> String;

    fn put(&self, value: PvValue) -> Result<(), ScopeError>;

    /// Register a callback for subsequent updates.
    fn subscribe(&self, callback: UpdateCallback);
}

impl std::fmt::Debug for dyn ProcessVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessVariable")
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}

/// Hands out connected process variables by name. Fails fast on an empty
/// name, before any subscription is attempted.
pub trait PvConnector: Send + Sync {
    fn connect(&self, name: &str) -> Result<Arc<dyn ProcessVariable>, ScopeError>;
}

struct SimulatedState {
    value: Option<PvValue>,
    unit: String,
}

/// In-memory process variable. `put` stores the value and synchronously
/// notifies every subscriber, exactly like a monitor callback from a live
/// transport.
pub struct SimulatedPv {
    name: String,
    state: Mutex<SimulatedState>,
    subscribers: Mutex<Vec<Arc<dyn Fn(&PvValue) + Send + Sync>>>,
}

impl SimulatedPv {
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            state: Mutex::new(SimulatedState {
                value: None,
                unit: String::new(),
            }),
            subscribers: Mutex::new(Vec::new()),
        })
    }

    pub fn set_unit(&self, unit: impl Into<String>) {
        self.state.lock().unit = unit.into();
    }

    /// Store a value without notifying subscribers. Used to seed readback
    /// records before anyone is listening.
    pub fn seed(&self, value: PvValue) {
        self.state.lock().value = Some(value);
    }
}

impl ProcessVariable for SimulatedPv {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> Option<PvValue> {
        self.state.lock().value.clone()
    }

    fn unit(&self) -> String {
        self.state.lock().unit.clone()
    }

    fn put(&self, value: PvValue) -> Result<(), ScopeError> {
        self.state.lock().value = Some(value.clone());
        // Snapshot outside the lock so a callback may read the PV again.
        let subscribers: Vec<_> = self.subscribers.lock().iter().cloned().collect();
        for callback in subscribers {
            callback(&value);
        }
        Ok(())
    }

    fn subscribe(&self, callback: UpdateCallback) {
        self.subscribers.lock().push(Arc::from(callback));
    }
}

/// Connector over a shared set of [`SimulatedPv`]s. Connecting to an unknown
/// name creates the record, so a data source and a display can wire up in
/// either order.
#[derive(Default)]
pub struct SimulatedConnector {
    pvs: Mutex<HashMap<String, Arc<SimulatedPv>>>,
}

impl SimulatedConnector {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn get_or_create(&self, name: &str) -> Arc<SimulatedPv> {
        self.pvs
            .lock()
            .entry(name.to_string())
            .or_insert_with(|| SimulatedPv::new(name))
            .clone()
    }

    pub fn get(&self, name: &str) -> Option<Arc<SimulatedPv>> {
        self.pvs.lock().get(name).cloned()
    }
}

impl PvConnector for SimulatedConnector {
    fn connect(&self, name: &str) -> Result<Arc<dyn ProcessVariable>, ScopeError> {
        validate_pv_name(name, "pv")?;
        Ok(self.get_or_create(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn put_notifies_every_subscriber_with_the_value() {
        let pv = SimulatedPv::new("IOC:Wave");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_cb = seen.clone();
        pv.subscribe(Box::new(move |value| {
            seen_cb.lock().push(value.clone());
        }));

        pv.put(PvValue::ArrayF64(vec![1.0, 2.0])).unwrap();
        pv.put(PvValue::ArrayF64(vec![3.0])).unwrap();

        let seen = seen.lock();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], PvValue::ArrayF64(vec![1.0, 2.0]));
        assert_eq!(seen[1], PvValue::ArrayF64(vec![3.0]));
        assert_eq!(pv.value(), Some(PvValue::ArrayF64(vec![3.0])));
    }

    #[test]
    fn seed_does_not_notify() {
        let pv = SimulatedPv::new("IOC:Enable");
        let count = Arc::new(AtomicUsize::new(0));
        let count_cb = count.clone();
        pv.subscribe(Box::new(move |_| {
            count_cb.fetch_add(1, Ordering::SeqCst);
        }));

        pv.seed(PvValue::Bool(true));
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(pv.value(), Some(PvValue::Bool(true)));
    }

    #[test]
    fn connector_rejects_empty_names_before_connecting() {
        let connector = SimulatedConnector::new();
        assert!(matches!(
            connector.connect("").unwrap_err(),
            ScopeError::EmptyPvName { .. }
        ));
    }

    #[test]
    fn connector_shares_one_record_per_name() {
        let connector = SimulatedConnector::new();
        let a = connector.connect("IOC:Wave").unwrap();
        let writer = connector.get_or_create("IOC:Wave");
        writer.put(PvValue::F64(4.2)).unwrap();
        assert_eq!(a.value(), Some(PvValue::F64(4.2)));
    }
}
