//! Recurring alarm contracts mirroring the WebExtensions alarm namespace.

use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use crate::time::unix_time_ms_now;

/// A fired alarm delivered to [`AlarmService`] listeners.
#[derive(Debug, Clone, PartialEq)]
pub struct AlarmEvent {
    /// Name the alarm was registered under.
    pub name: String,
    /// Host-scheduled firing time in unix milliseconds.
    pub scheduled_time_unix_ms: u64,
}

/// Listener invoked for every fired alarm, regardless of name.
pub type AlarmListener = Rc<dyn Fn(&AlarmEvent)>;

/// Recurring timer service.
///
/// Registration is idempotent per name and listeners are unfiltered; callers
/// match on [`AlarmEvent::name`] themselves.
pub trait AlarmService {
    /// Registers (or re-registers) a recurring alarm.
    ///
    /// Scheduling the same `name` again replaces the previous schedule; two
    /// calls never produce two competing timers for one name. Hosts without
    /// an alarm namespace accept and drop the registration.
    fn schedule(&self, name: &str, period_minutes: f64);

    /// Adds a listener invoked on every fired alarm.
    fn on_alarm(&self, listener: AlarmListener);
}

#[derive(Debug, Clone, Copy, Default)]
/// Inert alarm service for hosts without an alarm namespace.
pub struct NoopAlarmService;

impl AlarmService for NoopAlarmService {
    fn schedule(&self, _name: &str, _period_minutes: f64) {}

    fn on_alarm(&self, _listener: AlarmListener) {}
}

#[derive(Clone, Default)]
/// In-memory alarm service with manual firing for tests.
pub struct MemoryAlarmService {
    schedules: Rc<RefCell<BTreeMap<String, f64>>>,
    listeners: Rc<RefCell<Vec<AlarmListener>>>,
}

impl MemoryAlarmService {
    /// Creates a service with no schedules or listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the registered schedules keyed by alarm name.
    pub fn schedules(&self) -> BTreeMap<String, f64> {
        self.schedules.borrow().clone()
    }

    /// Fires the named alarm immediately, invoking every listener.
    ///
    /// Listeners run whether or not a schedule exists for `name`, matching a
    /// host delivering an alarm registered by an earlier process.
    pub fn fire(&self, name: &str) {
        let event = AlarmEvent {
            name: name.to_string(),
            scheduled_time_unix_ms: unix_time_ms_now(),
        };
        let listeners = self.listeners.borrow().clone();
        for listener in listeners {
            listener(&event);
        }
    }
}

impl AlarmService for MemoryAlarmService {
    fn schedule(&self, name: &str, period_minutes: f64) {
        self.schedules
            .borrow_mut()
            .insert(name.to_string(), period_minutes);
    }

    fn on_alarm(&self, listener: AlarmListener) {
        self.listeners.borrow_mut().push(listener);
    }
}
