//! Hot-plug detection
//!
//! Translates enable-line edges into registry changes. [`HotPlugDetector::on_edge`]
//! is called from the GPIO edge handler: it never blocks, never allocates and
//! holds the registry critical section only long enough to copy one slot.

use crate::sensor::{SensorKind, SensorRecord, SensorRegistry, SENSOR_KIND_COUNT};

/// Registry change caused by one edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotPlugEvent {
    /// Rising edge: a fresh record was installed
    Registered(SensorRecord),
    /// Falling edge: the record was marked absent
    Deregistered(SensorKind),
    /// Falling edge on a sensor that was not registered
    AlreadyAbsent(SensorKind),
}

/// Enable-line edge handler bound to a registry
#[derive(Clone, Copy)]
pub struct HotPlugDetector<'a> {
    registry: &'a SensorRegistry,
}

impl<'a> HotPlugDetector<'a> {
    /// Detector that writes into `registry`
    pub fn new(registry: &'a SensorRegistry) -> Self {
        Self { registry }
    }

    /// Handle one edge of `kind`'s enable line
    ///
    /// `level_high` is the line level after the edge. Consecutive rising
    /// edges leave exactly one record, reset to zero.
    pub fn on_edge(&self, kind: SensorKind, level_high: bool) -> HotPlugEvent {
        if level_high {
            HotPlugEvent::Registered(self.registry.register(kind))
        } else if self.registry.deregister(kind) {
            HotPlugEvent::Deregistered(kind)
        } else {
            HotPlugEvent::AlreadyAbsent(kind)
        }
    }

    /// Bring the registry in line with the current level of `kind`'s line
    ///
    /// Edges that arrive while nobody is waiting are lost; comparing the
    /// level against presence recovers them. Returns `None` when the
    /// registry already matches the line.
    pub fn reconcile(&self, kind: SensorKind, level_high: bool) -> Option<HotPlugEvent> {
        if level_high == self.registry.is_present(kind) {
            return None;
        }
        Some(self.on_edge(kind, level_high))
    }

    /// Register every sensor whose enable line is already high at boot
    ///
    /// `levels` is indexed like [`SensorKind::ALL`]. Low lines are left
    /// untouched. Returns the number of sensors registered.
    pub fn sync_levels(&self, levels: [bool; SENSOR_KIND_COUNT]) -> usize {
        SensorKind::ALL
            .iter()
            .zip(levels)
            .filter(|(_, high)| *high)
            .map(|(kind, _)| self.registry.register(*kind))
            .count()
    }
}
