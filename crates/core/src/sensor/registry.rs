//! Sensor registry
//!
//! A fixed slot table, one slot per [`SensorKind`], allocated once (usually in
//! a `static`). Registration never allocates: a rising edge overwrites the
//! slot with a fresh record and a falling edge marks it absent.
//!
//! # Concurrency
//!
//! The table is only touched inside a `critical_section`, and every access
//! copies whole records in or out. A reader therefore sees either the old
//! record, the new record, or no record, never a partially written one.
//!
//! Each registration bumps a per-slot generation. Value updates carry the
//! generation they were sampled for and are discarded if the slot has been
//! deregistered or re-registered since, so a slow bus read can never write
//! into a record that replaced the one it was reading for.

use super::kind::{SensorKind, SENSOR_KIND_COUNT};
use core::cell::Cell;
use critical_section::Mutex;
use heapless::Vec;

/// One enabled sensor and its most recent value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorRecord {
    /// Sensor kind
    pub kind: SensorKind,
    /// Last sampled engineering value (0 until the first successful sample)
    pub last_value: i32,
    /// Registration generation of the slot this record lives in
    pub generation: u32,
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    record: Option<SensorRecord>,
    generation: u32,
}

impl Slot {
    const EMPTY: Slot = Slot {
        record: None,
        generation: 0,
    };
}

/// Slot table of currently enabled sensors
pub struct SensorRegistry {
    slots: Mutex<Cell<[Slot; SENSOR_KIND_COUNT]>>,
}

impl SensorRegistry {
    /// Create an empty registry
    ///
    /// This is a const fn so the registry can live in a `static`.
    pub const fn new() -> Self {
        Self {
            slots: Mutex::new(Cell::new([Slot::EMPTY; SENSOR_KIND_COUNT])),
        }
    }

    fn modify<R>(&self, f: impl FnOnce(&mut [Slot; SENSOR_KIND_COUNT]) -> R) -> R {
        critical_section::with(|cs| {
            let cell = self.slots.borrow(cs);
            let mut slots = cell.get();
            let result = f(&mut slots);
            cell.set(slots);
            result
        })
    }

    fn read(&self) -> [Slot; SENSOR_KIND_COUNT] {
        critical_section::with(|cs| self.slots.borrow(cs).get())
    }

    /// Register a sensor with a fresh record
    ///
    /// Any record already in the slot is replaced, which covers a repeated
    /// rising edge without a falling edge in between.
    pub fn register(&self, kind: SensorKind) -> SensorRecord {
        self.modify(|slots| {
            let slot = &mut slots[kind.index()];
            slot.generation = slot.generation.wrapping_add(1);
            let record = SensorRecord {
                kind,
                last_value: 0,
                generation: slot.generation,
            };
            slot.record = Some(record);
            record
        })
    }

    /// Mark a sensor absent
    ///
    /// Returns `true` if a record was present.
    pub fn deregister(&self, kind: SensorKind) -> bool {
        self.modify(|slots| slots[kind.index()].record.take().is_some())
    }

    /// Copy of the record for `kind`, if enabled
    pub fn get(&self, kind: SensorKind) -> Option<SensorRecord> {
        self.read()[kind.index()].record
    }

    /// Whether `kind` is currently enabled
    pub fn is_present(&self, kind: SensorKind) -> bool {
        self.get(kind).is_some()
    }

    /// Store a sampled value
    ///
    /// The value is written only if the slot still holds the record of
    /// `generation`. Returns `false` when the value was discarded.
    pub fn update_value(&self, kind: SensorKind, generation: u32, value: i32) -> bool {
        self.modify(|slots| match &mut slots[kind.index()].record {
            Some(record) if record.generation == generation => {
                record.last_value = value;
                true
            }
            _ => false,
        })
    }

    /// Consistent copy of all enabled records, in slot order
    pub fn snapshot(&self) -> Vec<SensorRecord, SENSOR_KIND_COUNT> {
        self.read().iter().filter_map(|slot| slot.record).collect()
    }

    /// Number of enabled sensors
    pub fn len(&self) -> usize {
        self.read().iter().filter(|slot| slot.record.is_some()).count()
    }

    /// Whether no sensor is enabled
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SensorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
