//! Fix store
//!
//! Single slot holding the last known good fix and its freshness flag.
//! This is the only state shared between the decoder's context and the
//! tasks polling for fixes.
//!
//! Every access is one short critical section copying a `Copy` value in or
//! out, so a reader never observes a half-written snapshot and the lock is
//! never held across an await point.
//!
//! # Example
//!
//! ```ignore
//! use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
//! use pico_gnss::devices::gnss::FixStore;
//!
//! static FIX_STORE: FixStore<CriticalSectionRawMutex> = FixStore::new();
//! ```

use crate::devices::gnss::fix::{FixSnapshot, UtcDate, UtcTime};
use core::cell::Cell;
use embassy_sync::blocking_mutex::{
    raw::{CriticalSectionRawMutex, RawMutex},
    Mutex,
};

const EMPTY_FIX: FixSnapshot = FixSnapshot {
    latitude: 0.0,
    longitude: 0.0,
    altitude: 0.0,
    altitude_known: false,
    horizontal_dilution: 0.0,
    hdop_known: false,
    satellites_locked: 0,
    satellites_visible: 0,
    utc_time: UtcTime {
        hour: 0,
        minute: 0,
        second: 0,
    },
    utc_date: UtcDate {
        day: 0,
        month: 0,
        year: 0,
    },
    position_valid: false,
};

#[derive(Clone, Copy)]
struct Slot {
    fix: FixSnapshot,
    fresh: bool,
    publishes: u32,
}

/// Last-known-good fix shared between producer and consumers
pub struct FixStore<M: RawMutex = CriticalSectionRawMutex> {
    slot: Mutex<M, Cell<Slot>>,
}

impl<M: RawMutex> FixStore<M> {
    /// Create an empty store. Usable in `static` initializers.
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Cell::new(Slot {
                fix: EMPTY_FIX,
                fresh: false,
                publishes: 0,
            })),
        }
    }

    /// Replace the stored fix and mark it fresh
    pub fn publish(&self, fix: FixSnapshot) {
        self.slot.lock(|slot| {
            let current = slot.get();
            slot.set(Slot {
                fix,
                fresh: true,
                publishes: current.publishes.wrapping_add(1),
            });
        });
    }

    /// Copy of the stored fix if one was published since the last `clear`
    pub fn try_read(&self) -> Option<FixSnapshot> {
        self.slot.lock(|slot| {
            let current = slot.get();
            current.fresh.then_some(current.fix)
        })
    }

    /// Drop freshness; subsequent reads return `None` until the next publish
    pub fn clear(&self) {
        self.slot.lock(|slot| {
            let mut current = slot.get();
            current.fresh = false;
            slot.set(current);
        });
    }

    pub fn is_fresh(&self) -> bool {
        self.slot.lock(|slot| slot.get().fresh)
    }

    /// Publishes since construction (wrapping)
    pub fn publish_count(&self) -> u32 {
        self.slot.lock(|slot| slot.get().publishes)
    }
}

impl<M: RawMutex> Default for FixStore<M> {
    fn default() -> Self {
        Self::new()
    }
}
