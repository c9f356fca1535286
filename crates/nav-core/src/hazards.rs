//! Process-wide registry of active hazard zones.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::Hazard;

/// Thread-safe hazard store.
///
/// Classification calls take shared read access; `add` and `clear` take the
/// write lock so no reader ever observes a half-updated list.
#[derive(Debug, Default)]
pub struct HazardRegistry {
    hazards: RwLock<Vec<Hazard>>,
}

impl HazardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a validated hazard and return the new total.
    pub fn add(&self, hazard: Hazard) -> usize {
        let mut hazards = self.write();
        hazards.push(hazard);
        hazards.len()
    }

    /// Remove every hazard.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Copy of the hazard list in insertion order.
    pub fn list(&self) -> Vec<Hazard> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Shared read view for callers that classify many points at once.
    pub fn read(&self) -> RwLockReadGuard<'_, Vec<Hazard>> {
        // A panicked writer cannot leave a partial push or clear behind.
        self.hazards.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Hazard>> {
        self.hazards.write().unwrap_or_else(PoisonError::into_inner)
    }
}
