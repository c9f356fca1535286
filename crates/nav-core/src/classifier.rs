//! Land/water classification.

use crate::land::LandMask;
use crate::models::{Coordinate, Hazard};

/// Decides whether a coordinate is open, hazard-free water.
///
/// Borrows the land mask and a hazard view; it never mutates either, so one
/// classifier can be shared by any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    land: &'a LandMask,
    hazards: &'a [Hazard],
}

impl<'a> Classifier<'a> {
    pub fn new(land: &'a LandMask, hazards: &'a [Hazard]) -> Self {
        Self { land, hazards }
    }

    /// Land is checked first, then hazards in registry order, stopping at the
    /// first match.
    pub fn is_navigable(&self, point: Coordinate) -> bool {
        if self.land.is_land(point) {
            return false;
        }
        !self.hazards.iter().any(|hazard| hazard.contains(point))
    }
}
