//! Shared library surface for the route planning server and its tests.

pub mod api;
pub mod cache;
pub mod config;
pub mod geocode;
pub mod state;
