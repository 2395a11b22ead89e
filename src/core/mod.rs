//! Core collection module
//!
//! Sequences Redfish discovery and inventory registration for one BMC
//! and keeps the name -> uid correlation for the run.

mod collector;

pub use collector::*;
