//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules for the relay: publishing
//! detector labels, and the display controller that turns decoded states
//! into indicator and alert rendering.  All interaction with the broker
//! and the screen happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without a network or a display.

pub mod events;
pub mod ports;
pub mod publisher;
pub mod service;
