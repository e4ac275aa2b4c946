//! Drivemode library.
//!
//! Driver-state relay: a publisher that maps detector labels to drive
//! modes, a decoder for inbound notifications, and the display state
//! machine that drives the cluster's indicator and anger alert.  The MQTT
//! adapter is behind the `mqtt` feature; everything else is
//! transport-free and testable on the host.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod classifier;
pub mod config;
pub mod decoder;
pub mod error;
pub mod events;
pub mod fsm;
pub mod mode;
pub mod runtime;
