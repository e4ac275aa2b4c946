//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against recording mock adapters.  All tests run on the host with no
//! broker or display required.

mod classifier_flow_tests;
mod display_flow_tests;
mod mock_ports;
mod publisher_tests;
mod runtime_tests;
