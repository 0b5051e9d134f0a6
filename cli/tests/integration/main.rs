//! Integration tests for the nearbot-provision CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior. Every
//! run is pointed at a configuration inside a temporary directory so nothing
//! outside it is ever written, even when the suite runs as root.
