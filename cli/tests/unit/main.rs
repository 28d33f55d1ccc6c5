//! Unit tests for droplet-deploy
//!
//! These run fast without network or SSH.

mod architecture;
mod property_tests;
