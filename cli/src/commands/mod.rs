//! Command handlers

pub mod deploy;
