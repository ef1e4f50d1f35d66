//! Domain models for rentroll.
//!
//! These are the core types shared across all crates.

pub mod lease;
pub mod property;
pub mod session;
pub mod tenant;
pub mod user;
