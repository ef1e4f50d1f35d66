//! rentroll core: domain models, repository traits and the listing logic
//! shared by the database, auth and server crates.
//!
//! The two pieces with real decision logic live here so they can be tested
//! without a datastore:
//! - [`registrar`]: resolve-or-create for properties, merging name
//!   collisions into one canonical record.
//! - [`ledger`]: the lease list, reconciling vacancy markers against real
//!   leases.

pub mod dashboard;
pub mod error;
pub mod leasing;
pub mod ledger;
pub mod models;
pub mod registrar;
pub mod rent;
pub mod repository;
