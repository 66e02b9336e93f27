//! Core abstractions for tickerlens
//!
//! This crate defines the read-only view of the date-partitioned object store
//! that every other tickerlens crate builds on: validated [`Partition`] labels,
//! [`ObjectKey`]s, and the [`ObjectStore`] trait.

pub mod error;
pub mod partition;
pub mod store;

pub use error::{Error, Result};
pub use partition::{ObjectKey, Partition};
pub use store::ObjectStore;
