//! Domain - Pure Data Structures and Wire Types
//!
//! Nothing in here performs I/O.

pub mod config;
pub mod filter;
pub mod metric;
pub mod query;
pub mod stock;
