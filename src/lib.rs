//! Stock Browser Library
//!
//! Client for a remote stock dataset: search, sort, and filter requests
//! against an HTTP provider, with client-side pagination of the result.

pub mod constants;
pub mod domain;
pub mod error;
pub mod eventing;
pub mod features;
pub mod helpers;
pub mod services;
pub mod state;
pub mod utils;
pub mod views;
