//! Features - Vertical Feature Slices
//!
//! Each feature owns the controller that drives its state.

pub mod stocks;
