//! State - Synchronous Session State
//!
//! Plain structs with no I/O. Controllers own them behind a mutex and hand
//! snapshots to the views.

pub mod detail_state;
pub mod pagination;
pub mod stocks_state;
