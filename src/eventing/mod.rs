//! Eventing - Controller to View Events

pub mod stocks_event;
