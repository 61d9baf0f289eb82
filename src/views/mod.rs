//! Views - Console Front End
//!
//! ```text
//! stdin ──▶ parse_command ──▶ StocksController
//!                                  │ StocksEvent
//!                                  ▼
//!                    render_table / render_detail ──▶ stdout
//! ```

pub mod command;
pub mod console;
