//! Stocks - Browse, Search, Sort, and Filter the Provider's Stock List

pub mod controller;
