//! Extraction of typed records from simulator text reports.

pub mod production;
pub mod prt;
