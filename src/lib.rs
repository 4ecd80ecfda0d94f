//! Core library for the field-econ command line application.
//!
//! The library turns reservoir-simulation reports into yearly production,
//! workover, facilities and make-up gas schedules, and evaluates the annual
//! cash flow of a development plan. Responsibilities are kept narrow: report
//! tokenizers live under [`report`], schedule derivation under [`schedule`],
//! the cash-flow calculator and sensitivity sweep under [`economics`], Excel
//! and text adapters under [`io`], and the path-to-path orchestration used by
//! the CLI in [`pipeline`].

pub mod config;
pub mod economics;
pub mod error;
pub mod io;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod schedule;

pub use error::{EconError, Result};
