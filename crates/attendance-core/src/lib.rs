//! Core attendance analytics: data model, field normalization, KPI
//! aggregation, cohort baselines and the HR recommendation rules.
//!
//! Everything in this crate is pure. Loading data and rendering reports
//! live in `attendance-data` and the `attendance-insights` binary.

pub mod calculations;
pub mod data_processors;
pub mod error;
pub mod formatting;
pub mod models;
pub mod rules;
pub mod settings;

pub use error::{AttendanceError, Result};
