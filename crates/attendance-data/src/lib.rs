//! Data layer for attendance insights.
//!
//! Discovers and reads attendance tables, normalizes them once, and runs the
//! per-employee and cohort analysis on top of the pure core.

pub mod analysis;
pub mod reader;

pub use attendance_core as core;
pub use reader::{load_dataset, AttendanceDataset};
