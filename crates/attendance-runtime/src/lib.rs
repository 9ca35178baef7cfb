//! Runtime layer for attendance insights.
//!
//! Owns the one-time, process-wide load of the attendance dataset and serves
//! every query from memory afterwards.

pub mod data_manager;

pub use attendance_core as core;
pub use attendance_data as data;
