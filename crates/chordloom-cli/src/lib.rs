//! Chordloom CLI library.
//!
//! Input parsing, preset loading, section planning and the command
//! implementations behind the `chordloom` binary.

pub mod commands;
pub mod config;
pub mod controls;
pub mod logging;
pub mod planner;
pub mod settings;
