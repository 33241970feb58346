//! CLI command implementations

pub mod anchor_demo;
pub mod generate;
pub mod json_output;
pub mod plan;
