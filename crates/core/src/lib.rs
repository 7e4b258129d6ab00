// Core types and report logic for netreport

pub mod types;
pub mod distribution;
pub mod chart;
pub mod template;
pub mod summary;
pub mod report;

pub use types::*;
