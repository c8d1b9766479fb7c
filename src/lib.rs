//! Measure how far pinned dependencies lag behind their registries.
//!
//! For each requirement in a manifest, the delta is the number of days since
//! the first release that superseded the installed version.

pub mod config;
pub mod logging;
pub mod parser;
pub mod report;
pub mod scan;
pub mod version;
