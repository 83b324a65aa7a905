//! Token and cost usage reports for OpenCode sessions

pub mod cli;
pub mod parsers;
pub mod services;
pub mod types;
