//! CLI command implementations

pub mod init;
pub mod step;
pub mod steps;
pub mod validate;
