//! Subcommand implementations

pub mod inspect;
pub mod sample;
pub mod validate;
