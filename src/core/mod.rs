//! Core infrastructure: math types, errors, configuration, asset handles

pub mod assets;
pub mod config;
pub mod error;
pub mod types;
