//! Terminal host for the mission stage engine.

pub mod commands;
pub mod config;
pub mod logging;
pub mod play;
