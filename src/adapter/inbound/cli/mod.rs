//! CLI module graph.

pub mod classify;
pub mod command;
pub mod config;
pub mod cutover;
pub mod dispatch;
pub mod input;
pub mod output;
pub mod resolve;
pub mod run;
pub mod stats;
