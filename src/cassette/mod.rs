//! Record/replay of provider calls for deterministic tests.

pub mod config;
pub mod format;
pub mod recorder;
pub mod replayer;
