//! Live adapters that talk to the real provider.

pub mod gemini;
pub mod unconfigured;
