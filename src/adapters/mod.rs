//! Adapter implementations for port traits.
//!
//! - `live/`: Real API implementations
//! - `recording/`: Record interactions to cassettes
//! - `replaying/`: Replay interactions from cassettes
//! - `storage/`: Project snapshot persistence

pub mod live;
pub mod recording;
pub mod replaying;
pub mod storage;
