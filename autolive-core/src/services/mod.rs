// File: autolive-core/src/services/mod.rs
pub mod live_announcer;

pub use live_announcer::{Announcement, LiveAnnouncer};
