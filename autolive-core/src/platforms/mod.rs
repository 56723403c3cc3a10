// File: autolive-core/src/platforms/mod.rs

pub mod bluesky;
pub mod twitch;
