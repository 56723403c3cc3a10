pub mod broadcaster;
pub mod client;
pub mod requests;

pub use broadcaster::{HelixBroadcasterSource, StaticBroadcaster};
pub use client::TwitchHelixClient;
