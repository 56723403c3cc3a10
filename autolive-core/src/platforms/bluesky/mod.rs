pub mod client;
pub mod requests;

pub use client::BlueskyClient;
