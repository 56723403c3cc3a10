// File: autolive-common/src/traits/mod.rs
pub mod platform_traits;
pub mod repository_traits;

pub use platform_traits::BroadcasterSource;
pub use repository_traits::ConfigStore;
