// File: autolive-core/src/repositories/mod.rs
pub mod file;
pub mod memory;

pub use autolive_common::traits::ConfigStore;
pub use file::FileConfigStore;
pub use memory::InMemoryConfigStore;
