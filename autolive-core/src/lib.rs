// src/lib.rs

pub mod config;
pub mod http;
pub mod platforms;
pub mod repositories;
pub mod services;

pub use autolive_common::error::Error;
pub use config::{bootstrap_config, AutoLiveConfig, LiveSettings};
pub use http::{DefaultHttpClient, HttpClient, HttpResponse};
pub use services::{Announcement, LiveAnnouncer};
