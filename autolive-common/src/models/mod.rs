// File: autolive-common/src/models/mod.rs
pub mod broadcaster;
pub mod config;
pub mod credential;
pub mod session;
pub mod status;

pub use broadcaster::BroadcasterInfo;
pub use credential::Credentials;
pub use session::{CreateSessionResponse, DidDocument, Session};
pub use status::{LiveStatusRecord, PutRecordRequest};
