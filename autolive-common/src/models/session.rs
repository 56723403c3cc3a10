// File: autolive-common/src/models/session.rs

use serde::{Deserialize, Serialize};

use crate::Error;

/// JSON shape returned by `com.atproto.server.createSession`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    pub did: String,
    #[serde(default)]
    pub did_doc: Option<DidDocument>,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_confirmed: Option<bool>,
    #[serde(default)]
    pub email_auth_factor: Option<bool>,
    pub access_jwt: String,
    #[serde(default)]
    pub refresh_jwt: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidDocument {
    #[serde(default, rename = "@context")]
    pub context: Vec<String>,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub also_known_as: Vec<String>,
    #[serde(default)]
    pub verification_method: Vec<VerificationMethod>,
    #[serde(default)]
    pub service: Vec<DidService>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMethod {
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "type")]
    pub type_field: String,
    #[serde(default)]
    pub controller: String,
    #[serde(default)]
    pub public_key_multibase: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidService {
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "type")]
    pub type_field: String,
    pub service_endpoint: String,
}

/// The parts of a session the write step needs. Lives for one run only.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub did: String,
    pub handle: Option<String>,
    pub access_jwt: String,
    /// Base URL of the account's PDS, without a trailing slash.
    pub service_endpoint: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("did", &self.did)
            .field("handle", &self.handle)
            .field("access_jwt", &"<redacted>")
            .field("service_endpoint", &self.service_endpoint)
            .finish()
    }
}

impl TryFrom<CreateSessionResponse> for Session {
    type Error = Error;

    /// Picks the first DID document service entry as the write endpoint.
    fn try_from(resp: CreateSessionResponse) -> Result<Self, Self::Error> {
        if resp.did.trim().is_empty() {
            return Err(Error::Parse("createSession returned an empty did".into()));
        }
        if resp.access_jwt.trim().is_empty() {
            return Err(Error::Parse("createSession returned an empty accessJwt".into()));
        }

        let endpoint = resp
            .did_doc
            .as_ref()
            .and_then(|doc| doc.service.first())
            .map(|svc| svc.service_endpoint.trim().trim_end_matches('/').to_string())
            .filter(|ep| !ep.is_empty())
            .ok_or_else(|| Error::Parse("createSession returned no didDoc service endpoint".into()))?;

        Ok(Session {
            did: resp.did,
            handle: resp.handle,
            access_jwt: resp.access_jwt,
            service_endpoint: endpoint,
        })
    }
}
