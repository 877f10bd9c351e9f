use playlist_core::extract_playlist_id;

use crate::{FailureKind, IngestError};

/// A validated ingestion request: a playlist id plus the credential to use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestRequest {
    pub playlist_id: String,
    pub credential: String,
}

impl IngestRequest {
    /// Checks the credential first, then pulls the playlist id out of `input`.
    pub fn from_input(input: &str, credential: Option<&str>) -> Result<Self, IngestError> {
        let credential = credential
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                IngestError::new(FailureKind::MissingCredential, "no catalog credential configured")
            })?;
        let playlist_id = extract_playlist_id(input).ok_or_else(|| {
            IngestError::new(FailureKind::InvalidUrl, format!("no list parameter in {input:?}"))
        })?;

        Ok(Self {
            playlist_id,
            credential: credential.to_string(),
        })
    }
}
