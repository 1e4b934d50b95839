use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::identifiers::{ContentId, ContentVersion, MarketplaceId};
use super::metadata::Metadata;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Content must be valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// A renderable piece of advertising content for one marketplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvertisementContent {
    pub id: ContentId,
    pub marketplace_id: MarketplaceId,
    pub version: ContentVersion,
    pub renderable_content: String,
    pub metadata: Metadata,
}

impl AdvertisementContent {
    /// Ingest raw bytes into an AdvertisementContent.
    ///
    /// The version is computed from the verified UTF-8 content, so two
    /// records with the same version always render the same bytes.
    pub fn ingest(
        id: ContentId,
        marketplace_id: MarketplaceId,
        raw_content: Vec<u8>,
        metadata: Metadata,
    ) -> Result<Self, ContentError> {
        let renderable_content = String::from_utf8(raw_content)?;
        let version = ContentVersion::from_content(renderable_content.as_bytes());

        Ok(AdvertisementContent {
            id,
            marketplace_id,
            version,
            renderable_content,
            metadata,
        })
    }
}
