use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::content::AdvertisementContent;
use crate::types::identifiers::{ContentVersion, MarketplaceId};
use super::{ContentSource, StoreError};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Output file already exists: {0}")]
    OutputExists(PathBuf),
    #[error("Duplicate content ID: {0}")]
    DuplicateContentId(String),
    #[error("Content version mismatch for {id}: recorded {recorded}, content hashes to {computed}")]
    VersionMismatch {
        id: String,
        recorded: String,
        computed: String,
    },
}

/// Read-only content, grouped by marketplace.
///
/// Within a marketplace, contents keep the order they were supplied in.
#[derive(Debug, Clone, Default)]
pub struct ContentCatalog {
    by_marketplace: BTreeMap<MarketplaceId, Vec<AdvertisementContent>>,
}

impl ContentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_contents(contents: Vec<AdvertisementContent>) -> Result<Self, CatalogError> {
        let mut seen = BTreeSet::new();
        let mut by_marketplace: BTreeMap<MarketplaceId, Vec<AdvertisementContent>> = BTreeMap::new();

        for content in contents {
            if !seen.insert(content.id.clone()) {
                return Err(CatalogError::DuplicateContentId(content.id.as_str().to_string()));
            }
            by_marketplace
                .entry(content.marketplace_id.clone())
                .or_default()
                .push(content);
        }

        Ok(Self { by_marketplace })
    }

    /// Load a JSON array of contents, verifying every recorded version
    /// against its content hash.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let f = fs::File::open(path)?;
        let contents: Vec<AdvertisementContent> = serde_json::from_reader(f)?;

        for content in &contents {
            let computed = ContentVersion::from_content(content.renderable_content.as_bytes());
            if computed != content.version {
                return Err(CatalogError::VersionMismatch {
                    id: content.id.as_str().to_string(),
                    recorded: content.version.as_str().to_string(),
                    computed: computed.as_str().to_string(),
                });
            }
        }

        Self::from_contents(contents)
    }

    /// Persist the catalog as a JSON array. Written to a sibling temp file,
    /// synced, then renamed into place; never overwrites.
    pub fn write(&self, path: &Path) -> Result<(), CatalogError> {
        if path.exists() {
            return Err(CatalogError::OutputExists(path.to_path_buf()));
        }

        let records: Vec<&AdvertisementContent> = self.contents().collect();

        let temp_path = path.with_extension("tmp");
        if temp_path.exists() {
            fs::remove_file(&temp_path)?;
        }

        let f = fs::File::create(&temp_path)?;
        serde_json::to_writer_pretty(&f, &records)?;
        f.sync_all()?;

        fs::rename(&temp_path, path)?;
        Ok(())
    }

    pub fn marketplace(&self, marketplace_id: &MarketplaceId) -> &[AdvertisementContent] {
        self.by_marketplace
            .get(marketplace_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All contents, by marketplace id and then supplied order.
    pub fn contents(&self) -> impl Iterator<Item = &AdvertisementContent> {
        self.by_marketplace.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.by_marketplace.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ContentSource for ContentCatalog {
    async fn get(&self, marketplace_id: &MarketplaceId) -> Result<Vec<AdvertisementContent>, StoreError> {
        Ok(self.marketplace(marketplace_id).to_vec())
    }
}
