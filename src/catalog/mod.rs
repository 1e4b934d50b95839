//! Lookups the selector depends on, and in-memory catalogs implementing them.
//!
//! Both lookups return an empty vector for an unknown key; an error means
//! the backing store itself failed.

pub mod content_catalog;
pub mod targeting_catalog;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::content::AdvertisementContent;
use crate::targeting::TargetingGroup;
use crate::types::{ContentId, MarketplaceId};

pub use content_catalog::{CatalogError, ContentCatalog};
pub use targeting_catalog::TargetingGroupCatalog;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Malformed record for {key}: {message}")]
    Malformed { key: String, message: String },
}

/// Source of advertising content, keyed by marketplace.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn get(&self, marketplace_id: &MarketplaceId) -> Result<Vec<AdvertisementContent>, StoreError>;
}

/// Source of the targeting groups attached to each content.
#[async_trait]
pub trait TargetingGroupSource: Send + Sync {
    async fn get(&self, content_id: &ContentId) -> Result<Vec<TargetingGroup>, StoreError>;
}

#[async_trait]
impl<T: ContentSource + ?Sized> ContentSource for Arc<T> {
    async fn get(&self, marketplace_id: &MarketplaceId) -> Result<Vec<AdvertisementContent>, StoreError> {
        (**self).get(marketplace_id).await
    }
}

#[async_trait]
impl<T: TargetingGroupSource + ?Sized> TargetingGroupSource for Arc<T> {
    async fn get(&self, content_id: &ContentId) -> Result<Vec<TargetingGroup>, StoreError> {
        (**self).get(content_id).await
    }
}
