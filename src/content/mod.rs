pub mod content;
pub mod metadata;

pub use crate::types::identifiers::{ContentId, ContentVersion};
pub use content::{AdvertisementContent, ContentError};
pub use metadata::{Metadata, MetadataValue};
