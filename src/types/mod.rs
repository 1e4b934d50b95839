pub mod advertisement;
pub mod identifiers;
pub mod request_context;

pub use advertisement::{GeneratedAdvertisement, SelectionError, SelectionMetadata, SelectionResult};
pub use identifiers::{ContentId, ContentVersion, CustomerId, IdentifierError, MarketplaceId};
pub use request_context::RequestContext;
