use crate::types::identifiers::{CustomerId, MarketplaceId};

/// The subject of an eligibility evaluation.
///
/// Built once per selection request and shared read-only (behind an `Arc`)
/// by every predicate task evaluated against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    customer_id: Option<CustomerId>,
    marketplace_id: MarketplaceId,
}

impl RequestContext {
    pub fn new(customer_id: Option<CustomerId>, marketplace_id: MarketplaceId) -> Self {
        Self {
            customer_id,
            marketplace_id,
        }
    }

    pub fn customer_id(&self) -> Option<&CustomerId> {
        self.customer_id.as_ref()
    }

    pub fn marketplace_id(&self) -> &MarketplaceId {
        &self.marketplace_id
    }
}
