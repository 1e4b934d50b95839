use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::targeting::TargetingGroup;
use crate::types::identifiers::ContentId;
use super::{StoreError, TargetingGroupSource};

/// Targeting groups attached to each content id.
#[derive(Debug, Clone, Default)]
pub struct TargetingGroupCatalog {
    groups: BTreeMap<ContentId, Vec<TargetingGroup>>,
}

impl TargetingGroupCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, content_id: ContentId, group: TargetingGroup) {
        self.groups.entry(content_id).or_default().push(group);
    }

    pub fn with_group(mut self, content_id: ContentId, group: TargetingGroup) -> Self {
        self.insert(content_id, group);
        self
    }

    pub fn groups_for(&self, content_id: &ContentId) -> &[TargetingGroup] {
        self.groups
            .get(content_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[async_trait]
impl TargetingGroupSource for TargetingGroupCatalog {
    async fn get(&self, content_id: &ContentId) -> Result<Vec<TargetingGroup>, StoreError> {
        // Groups share their predicates; cloning only bumps reference counts.
        Ok(self.groups_for(content_id).to_vec())
    }
}
