use std::sync::Arc;

use super::predicate::TargetingPredicate;

/// The predicates that must all hold for one way of targeting a content.
///
/// Order is irrelevant to the outcome. An empty group is vacuously TRUE.
#[derive(Debug, Clone, Default)]
pub struct TargetingGroup {
    predicates: Vec<Arc<dyn TargetingPredicate>>,
}

impl TargetingGroup {
    pub fn new(predicates: Vec<Arc<dyn TargetingPredicate>>) -> Self {
        Self { predicates }
    }

    pub fn with_predicate(mut self, predicate: impl TargetingPredicate + 'static) -> Self {
        self.push(predicate);
        self
    }

    pub fn push(&mut self, predicate: impl TargetingPredicate + 'static) {
        self.predicates.push(Arc::new(predicate));
    }

    pub fn predicates(&self) -> &[Arc<dyn TargetingPredicate>] {
        &self.predicates
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl FromIterator<Arc<dyn TargetingPredicate>> for TargetingGroup {
    fn from_iter<I: IntoIterator<Item = Arc<dyn TargetingPredicate>>>(iter: I) -> Self {
        Self {
            predicates: iter.into_iter().collect(),
        }
    }
}
