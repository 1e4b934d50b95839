use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::StoreError;
use crate::content::AdvertisementContent;
use crate::targeting::EvaluationError;

/// Outcome of a selection: either the chosen content or nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeneratedAdvertisement {
    Selected { content: AdvertisementContent },
    Empty,
}

impl GeneratedAdvertisement {
    pub fn is_empty(&self) -> bool {
        matches!(self, GeneratedAdvertisement::Empty)
    }

    pub fn content(&self) -> Option<&AdvertisementContent> {
        match self {
            GeneratedAdvertisement::Selected { content } => Some(content),
            GeneratedAdvertisement::Empty => None,
        }
    }
}

/// Metadata describing how the selection arrived at its outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionMetadata {
    pub marketplace_id: Option<String>,

    pub contents_considered: usize,
    pub contents_eligible: usize,
    pub targeting_groups_evaluated: usize,

    pub generated_at: DateTime<Utc>, // informational only
}

/// The advertisement together with its selection metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    pub advertisement: GeneratedAdvertisement,
    pub selection: SelectionMetadata,
}

#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("Catalog lookup failed: {0}")]
    Lookup(#[from] StoreError),

    #[error("Targeting evaluation failed: {0}")]
    Evaluation(#[from] EvaluationError),

    #[error("Random source returned index {index} for {len} eligible contents")]
    IndexOutOfRange { index: usize, len: usize },
}
