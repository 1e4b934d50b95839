//! Targeting-group evaluation and advertisement selection.
//!
//! `ad-targeting-core` decides which advertising content may be shown for a
//! request and picks one. Each content carries targeting groups; a group is
//! TRUE when all of its predicates are TRUE (evaluated concurrently on a
//! bounded worker pool), and a content is eligible when any of its groups is
//! TRUE. One eligible content is drawn uniformly at random.
//!
//! Content and targeting-group storage, concrete predicate kinds, and any
//! serving layer are supplied by the caller through [`catalog::ContentSource`],
//! [`catalog::TargetingGroupSource`] and [`targeting::TargetingPredicate`].

pub mod catalog;
pub mod config;
pub mod content;
pub mod selection;
pub mod targeting;
pub mod types;

pub use config::EngineConfig;
pub use selection::AdvertisementSelector;
pub use types::{GeneratedAdvertisement, RequestContext, SelectionError};
