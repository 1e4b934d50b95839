pub mod random;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::catalog::{ContentSource, TargetingGroupSource};
use crate::config::EngineConfig;
use crate::targeting::{EvaluationError, PoolError, TargetingEvaluator, TargetingGroup, WorkerPool};
use crate::types::advertisement::{
	GeneratedAdvertisement, SelectionError, SelectionMetadata, SelectionResult,
};
use crate::types::{CustomerId, MarketplaceId, RequestContext};
pub use random::{FixedIndex, RandomSource, SeededRandom, ThreadRandom};

const LOG_TARGET: &str = "selection";

/// Picks the advertisement to render for a customer and marketplace.
///
/// Stateless between calls: every selection reads the two sources afresh.
pub struct AdvertisementSelector<C, G, R = ThreadRandom> {
	contents: C,
	targeting_groups: G,
	random: R,
	pool: WorkerPool,
	evaluation_timeout: Option<Duration>,
}

impl<C, G> AdvertisementSelector<C, G, ThreadRandom>
where
	C: ContentSource,
	G: TargetingGroupSource,
{
	/// A selector on the process-wide worker pool with a thread-local RNG,
	/// using the evaluation timeout the pool was configured with.
	pub fn new(contents: C, targeting_groups: G) -> Result<Self, PoolError> {
		let (pool, config) = WorkerPool::global_with_config()?;
		Ok(Self::with_parts(contents, targeting_groups, ThreadRandom, pool)
			.with_timeout_from(&config))
	}
}

impl<C, G, R> AdvertisementSelector<C, G, R>
where
	C: ContentSource,
	G: TargetingGroupSource,
	R: RandomSource,
{
	pub fn with_parts(contents: C, targeting_groups: G, random: R, pool: WorkerPool) -> Self {
		Self {
			contents,
			targeting_groups,
			random,
			pool,
			evaluation_timeout: None,
		}
	}

	pub fn with_random<R2: RandomSource>(self, random: R2) -> AdvertisementSelector<C, G, R2> {
		AdvertisementSelector {
			contents: self.contents,
			targeting_groups: self.targeting_groups,
			random,
			pool: self.pool,
			evaluation_timeout: self.evaluation_timeout,
		}
	}

	pub fn with_pool(mut self, pool: WorkerPool) -> Self {
		self.pool = pool;
		self
	}

	pub fn with_evaluation_timeout(mut self, timeout: Duration) -> Self {
		self.evaluation_timeout = Some(timeout);
		self
	}

	/// Take the evaluation timeout from `config`, replacing any set before.
	/// Pool sizing in `config` is not applied here; see [`WorkerPool`].
	pub fn with_timeout_from(mut self, config: &EngineConfig) -> Self {
		self.evaluation_timeout = config.evaluation_timeout();
		self
	}

	/// The advertisement to render, or [`GeneratedAdvertisement::Empty`] when
	/// the marketplace is missing or no content is eligible.
	pub async fn select_advertisement(
		&self,
		customer_id: Option<&str>,
		marketplace_id: Option<&str>,
	) -> Result<GeneratedAdvertisement, SelectionError> {
		self.select(customer_id, marketplace_id)
			.await
			.map(|result| result.advertisement)
	}

	pub async fn select(
		&self,
		customer_id: Option<&str>,
		marketplace_id: Option<&str>,
	) -> Result<SelectionResult, SelectionError> {
		let mut metadata = SelectionMetadata {
			marketplace_id: None,
			contents_considered: 0,
			contents_eligible: 0,
			targeting_groups_evaluated: 0,
			generated_at: Utc::now(),
		};

		let Some(marketplace_id) = marketplace_id.and_then(|raw| MarketplaceId::parse(raw).ok()) else {
			log::warn!(
				target: LOG_TARGET,
				"MarketplaceId cannot be missing or empty. Returning empty advertisement."
			);
			return Ok(empty(metadata));
		};
		metadata.marketplace_id = Some(marketplace_id.as_str().to_string());

		// 1. Retrieval Phase
		let contents = self.contents.get(&marketplace_id).await?;
		metadata.contents_considered = contents.len();
		if contents.is_empty() {
			log::debug!(target: LOG_TARGET, "No content for marketplace {marketplace_id}");
			return Ok(empty(metadata));
		}

		// 2. Eligibility Phase
		// One context and one evaluator serve every content of this request.
		let customer_id = customer_id.filter(|raw| !raw.is_empty()).map(CustomerId::new);
		let context = Arc::new(RequestContext::new(customer_id, marketplace_id));
		let evaluator = self.evaluator(context);

		let mut eligible = Vec::with_capacity(contents.len());
		for content in contents {
			let groups = self.targeting_groups.get(&content.id).await?;
			if is_eligible(&evaluator, &groups, &mut metadata.targeting_groups_evaluated).await? {
				eligible.push(content);
			}
		}
		metadata.contents_eligible = eligible.len();

		log::debug!(
			target: LOG_TARGET,
			"{} of {} contents eligible after {} targeting groups",
			metadata.contents_eligible,
			metadata.contents_considered,
			metadata.targeting_groups_evaluated
		);

		if eligible.is_empty() {
			return Ok(empty(metadata));
		}

		// 3. Draw Phase
		let len = eligible.len();
		let index = self.random.next_index(len);
		if index >= len {
			return Err(SelectionError::IndexOutOfRange { index, len });
		}
		let content = eligible.swap_remove(index);

		Ok(SelectionResult {
			advertisement: GeneratedAdvertisement::Selected { content },
			selection: metadata,
		})
	}

	fn evaluator(&self, context: Arc<RequestContext>) -> TargetingEvaluator {
		let evaluator = TargetingEvaluator::new(context, self.pool.clone());
		match self.evaluation_timeout {
			Some(timeout) => evaluator.with_timeout(timeout),
			None => evaluator,
		}
	}
}

// OR across groups; stops at the first TRUE group.
async fn is_eligible(
	evaluator: &TargetingEvaluator,
	groups: &[TargetingGroup],
	groups_evaluated: &mut usize,
) -> Result<bool, EvaluationError> {
	for group in groups {
		*groups_evaluated += 1;
		if evaluator.evaluate(group).await?.is_true() {
			return Ok(true);
		}
	}
	Ok(false)
}

fn empty(selection: SelectionMetadata) -> SelectionResult {
	SelectionResult {
		advertisement: GeneratedAdvertisement::Empty,
		selection,
	}
}
