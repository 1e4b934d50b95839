use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::task::{JoinError, JoinSet};

use crate::types::RequestContext;
use super::group::TargetingGroup;
use super::pool::WorkerPool;
use super::predicate::{PredicateError, PredicateResult};

const LOG_TARGET: &str = "targeting::evaluator";

/// A targeting group could not be reduced to a result.
///
/// Every variant is fatal for the evaluation that produced it; no variant
/// stands for FALSE.
#[derive(Debug, Clone, Error)]
pub enum EvaluationError {
    #[error(transparent)]
    Predicate(#[from] PredicateError),

    #[error("predicate panicked: {message}")]
    Panicked { message: String },

    #[error("predicate task was cancelled before completing")]
    Cancelled,

    #[error("worker pool is closed")]
    PoolClosed,

    #[error("targeting group did not finish within {0:?}")]
    TimedOut(Duration),
}

impl EvaluationError {
    fn from_join(err: JoinError) -> Self {
        if err.is_panic() {
            EvaluationError::Panicked {
                message: panic_message(err.into_panic()),
            }
        } else {
            EvaluationError::Cancelled
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

type PredicateOutcome = Result<PredicateResult, EvaluationError>;

/// Reduces targeting groups to a single result for one request context.
pub struct TargetingEvaluator {
    context: Arc<RequestContext>,
    pool: WorkerPool,
    timeout: Option<Duration>,
}

impl TargetingEvaluator {
    pub fn new(context: Arc<RequestContext>, pool: WorkerPool) -> Self {
        Self {
            context,
            pool,
            timeout: None,
        }
    }

    /// Fail evaluations that take longer than `timeout`. Outstanding
    /// predicate tasks are aborted and drained before the error returns.
    /// The calling runtime must have its time driver enabled.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// TRUE iff every predicate in `group` is TRUE; an empty group is TRUE.
    ///
    /// All predicates run concurrently on the worker pool and all of them are
    /// awaited, even once a FALSE or a fault is known. Any fault fails the
    /// whole evaluation.
    pub async fn evaluate(&self, group: &TargetingGroup) -> PredicateOutcome {
        if group.is_empty() {
            return Ok(PredicateResult::True);
        }

        // A closed pool may sit on a runtime that no longer runs tasks.
        if self.pool.is_closed() {
            return Err(EvaluationError::PoolClosed);
        }

        let mut tasks: JoinSet<PredicateOutcome> = JoinSet::new();
        for predicate in group.predicates() {
            let predicate = Arc::clone(predicate);
            let context = Arc::clone(&self.context);
            let permits = self.pool.permits();

            tasks.spawn_on(
                async move {
                    let Ok(_permit) = permits.acquire_owned().await else {
                        return Err(EvaluationError::PoolClosed);
                    };
                    predicate.evaluate(&context).await.map_err(EvaluationError::from)
                },
                self.pool.handle(),
            );
        }

        let Some(limit) = self.timeout else {
            return reduce(&mut tasks).await;
        };

        match tokio::time::timeout(limit, reduce(&mut tasks)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                tasks.shutdown().await;
                log::error!(
                    target: LOG_TARGET,
                    "Targeting group of {} predicates timed out after {limit:?}",
                    group.len()
                );
                Err(EvaluationError::TimedOut(limit))
            }
        }
    }
}

// AND over every task, in completion order. The first fault wins.
async fn reduce(tasks: &mut JoinSet<PredicateOutcome>) -> PredicateOutcome {
    let mut outcome: PredicateOutcome = Ok(PredicateResult::True);

    while let Some(joined) = tasks.join_next().await {
        let result = joined.map_err(EvaluationError::from_join).and_then(|r| r);

        outcome = match (outcome, result) {
            (Ok(acc), Ok(result)) => Ok(acc.and(result)),
            (Ok(_), Err(err)) => {
                log::error!(target: LOG_TARGET, "Targeting evaluation failed: {err}");
                Err(err)
            }
            (Err(first), Err(err)) => {
                log::debug!(target: LOG_TARGET, "Additional predicate fault: {err}");
                Err(first)
            }
            (Err(first), Ok(_)) => Err(first),
        };
    }

    outcome
}
