pub mod evaluator;
pub mod group;
pub mod pool;
pub mod predicate;

pub use evaluator::{EvaluationError, TargetingEvaluator};
pub use group::TargetingGroup;
pub use pool::{shutdown_global_pool, PoolError, WorkerPool};
pub use predicate::{FnPredicate, Inverted, PredicateError, PredicateResult, TargetingPredicate};
