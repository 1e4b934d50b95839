use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::RequestContext;

/// Outcome of a single predicate, or of a reduced targeting group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PredicateResult {
    True,
    False,
}

impl PredicateResult {
    pub fn is_true(self) -> bool {
        self == PredicateResult::True
    }

    pub fn and(self, other: PredicateResult) -> PredicateResult {
        (self.is_true() && other.is_true()).into()
    }

    pub fn or(self, other: PredicateResult) -> PredicateResult {
        (self.is_true() || other.is_true()).into()
    }

    pub fn invert(self) -> PredicateResult {
        (!self.is_true()).into()
    }
}

impl From<bool> for PredicateResult {
    fn from(value: bool) -> Self {
        if value {
            PredicateResult::True
        } else {
            PredicateResult::False
        }
    }
}

/// A predicate could not produce a result. Never interpreted as FALSE.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("predicate '{predicate}' failed: {message}")]
pub struct PredicateError {
    pub predicate: String,
    pub message: String,
}

impl PredicateError {
    pub fn new(predicate: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            predicate: predicate.into(),
            message: message.into(),
        }
    }
}

/// A unit of eligibility logic evaluated against a [`RequestContext`].
///
/// Implementations must not depend on one another: the evaluator runs every
/// predicate of a group concurrently and in no particular order.
#[async_trait]
pub trait TargetingPredicate: Send + Sync + fmt::Debug {
    async fn evaluate(&self, context: &RequestContext) -> Result<PredicateResult, PredicateError>;

    /// Name used in errors and logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Inverse targeting: TRUE exactly when the wrapped predicate is FALSE.
///
/// Faults of the inner predicate pass through untouched.
#[derive(Debug, Clone)]
pub struct Inverted<P> {
    inner: P,
}

impl<P> Inverted<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> P {
        self.inner
    }
}

#[async_trait]
impl<P: TargetingPredicate> TargetingPredicate for Inverted<P> {
    async fn evaluate(&self, context: &RequestContext) -> Result<PredicateResult, PredicateError> {
        Ok(self.inner.evaluate(context).await?.invert())
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Adapts a synchronous closure into a predicate.
pub struct FnPredicate<F> {
    name: String,
    f: F,
}

impl<F> FnPredicate<F>
where
    F: Fn(&RequestContext) -> Result<PredicateResult, PredicateError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> fmt::Debug for FnPredicate<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPredicate").field("name", &self.name).finish()
    }
}

#[async_trait]
impl<F> TargetingPredicate for FnPredicate<F>
where
    F: Fn(&RequestContext) -> Result<PredicateResult, PredicateError> + Send + Sync,
{
    async fn evaluate(&self, context: &RequestContext) -> Result<PredicateResult, PredicateError> {
        (self.f)(context)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
