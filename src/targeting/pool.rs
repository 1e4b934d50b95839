use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use once_cell::sync::Lazy;
use thiserror::Error;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::sync::Semaphore;

use crate::config::EngineConfig;

const LOG_TARGET: &str = "targeting::pool";

#[derive(Debug, Clone, Error)]
pub enum PoolError {
    #[error("No tokio runtime is running on the current thread")]
    NoRuntime,
    #[error("Failed to start the targeting worker pool: {0}")]
    Startup(String),
}

/// Bounded, reusable workers for predicate evaluation.
///
/// Cloning is cheap: clones share the runtime handle and the permit budget,
/// so the bound holds across every evaluator built from the same pool.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    handle: Handle,
    permits: Arc<Semaphore>,
    limit: usize,
}

impl WorkerPool {
    /// Spawn on `handle`, with at most `max_concurrent` predicates in flight.
    pub fn on_handle(handle: Handle, max_concurrent: usize) -> Self {
        let limit = max_concurrent.max(1);
        Self {
            handle,
            permits: Arc::new(Semaphore::new(limit)),
            limit,
        }
    }

    /// A pool on the runtime the caller is running in.
    pub fn current(max_concurrent: usize) -> Result<Self, PoolError> {
        let handle = Handle::try_current().map_err(|_| PoolError::NoRuntime)?;
        Ok(Self::on_handle(handle, max_concurrent))
    }

    /// The process-wide pool, started on first use from [`EngineConfig::from_env`].
    pub fn global() -> Result<Self, PoolError> {
        Self::global_with_config().map(|(pool, _)| pool)
    }

    /// The process-wide pool together with the configuration it was started
    /// from, so callers apply the same evaluation timeout.
    pub fn global_with_config() -> Result<(Self, EngineConfig), PoolError> {
        match &*GLOBAL_POOL {
            Ok(global) => Ok((global.pool.clone(), global.config.clone())),
            Err(message) => Err(PoolError::Startup(message.clone())),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    pub fn is_closed(&self) -> bool {
        self.permits.is_closed()
    }

    /// Stop admitting new predicate evaluations. Work already holding a
    /// permit runs to completion.
    pub fn close(&self) {
        self.permits.close();
    }

    pub(crate) fn handle(&self) -> &Handle {
        &self.handle
    }

    pub(crate) fn permits(&self) -> Arc<Semaphore> {
        Arc::clone(&self.permits)
    }
}

struct GlobalPool {
    runtime: Mutex<Option<Runtime>>,
    pool: WorkerPool,
    config: EngineConfig,
}

static GLOBAL_POOL: Lazy<Result<GlobalPool, String>> = Lazy::new(|| {
    let config = EngineConfig::from_env();
    let runtime = Builder::new_multi_thread()
        .worker_threads(config.worker_threads)
        .thread_name("targeting-worker")
        .enable_time()
        .build()
        .map_err(|e| e.to_string())?;

    log::debug!(
        target: LOG_TARGET,
        "Started targeting worker pool: {} threads, {} predicates in flight",
        config.worker_threads,
        config.max_concurrent_predicates
    );

    let pool = WorkerPool::on_handle(runtime.handle().clone(), config.max_concurrent_predicates);
    Ok(GlobalPool {
        runtime: Mutex::new(Some(runtime)),
        pool,
        config,
    })
});

/// Close the process-wide pool and wait up to `timeout` for its workers.
///
/// Evaluations started afterwards fail with `EvaluationError::PoolClosed`.
/// A no-op when the pool was never started. Called from within an async
/// context it logs a warning and leaves the pool running, since blocking on
/// the workers there would panic.
pub fn shutdown_global_pool(timeout: Duration) {
    let Some(Ok(global)) = Lazy::get(&GLOBAL_POOL) else {
        return;
    };

    if Handle::try_current().is_ok() {
        log::warn!(
            target: LOG_TARGET,
            "Ignoring targeting worker pool shutdown requested from an async context"
        );
        return;
    }

    global.pool.close();
    let runtime = global
        .runtime
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .take();

    if let Some(runtime) = runtime {
        log::debug!(target: LOG_TARGET, "Shutting down targeting worker pool");
        runtime.shutdown_timeout(timeout);
    }
}
