use super::concurrent::ConcurrentAssessmentExecutor;
use super::pool::WorkerPool;
use super::sequential::SequentialAssessmentExecutor;
use super::AssessmentExecutor;
use crate::api::EngineConfig;
use crate::assessment::ConfiguredAssessment;
use crate::builder::ProtocolError;
use crate::notify::AssessmentNotifier;
use std::sync::Arc;

/// Builds executors for a configuration and owns the shared worker pool
///
/// The pool is created lazily on the first concurrent executor and lives
/// until [`shutdown`](Self::shutdown) or drop.
pub struct AssessmentExecutorFactory {
    config: EngineConfig,
    pool: Option<Arc<WorkerPool>>,
}

impl AssessmentExecutorFactory {
    pub fn new(config: EngineConfig) -> Self {
        Self { config, pool: None }
    }

    /// Use a caller-owned pool instead of creating one
    pub fn with_pool(mut self, pool: Arc<WorkerPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn pool(&self) -> Option<&Arc<WorkerPool>> {
        self.pool.as_ref()
    }

    fn ensure_pool(&mut self) -> std::io::Result<Arc<WorkerPool>> {
        if let Some(pool) = &self.pool {
            return Ok(pool.clone());
        }
        let pool = Arc::new(WorkerPool::new(self.config.max_threads)?);
        self.pool = Some(pool.clone());
        Ok(pool)
    }

    /// Create the executor variant the configuration asks for
    pub fn create(
        &mut self,
        assessments: Vec<ConfiguredAssessment>,
        notifier: Arc<dyn AssessmentNotifier>,
    ) -> Result<Box<dyn AssessmentExecutor>, ProtocolError> {
        if !self.config.concurrent {
            return Ok(Box::new(SequentialAssessmentExecutor::new(
                assessments,
                notifier,
            )?));
        }

        match self.ensure_pool() {
            Ok(pool) => Ok(Box::new(
                ConcurrentAssessmentExecutor::new(assessments, notifier, pool)?
                    .with_strict_task_failures(self.config.strict_task_failures),
            )),
            Err(e) => {
                log_warning!("Cannot start worker pool, running sequentially",
                    "error" => e
                );
                Ok(Box::new(SequentialAssessmentExecutor::new(
                    assessments,
                    notifier,
                )?))
            }
        }
    }

    /// Stop the pool this factory holds, if any
    pub fn shutdown(&mut self) {
        if let Some(pool) = self.pool.take() {
            pool.shutdown();
        }
    }
}

impl Drop for AssessmentExecutorFactory {
    fn drop(&mut self) {
        self.shutdown();
    }
}
