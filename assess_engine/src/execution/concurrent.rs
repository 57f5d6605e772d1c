use super::helper;
use super::pool::{CancellationToken, Job, TaskExecutor};
use super::AssessmentExecutor;
use crate::assessment::errors::panic_message;
use crate::assessment::{AssessmentError, ConfiguredAssessment, ExecutableAssessment};
use crate::builder::{AssessmentResultBuilder, ProtocolError};
use crate::logging::codes;
use crate::notify::AssessmentNotifier;
use crate::types::Document;
use crossbeam_channel::{unbounded, Sender};
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// How a single dispatched task ended
#[derive(Debug)]
enum TaskOutcome {
    Completed,
    Failed(AssessmentError),
    Panicked(String),
    Cancelled,
}

/// Dispatches one task per executable assessment onto a shared [`TaskExecutor`]
/// and drains them in completion order
///
/// A failed assessment cancels every task that has not started yet and is
/// returned. A panicking assessment also cancels the rest, but the run then
/// returns `Ok(())` unless strict task failures are enabled; observers still
/// see the `assessment_error` notification either way.
pub struct ConcurrentAssessmentExecutor {
    assessments: Vec<ConfiguredAssessment>,
    notifier: Arc<dyn AssessmentNotifier>,
    task_executor: Arc<dyn TaskExecutor>,
    strict_task_failures: bool,
}

impl ConcurrentAssessmentExecutor {
    pub fn new(
        assessments: Vec<ConfiguredAssessment>,
        notifier: Arc<dyn AssessmentNotifier>,
        task_executor: Arc<dyn TaskExecutor>,
    ) -> Result<Self, ProtocolError> {
        if assessments.is_empty() {
            return Err(ProtocolError::EmptyAssessmentList);
        }
        Ok(Self {
            assessments,
            notifier,
            task_executor,
            strict_task_failures: false,
        })
    }

    /// Report panicking tasks as `AssessmentError::TaskFailed` instead of
    /// returning normally
    pub fn with_strict_task_failures(mut self, strict: bool) -> Self {
        self.strict_task_failures = strict;
        self
    }

    pub fn strict_task_failures(&self) -> bool {
        self.strict_task_failures
    }

    fn task(
        &self,
        index: usize,
        executable: ExecutableAssessment,
        document: Arc<dyn Document>,
        builder: Arc<dyn AssessmentResultBuilder>,
        token: CancellationToken,
        completions: Sender<(usize, TaskOutcome)>,
    ) -> Job {
        let notifier = self.notifier.clone();
        Box::new(move || {
            let outcome = if token.is_cancelled() {
                TaskOutcome::Cancelled
            } else {
                let run = catch_unwind(AssertUnwindSafe(|| {
                    helper::execute_assessment(
                        &executable,
                        document.as_ref(),
                        builder.as_ref(),
                        notifier.as_ref(),
                    )
                }));
                match run {
                    Ok(Ok(())) => TaskOutcome::Completed,
                    Ok(Err(error)) => TaskOutcome::Failed(error),
                    Err(payload) => TaskOutcome::Panicked(panic_message(payload.as_ref())),
                }
            };
            // Cancel before reporting so queued tasks on this worker see it
            if matches!(outcome, TaskOutcome::Failed(_) | TaskOutcome::Panicked(_)) {
                token.cancel();
            }
            // The drain loop may already have returned
            let _ = completions.send((index, outcome));
        })
    }

    fn interrupted(token: &CancellationToken, reason: String) -> AssessmentError {
        token.cancel();
        log_error!(codes::execution::EXECUTION_INTERRUPTED, "Concurrent execution interrupted",
            "reason" => &reason
        );
        AssessmentError::Interrupted { reason }
    }
}

impl AssessmentExecutor for ConcurrentAssessmentExecutor {
    fn assessments(&self) -> &[ConfiguredAssessment] {
        &self.assessments
    }

    fn execute(
        &self,
        document: Arc<dyn Document>,
        builder: Arc<dyn AssessmentResultBuilder>,
    ) -> Result<(), AssessmentError> {
        builder.start();
        builder.add_assessment_target(document.as_ref());
        self.notifier.execution_started(document.as_ref());

        let executables =
            helper::get_executable_assessments(document.as_ref(), &self.assessments)?;

        let token = CancellationToken::new();
        let (sender, receiver) = unbounded();
        let mut outstanding: BTreeMap<usize, String> = BTreeMap::new();

        for (index, executable) in executables.into_iter().enumerate() {
            let name = executable.name();
            let job = self.task(
                index,
                executable,
                document.clone(),
                builder.clone(),
                token.clone(),
                sender.clone(),
            );
            if self.task_executor.submit(job).is_err() {
                return Err(Self::interrupted(
                    &token,
                    format!("task executor rejected {}", name),
                ));
            }
            outstanding.insert(index, name);
        }
        drop(sender);

        log_debug!("Dispatched assessment tasks",
            "document" => document.system_id(),
            "tasks" => outstanding.len()
        );

        while !outstanding.is_empty() {
            let (index, outcome) = match receiver.recv() {
                Ok(completion) => completion,
                Err(_) => {
                    return Err(Self::interrupted(
                        &token,
                        format!("{} task(s) dropped without completing", outstanding.len()),
                    ));
                }
            };
            let name = outstanding.remove(&index).unwrap_or_default();

            match outcome {
                TaskOutcome::Completed | TaskOutcome::Cancelled => {}
                TaskOutcome::Failed(error) => {
                    token.cancel();
                    return Err(error);
                }
                TaskOutcome::Panicked(message) => {
                    token.cancel();
                    if self.strict_task_failures {
                        return Err(AssessmentError::TaskFailed {
                            assessment: name,
                            message,
                        });
                    }
                    log_warning!(code = codes::execution::TASK_FAILURE_SUPPRESSED,
                        "Assessment task panicked; remaining tasks cancelled",
                        "assessment" => &name,
                        "panic" => &message,
                        "cancelled" => outstanding.len()
                    );
                    return Ok(());
                }
            }
        }

        self.notifier.execution_completed(document.as_ref());
        Ok(())
    }
}
