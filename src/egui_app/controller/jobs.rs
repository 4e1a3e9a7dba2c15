use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::thread;

use crate::planner::{GenerationError, PlanPrompt, PlanService, StudyWindow};

pub(crate) enum JobMessage {
    PlanGenerated(PlanGenerationResult),
}

pub(crate) struct PlanJob {
    pub(crate) service: Arc<dyn PlanService>,
    pub(crate) prompt: PlanPrompt,
    pub(crate) api_key: String,
    pub(crate) window: StudyWindow,
    pub(crate) exam_subject: String,
}

#[derive(Debug)]
pub(crate) struct PlanGenerationResult {
    pub(crate) window: StudyWindow,
    pub(crate) exam_subject: String,
    pub(crate) result: Result<String, GenerationError>,
}

pub(crate) struct ControllerJobs {
    message_tx: Sender<JobMessage>,
    message_rx: Receiver<JobMessage>,
    plan_in_progress: bool,
}

impl ControllerJobs {
    pub(super) fn new() -> Self {
        let (message_tx, message_rx) = std::sync::mpsc::channel::<JobMessage>();
        Self {
            message_tx,
            message_rx,
            plan_in_progress: false,
        }
    }

    pub(super) fn try_recv_message(&self) -> Option<JobMessage> {
        match self.message_rx.try_recv() {
            Ok(message) => Some(message),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    pub(super) fn plan_in_progress(&self) -> bool {
        self.plan_in_progress
    }

    /// Start one generation; ignored while another is outstanding.
    pub(super) fn begin_plan_generation(&mut self, job: PlanJob) -> bool {
        if self.plan_in_progress {
            return false;
        }
        self.plan_in_progress = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                job.service.generate(&job.prompt, &job.api_key)
            }))
            .unwrap_or_else(|payload| {
                let reason = panic_reason(payload.as_ref());
                tracing::error!("Plan service panicked: {reason}");
                Err(GenerationError::Response(format!("plan service crashed: {reason}")))
            });
            let _ = tx.send(JobMessage::PlanGenerated(PlanGenerationResult {
                window: job.window,
                exam_subject: job.exam_subject,
                result,
            }));
        });
        true
    }

    pub(super) fn clear_plan_generation(&mut self) {
        self.plan_in_progress = false;
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "unknown panic".to_string()
    }
}
