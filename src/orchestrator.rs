use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::config::PollSettings;
use crate::cursor::{AgentApi, LaunchRequest};
use crate::state_machine::{JobEvent, JobPhase, JobRun, JobStatus, StateMachine, Transition};

/// Drives one remote job through launch, polling and result retrieval.
///
/// Remote failures never escape: they end the run in `FailedLocal`,
/// `TimedOut` or `NoResult`, and the caller decides what to do next.
pub struct JobOrchestrator<C> {
    client: C,
    poll: PollSettings,
}

impl<C: AgentApi> JobOrchestrator<C> {
    pub fn new(client: C, poll: PollSettings) -> Self {
        Self { client, poll }
    }

    /// Runs the job to a final phase. `on_phase` is called on every phase
    /// change, starting with `Submit`.
    pub async fn run(&self, request: &LaunchRequest, mut on_phase: impl FnMut(&JobPhase)) -> JobRun {
        let mut run = JobRun::new();
        on_phase(&run.phase);

        let event = match self.client.launch(request).await {
            Ok(id) => {
                info!("Launched agent job {id}");
                JobEvent::Launched(id)
            }
            Err(e) => JobEvent::RequestFailed(e.to_string()),
        };
        self.step(&mut run, event, &mut on_phase);

        if run.phase == JobPhase::Polling {
            self.poll_until_terminal(&mut run, &mut on_phase).await;
        }

        if let JobPhase::Terminal(status) = run.phase {
            let event = if status == JobStatus::Finished {
                self.fetch_result(&run).await
            } else {
                JobEvent::ResultSkipped
            };
            self.step(&mut run, event, &mut on_phase);
        }

        debug_assert!(run.phase.is_final(), "run stopped in {}", run.phase);
        run
    }

    async fn poll_until_terminal(&self, run: &mut JobRun, on_phase: &mut impl FnMut(&JobPhase)) {
        let Some(job_id) = run.job_id.clone() else {
            return;
        };
        // `None` when the timeout is too large to represent: wait forever.
        let deadline = Instant::now().checked_add(self.poll.timeout);
        let expired = |now: Instant| deadline.is_some_and(|d| now >= d);

        loop {
            if expired(Instant::now()) {
                self.step(run, JobEvent::DeadlineExceeded, on_phase);
                return;
            }

            let event = match self.client.status(&job_id).await {
                Ok(status) => JobEvent::StatusObserved(status),
                Err(e) => JobEvent::RequestFailed(e.to_string()),
            };
            if self.step(run, event, on_phase) != Transition::Wait {
                return;
            }

            let now = Instant::now();
            if expired(now) {
                self.step(run, JobEvent::DeadlineExceeded, on_phase);
                return;
            }
            let wait = deadline.map_or(self.poll.interval, |d| self.poll.interval.min(d - now));
            debug!(
                "Agent job {job_id} is {}; next check in {wait:?}",
                run.last_status.unwrap_or(JobStatus::Unknown)
            );
            sleep(wait).await;
        }
    }

    async fn fetch_result(&self, run: &JobRun) -> JobEvent {
        let Some(job_id) = run.job_id.as_deref() else {
            return JobEvent::ResultFetched(None);
        };
        match self.client.conversation(job_id).await {
            Ok(conversation) => JobEvent::ResultFetched(conversation.latest_assistant_text()),
            Err(e) => JobEvent::RequestFailed(e.to_string()),
        }
    }

    fn step(&self, run: &mut JobRun, event: JobEvent, on_phase: &mut impl FnMut(&JobPhase)) -> Transition {
        let transition = StateMachine::apply(run, event);
        match &transition {
            Transition::Next(phase) => on_phase(phase),
            Transition::Wait => {}
            Transition::Rejected { phase, event } => {
                warn!("Ignoring unexpected event '{event}' in phase {phase}");
            }
        }
        transition
    }
}
