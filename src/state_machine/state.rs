use std::fmt;

use serde::Serialize;

use super::job::{JobRun, JobStatus};

/// Local phases of a remote job run.
///
/// SUBMIT → POLLING → TERMINAL → RESULT_READY | NO_RESULT, with TIMED_OUT
/// and FAILED_LOCAL as early exits. The last four are final.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum JobPhase {
    Submit,
    Polling,
    Terminal(JobStatus),
    TimedOut,
    FailedLocal,
    ResultReady,
    NoResult,
}

impl JobPhase {
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            JobPhase::TimedOut | JobPhase::FailedLocal | JobPhase::ResultReady | JobPhase::NoResult
        )
    }
}

impl fmt::Display for JobPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobPhase::Submit => write!(f, "SUBMIT"),
            JobPhase::Polling => write!(f, "POLLING"),
            JobPhase::Terminal(status) => write!(f, "TERMINAL({status})"),
            JobPhase::TimedOut => write!(f, "TIMED_OUT"),
            JobPhase::FailedLocal => write!(f, "FAILED_LOCAL"),
            JobPhase::ResultReady => write!(f, "RESULT_READY"),
            JobPhase::NoResult => write!(f, "NO_RESULT"),
        }
    }
}

/// Something the orchestrator observed.
#[derive(Debug, Clone, PartialEq)]
pub enum JobEvent {
    /// The launch call returned a job id.
    Launched(String),
    /// A status poll returned. `None` when the response had no status.
    StatusObserved(Option<JobStatus>),
    /// The polling deadline passed before a terminal status was seen.
    DeadlineExceeded,
    /// The conversation was fetched; carries the newest assistant text.
    ResultFetched(Option<String>),
    /// The job ended without FINISHED, so no conversation is fetched.
    ResultSkipped,
    /// Any remote call failed.
    RequestFailed(String),
}

impl fmt::Display for JobEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobEvent::Launched(id) => write!(f, "launched {id}"),
            JobEvent::StatusObserved(Some(status)) => write!(f, "status {status}"),
            JobEvent::StatusObserved(None) => write!(f, "status <missing>"),
            JobEvent::DeadlineExceeded => write!(f, "deadline exceeded"),
            JobEvent::ResultFetched(Some(_)) => write!(f, "result fetched"),
            JobEvent::ResultFetched(None) => write!(f, "no assistant message"),
            JobEvent::ResultSkipped => write!(f, "result skipped"),
            JobEvent::RequestFailed(reason) => write!(f, "request failed: {reason}"),
        }
    }
}

/// Outcome of feeding one event to the machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Move to a new phase.
    Next(JobPhase),
    /// Stay in `Polling` and check again after the poll interval.
    Wait,
    /// The event makes no sense in the current phase; nothing changes.
    Rejected { phase: JobPhase, event: String },
}

pub struct StateMachine;

impl StateMachine {
    /// Pure transition function. No clocks, no I/O.
    pub fn transition(phase: &JobPhase, event: &JobEvent) -> Transition {
        use JobEvent as E;
        use JobPhase as P;

        match (phase, event) {
            (P::Submit, E::Launched(_)) => Transition::Next(P::Polling),
            (P::Submit | P::Polling | P::Terminal(_), E::RequestFailed(_)) => {
                Transition::Next(P::FailedLocal)
            }
            (P::Polling, E::StatusObserved(Some(status))) if status.is_terminal() => {
                Transition::Next(P::Terminal(*status))
            }
            (P::Polling, E::StatusObserved(_)) => Transition::Wait,
            (P::Polling, E::DeadlineExceeded) => Transition::Next(P::TimedOut),
            (P::Terminal(JobStatus::Finished), E::ResultFetched(Some(_))) => {
                Transition::Next(P::ResultReady)
            }
            (P::Terminal(_), E::ResultFetched(_)) => Transition::Next(P::NoResult),
            (P::Terminal(status), E::ResultSkipped) if *status != JobStatus::Finished => {
                Transition::Next(P::NoResult)
            }
            _ => Transition::Rejected {
                phase: phase.clone(),
                event: event.to_string(),
            },
        }
    }

    /// Applies an event to a run, recording what it carries.
    pub fn apply(run: &mut JobRun, event: JobEvent) -> Transition {
        let transition = Self::transition(&run.phase, &event);
        if matches!(transition, Transition::Rejected { .. }) {
            return transition;
        }

        match event {
            JobEvent::Launched(id) => run.job_id = Some(id),
            JobEvent::StatusObserved(status) => {
                run.status_checks += 1;
                if status.is_some() {
                    run.last_status = status;
                }
            }
            JobEvent::DeadlineExceeded => {
                let last = run
                    .last_status
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "none".into());
                run.failure = Some(format!("timed out waiting for agent (last status={last})"));
            }
            JobEvent::ResultFetched(markdown) => {
                if markdown.is_none() {
                    run.failure = Some("agent conversation has no assistant message".into());
                }
                run.markdown = markdown;
            }
            JobEvent::ResultSkipped => {
                let last = run.last_status.unwrap_or(JobStatus::Unknown);
                run.failure = Some(format!("agent ended with status {last}"));
            }
            JobEvent::RequestFailed(reason) => run.failure = Some(reason),
        }

        if let Transition::Next(next) = &transition {
            let previous = std::mem::replace(&mut run.phase, next.clone());
            run.phase_history.push(previous);
        }
        transition
    }
}
