use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::state::JobPhase;

/// Remote job status as reported by the agent API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Running,
    Finished,
    Failed,
    Error,
    /// Any status string this client does not know. Treated as still running.
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// FINISHED, FAILED and ERROR are final on the remote side.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Finished | JobStatus::Failed | JobStatus::Error)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "PENDING"),
            JobStatus::Running => write!(f, "RUNNING"),
            JobStatus::Finished => write!(f, "FINISHED"),
            JobStatus::Failed => write!(f, "FAILED"),
            JobStatus::Error => write!(f, "ERROR"),
            JobStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Local record of one launch/poll/fetch sequence.
#[derive(Debug, Clone, Serialize)]
pub struct JobRun {
    /// Set once the launch call returns.
    pub job_id: Option<String>,
    pub phase: JobPhase,
    pub phase_history: Vec<JobPhase>,
    pub last_status: Option<JobStatus>,
    pub status_checks: u32,
    /// Assistant markdown, only when the run ends in `ResultReady`.
    pub markdown: Option<String>,
    /// Why the run ended without a result, when there is a reason to report.
    pub failure: Option<String>,
    pub started_at: DateTime<Utc>,
}

impl JobRun {
    pub fn new() -> Self {
        Self {
            job_id: None,
            phase: JobPhase::Submit,
            phase_history: Vec::new(),
            last_status: None,
            status_checks: 0,
            markdown: None,
            failure: None,
            started_at: Utc::now(),
        }
    }

    /// Phases visited so far, including the current one.
    pub fn transitions(&self) -> Vec<JobPhase> {
        let mut all = self.phase_history.clone();
        all.push(self.phase.clone());
        all
    }
}

impl Default for JobRun {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses() {
        assert!(JobStatus::Finished.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(JobStatus::Error.is_terminal());
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(!JobStatus::Unknown.is_terminal());
    }

    #[test]
    fn status_uses_api_spelling() {
        let s: JobStatus = serde_json::from_str(r#""FINISHED""#).unwrap();
        assert_eq!(s, JobStatus::Finished);
        assert_eq!(serde_json::to_string(&JobStatus::Pending).unwrap(), r#""PENDING""#);
        assert_eq!(JobStatus::Error.to_string(), "ERROR");
    }

    #[test]
    fn new_run_starts_in_submit() {
        let run = JobRun::new();
        assert_eq!(run.phase, JobPhase::Submit);
        assert!(run.job_id.is_none());
        assert!(run.phase_history.is_empty());
        assert_eq!(run.transitions(), vec![JobPhase::Submit]);
    }
}
