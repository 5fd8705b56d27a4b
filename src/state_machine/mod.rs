mod job;
mod state;

pub use job::{JobRun, JobStatus};
pub use state::{JobEvent, JobPhase, StateMachine, Transition};
