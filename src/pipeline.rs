//! One stateless run: transcript in, brief out.

use std::path::PathBuf;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::artifact::{assemble, write_artifact};
use crate::config::BriefConfig;
use crate::cursor::{AgentApi, AgentError, CursorClient, LaunchRequest};
use crate::error::BriefError;
use crate::extract::{Document, ExtractorRegistry};
use crate::fallback::fallback;
use crate::metadata::{Metadata, slugify};
use crate::orchestrator::JobOrchestrator;
use crate::prompt::build_prompt;
use crate::state_machine::JobPhase;
use crate::ui::JobProgress;

/// Caller-supplied inputs for a single transcript.
#[derive(Debug, Clone, Default)]
pub struct BriefRequest {
    pub transcript: PathBuf,
    pub output: Option<PathBuf>,
    pub title: Option<String>,
    pub date: Option<String>,
    pub stakeholders: Option<String>,
    pub slug: Option<String>,
    pub branch_name: Option<String>,
}

impl BriefRequest {
    pub fn new(transcript: impl Into<PathBuf>) -> Self {
        Self {
            transcript: transcript.into(),
            ..Default::default()
        }
    }
}

/// What a run produced.
#[derive(Debug, Clone)]
pub struct BriefOutcome {
    pub output_path: PathBuf,
    /// Id of the launched job, kept even when the body is a fallback.
    pub job_id: Option<String>,
    pub used_fallback: bool,
    /// Final job phase, if a job was attempted.
    pub phase: Option<JobPhase>,
}

pub struct BriefPipeline {
    config: BriefConfig,
    extractors: ExtractorRegistry,
    progress: JobProgress,
}

impl BriefPipeline {
    pub fn new(config: BriefConfig, extractors: ExtractorRegistry, progress: JobProgress) -> Self {
        Self {
            config,
            extractors,
            progress,
        }
    }

    pub fn progress(&self) -> &JobProgress {
        &self.progress
    }

    /// Runs against the real Cursor API built from the configuration.
    pub async fn run(&self, req: &BriefRequest) -> Result<BriefOutcome, BriefError> {
        let client = CursorClient::new(&self.config.api_settings());
        self.run_with(req, client).await
    }

    /// Runs with an already-resolved client, or the reason there is none.
    pub async fn run_with<C: AgentApi>(
        &self,
        req: &BriefRequest,
        client: Result<C, AgentError>,
    ) -> Result<BriefOutcome, BriefError> {
        if matches!(client, Err(AgentError::MissingCredential)) && self.config.require_credential {
            return Err(BriefError::MissingCredential);
        }

        let doc = Document::read(&req.transcript)?;
        let text = self.extractors.extract(&doc)?;
        info!(
            "Extracted {} characters from {}",
            text.chars().count(),
            req.transcript.display()
        );

        let metadata = Metadata::infer(
            &req.transcript,
            req.title.as_deref(),
            req.date.as_deref(),
            req.stakeholders.as_deref(),
        );
        let prompt = build_prompt(&metadata, req.stakeholders.as_deref(), &text);

        let (job_id, markdown, phase) = match client {
            Ok(client) => {
                let launch = LaunchRequest::new(
                    prompt,
                    &self.config.repository,
                    &self.config.repository_ref,
                    req.branch_name.as_deref(),
                );
                let orchestrator = JobOrchestrator::new(client, self.config.poll_settings());
                let run = orchestrator
                    .run(&launch, |phase| self.progress.phase(phase))
                    .await;
                let phases: Vec<String> = run.transitions().iter().map(ToString::to_string).collect();
                debug!(
                    "Agent run took {}s: {}",
                    (Utc::now() - run.started_at).num_seconds(),
                    phases.join(" -> ")
                );
                if run.markdown.is_none() {
                    let job = run.job_id.as_deref().unwrap_or("<not launched>");
                    let reason = run.failure.as_deref().unwrap_or("no result");
                    warn!("Agent job {job} ended in {}: {reason}; writing fallback brief", run.phase);
                }
                (run.job_id, run.markdown, Some(run.phase))
            }
            Err(e) if e.is_remote() => {
                warn!("Cannot reach Cursor API ({e}); writing fallback brief");
                (None, None, None)
            }
            Err(e) => {
                warn!("{e}; writing fallback brief");
                (None, None, None)
            }
        };

        let used_fallback = markdown.is_none();
        let content = markdown.unwrap_or_else(|| fallback(&text, &metadata));

        let output_path = self.output_path(req);
        let artifact = assemble(&content, &metadata, &req.transcript, job_id.as_deref());
        write_artifact(&output_path, &artifact)?;
        info!("Wrote meeting brief to {}", output_path.display());

        Ok(BriefOutcome {
            output_path,
            job_id,
            used_fallback,
            phase,
        })
    }

    fn output_path(&self, req: &BriefRequest) -> PathBuf {
        if let Some(output) = &req.output {
            return output.clone();
        }
        let slug = req
            .slug
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| {
                slugify(
                    &req.transcript
                        .file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                )
            });
        self.config.output_dir.join(format!("{slug}.md"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::split_artifact;
    use crate::extract::pointer::pointer_notice;
    use crate::orchestrator::tests::ScriptedAgent;
    use crate::state_machine::JobStatus;
    use std::path::Path;
    use tempfile::TempDir;

    fn pipeline(tmp: &TempDir, config: BriefConfig) -> BriefPipeline {
        let config = BriefConfig {
            output_dir: tmp.path().join("meeting_outputs"),
            repository: "https://github.com/acme/arch".into(),
            poll_interval_secs: 5,
            timeout_secs: 60,
            ..config
        };
        BriefPipeline::new(config, ExtractorRegistry::with_defaults(None), JobProgress::hidden())
    }

    fn write(tmp: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = tmp.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn read_artifact(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    #[tokio::test]
    async fn missing_credential_degrades_to_fallback() {
        let tmp = TempDir::new().unwrap();
        let text: String = (1..=20).map(|i| format!("Speaker {i}: point {i}\n")).collect();
        let transcript = write(&tmp, "2024-03-18-payments-sync.txt", &text);
        let pipeline = pipeline(&tmp, BriefConfig::default());

        let outcome = pipeline.run(&BriefRequest::new(&transcript)).await.unwrap();

        assert!(outcome.used_fallback);
        assert!(outcome.job_id.is_none());
        assert!(outcome.phase.is_none());
        assert_eq!(
            outcome.output_path,
            tmp.path().join("meeting_outputs/2024-03-18-payments-sync.md")
        );

        let doc = read_artifact(&outcome.output_path);
        let (header, body) = split_artifact(&doc);
        assert!(header.contains("agent_id: \"fallback\""));
        assert!(header.contains("date: \"2024-03-18\""));

        let metadata = Metadata::infer(&transcript, None, None, None);
        let first_twelve: String = text.lines().take(12).collect::<Vec<_>>().join("\n");
        assert_eq!(body, fallback(&first_twelve, &metadata));
        assert!(body.ends_with("Speaker 12: point 12"));
    }

    #[tokio::test]
    async fn strict_mode_fails_on_missing_credential() {
        let tmp = TempDir::new().unwrap();
        let transcript = write(&tmp, "sync.md", "hello");
        let pipeline = pipeline(
            &tmp,
            BriefConfig {
                require_credential: true,
                ..Default::default()
            },
        );

        let err = pipeline.run(&BriefRequest::new(&transcript)).await.unwrap_err();
        assert!(matches!(err, BriefError::MissingCredential));
        assert!(!tmp.path().join("meeting_outputs").exists());
    }

    #[tokio::test(start_paused = true)]
    async fn pointer_text_flows_into_prompt_and_fallback() {
        let tmp = TempDir::new().unwrap();
        let transcript = write(&tmp, "weekly.gdoc", r#"{"url": "https://docs.google.com/doc/abc"}"#);
        let pipeline = pipeline(&tmp, BriefConfig::default());
        let agent = ScriptedAgent::failing_launch(AgentError::Api {
            status: 500,
            message: "down".into(),
        });

        let outcome = pipeline
            .run_with(&BriefRequest::new(&transcript), Ok(&agent))
            .await
            .unwrap();

        let notice = pointer_notice("https://docs.google.com/doc/abc");
        let prompts = agent.prompts.lock().unwrap().clone();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains(&format!("---\n{notice}\n---")));

        assert!(outcome.used_fallback);
        assert_eq!(outcome.phase, Some(JobPhase::FailedLocal));
        let doc = read_artifact(&outcome.output_path);
        let (_, body) = split_artifact(&doc);
        assert!(body.ends_with(&format!("Transcript excerpt:\n{notice}")));
    }

    #[tokio::test(start_paused = true)]
    async fn finished_job_writes_agent_markdown() {
        let tmp = TempDir::new().unwrap();
        let transcript = write(&tmp, "design-review.md", "Alice: let's use queues");
        let pipeline = pipeline(&tmp, BriefConfig::default());
        let agent = ScriptedAgent::launching("bc-77")
            .with_statuses(&[JobStatus::Running, JobStatus::Running, JobStatus::Finished])
            .with_assistant_messages(&["Hello"]);

        let outcome = pipeline
            .run_with(&BriefRequest::new(&transcript), Ok(&agent))
            .await
            .unwrap();

        assert!(!outcome.used_fallback);
        assert_eq!(outcome.job_id.as_deref(), Some("bc-77"));
        assert_eq!(outcome.phase, Some(JobPhase::ResultReady));

        let doc = read_artifact(&outcome.output_path);
        let (header, body) = split_artifact(&doc);
        assert_eq!(body, "Hello");
        assert!(header.contains("agent_id: \"bc-77\""));
        assert!(header.contains("meeting: \"Design Review\""));
        assert!(doc.ends_with("Hello\n"));
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_job_falls_back() {
        let tmp = TempDir::new().unwrap();
        let transcript = write(&tmp, "standup.md", "one\ntwo\n");
        let pipeline = pipeline(&tmp, BriefConfig::default());
        let agent = ScriptedAgent::launching("bc-slow");

        let outcome = pipeline
            .run_with(&BriefRequest::new(&transcript), Ok(&agent))
            .await
            .unwrap();

        assert!(outcome.used_fallback);
        assert_eq!(outcome.job_id.as_deref(), Some("bc-slow"));
        assert_eq!(outcome.phase, Some(JobPhase::TimedOut));
        assert!(!agent.calls().iter().any(|c| c.starts_with("conversation")));

        let doc = read_artifact(&outcome.output_path);
        let (header, body) = split_artifact(&doc);
        assert!(header.contains("agent_id: \"bc-slow\""));
        assert!(body.ends_with("Transcript excerpt:\none\ntwo"));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_job_keeps_launched_id_in_header() {
        let tmp = TempDir::new().unwrap();
        let transcript = write(&tmp, "retro.md", "Bob: the deploy broke\n");
        let pipeline = pipeline(&tmp, BriefConfig::default());
        let agent = ScriptedAgent::launching("bc-launched").with_statuses(&[JobStatus::Failed]);

        let outcome = pipeline
            .run_with(&BriefRequest::new(&transcript), Ok(&agent))
            .await
            .unwrap();

        assert!(outcome.used_fallback);
        assert_eq!(outcome.job_id.as_deref(), Some("bc-launched"));
        assert_eq!(outcome.phase, Some(JobPhase::NoResult));

        let doc = read_artifact(&outcome.output_path);
        let (header, body) = split_artifact(&doc);
        assert!(header.lines().any(|l| l == "agent_id: \"bc-launched\""));
        assert!(body.starts_with("_Cursor agent fallback summary_"));
        assert!(body.ends_with("Transcript excerpt:\nBob: the deploy broke"));
    }

    #[tokio::test]
    async fn overrides_shape_metadata_and_output_path() {
        let tmp = TempDir::new().unwrap();
        let transcript = write(&tmp, "raw.txt", "x");
        let pipeline = pipeline(&tmp, BriefConfig::default());
        let explicit = tmp.path().join("out/custom.md");

        let req = BriefRequest {
            output: Some(explicit.clone()),
            title: Some("Quarterly Planning".into()),
            date: Some("2024-07-01".into()),
            ..BriefRequest::new(&transcript)
        };
        let outcome = pipeline.run(&req).await.unwrap();
        assert_eq!(outcome.output_path, explicit);
        let doc = read_artifact(&explicit);
        assert!(doc.contains("meeting: \"Quarterly Planning\""));
        assert!(doc.contains("date: \"2024-07-01\""));

        let req = BriefRequest {
            slug: Some("q3-plan".into()),
            ..BriefRequest::new(&transcript)
        };
        let outcome = pipeline.run(&req).await.unwrap();
        assert_eq!(outcome.output_path, tmp.path().join("meeting_outputs/q3-plan.md"));
    }

    #[tokio::test]
    async fn unreadable_input_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let pipeline = pipeline(&tmp, BriefConfig::default());
        let err = pipeline
            .run(&BriefRequest::new(tmp.path().join("missing.md")))
            .await
            .unwrap_err();
        assert!(matches!(err, BriefError::InputRead { .. }));
    }

    #[tokio::test]
    async fn corrupt_docx_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let transcript = write(&tmp, "broken.docx", "not a zip");
        let pipeline = pipeline(&tmp, BriefConfig::default());
        let err = pipeline.run(&BriefRequest::new(&transcript)).await.unwrap_err();
        assert!(matches!(err, BriefError::Extract(_)));
        assert!(!tmp.path().join("meeting_outputs").exists());
    }
}
