//! Interface de terminal do meeting-brief: spinner e saída colorida.
//!
//! Usa `indicatif` para o spinner de progresso e `console` para as cores.
//! O [`JobProgress`] acompanha as fases do job remoto enquanto ele roda.

use std::time::Duration;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::pipeline::BriefOutcome;
use crate::state_machine::JobPhase;

/// Indicador visual de progresso de uma execução.
pub struct JobProgress {
    pb: ProgressBar,
    green: Style,
    yellow: Style,
    red: Style,
}

impl JobProgress {
    /// Inicia o spinner com a descrição da transcrição.
    pub fn start(label: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(style);
        pb.set_message(format!("Preparing brief for {label}"));
        pb.enable_steady_tick(Duration::from_millis(100));
        Self::with_bar(pb)
    }

    /// Progresso sem saída, para testes e execuções não interativas.
    pub fn hidden() -> Self {
        Self::with_bar(ProgressBar::hidden())
    }

    fn with_bar(pb: ProgressBar) -> Self {
        Self {
            pb,
            green: Style::new().green().bold(),
            yellow: Style::new().yellow(),
            red: Style::new().red().bold(),
        }
    }

    /// Atualiza a mensagem do spinner para a fase atual do job.
    pub fn phase(&self, phase: &JobPhase) {
        let msg = match phase {
            JobPhase::Submit => "Launching Cursor agent".to_string(),
            JobPhase::Polling => "Waiting for Cursor agent".to_string(),
            JobPhase::Terminal(status) => format!("Agent finished with {status}"),
            JobPhase::ResultReady => "Agent summary received".to_string(),
            other => {
                self.pb
                    .println(format!("  {} Agent job ended in {other}", self.yellow.apply_to("!")));
                return;
            }
        };
        self.pb.set_message(msg);
    }

    /// Finaliza o spinner e mostra onde o brief foi escrito.
    pub fn finish(&self, outcome: &BriefOutcome) {
        self.pb.finish_and_clear();
        let path = outcome.output_path.display();
        match (&outcome.job_id, outcome.used_fallback) {
            (Some(id), false) => {
                println!("  {} Brief written to {path} (agent {id})", self.green.apply_to("✓"));
            }
            (Some(id), true) => {
                println!(
                    "  {} Fallback brief written to {path} (agent {id} produced no result)",
                    self.yellow.apply_to("↻")
                );
            }
            (None, _) => {
                println!(
                    "  {} Fallback brief written to {path}",
                    self.yellow.apply_to("↻")
                );
            }
        }
    }

    /// Finaliza o spinner com uma mensagem de erro.
    pub fn fail(&self, message: &str) {
        self.pb.finish_and_clear();
        eprintln!("  {} {message}", self.red.apply_to("✗"));
    }
}
