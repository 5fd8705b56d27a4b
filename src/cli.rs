//! Interface de linha de comando do meeting-brief baseada em clap.
//!
//! Define a struct [`Cli`] com os subcomandos [`Command`] (run, changed)
//! e as flags globais (--config, --verbose).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::BriefConfig;
use crate::pipeline::BriefRequest;

/// Turns meeting transcripts into architecture briefs via a Cursor agent.
#[derive(Debug, Parser)]
#[command(name = "meeting-brief", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Caminho do arquivo de configuração (padrão: ./meeting-brief.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Gera o brief de uma transcrição.
    Run(RunArgs),

    /// Lista transcrições alteradas entre dois commits.
    Changed {
        /// Commit base (all zeros for the first push).
        base: String,

        /// Commit final.
        head: String,

        /// Diretórios de transcrições; substitui `transcript_roots` da configuração.
        #[arg(long, num_args = 1..)]
        roots: Vec<String>,
    },
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Arquivo da transcrição (.md, .txt, .docx, .pdf, .gdoc).
    #[arg(long)]
    pub transcript: PathBuf,

    /// Caminho do brief gerado (padrão: <output_dir>/<slug>.md).
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Título da reunião; por padrão derivado do nome do arquivo.
    #[arg(long)]
    pub meeting_title: Option<String>,

    /// Data da reunião (YYYY-MM-DD).
    #[arg(long)]
    pub meeting_date: Option<String>,

    /// Participantes, em texto livre.
    #[arg(long)]
    pub stakeholders: Option<String>,

    /// Slug do arquivo de saída.
    #[arg(long)]
    pub slug: Option<String>,

    /// Tempo máximo de espera pelo agente, em segundos.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Intervalo entre consultas de status, em segundos.
    #[arg(long)]
    pub poll_interval: Option<u64>,

    /// Branch que o agente deve usar no repositório alvo.
    #[arg(long)]
    pub branch_name: Option<String>,

    /// Falha quando CURSOR_API_KEY não está definida.
    #[arg(long, default_value_t = false)]
    pub require_credential: bool,
}

impl RunArgs {
    /// Aplica as flags que sobrescrevem a configuração.
    pub fn apply_to(&self, config: &mut BriefConfig) {
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(interval) = self.poll_interval {
            config.poll_interval_secs = interval;
        }
        if self.require_credential {
            config.require_credential = true;
        }
    }

    pub fn request(&self) -> BriefRequest {
        BriefRequest {
            output: self.output.clone(),
            title: self.meeting_title.clone(),
            date: self.meeting_date.clone(),
            stakeholders: self.stakeholders.clone(),
            slug: self.slug.clone(),
            branch_name: self.branch_name.clone(),
            ..BriefRequest::new(&self.transcript)
        }
    }
}
