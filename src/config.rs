//! Configuração do meeting-brief carregada a partir de `meeting-brief.toml`.
//!
//! A struct [`BriefConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! As variáveis de ambiente `CURSOR_*` têm precedência sobre o arquivo.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::BriefError;

/// Nome do arquivo procurado no diretório atual.
pub const CONFIG_FILE: &str = "meeting-brief.toml";

/// Configuração de nível superior carregada de `meeting-brief.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct BriefConfig {
    /// Chave da API Cursor. Vazia significa "sem credencial".
    #[serde(default)]
    pub api_key: String,

    /// URL base versionada da API.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Repositório alvo enviado ao agente.
    #[serde(default)]
    pub repository: String,

    /// Ref do repositório alvo.
    #[serde(default = "default_repository_ref")]
    pub repository_ref: String,

    /// Desativa a verificação TLS. Apenas para ambientes controlados.
    #[serde(default)]
    pub skip_tls_verify: bool,

    /// Timeout de cada requisição HTTP, em segundos.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Tempo máximo de espera pelo job, em segundos.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Intervalo entre consultas de status, em segundos.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Diretório de saída quando `--output` não é informado.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Falha a execução quando não há credencial, em vez de usar o fallback.
    #[serde(default)]
    pub require_credential: bool,

    /// Prefixos de diretório onde transcrições são procuradas.
    #[serde(default = "default_transcript_roots")]
    pub transcript_roots: Vec<String>,
}

fn default_api_base() -> String {
    "https://api.cursor.com/v0".to_string()
}

fn default_repository_ref() -> String {
    "main".to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_timeout_secs() -> u64 {
    600
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("meeting_outputs")
}

fn default_transcript_roots() -> Vec<String> {
    ["meeting-notes", "docs/meeting-notes", "transcripts", "meeting_transcripts"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for BriefConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: default_api_base(),
            repository: String::new(),
            repository_ref: default_repository_ref(),
            skip_tls_verify: false,
            request_timeout_secs: default_request_timeout_secs(),
            timeout_secs: default_timeout_secs(),
            poll_interval_secs: default_poll_interval_secs(),
            output_dir: default_output_dir(),
            require_credential: false,
            transcript_roots: default_transcript_roots(),
        }
    }
}

/// Everything [`crate::cursor::CursorClient`] needs, passed explicitly.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub api_key: String,
    pub skip_tls_verify: bool,
    pub request_timeout: Duration,
}

/// Poll cadence and overall deadline for one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub timeout: Duration,
}

impl BriefConfig {
    /// Carrega `path`, ou `meeting-brief.toml` no diretório atual.
    /// Usa valores padrão se o arquivo implícito não existir; um arquivo
    /// passado explicitamente precisa existir.
    pub fn load(path: Option<&Path>) -> Result<Self, BriefError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(CONFIG_FILE).exists() => Self::from_file(Path::new(CONFIG_FILE))?,
            None => Self::default(),
        };
        Ok(config.with_env(|key| std::env::var(key).ok()))
    }

    fn from_file(path: &Path) -> Result<Self, BriefError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| BriefError::Config(format!("cannot read {}: {e}", path.display())))?;
        Ok(toml::from_str::<BriefConfig>(&contents)?)
    }

    /// Aplica as variáveis `CURSOR_*` obtidas por `lookup`.
    /// Variáveis vazias são ignoradas.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(key) = var("CURSOR_API_KEY") {
            self.api_key = key;
        }
        if let Some(base) = var("CURSOR_API_BASE") {
            self.api_base = base;
        }
        if let Some(repo) = var("CURSOR_REPOSITORY") {
            self.repository = repo;
        }
        if let Some(git_ref) = var("CURSOR_REPOSITORY_REF") {
            self.repository_ref = git_ref;
        }
        if let Some(skip) = var("CURSOR_SKIP_SSL_VERIFY") {
            self.skip_tls_verify = skip == "1";
        }
        self
    }

    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.api_base.clone(),
            api_key: self.api_key.clone(),
            skip_tls_verify: self.skip_tls_verify,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: Duration::from_secs(self.poll_interval_secs),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}
