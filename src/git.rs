//! Integração com Git via libgit2 para descobrir transcrições alteradas.
//!
//! O [`TranscriptScanner`] compara duas árvores de commits e devolve os
//! arquivos de transcrição adicionados ou modificados entre elas.

use std::path::Path;

use git2::{Delta, DiffOptions, ObjectType, Repository, Tree, TreeWalkMode, TreeWalkResult};

use crate::error::BriefError;

/// Extensões tratadas como transcrições.
pub const TRANSCRIPT_EXTENSIONS: [&str; 5] = ["gdoc", "docx", "md", "txt", "pdf"];

/// Descobre transcrições alteradas em um repositório existente.
pub struct TranscriptScanner {
    repo: Repository,
}

impl TranscriptScanner {
    /// Abre o repositório que contém `path`.
    pub fn open(path: &Path) -> Result<Self, BriefError> {
        let repo = Repository::discover(path)?;
        Ok(Self { repo })
    }

    /// Caminhos alterados entre `base` e `head`, sem arquivos removidos.
    ///
    /// Um `base` formado só por zeros (primeiro push) lista todos os
    /// arquivos da árvore de `head`.
    pub fn changed_files(&self, base: &str, head: &str) -> Result<Vec<String>, BriefError> {
        let head_tree = self.tree(head)?;

        if is_null_revision(base) {
            let mut files = Vec::new();
            head_tree.walk(TreeWalkMode::PreOrder, |dir, entry| {
                if entry.kind() == Some(ObjectType::Blob)
                    && let Some(name) = entry.name()
                {
                    files.push(format!("{dir}{name}"));
                }
                TreeWalkResult::Ok
            })?;
            return Ok(files);
        }

        let base_tree = self.tree(base)?;
        let mut opts = DiffOptions::new();
        let diff = self
            .repo
            .diff_tree_to_tree(Some(&base_tree), Some(&head_tree), Some(&mut opts))?;

        let files = diff
            .deltas()
            .filter(|delta| delta.status() != Delta::Deleted)
            .filter_map(|delta| delta.new_file().path().map(|p| p.to_string_lossy().into_owned()))
            .collect();
        Ok(files)
    }

    /// Transcrições alteradas entre dois commits, filtradas por `roots`.
    pub fn changed_transcripts(
        &self,
        base: &str,
        head: &str,
        roots: &[String],
    ) -> Result<Vec<String>, BriefError> {
        let files = self.changed_files(base, head)?;
        Ok(filter_transcripts(files, roots))
    }

    fn tree(&self, rev: &str) -> Result<Tree<'_>, BriefError> {
        Ok(self.repo.revparse_single(rev)?.peel_to_tree()?)
    }
}

fn is_null_revision(rev: &str) -> bool {
    !rev.is_empty() && rev.chars().all(|c| c == '0')
}

/// Mantém apenas arquivos de transcrição sob um dos `roots`.
/// Uma lista vazia de raízes desativa o filtro de diretório.
pub fn filter_transcripts(files: Vec<String>, roots: &[String]) -> Vec<String> {
    files
        .into_iter()
        .filter(|file| {
            roots.is_empty()
                || roots.iter().any(|root| {
                    let root = root.trim_end_matches('/');
                    file.starts_with(&format!("{root}/"))
                })
        })
        .filter(|file| {
            Path::new(file)
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    TRANSCRIPT_EXTENSIONS
                        .iter()
                        .any(|known| ext.eq_ignore_ascii_case(known))
                })
        })
        .collect()
}
