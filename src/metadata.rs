//! Meeting metadata and output slugs derived from the transcript file name.

use std::path::Path;
use std::sync::LazyLock;

use chrono::Local;
use regex::Regex;
use serde::Serialize;

static DATE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})").expect("valid date regex"));

static NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("valid slug regex"));

/// Title and date of a meeting, plus who attended if the caller knows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub title: String,
    /// ISO-8601 calendar date.
    pub date: String,
    pub stakeholders: Option<String>,
}

impl Metadata {
    /// Derive metadata from the transcript path. Overrides win; otherwise the
    /// title comes from the file stem and the date from a `YYYY-MM-DD` name
    /// prefix, falling back to today.
    pub fn infer(
        path: &Path,
        title: Option<&str>,
        date: Option<&str>,
        stakeholders: Option<&str>,
    ) -> Self {
        let title = non_blank(title)
            .map(str::to_string)
            .unwrap_or_else(|| title_from_stem(&file_stem(path)));

        let date = non_blank(date)
            .map(str::to_string)
            .or_else(|| date_prefix(path))
            .unwrap_or_else(|| Local::now().date_naive().to_string());

        Self {
            title,
            date,
            stakeholders: non_blank(stakeholders).map(str::to_string),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn date_prefix(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    DATE_PREFIX
        .captures(&name)
        .map(|caps| caps[1].to_string())
}

/// `weekly-arch_sync` → `Weekly Arch Sync`. Each alphabetic run starts
/// upper-case and continues lower-case.
fn title_from_stem(stem: &str) -> String {
    let spaced = stem.replace(['-', '_'], " ");
    let mut out = String::with_capacity(spaced.len());
    let mut prev_alpha = false;
    for c in spaced.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// File-name-safe slug: runs of non-alphanumerics become `-`.
pub fn slugify(text: &str) -> String {
    let slug = NON_ALNUM.replace_all(text, "-");
    let slug = slug.trim_matches('-').to_lowercase();
    if slug.is_empty() {
        "meeting".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_and_date_from_file_name() {
        let meta = Metadata::infer(
            Path::new("meeting_transcripts/2024-03-18-payments_REVIEW.md"),
            None,
            None,
            None,
        );
        assert_eq!(meta.title, "2024 03 18 Payments Review");
        assert_eq!(meta.date, "2024-03-18");
        assert_eq!(meta.stakeholders, None);
    }

    #[test]
    fn overrides_take_precedence() {
        let meta = Metadata::infer(
            Path::new("2024-03-18-sync.md"),
            Some("Payments Deep Dive"),
            Some("2024-04-01"),
            Some("CTO, Payments lead"),
        );
        assert_eq!(meta.title, "Payments Deep Dive");
        assert_eq!(meta.date, "2024-04-01");
        assert_eq!(meta.stakeholders.as_deref(), Some("CTO, Payments lead"));
    }

    #[test]
    fn blank_overrides_are_ignored() {
        let meta = Metadata::infer(Path::new("kickoff.txt"), Some("  "), Some(""), Some(" "));
        assert_eq!(meta.title, "Kickoff");
        assert_eq!(meta.stakeholders, None);
    }

    #[test]
    fn date_defaults_to_today() {
        let meta = Metadata::infer(Path::new("kickoff.txt"), None, None, None);
        assert_eq!(meta.date, Local::now().date_naive().to_string());
    }

    #[test]
    fn date_prefix_must_lead_the_name() {
        let meta = Metadata::infer(Path::new("notes-2024-03-18.md"), None, Some("2025-01-02"), None);
        assert_eq!(meta.date, "2025-01-02");
        assert_eq!(date_prefix(Path::new("notes-2024-03-18.md")), None);
    }

    #[test]
    fn title_case_matches_word_boundaries() {
        assert_eq!(title_from_stem("api_GATEWAY-v2review"), "Api Gateway V2Review");
        assert_eq!(title_from_stem(""), "");
    }

    #[test]
    fn slugify_collapses_and_trims() {
        assert_eq!(slugify("2024-03-18 Payments/Review!!"), "2024-03-18-payments-review");
        assert_eq!(slugify("--Hello__World--"), "hello-world");
        assert_eq!(slugify("***"), "meeting");
        assert_eq!(slugify(""), "meeting");
    }
}
