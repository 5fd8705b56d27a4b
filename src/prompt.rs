//! Instruction prompt sent to the remote agent.

use crate::metadata::Metadata;

/// Sections the generated brief must contain, in order.
pub const REQUIRED_SECTIONS: [&str; 9] = [
    "Summary",
    "Business Requirements",
    "Technical Requirements",
    "Architecture / Integration Notes",
    "Action Items",
    "Next Steps & Upcoming Sessions",
    "Mermaid Diagrams",
    "Risks & Open Questions",
    "Appendix",
];

const ROLE: &str = "You are a principal solutions architect. Analyse the following meeting transcript\n\
and produce a single markdown document tailored for architecture planning.";

const INSTRUCTIONS: &str = "\
- Summarize the meeting context and key decisions.
- List business requirements, technical requirements, constraints, and assumptions.
- Capture action items with owners and due dates if available.
- Recommend next sessions/workshops with target attendees and agenda bullets.
- If business/customer flows were discussed, provide a Mermaid flowchart or sequence diagram.
- If solution or integration designs were discussed, provide a Mermaid sequence/class diagram describing system interactions.";

const CLOSING: &str = "\
- Respond with the full markdown document in a single message. Do not reference separate files or attachments.
- Keep the output professional and suitable for handoff to implementation teams.";

/// Renders the agent prompt. The transcript is embedded verbatim between
/// `---` fences at the end.
pub fn build_prompt(metadata: &Metadata, stakeholders: Option<&str>, transcript: &str) -> String {
    let stakeholders = stakeholders
        .or(metadata.stakeholders.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("Not specified");
    let sections = REQUIRED_SECTIONS.join(", ");

    format!(
        "{ROLE}\n\
         \n\
         Meeting title: {title}\n\
         Meeting date: {date}\n\
         Stakeholders: {stakeholders}\n\
         \n\
         Requirements:\n\
         {INSTRUCTIONS}\n\
         - Include sections: {sections}.\n\
         {CLOSING}\n\
         \n\
         Transcript:\n\
         ---\n\
         {transcript}\n\
         ---",
        title = metadata.title,
        date = metadata.date,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(title: &str, date: &str) -> Metadata {
        Metadata {
            title: title.into(),
            date: date.into(),
            stakeholders: None,
        }
    }

    #[test]
    fn prompt_contains_metadata_sections_and_transcript() {
        let prompt = build_prompt(&meta("Payments Sync", "2024-03-18"), Some("CTO"), "Alice: hi\n  Bob: hey");
        assert!(prompt.starts_with("You are a principal solutions architect."));
        assert!(prompt.contains("Meeting title: Payments Sync\n"));
        assert!(prompt.contains("Meeting date: 2024-03-18\n"));
        assert!(prompt.contains("Stakeholders: CTO\n"));
        for section in REQUIRED_SECTIONS {
            assert!(prompt.contains(section), "missing section {section}");
        }
        assert!(prompt.ends_with("Transcript:\n---\nAlice: hi\n  Bob: hey\n---"));
    }

    #[test]
    fn stakeholders_default_to_not_specified() {
        let prompt = build_prompt(&meta("T", "2024-01-01"), None, "x");
        assert!(prompt.contains("Stakeholders: Not specified\n"));

        let prompt = build_prompt(&meta("T", "2024-01-01"), Some("   "), "x");
        assert!(prompt.contains("Stakeholders: Not specified\n"));
    }

    #[test]
    fn stakeholders_fall_back_to_metadata() {
        let mut m = meta("T", "2024-01-01");
        m.stakeholders = Some("Data team".into());
        let prompt = build_prompt(&m, None, "x");
        assert!(prompt.contains("Stakeholders: Data team\n"));
    }

    #[test]
    fn prompt_is_deterministic_and_input_sensitive() {
        let a = build_prompt(&meta("A", "2024-01-01"), None, "same text");
        assert_eq!(a, build_prompt(&meta("A", "2024-01-01"), None, "same text"));
        assert_ne!(a, build_prompt(&meta("B", "2024-01-01"), None, "same text"));
        assert_ne!(a, build_prompt(&meta("A", "2024-01-02"), None, "same text"));
        assert_ne!(a, build_prompt(&meta("A", "2024-01-01"), None, "other text"));
    }

    #[test]
    fn instruction_lines_are_not_indented() {
        let prompt = build_prompt(&meta("T", "2024-01-01"), None, "x");
        assert!(prompt.contains("\nRequirements:\n- Summarize the meeting context"));
        assert!(prompt.contains("\n- Include sections: Summary, Business Requirements,"));
    }
}
