//! Wire types for the Cursor background-agent API.
//!
//! Field names follow the API's camelCase JSON; unknown fields are ignored
//! so that additions on the server side never break polling.

use serde::{Deserialize, Serialize};

use crate::state_machine::JobStatus;

/// Message `type` that marks agent-authored conversation entries.
pub const ASSISTANT_MESSAGE: &str = "assistant_message";

/// Body of `POST /agents`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchRequest {
    pub prompt: PromptBody,
    pub source: SourceRepo,
    pub target: Target,
}

impl LaunchRequest {
    pub fn new(prompt: String, repository: &str, git_ref: &str, branch_name: Option<&str>) -> Self {
        Self {
            prompt: PromptBody { text: prompt },
            source: SourceRepo {
                repository: repository.to_string(),
                git_ref: git_ref.to_string(),
            },
            target: Target {
                auto_create_pr: false,
                branch_name: branch_name.map(str::to_string),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptBody {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRepo {
    pub repository: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub auto_create_pr: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
}

/// Response of `POST /agents`.
#[derive(Debug, Clone, Deserialize)]
pub struct LaunchResponse {
    #[serde(default)]
    pub id: Option<String>,
}

/// Response of `GET /agents/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: Option<JobStatus>,
}

/// Response of `GET /agents/{id}/conversation`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Conversation {
    #[serde(default)]
    pub messages: Vec<ConversationMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConversationMessage {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub text: String,
}

impl Conversation {
    /// The most recent non-empty assistant message, trimmed.
    pub fn latest_assistant_text(&self) -> Option<String> {
        self.messages
            .iter()
            .rev()
            .filter(|m| m.kind == ASSISTANT_MESSAGE)
            .map(|m| m.text.trim())
            .find(|text| !text.is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_request_matches_api_shape() {
        let req = LaunchRequest::new("Summarize".into(), "https://github.com/acme/arch", "main", Some("briefs/sync"));
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "prompt": {"text": "Summarize"},
                "source": {"repository": "https://github.com/acme/arch", "ref": "main"},
                "target": {"autoCreatePr": false, "branchName": "briefs/sync"}
            })
        );
    }

    #[test]
    fn branch_name_is_omitted_when_absent() {
        let req = LaunchRequest::new("p".into(), "r", "main", None);
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("branchName"));
        assert!(json.contains(r#""autoCreatePr":false"#));
    }

    #[test]
    fn status_parses_known_and_unknown_values() {
        let resp: StatusResponse = serde_json::from_str(r#"{"status":"RUNNING","id":"bc-1"}"#).unwrap();
        assert_eq!(resp.status, Some(JobStatus::Running));

        let resp: StatusResponse = serde_json::from_str(r#"{"status":"CREATING"}"#).unwrap();
        assert_eq!(resp.status, Some(JobStatus::Unknown));

        let resp: StatusResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(resp.status, None);
    }

    #[test]
    fn latest_assistant_text_scans_newest_first() {
        let conv: Conversation = serde_json::from_str(
            r#"{"messages":[
                {"type":"user_message","text":"go"},
                {"type":"assistant_message","text":"first draft"},
                {"type":"assistant_message","text":"  final brief \n"},
                {"type":"assistant_message","text":"   "},
                {"type":"user_message","text":"thanks"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(conv.latest_assistant_text().as_deref(), Some("final brief"));
    }

    #[test]
    fn no_assistant_text_is_none() {
        let conv: Conversation =
            serde_json::from_str(r#"{"messages":[{"type":"user_message","text":"hi"},{"type":"assistant_message"}]}"#)
                .unwrap();
        assert_eq!(conv.latest_assistant_text(), None);

        let conv: Conversation = serde_json::from_str("{}").unwrap();
        assert_eq!(conv.latest_assistant_text(), None);
    }
}
