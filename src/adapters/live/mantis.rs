//! Live adapter for the `IssueTracker` port using the Mantis REST API.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;

use crate::config::TrackerSite;
use crate::error::TrackerError;
use crate::ports::{Issue, IssueTracker};
use crate::ticket::TicketId;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Talks to a Mantis installation over its REST API.
///
/// The port is blocking, so requests are driven on a private
/// current-thread runtime.
pub struct MantisTracker {
    client: Client,
    runtime: Runtime,
    base_url: String,
    token: Option<String>,
}

impl MantisTracker {
    /// Creates a tracker client for `site`, reading its token from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or runtime cannot be built.
    pub fn new(site: &TrackerSite) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| format!("Failed to start tracker runtime: {e}"))?;
        Ok(Self {
            client,
            runtime,
            base_url: site.url.trim_end_matches('/').to_string(),
            token: site.token(),
        })
    }

    fn issue_url(&self, id: TicketId) -> String {
        format!("{}/api/rest/issues/{id}", self.base_url)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.header("Authorization", token),
            None => request,
        }
    }
}

/// Response body of `GET /api/rest/issues/{id}`.
#[derive(Deserialize)]
struct IssuesResponse {
    issues: Vec<MantisIssue>,
}

#[derive(Deserialize)]
struct MantisIssue {
    id: u32,
    summary: String,
    #[serde(default)]
    status: Option<NamedRef>,
}

#[derive(Serialize, Deserialize)]
struct NamedRef {
    name: String,
}

/// Request body of `POST /api/rest/issues/{id}/notes`.
#[derive(Serialize)]
struct NoteRequest<'a> {
    text: &'a str,
    view_state: NamedRef,
}

fn parse_issue(id: TicketId, body: &str) -> Result<Issue, TrackerError> {
    let response: IssuesResponse = serde_json::from_str(body)
        .map_err(|e| TrackerError::Unreachable(format!("unexpected response for #{id}: {e}")))?;
    let issue = response
        .issues
        .into_iter()
        .find(|issue| issue.id == id.get())
        .ok_or(TrackerError::NotFound(id))?;
    Ok(Issue { id, summary: issue.summary, status: issue.status.map(|s| s.name) })
}

fn view_state(private: bool) -> NamedRef {
    NamedRef { name: if private { "private" } else { "public" }.to_string() }
}

fn unreachable(e: &reqwest::Error) -> TrackerError {
    TrackerError::Unreachable(e.to_string())
}

impl IssueTracker for MantisTracker {
    fn get_issue(&self, id: TicketId) -> Result<Issue, TrackerError> {
        self.runtime.block_on(async {
            let response = self
                .authorized(self.client.get(self.issue_url(id)))
                .send()
                .await
                .map_err(|e| unreachable(&e))?;
            let status = response.status();
            if status == StatusCode::NOT_FOUND {
                return Err(TrackerError::NotFound(id));
            }
            let body = response.text().await.map_err(|e| unreachable(&e))?;
            if !status.is_success() {
                return Err(TrackerError::Unreachable(format!("HTTP {}: {body}", status.as_u16())));
            }
            parse_issue(id, &body)
        })
    }

    fn update_issue(&self, id: TicketId, note: &str, private: bool) -> Result<(), TrackerError> {
        let request = NoteRequest { text: note, view_state: view_state(private) };
        self.runtime.block_on(async {
            let response = self
                .authorized(self.client.post(format!("{}/notes", self.issue_url(id))))
                .json(&request)
                .send()
                .await
                .map_err(|e| unreachable(&e))?;
            let status = response.status();
            if status.is_success() {
                return Ok(());
            }
            if status == StatusCode::NOT_FOUND {
                return Err(TrackerError::NotFound(id));
            }
            let body = response.text().await.unwrap_or_default();
            if status.is_server_error() {
                return Err(TrackerError::Unreachable(format!("HTTP {}: {body}", status.as_u16())));
            }
            Err(TrackerError::Rejected { id, reason: format!("HTTP {}: {body}", status.as_u16()) })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u32) -> TicketId {
        TicketId::new(raw).unwrap()
    }

    #[test]
    fn parses_issue_with_status() {
        let body = r#"{"issues":[{"id":42,"summary":"Crash on save","status":{"name":"assigned"}}]}"#;
        let issue = parse_issue(id(42), body).unwrap();
        assert_eq!(issue.summary, "Crash on save");
        assert_eq!(issue.status.as_deref(), Some("assigned"));
    }

    #[test]
    fn empty_issue_list_is_not_found() {
        assert_eq!(parse_issue(id(7), r#"{"issues":[]}"#), Err(TrackerError::NotFound(id(7))));
    }

    #[test]
    fn garbage_body_is_unreachable() {
        let err = parse_issue(id(7), "<html>login</html>").unwrap_err();
        assert!(matches!(err, TrackerError::Unreachable(_)));
    }

    #[test]
    fn note_request_carries_view_state() {
        let body = serde_json::to_value(NoteRequest { text: "hi", view_state: view_state(true) }).unwrap();
        assert_eq!(body["view_state"]["name"], "private");
        assert_eq!(body["text"], "hi");
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        let site = TrackerSite { url: "https://mantis.example.org/".into(), token_env: "UNSET_TOKEN_VAR".into() };
        let tracker = MantisTracker::new(&site).unwrap();
        assert_eq!(tracker.issue_url(id(5)), "https://mantis.example.org/api/rest/issues/5");
        assert!(tracker.token.is_none());
    }

    #[test]
    fn unreachable_host_is_reported_as_unreachable() {
        let site = TrackerSite { url: "http://127.0.0.1:1".into(), token_env: "UNSET_TOKEN_VAR".into() };
        let tracker = MantisTracker::new(&site).unwrap();
        let err = tracker.get_issue(id(1)).unwrap_err();
        assert!(matches!(err, TrackerError::Unreachable(_)));
    }
}
