//! services/client/src/adapters/http.rs
//!
//! This module contains the HTTP adapter, the concrete implementation of the
//! backend ports from the `core` crate. It talks JSON over `reqwest` with a cookie
//! store so the session cookie set by `/api/login` rides along on later calls.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use portfolio_core::chat_text::normalize_content;
use portfolio_core::domain::{
    ChatListing, ChatMessage, ContactForm, Credentials, Project, ProjectDraft, ProjectPatch, RunId,
    RunStatus, Sender, ThreadId, User, WorkExperience,
};
use portfolio_core::ports::{
    AuthService, ChatService, ContactService, ExperienceService, PortError, PortResult,
    ProjectService,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements every backend port over HTTP.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
    api_base_url: String,
    chat_base_url: String,
}

impl HttpBackend {
    /// Creates a new `HttpBackend` with its own cookie-bearing client.
    pub fn new(
        api_base_url: impl Into<String>,
        chat_base_url: impl Into<String>,
        timeout: Duration,
    ) -> PortResult<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .user_agent("portfolio-client")
            .build()
            .map_err(|e| PortError::Unexpected(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            chat_base_url: chat_base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn api(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }

    fn chat(&self, path: &str) -> String {
        format!("{}/{}", self.chat_base_url, path.trim_start_matches('/'))
    }

    async fn send(&self, request: RequestBuilder) -> PortResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| PortError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!("Backend answered {} with body '{}'", status, body);
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PortError::Unauthorized,
            StatusCode::NOT_FOUND => PortError::NotFound(body),
            _ => PortError::Status {
                status: status.as_u16(),
                body,
            },
        })
    }

    async fn request_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> PortResult<T> {
        let response = self.send(request).await?;
        let body = response
            .text()
            .await
            .map_err(|e| PortError::Transport(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| PortError::Malformed(e.to_string()))
    }

    async fn request_status_only(&self, request: RequestBuilder) -> PortResult<()> {
        self.send(request).await.map(|_| ())
    }
}

//=========================================================================================
// "Impure" Wire Record Structs
//=========================================================================================

#[derive(Deserialize)]
struct UserRecord {
    id: Value,
    email: String,
    #[serde(default)]
    isadmin: bool,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            id: id_text(&self.id),
            email: self.email,
            is_admin: self.isadmin,
        }
    }
}

#[derive(Deserialize)]
struct ProjectRecord {
    id: i64,
    name: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    images: Option<Vec<String>>,
    #[serde(default)]
    rank: Option<i64>,
    #[serde(default)]
    year: Option<i32>,
    #[serde(default)]
    languages: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    github: Option<String>,
    #[serde(default)]
    complexity: Option<Value>,
}
impl ProjectRecord {
    fn to_domain(self) -> Project {
        Project {
            id: self.id,
            name: self.name,
            kind: self.kind,
            description: self.description,
            year: self.year,
            languages: self.languages,
            github: self.github,
            image: self.image.unwrap_or_default(),
            images: self.images.unwrap_or_default(),
            complexity: self.complexity.as_ref().and_then(scalar_text),
            rank: self.rank,
        }
    }
}

/// Outgoing project fields. The backend reads the rank from `complexity`.
#[derive(Serialize)]
struct ProjectWriteRecord<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    languages: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    github: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    images: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    complexity: Option<String>,
}
impl<'a> ProjectWriteRecord<'a> {
    fn from_draft(draft: &'a ProjectDraft) -> Self {
        Self {
            name: Some(draft.name.as_str()),
            kind: Some(draft.kind.as_str()),
            description: Some(draft.description.as_str()),
            year: Some(draft.year),
            languages: Some(draft.languages.as_str()),
            github: Some(draft.github.as_str()),
            image: Some(draft.image.as_str()),
            images: Some(draft.images.as_slice()),
            complexity: Some(draft.rank.to_string()),
        }
    }

    fn from_patch(patch: &'a ProjectPatch) -> Self {
        Self {
            name: patch.name.as_deref(),
            kind: patch.kind.as_deref(),
            description: patch.description.as_deref(),
            year: patch.year,
            languages: patch.languages.as_deref(),
            github: patch.github.as_deref(),
            image: patch.image.as_deref(),
            images: patch.images.as_deref(),
            complexity: patch.rank.map(|rank| rank.to_string()),
        }
    }
}

#[derive(Deserialize)]
struct WorkExperienceRecord {
    id: Value,
    title: String,
    company: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    date_range: String,
    #[serde(default)]
    details: Vec<String>,
}
impl WorkExperienceRecord {
    fn to_domain(self) -> WorkExperience {
        WorkExperience {
            id: id_text(&self.id),
            title: self.title,
            company: self.company,
            location: self.location,
            date_range: self.date_range,
            details: self.details,
        }
    }
}

#[derive(Serialize)]
struct CredentialsBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct ContactBody<'a> {
    name: &'a str,
    email: &'a str,
    message: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewThreadResponse {
    thread_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendBody<'a> {
    thread_id: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendResponse {
    run_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListBody<'a> {
    thread_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    run_id: Option<&'a str>,
}

#[derive(Deserialize)]
struct ListResponse {
    #[serde(default)]
    messages: Vec<ChatMessageRecord>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Deserialize)]
struct ChatMessageRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    content: Value,
    #[serde(default)]
    role: String,
    #[serde(default)]
    created_at: Option<Value>,
}
impl ChatMessageRecord {
    /// `position` is the index in the oldest-first transcript, used when the backend
    /// sends no id.
    fn to_domain(self, position: usize) -> ChatMessage {
        ChatMessage {
            id: self
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| position.to_string()),
            text: normalize_content(&self.content),
            sender: if self.role == "user" {
                Sender::Visitor
            } else {
                Sender::Assistant
            },
            timestamp: self
                .created_at
                .as_ref()
                .and_then(parse_timestamp)
                .unwrap_or_else(Utc::now),
        }
    }
}

/// Maps a newest-first listing, keeping that order. Messages without an id are
/// numbered by their place in the oldest-first transcript, so the number stays put
/// as newer messages arrive.
fn listing_messages(records: Vec<ChatMessageRecord>) -> Vec<ChatMessage> {
    let len = records.len();
    records
        .into_iter()
        .enumerate()
        .map(|(newest_first, record)| record.to_domain(len - 1 - newest_first))
        .collect()
}

fn id_text(id: &Value) -> String {
    scalar_text(id).unwrap_or_default()
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Accepts unix seconds or an RFC 3339 string.
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        _ => None,
    }
}

//=========================================================================================
// Port Implementations
//=========================================================================================

#[async_trait]
impl AuthService for HttpBackend {
    async fn current_user(&self) -> PortResult<Option<User>> {
        match self
            .request_json::<UserRecord>(self.client.get(self.api("/api/current-user")))
            .await
        {
            Ok(record) => Ok(Some(record.to_domain())),
            // A non-OK answer just means nobody is signed in.
            Err(PortError::Unauthorized | PortError::NotFound(_) | PortError::Status { .. }) => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn login(&self, credentials: &Credentials) -> PortResult<()> {
        let body = CredentialsBody {
            email: &credentials.email,
            password: &credentials.password,
        };
        self.request_status_only(self.client.post(self.api("/api/login")).json(&body))
            .await
    }

    async fn register(&self, credentials: &Credentials) -> PortResult<()> {
        let body = CredentialsBody {
            email: &credentials.email,
            password: &credentials.password,
        };
        self.request_status_only(self.client.post(self.api("/api/register")).json(&body))
            .await
    }

    async fn logout(&self) -> PortResult<()> {
        self.request_status_only(self.client.post(self.api("/api/logout")))
            .await
    }
}

#[async_trait]
impl ProjectService for HttpBackend {
    async fn list_projects(&self) -> PortResult<Vec<Project>> {
        let records: Vec<ProjectRecord> = self
            .request_json(self.client.get(self.api("/api/projects")))
            .await?;
        Ok(records.into_iter().map(ProjectRecord::to_domain).collect())
    }

    async fn get_project(&self, id: i64) -> PortResult<Project> {
        let record: ProjectRecord = self
            .request_json(self.client.get(self.api(&format!("/api/projects/{id}"))))
            .await?;
        Ok(record.to_domain())
    }

    async fn create_project(&self, draft: &ProjectDraft) -> PortResult<()> {
        let body = ProjectWriteRecord::from_draft(draft);
        self.request_status_only(self.client.post(self.api("/api/projects")).json(&body))
            .await
    }

    async fn update_project(&self, id: i64, patch: &ProjectPatch) -> PortResult<()> {
        let body = ProjectWriteRecord::from_patch(patch);
        self.request_status_only(
            self.client
                .patch(self.api(&format!("/api/projects/{id}")))
                .json(&body),
        )
        .await
    }

    async fn delete_project(&self, id: i64) -> PortResult<()> {
        self.request_status_only(self.client.delete(self.api(&format!("/api/projects/{id}"))))
            .await
    }
}

#[async_trait]
impl ExperienceService for HttpBackend {
    async fn list_work_experiences(&self) -> PortResult<Vec<WorkExperience>> {
        let records: Vec<WorkExperienceRecord> = self
            .request_json(self.client.get(self.api("/api/work-experiences")))
            .await?;
        Ok(records
            .into_iter()
            .map(WorkExperienceRecord::to_domain)
            .collect())
    }
}

#[async_trait]
impl ContactService for HttpBackend {
    async fn send_contact(&self, form: &ContactForm) -> PortResult<()> {
        let body = ContactBody {
            name: &form.name,
            email: &form.email,
            message: &form.message,
        };
        self.request_status_only(self.client.post(self.api("/api/contact")).json(&body))
            .await
    }
}

#[async_trait]
impl ChatService for HttpBackend {
    async fn create_thread(&self) -> PortResult<ThreadId> {
        let response: NewThreadResponse = self
            .request_json(self.client.post(self.chat("/chat/new")))
            .await?;
        Ok(ThreadId(response.thread_id))
    }

    async fn send_message(&self, thread: &ThreadId, text: &str) -> PortResult<RunId> {
        let body = SendBody {
            thread_id: &thread.0,
            text,
        };
        let response: SendResponse = self
            .request_json(self.client.post(self.chat("/chat/send")).json(&body))
            .await?;
        Ok(RunId(response.run_id))
    }

    async fn list_messages(
        &self,
        thread: &ThreadId,
        run: Option<&RunId>,
    ) -> PortResult<ChatListing> {
        let body = ListBody {
            thread_id: &thread.0,
            run_id: run.map(|r| r.0.as_str()),
        };
        let response: ListResponse = self
            .request_json(self.client.post(self.chat("/chat/list")).json(&body))
            .await?;

        Ok(ChatListing {
            messages: listing_messages(response.messages),
            status: response
                .status
                .as_deref()
                .map(RunStatus::from_wire)
                .unwrap_or_else(|| RunStatus::Other(String::new())),
        })
    }
}
