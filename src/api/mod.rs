mod subscription;

use crate::gateway::{ChangeKind, NoteGateway, NoteStream};
use crate::logging::default_log_level;
use crate::models::Note;
use crate::storage::TOKEN_KEY;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiErrorKind {
    Unauthorized,
    Network,
    Http,
    Parse,
    Subscription,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    pub(crate) fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    fn unauthorized() -> Self {
        Self {
            kind: ApiErrorKind::Unauthorized,
            message: "Unauthorized".to_string(),
        }
    }

    fn http(status: reqwest::StatusCode, body: String, ctx: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({status}): {body}"),
        }
    }

    pub(crate) fn subscription(kind: ChangeKind, detail: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Subscription,
            message: format!("Failed to open {kind} feed: {detail}"),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Clone, Debug)]
pub struct EnvConfig {
    pub api_url: String,
    pub log_level: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        let mut config = Self {
            api_url: "http://localhost:6689".to_string(),
            log_level: default_log_level().to_string(),
        };

        // We support BOTH `window.ENV.API_URL` (documented in README) and
        // `window.ENV.api_url` (legacy) for compatibility.
        let Some(env) = web_sys::window()
            .and_then(|w| w.get("ENV"))
            .filter(|env| !env.is_undefined() && env.is_object())
        else {
            return config;
        };

        let read = |key: &str| {
            js_sys::Reflect::get(&env, &key.into())
                .ok()
                .and_then(|v| v.as_string())
                .filter(|s| !s.trim().is_empty())
        };

        if let Some(api_url) = read("API_URL").or_else(|| read("api_url")) {
            config.api_url = api_url;
        }
        if let Some(level) = read("LOG_LEVEL") {
            config.log_level = level;
        }

        config
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct ListNotesRequest {
    pub owner: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct CreateNoteRequest {
    #[serde(rename = "note")]
    pub text: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct UpdateNoteRequest {
    pub id: String,
    #[serde(rename = "note")]
    pub text: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct DeleteNoteRequest {
    pub id: String,
}

#[derive(Clone)]
pub struct ApiClient {
    pub(crate) base_url: String,
    pub(crate) token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            token: None,
        }
    }

    pub fn load_from_storage(config: &EnvConfig) -> Self {
        let token = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|s| s.get_item(TOKEN_KEY).ok().flatten());

        Self {
            base_url: config.api_url.clone(),
            token,
        }
    }

    fn get_auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {t}"))
    }

    pub(crate) fn subscribe_url(&self, kind: ChangeKind, owner: &str) -> String {
        format!(
            "{}/notes/subscribe/{}?owner={}",
            self.base_url,
            kind,
            urlencoding::encode(owner)
        )
    }

    async fn request_api<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &impl serde::Serialize,
    ) -> ApiResult<T> {
        let client = reqwest::Client::new();
        let url = format!("{}{}", self.base_url, path);
        let mut req = client.post(url).json(body);
        if let Some(header) = self.get_auth_header() {
            req = req.header("Authorization", header);
        }

        let res = req.send().await.map_err(ApiError::network)?;

        if res.status().is_success() {
            res.json().await.map_err(ApiError::parse)
        } else if res.status().as_u16() == 401 {
            Err(ApiError::unauthorized())
        } else {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::http(status, body, &format!("Request {path} failed")))
        }
    }

    /// The list endpoint wraps notes in `items`; entries without an id are
    /// dropped because the store never holds notes the backend did not create.
    pub(crate) fn parse_note_list_response(data: serde_json::Value) -> Vec<Note> {
        let list = data
            .get("items")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();

        list.into_iter()
            .filter_map(|item| serde_json::from_value::<Note>(item).ok())
            .filter(Note::is_remote)
            .collect()
    }
}

/// Reads a note, or a bare id string, which the backend sends for deletes.
pub(crate) fn parse_note_value(data: serde_json::Value) -> serde_json::Result<Note> {
    match data {
        serde_json::Value::String(id) => Ok(Note::new(id, "")),
        other => serde_json::from_value(other),
    }
}

#[async_trait(?Send)]
impl NoteGateway for ApiClient {
    async fn fetch_all(&self, owner: &str) -> ApiResult<Vec<Note>> {
        let data: serde_json::Value = self
            .request_api(
                "/notes/list",
                &ListNotesRequest {
                    owner: owner.to_string(),
                },
            )
            .await?;
        Ok(Self::parse_note_list_response(data))
    }

    async fn create(&self, text: &str) -> ApiResult<Note> {
        let note: Note = self
            .request_api(
                "/notes/create",
                &CreateNoteRequest {
                    text: text.to_string(),
                },
            )
            .await?;

        if !note.is_remote() {
            return Err(ApiError::parse("Create note succeeded but response is missing note id"));
        }
        Ok(note)
    }

    async fn update(&self, id: &str, text: &str) -> ApiResult<Note> {
        self.request_api(
            "/notes/update",
            &UpdateNoteRequest {
                id: id.to_string(),
                text: text.to_string(),
            },
        )
        .await
    }

    async fn delete(&self, id: &str) -> ApiResult<Note> {
        let data: serde_json::Value = self
            .request_api("/notes/delete", &DeleteNoteRequest { id: id.to_string() })
            .await?;
        parse_note_value(data).map_err(ApiError::parse)
    }

    async fn subscribe(&self, kind: ChangeKind, owner: &str) -> ApiResult<NoteStream> {
        subscription::open(kind, &self.subscribe_url(kind, owner))
    }
}
