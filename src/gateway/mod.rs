//! Remote data gateway contract.
//!
//! The note store only talks to the backend through [`NoteGateway`]. Every
//! call is scoped to the signed-in owner by the backend; push feeds are
//! scoped explicitly by the `owner` passed to [`NoteGateway::subscribe`].

use crate::api::ApiResult;
use crate::models::Note;
use async_trait::async_trait;
use futures::stream::LocalBoxStream;

/// One long-lived inbound feed of pushed notes.
pub type NoteStream = LocalBoxStream<'static, Note>;

/// Which change a push feed reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

impl ChangeKind {
    pub const ALL: [ChangeKind; 3] = [ChangeKind::Created, ChangeKind::Updated, ChangeKind::Deleted];
}

#[async_trait(?Send)]
pub trait NoteGateway {
    async fn fetch_all(&self, owner: &str) -> ApiResult<Vec<Note>>;

    /// The backend assigns the id of the returned note.
    async fn create(&self, text: &str) -> ApiResult<Note>;

    async fn update(&self, id: &str, text: &str) -> ApiResult<Note>;

    /// Returns the deleted record (at least its id) for correlation.
    async fn delete(&self, id: &str) -> ApiResult<Note>;

    async fn subscribe(&self, kind: ChangeKind, owner: &str) -> ApiResult<NoteStream>;
}
