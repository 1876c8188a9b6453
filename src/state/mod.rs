pub(crate) mod note_store;

pub use note_store::{NoteStore, Subscriptions};

use crate::api::ApiError;
use crate::models::Note;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Empty draft on submit. Nothing was sent and nothing changed.
    #[error("Enter valid note")]
    Validation,

    #[error(transparent)]
    Remote(#[from] ApiError),

    #[error("failed to start feed task: {0}")]
    Spawn(#[from] futures::task::SpawnError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// What a submit turns into, decided against the collection at submit time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitPlan {
    Create { text: String },
    Update { id: String, text: String },
}

/// Read model handed to the presentation layer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NoteSnapshot {
    pub notes: Vec<Note>,
    pub draft: String,
    /// `None` means create mode.
    pub selected_id: Option<String>,
    pub loading: bool,
}

impl NoteSnapshot {
    pub fn is_update_mode(&self) -> bool {
        self.selected_id.is_some()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_update_mode() {
            "Update Note"
        } else {
            "Add Note"
        }
    }
}

/// Reconciled note collection plus the edit form.
///
/// # Invariants
/// - At most one note per id; notes without an id are never held.
/// - A selection always names a note present in `notes`, except across a
///   reload, which is re-checked when the draft is submitted.
/// - Remote events converge: the last event applied for an id decides
///   whether it is present and with which text.
#[derive(Clone, Debug, Default)]
pub struct NoteState {
    notes: Vec<Note>,
    selected_id: Option<String>,
    draft: String,
    loading: bool,
}

impl NoteState {
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.notes.iter().any(|n| n.id == id)
    }

    pub fn snapshot(&self) -> NoteSnapshot {
        NoteSnapshot {
            notes: self.notes.clone(),
            draft: self.draft.clone(),
            selected_id: self.selected_id.clone(),
            loading: self.loading,
        }
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Replaces the whole collection with a fetched list.
    ///
    /// A selection that no longer exists is dropped; the draft is kept so a
    /// later submit becomes a create.
    pub fn replace_all(&mut self, notes: Vec<Note>) {
        self.notes.clear();
        for note in notes {
            self.upsert(note);
        }
        if let Some(id) = self.selected_id.as_deref() {
            if !self.contains(id) {
                self.selected_id = None;
            }
        }
    }

    /// Loads `note` into the edit form. The note is expected to be present.
    pub fn begin_edit(&mut self, note: &Note) {
        self.selected_id = Some(note.id.clone());
        self.draft = note.text.clone();
    }

    /// Returns false when the draft already held `text`.
    pub fn change_draft(&mut self, text: &str) -> bool {
        if self.draft == text {
            return false;
        }
        self.draft = text.to_string();
        true
    }

    /// Chooses between update and create.
    ///
    /// The selection is re-checked against the current collection, so a note
    /// deleted since `begin_edit` turns the submit into a create.
    pub fn plan_submit(&self) -> StoreResult<SubmitPlan> {
        if self.draft.is_empty() {
            return Err(StoreError::Validation);
        }

        let text = self.draft.clone();
        match self.selected_id.as_deref() {
            Some(id) if self.contains(id) => Ok(SubmitPlan::Update {
                id: id.to_string(),
                text,
            }),
            _ => Ok(SubmitPlan::Create { text }),
        }
    }

    /// Create was accepted by the backend. The note itself arrives later on
    /// the created feed.
    pub fn finish_create(&mut self) {
        self.draft.clear();
        if let Some(id) = self.selected_id.as_deref() {
            if !self.contains(id) {
                self.selected_id = None;
            }
        }
    }

    pub fn apply_created(&mut self, note: Note) -> bool {
        if !note.is_remote() {
            return false;
        }
        // A duplicate push must not leave two entries behind.
        self.notes.retain(|n| n.id != note.id);
        self.notes.push(note);
        true
    }

    /// Replaces in place, or inserts when the update overtook its create.
    /// An update to the selected note settles the edit form.
    pub fn apply_updated(&mut self, note: Note) -> bool {
        if !note.is_remote() {
            return false;
        }
        if self.selected_id.as_deref() == Some(note.id.as_str()) {
            self.clear_selection();
        }
        self.upsert(note);
        true
    }

    /// Removes `id`. Deleting the selected note drops the selection; the
    /// draft goes with it unless it was edited, in which case it stays and a
    /// later submit creates a new note from it.
    pub fn apply_deleted(&mut self, id: &str) -> bool {
        let removed = self
            .notes
            .iter()
            .position(|n| n.id == id)
            .map(|i| self.notes.remove(i));

        if self.selected_id.as_deref() == Some(id) {
            let edited = removed.as_ref().is_some_and(|n| n.text != self.draft);
            self.selected_id = None;
            if !edited {
                self.draft.clear();
            }
        }
        removed.is_some()
    }

    fn upsert(&mut self, note: Note) {
        if !note.is_remote() {
            return;
        }
        match self.notes.iter_mut().find(|n| n.id == note.id) {
            Some(existing) => *existing = note,
            None => self.notes.push(note),
        }
    }

    fn clear_selection(&mut self) {
        self.selected_id = None;
        self.draft.clear();
    }
}
