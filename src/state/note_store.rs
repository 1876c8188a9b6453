use super::{NoteSnapshot, NoteState, StoreResult, SubmitPlan};
use crate::api::ApiResult;
use crate::gateway::{ChangeKind, NoteGateway, NoteStream};
use crate::identity::IdentityProvider;
use crate::models::Note;
use futures::future::{AbortHandle, Abortable, FutureExt};
use futures::stream::StreamExt;
use futures::task::{LocalSpawn, LocalSpawnExt};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Observer = Rc<dyn Fn(&NoteSnapshot)>;

/// Note store: local intents plus pushed change events over one
/// [`NoteState`].
///
/// Responsibilities:
/// - intents from the presentation layer (load, edit, submit, delete)
/// - the three push feeds, opened after the owner is known
/// - snapshot notifications after every change
///
/// Non-responsibilities:
/// - retries and backoff (transport)
/// - optimistic writes: the collection only moves on fetch results and
///   pushed events
///
/// Everything runs on one thread; no `RefCell` borrow is held across an
/// await, so feed events may interleave with a suspended intent.
pub struct NoteStore<G, I> {
    inner: Rc<StoreInner<G, I>>,
}

struct StoreInner<G, I> {
    gateway: G,
    identity: I,
    state: RefCell<NoteState>,
    observers: RefCell<Vec<Observer>>,

    /// Load guard: responses from an older `load()` are ignored.
    load_generation: Cell<u64>,

    subscriptions: RefCell<Option<Subscriptions>>,
}

impl<G, I> Clone for NoteStore<G, I> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// The three feed tasks of one `connect()`. Dropping this releases them all.
pub struct Subscriptions {
    handles: Vec<(ChangeKind, AbortHandle)>,
}

impl Subscriptions {
    fn new() -> Self {
        Self {
            handles: Vec::with_capacity(ChangeKind::ALL.len()),
        }
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        for (kind, handle) in self.handles.drain(..) {
            handle.abort();
            log::debug!("event=feed_close module=store status=ok kind={kind}");
        }
    }
}

impl<G, I> NoteStore<G, I>
where
    G: NoteGateway + 'static,
    I: IdentityProvider + 'static,
{
    pub fn new(gateway: G, identity: I) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                gateway,
                identity,
                state: RefCell::new(NoteState::default()),
                observers: RefCell::new(Vec::new()),
                load_generation: Cell::new(0),
                subscriptions: RefCell::new(None),
            }),
        }
    }

    pub fn snapshot(&self) -> NoteSnapshot {
        self.inner.state.borrow().snapshot()
    }

    /// Registers a listener called with the new snapshot after each change.
    pub fn on_change(&self, observer: impl Fn(&NoteSnapshot) + 'static) {
        self.inner.observers.borrow_mut().push(Rc::new(observer));
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut NoteState) -> R) -> R {
        let (out, snapshot) = {
            let mut state = self.inner.state.borrow_mut();
            let out = f(&mut state);
            (out, state.snapshot())
        };
        self.notify(&snapshot);
        out
    }

    fn notify(&self, snapshot: &NoteSnapshot) {
        // Observers may call back into the store.
        let observers: Vec<Observer> = self.inner.observers.borrow().clone();
        for observer in observers {
            observer(snapshot);
        }
    }

    /// Fetches every note of the current owner and replaces the collection.
    pub async fn load(&self) -> StoreResult<()> {
        let generation = self.inner.load_generation.get() + 1;
        self.inner.load_generation.set(generation);
        self.mutate(|s| s.set_loading(true));

        let result = self.fetch_for_owner().await;

        if self.inner.load_generation.get() != generation {
            log::debug!("event=notes_load module=store status=stale generation={generation}");
            return Ok(());
        }

        match result {
            Ok(notes) => {
                let count = notes.len();
                self.mutate(|s| {
                    s.set_loading(false);
                    s.replace_all(notes);
                });
                log::info!("event=notes_load module=store status=ok count={count}");
                Ok(())
            }
            Err(e) => {
                self.mutate(|s| s.set_loading(false));
                log::warn!("event=notes_load module=store status=error kind={:?}", e.kind);
                Err(e.into())
            }
        }
    }

    async fn fetch_for_owner(&self) -> ApiResult<Vec<Note>> {
        let owner = self.inner.identity.current_user().await?;
        self.inner.gateway.fetch_all(&owner).await
    }

    pub fn begin_edit(&self, note: &Note) {
        self.mutate(|s| s.begin_edit(note));
    }

    pub fn change_draft(&self, text: &str) {
        let changed = self.inner.state.borrow_mut().change_draft(text);
        if changed {
            self.notify(&self.snapshot());
        }
    }

    /// Sends the draft as an update or a create.
    ///
    /// Update leaves the form alone until the matching update event arrives.
    /// Create clears the draft as soon as the backend accepts it.
    pub async fn submit(&self) -> StoreResult<SubmitPlan> {
        let plan = self.inner.state.borrow().plan_submit();
        let plan = match plan {
            Ok(plan) => plan,
            Err(e) => {
                log::debug!("event=note_submit module=store status=rejected");
                return Err(e);
            }
        };

        match &plan {
            SubmitPlan::Update { id, text } => {
                self.inner.gateway.update(id, text).await?;
                log::info!("event=note_update module=store status=ok id={id}");
            }
            SubmitPlan::Create { text } => {
                let created = self.inner.gateway.create(text).await?;
                self.mutate(|s| s.finish_create());
                log::info!("event=note_create module=store status=ok id={}", created.id);
            }
        }
        Ok(plan)
    }

    /// Asks the backend to delete `id`; removal happens on the deleted event.
    pub async fn delete_note(&self, id: &str) -> StoreResult<()> {
        self.inner.gateway.delete(id).await?;
        log::info!("event=note_delete module=store status=ok id={id}");
        Ok(())
    }

    pub fn on_remote_create(&self, note: Note) {
        self.apply_remote(ChangeKind::Created, note);
    }

    pub fn on_remote_update(&self, note: Note) {
        self.apply_remote(ChangeKind::Updated, note);
    }

    pub fn on_remote_delete(&self, note: Note) {
        self.apply_remote(ChangeKind::Deleted, note);
    }

    fn apply_remote(&self, kind: ChangeKind, note: Note) {
        let id = note.id.clone();
        let applied = self.mutate(|s| match kind {
            ChangeKind::Created => s.apply_created(note),
            ChangeKind::Updated => s.apply_updated(note),
            ChangeKind::Deleted => s.apply_deleted(&note.id),
        });
        log::debug!("event=remote_{kind} module=store status=ok id={id} applied={applied}");
    }

    /// Resolves the owner, then opens the created/updated/deleted feeds.
    ///
    /// Each feed is drained by a task on `spawner`. A previous connection is
    /// released first; if any feed fails to open, none stay open.
    pub async fn connect(&self, spawner: &impl LocalSpawn) -> StoreResult<()> {
        self.disconnect();
        let owner = self.inner.identity.current_user().await?;

        let mut subscriptions = Subscriptions::new();
        for kind in ChangeKind::ALL {
            let stream = self.inner.gateway.subscribe(kind, &owner).await?;
            let (handle, registration) = AbortHandle::new_pair();
            let task = Abortable::new(
                drain_feed(Rc::downgrade(&self.inner), kind, stream),
                registration,
            );
            spawner.spawn_local(task.map(|_| ()))?;
            subscriptions.handles.push((kind, handle));
        }

        log::info!("event=feeds_open module=store status=ok");
        self.inner.subscriptions.replace(Some(subscriptions));
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.inner.subscriptions.borrow().is_some()
    }

    /// Releases the push feeds. Safe to call when not connected.
    pub fn disconnect(&self) {
        let subscriptions = self.inner.subscriptions.borrow_mut().take();
        drop(subscriptions);
    }
}

async fn drain_feed<G, I>(store: Weak<StoreInner<G, I>>, kind: ChangeKind, mut stream: NoteStream)
where
    G: NoteGateway + 'static,
    I: IdentityProvider + 'static,
{
    while let Some(note) = stream.next().await {
        let Some(inner) = store.upgrade() else {
            break;
        };
        NoteStore { inner }.apply_remote(kind, note);
    }
    log::debug!("event=feed_end module=store status=ok kind={kind}");
}
