use crate::api::{ApiClient, EnvConfig};
use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, ButtonVariant, Card, CardContent, CardHeader,
    CardItem, CardList, CardTitle, Input, Spinner,
};
use crate::identity::StoredIdentity;
use crate::models::Note;
use crate::state::{NoteStore, StoreResult};
use futures::future::LocalFutureObj;
use futures::task::{LocalSpawn, SpawnError};
use leptos::prelude::*;
use leptos::task::spawn_local;

type AppStore = NoteStore<ApiClient, StoredIdentity>;

/// Runs feed tasks on the Leptos local executor.
struct LeptosSpawner;

impl LocalSpawn for LeptosSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        spawn_local(future);
        Ok(())
    }
}

fn report<T>(error: RwSignal<Option<String>>, result: StoreResult<T>) {
    match result {
        Ok(_) => error.set(None),
        Err(e) => error.set(Some(e.to_string())),
    }
}

#[component]
pub fn App(config: EnvConfig) -> impl IntoView {
    let store: AppStore = NoteStore::new(ApiClient::load_from_storage(&config), StoredIdentity);

    // The view only reads this mirror; every write goes through the store.
    let snapshot = RwSignal::new(store.snapshot());
    store.on_change(move |snap| snapshot.set(snap.clone()));
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    let store = StoredValue::new_local(store);

    let s = store.get_value();
    spawn_local(async move {
        report(error, s.load().await);
    });
    let s = store.get_value();
    spawn_local(async move {
        report(error, s.connect(&LeptosSpawner).await);
    });

    on_cleanup(move || {
        let _ = store.try_with_value(|s| s.disconnect());
    });

    let on_draft = Callback::new(move |text: String| {
        store.with_value(|s| s.change_draft(&text));
    });

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let s = store.get_value();
        spawn_local(async move {
            report(error, s.submit().await);
        });
    };

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto flex w-full max-w-md flex-col px-4 py-10">
                <Card>
                    <CardHeader>
                        <CardTitle class="font-mono text-2xl">"Note Taker"</CardTitle>
                    </CardHeader>

                    <CardContent>
                        <form class="mb-3 flex gap-2" on:submit=on_submit>
                            <Input
                                placeholder="write your note"
                                value=Signal::derive(move || snapshot.with(|s| s.draft.clone()))
                                on_input=on_draft
                            />
                            <Button size=ButtonSize::Default>
                                {move || snapshot.with(|s| s.submit_label())}
                            </Button>
                        </form>

                        <Show when=move || error.get().is_some() fallback=|| ().into_view()>
                            {move || {
                                error.get().map(|e| {
                                    view! {
                                        <Alert class="mb-3 border-destructive/30">
                                            <AlertDescription class="text-destructive text-xs">
                                                {e}
                                            </AlertDescription>
                                        </Alert>
                                    }
                                })
                            }}
                        </Show>

                        <Show when=move || snapshot.with(|s| s.loading) fallback=|| ().into_view()>
                            <div class="flex justify-center py-2">
                                <Spinner />
                            </div>
                        </Show>

                        <CardList>
                            <For
                                each=move || snapshot.with(|s| s.notes.clone())
                                key=|note| (note.id.clone(), note.text.clone())
                                let:note
                            >
                                <NoteRow note=note store=store error=error />
                            </For>
                        </CardList>
                    </CardContent>
                </Card>
            </div>
        </div>
    }
}

#[component]
fn NoteRow(
    note: Note,
    store: StoredValue<AppStore, LocalStorage>,
    error: RwSignal<Option<String>>,
) -> impl IntoView {
    let text = note.text.clone();
    let id = note.id.clone();

    let on_select = move |_ev: web_sys::MouseEvent| {
        store.with_value(|s| s.begin_edit(&note));
    };

    let on_delete = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        let s = store.get_value();
        let id = id.clone();
        spawn_local(async move {
            report(error, s.delete_note(&id).await);
        });
    };

    view! {
        <CardItem>
            <span class="flex-1 cursor-pointer truncate py-1 text-lg" on:click=on_select>
                {text}
            </span>
            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Icon
                class="h-7 w-7 text-destructive"
                attr:title="Delete"
                on:click=on_delete
            >
                <span aria-hidden="true">"×"</span>
            </Button>
        </CardItem>
    }
}
