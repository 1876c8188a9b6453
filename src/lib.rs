//! Note-taking client: a reconciled note list kept live by push feeds.
//!
//! The [`state::NoteStore`] owns the collection and the edit form; the
//! Leptos page in [`app`] renders its snapshots and forwards user intents.

pub mod api;
pub mod app;
mod components;
pub mod gateway;
pub mod identity;
pub mod logging;
pub mod models;
pub mod state;
pub mod storage;

pub use api::{ApiClient, ApiError, ApiErrorKind, ApiResult, EnvConfig};
pub use gateway::{ChangeKind, NoteGateway, NoteStream};
pub use identity::{FixedIdentity, IdentityProvider, StoredIdentity};
pub use models::Note;
pub use state::{NoteSnapshot, NoteState, NoteStore, StoreError, StoreResult, SubmitPlan};

use crate::app::App;
use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();

    let config = EnvConfig::new();
    if let Err(e) = logging::init_logging(&config.log_level) {
        web_sys::console::warn_1(&e.into());
    }

    mount_to_body(move || view! { <App config=config /> });
}
