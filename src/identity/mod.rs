//! Identity provider contract: who the current owner is.

use crate::api::{ApiError, ApiErrorKind, ApiResult};
use crate::storage::load_user_from_storage;
use async_trait::async_trait;

#[async_trait(?Send)]
pub trait IdentityProvider {
    /// Stable identifier of the signed-in user; push feeds are scoped to it.
    async fn current_user(&self) -> ApiResult<String>;
}

/// Reads the user record saved at sign-in.
#[derive(Clone, Copy, Debug, Default)]
pub struct StoredIdentity;

#[async_trait(?Send)]
impl IdentityProvider for StoredIdentity {
    async fn current_user(&self) -> ApiResult<String> {
        load_user_from_storage()
            .and_then(|user| user.username().map(str::to_string))
            .ok_or_else(|| ApiError {
                kind: ApiErrorKind::Unauthorized,
                message: "Not signed in".to_string(),
            })
    }
}

/// An owner known up front.
#[derive(Clone, Debug)]
pub struct FixedIdentity(pub String);

#[async_trait(?Send)]
impl IdentityProvider for FixedIdentity {
    async fn current_user(&self) -> ApiResult<String> {
        Ok(self.0.clone())
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use crate::storage::USER_KEY;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    async fn test_stored_identity_reads_username() {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .expect("localStorage should be available");
        storage
            .set_item(USER_KEY, r#"{"username": "alice"}"#)
            .expect("should seed user");
        assert_eq!(StoredIdentity.current_user().await, Ok("alice".to_string()));

        let _ = storage.remove_item(USER_KEY);
        let err = StoredIdentity.current_user().await.expect_err("signed out");
        assert_eq!(err.kind, ApiErrorKind::Unauthorized);
    }
}
