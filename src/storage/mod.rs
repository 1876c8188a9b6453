use crate::models::AccountInfo;
use serde::Deserialize;

pub(crate) const TOKEN_KEY: &str = "notetaker_token";
pub(crate) const USER_KEY: &str = "notetaker_user";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

pub(crate) fn load_json_from_storage<T: for<'de> Deserialize<'de>>(key: &str) -> Option<T> {
    let json = local_storage()?.get_item(key).ok().flatten()?;
    serde_json::from_str(&json).ok()
}

pub fn load_user_from_storage() -> Option<AccountInfo> {
    load_json_from_storage(USER_KEY)
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_user_record_written_at_sign_in_loads() {
        let storage = local_storage().expect("localStorage should be available");
        storage
            .set_item(USER_KEY, r#"{"id": 1, "username": "u"}"#)
            .expect("should seed user");
        let loaded = load_user_from_storage().expect("should load user from localStorage");
        assert_eq!(loaded.username(), Some("u"));
    }

    #[wasm_bindgen_test]
    fn test_corrupt_json_loads_as_none() {
        if let Some(storage) = local_storage() {
            let _ = storage.set_item("notetaker_test_corrupt", "{not json");
        }
        assert!(load_json_from_storage::<AccountInfo>("notetaker_test_corrupt").is_none());
    }
}
