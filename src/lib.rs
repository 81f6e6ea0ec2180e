mod api;
mod app;
mod components;
mod fees;
mod models;
mod pages;
mod password_reset;
mod reviews;
mod state;
mod storage;
mod util;

use crate::api::EnvConfig;
use crate::app::App;
use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use crate::api::ApiClient;
    use crate::models::{Role, UserProfile};
    use crate::storage::{load_user_from_storage, save_user_to_storage};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_api_client_storage_roundtrip_token() {
        ApiClient::clear_storage();

        let mut c = ApiClient::load_from_storage();
        assert!(!c.is_authenticated());

        c.set_token("t1".to_string());
        c.save_to_storage();

        let c2 = ApiClient::load_from_storage();
        assert_eq!(c2.get_token().map(|s| s.as_str()), Some("t1"));

        ApiClient::clear_storage();
        let c3 = ApiClient::load_from_storage();
        assert!(c3.get_token().is_none());
    }

    #[wasm_bindgen_test]
    fn test_user_storage_roundtrip() {
        let user = UserProfile {
            id: "u1".to_string(),
            full_name: "Asha K".to_string(),
            email: "asha@example.com".to_string(),
            role: Role::Mentor,
            mentor_id: None,
            profile_image_url: None,
        };
        save_user_to_storage(&user);
        let loaded = load_user_from_storage().expect("should load user from localStorage");
        assert_eq!(loaded, user);

        ApiClient::clear_storage();
        assert!(load_user_from_storage().is_none());
    }
}

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    let config = EnvConfig::new();
    // Logging is best-effort; a second init (hot reload) just keeps the first logger.
    let _ = console_log::init_with_level(config.log_level);
    log::info!("institute-desk starting, api at {}", config.api_url);
    mount_to_body(App);
}
