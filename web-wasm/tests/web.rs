//! ブラウザ上での保存設定テスト（wasm-pack test --headless --chrome）

use gloo::storage::{LocalStorage, Storage};
use paper_rag_common::voice::VOICE_ENABLED_KEY;
use paper_rag_wasm::storage::{load_voice_enabled, save_voice_enabled};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn voice_preference_round_trip() {
    save_voice_enabled(true);
    assert!(load_voice_enabled());
    assert_eq!(
        LocalStorage::raw().get_item(VOICE_ENABLED_KEY).ok().flatten().as_deref(),
        Some("true")
    );

    save_voice_enabled(false);
    assert!(!load_voice_enabled());
}

#[wasm_bindgen_test]
fn voice_preference_defaults_off() {
    LocalStorage::delete(VOICE_ENABLED_KEY);
    assert!(!load_voice_enabled());

    // 想定外の値もOFF扱い
    let _ = LocalStorage::raw().set_item(VOICE_ENABLED_KEY, "yes");
    assert!(!load_voice_enabled());
    LocalStorage::delete(VOICE_ENABLED_KEY);
}
