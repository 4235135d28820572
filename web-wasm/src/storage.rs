//! 音声モード設定の保存（localStorage）

use gloo::storage::{LocalStorage, Storage};
use paper_rag_common::voice::{parse_voice_enabled, voice_enabled_value, VOICE_ENABLED_KEY};

/// 起動時に読む。未設定・読めない場合はOFF
pub fn load_voice_enabled() -> bool {
    let stored = LocalStorage::raw().get_item(VOICE_ENABLED_KEY).ok().flatten();
    parse_voice_enabled(stored.as_deref())
}

/// 切り替え時に書く（"true" / "false"）
pub fn save_voice_enabled(enabled: bool) {
    if let Err(e) = LocalStorage::raw().set_item(VOICE_ENABLED_KEY, voice_enabled_value(enabled)) {
        gloo::console::error!("Error saving voice preference:", e);
    }
}
