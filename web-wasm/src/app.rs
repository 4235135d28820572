//! メインアプリケーションコンポーネント

use crate::api;
use crate::components::{
    chat_panel::ChatPanel, header::Header, papers_modal::PapersModal, sidebar::Sidebar,
    toast::ToastLayer,
};
use crate::files::WebFile;
use crate::storage;
use gloo::timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;
use paper_rag_common::toast::{TOAST_DURATION_MS, TOAST_FADE_MS};
use paper_rag_common::{AppState, Conversation, PapersManager, Stats, Tab, ToastKind, Toasts};

/// 画面全体で共有する状態
///
/// シグナルはすべてアリーナ上のIDなのでCopyで各コンポーネントへ渡せる。
#[derive(Clone, Copy)]
pub struct AppContext {
    /// 選択中のファイル（web_sys::Fileを含むためローカル保持）
    pub state: RwSignal<AppState<WebFile>, LocalStorage>,
    pub stats: RwSignal<Stats>,
    pub toasts: RwSignal<Toasts>,
    /// フェードアウト中のトーストID
    pub fading: RwSignal<Vec<u64>>,
    pub active_tab: RwSignal<Tab>,
    pub conversation: RwSignal<Conversation>,
    pub voice_enabled: RwSignal<bool>,
    pub papers: RwSignal<PapersManager>,
}

impl AppContext {
    fn new() -> Self {
        Self {
            state: RwSignal::new_local(AppState::new()),
            stats: RwSignal::new(Stats::default()),
            toasts: RwSignal::new(Toasts::new()),
            fading: RwSignal::new(Vec::new()),
            active_tab: RwSignal::new(Tab::default()),
            conversation: RwSignal::new(Conversation::new()),
            voice_enabled: RwSignal::new(storage::load_voice_enabled()),
            papers: RwSignal::new(PapersManager::new()),
        }
    }

    /// トースト（積み重なる）
    pub fn toast(&self, message: impl Into<String>, kind: ToastKind) {
        if let Some(id) = self.toasts.try_update(|t| t.show(message, kind)) {
            self.schedule_dismiss(id);
        }
    }

    /// 通知（同時に1件だけ）
    pub fn notify(&self, message: impl Into<String>, kind: ToastKind) {
        if let Some(id) = self.toasts.try_update(|t| t.notify(message, kind)) {
            self.schedule_dismiss(id);
        }
    }

    /// 3秒後にフェード、さらに0.3秒後に消す
    fn schedule_dismiss(&self, id: u64) {
        let toasts = self.toasts;
        let fading = self.fading;
        Timeout::new(TOAST_DURATION_MS, move || {
            fading.update(|f| f.push(id));
            Timeout::new(TOAST_FADE_MS, move || {
                toasts.update(|t| t.dismiss(id));
                fading.update(|f| f.retain(|x| *x != id));
            })
            .forget();
        })
        .forget();
    }

    /// ヘッダーの件数を再取得（失敗はログのみ）
    pub fn refresh_stats(&self) {
        let stats = self.stats;
        spawn_local(async move {
            match api::stats().await {
                Ok(s) => stats.set(s),
                Err(e) => gloo::console::error!("Error loading stats:", e.to_string()),
            }
        });
    }

    pub fn toggle_voice(&self) {
        let enabled = !self.voice_enabled.get_untracked();
        self.voice_enabled.set(enabled);
        storage::save_voice_enabled(enabled);
        let (message, kind) = paper_rag_common::voice::toggle_message(enabled);
        self.notify(message, kind);
    }
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext::new();
    ctx.refresh_stats();

    view! {
        <div class="app-container">
            <Header ctx=ctx />

            <div class="main-content">
                <Sidebar ctx=ctx />
                <ChatPanel ctx=ctx />
            </div>

            <PapersModal ctx=ctx />
            <ToastLayer ctx=ctx />
        </div>
    }
}
