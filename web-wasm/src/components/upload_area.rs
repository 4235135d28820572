//! アップロードエリアコンポーネント

use crate::api;
use crate::app::AppContext;
use crate::files;
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use paper_rag_common::UploadModel;
use web_sys::{DragEvent, FileList};

#[component]
pub fn UploadArea(ctx: AppContext) -> impl IntoView {
    let upload = RwSignal::new(UploadModel::new());
    let (is_dragover, set_is_dragover) = signal(false);
    let file_input: NodeRef<html::Input> = NodeRef::new();

    // PDF以外は黙って捨てる
    let handle_files = move |list: FileList| {
        let picked = files::from_file_list(&list);
        ctx.state.update(|state| {
            upload.update(|u| {
                u.select_files(state, picked);
            });
        });
    };

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(false);

        if let Some(dt) = ev.data_transfer() {
            if let Some(list) = dt.files() {
                handle_files(list);
            }
        }
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(true);
    };

    let on_dragleave = move |_: DragEvent| {
        set_is_dragover.set(false);
    };

    let on_click = move |_| {
        if let Some(input) = file_input.get() {
            input.click();
        }
    };

    let on_change = move |_| {
        if let Some(input) = file_input.get() {
            if let Some(list) = input.files() {
                handle_files(list);
            }
            // 同じファイルを選び直しても change が飛ぶように
            input.set_value("");
        }
    };

    let on_upload = move |_| {
        let started = ctx
            .state
            .with_untracked(|state| upload.try_update(|u| u.begin_upload(state)))
            .unwrap_or(false);
        if !started {
            return;
        }
        let selected = ctx.state.with_untracked(|state| state.selected_files().to_vec());

        spawn_local(async move {
            let success = match api::upload_pdfs(&selected).await {
                Ok(resp) => resp.success,
                Err(e) => {
                    gloo::console::error!("Upload error:", e.to_string());
                    false
                }
            };

            let outcome = ctx
                .state
                .try_update(|state| upload.try_update(|u| u.finish_upload(state, success)))
                .flatten();
            if let Some(outcome) = outcome {
                ctx.toast(outcome.message, outcome.kind);
                if outcome.refresh_stats {
                    ctx.refresh_stats();
                }
            }
        });
    };

    let summary = move || ctx.state.with(|state| upload.with(|u| u.summary(state)));
    let can_upload = move || ctx.state.with(|state| upload.with(|u| u.can_upload(state)));
    let is_uploading = move || upload.with(|u| u.is_uploading());

    view! {
        <div
            id="uploadArea"
            class=move || {
                if is_dragover.get() {
                    "upload-area dragover"
                } else {
                    "upload-area"
                }
            }
            on:drop=on_drop
            on:dragover=on_dragover
            on:dragleave=on_dragleave
            on:click=on_click
        >
            {move || match summary() {
                Some(s) => view! {
                    <div class="upload-icon">
                        <i data-lucide="check-circle" size="32" color="white"></i>
                    </div>
                    <h3>{s.heading}</h3>
                    <p class="text-muted">{s.preview}</p>
                }
                .into_any(),
                None => view! {
                    <div class="upload-icon">
                        <i data-lucide="file-text" size="32" color="white"></i>
                    </div>
                    <h3>"Drop PDF files here"</h3>
                    <p class="text-muted">"or click to browse"</p>
                }
                .into_any(),
            }}
        </div>

        <input
            type="file"
            id="fileInput"
            accept="application/pdf"
            multiple=true
            style="display: none;"
            node_ref=file_input
            on:change=on_change
        />

        <button
            class="btn btn-primary"
            id="uploadBtn"
            disabled=move || !can_upload()
            on:click=on_upload
        >
            <Show
                when=is_uploading
                fallback=|| view! {
                    <i data-lucide="upload-cloud" size="20"></i>
                    " Upload & Process"
                }
            >
                <div class="loading"></div>
                " Processing..."
            </Show>
        </button>
    }
}
