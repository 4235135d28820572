//! チャットパネル（メッセージ一覧・入力・画像添付・音声）

use crate::api;
use crate::app::AppContext;
use crate::components::{message::MessageView, voice_panel::VoicePanel};
use crate::files;
use crate::voice::Player;
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use paper_rag_common::voice::toggle_icon;
use paper_rag_common::ToastKind;

#[component]
pub fn ChatPanel(ctx: AppContext) -> impl IntoView {
    let player = StoredValue::new_local(Player::new());
    let (input, set_input) = signal(String::new());
    let image_input: NodeRef<html::Input> = NodeRef::new();
    let messages_ref: NodeRef<html::Div> = NodeRef::new();

    // 新しいメッセージが来たら最下部へ
    Effect::new(move |_| {
        ctx.conversation.track();
        if let Some(el) = messages_ref.get() {
            el.set_scroll_top(el.scroll_height());
        }
    });

    let send = move || {
        let text = input.get_untracked();
        let pending = ctx
            .state
            .try_update(|state| ctx.conversation.try_update(|c| c.begin_send(state, &text)))
            .flatten()
            .flatten();
        let Some(pending) = pending else {
            return;
        };
        set_input.set(String::new());

        spawn_local(async move {
            let result = api::query_text(&pending.request).await;
            if let Err(e) = &result {
                gloo::console::error!("Query error:", e.to_string());
            }
            ctx.conversation.update(|c| {
                c.complete(pending.typing_id, result);
            });
        });
    };

    let on_image_change = move |_| {
        let Some(input) = image_input.get() else {
            return;
        };
        let file = input.files().and_then(|list| list.get(0));
        input.set_value("");
        let Some(file) = file else {
            return;
        };

        spawn_local(async move {
            match files::read_data_url(&file).await {
                Ok(data_url) => {
                    ctx.state.update(|s| s.set_uploaded_image(data_url));
                    ctx.toast("Image uploaded! Add a message and send.", ToastKind::Success);
                }
                Err(e) => gloo::console::error!("Image read error:", e.to_string()),
            }
        });
    };

    let pending_image = move || ctx.state.with(|s| s.uploaded_image().map(str::to_string));

    view! {
        <section class="chat-panel">
            <div class="chat-messages" id="chatMessages" node_ref=messages_ref>
                <Show
                    when=move || !ctx.conversation.with(|c| c.is_empty())
                    fallback=|| view! {
                        <div class="empty-state">
                            <i data-lucide="message-square" size="48"></i>
                            <h3>"Ask anything about your papers"</h3>
                            <p>"Upload PDFs or ingest from ArXiv, then ask a question"</p>
                        </div>
                    }
                >
                    <For
                        each=move || ctx.conversation.with(|c| c.messages().to_vec())
                        key=|msg| (msg.id, msg.is_typing())
                        children=move |msg| view! { <MessageView msg=msg ctx=ctx player=player /> }
                    />
                </Show>
            </div>

            <div
                class="voice-panel-wrapper"
                style:display=move || if ctx.voice_enabled.get() { "block" } else { "none" }
            >
                <VoicePanel ctx=ctx player=player />
            </div>

            <div class="chat-input-container">
                {move || pending_image().map(|src| view! {
                    <div class="pending-image">
                        <img src=src alt="Attached image" />
                        <button
                            class="icon-btn"
                            title="Remove image"
                            on:click=move |_| ctx.state.update(|s| s.clear_uploaded_image())
                        >
                            <i data-lucide="x" size="16"></i>
                        </button>
                    </div>
                })}

                <div class="chat-input-wrapper">
                    <textarea
                        id="messageInput"
                        rows="1"
                        placeholder="Ask a question about your papers..."
                        prop:value=move || input.get()
                        on:input=move |ev| set_input.set(event_target_value(&ev))
                        on:keydown=move |ev| {
                            if ev.key() == "Enter" && !ev.shift_key() {
                                ev.prevent_default();
                                send();
                            }
                        }
                    ></textarea>

                    <div class="input-actions">
                        <button
                            class="icon-btn"
                            id="voice-toggle"
                            title=move || toggle_icon(ctx.voice_enabled.get()).1
                            on:click=move |_| ctx.toggle_voice()
                        >
                            <i data-lucide=move || toggle_icon(ctx.voice_enabled.get()).0 size="20"></i>
                        </button>
                        <button
                            class="icon-btn"
                            id="imageUploadBtn"
                            title="Attach image"
                            on:click=move |_| {
                                if let Some(el) = image_input.get() {
                                    el.click();
                                }
                            }
                        >
                            <i data-lucide="image" size="20"></i>
                        </button>
                        <input
                            type="file"
                            id="imageInput"
                            accept="image/*"
                            style="display: none;"
                            node_ref=image_input
                            on:change=on_image_change
                        />
                        <button class="send-btn" id="sendBtn" on:click=move |_| send()>
                            <i data-lucide="send" size="20"></i>
                        </button>
                    </div>
                </div>
            </div>
        </section>
    }
}
