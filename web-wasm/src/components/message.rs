//! チャットの吹き出し

use crate::app::AppContext;
use crate::voice::{self, Player};
use leptos::prelude::*;
use paper_rag_common::{ChatMessage, Role, Segment};

/// 書式付きテキスト（HTML文字列は組み立てない）
fn render_segments(segments: Vec<Segment>) -> impl IntoView {
    segments
        .into_iter()
        .map(|segment| match segment {
            Segment::Text(t) => t.into_any(),
            Segment::Strong(t) => view! { <strong>{t}</strong> }.into_any(),
            Segment::Emphasis(t) => view! { <em>{t}</em> }.into_any(),
            Segment::Code(t) => view! { <code>{t}</code> }.into_any(),
            Segment::LineBreak => view! { <br /> }.into_any(),
        })
        .collect_view()
}

#[component]
pub fn MessageView(
    msg: ChatMessage,
    ctx: AppContext,
    player: StoredValue<Player, LocalStorage>,
) -> impl IntoView {
    let role = msg.role;
    let avatar_class = format!("message-avatar {}-avatar", role.as_str());

    if msg.is_typing() {
        return view! {
            <div class=msg.class()>
                <div class=avatar_class>
                    <i data-lucide=role.avatar_icon() size="20" color="white"></i>
                </div>
                <div class="message-content">
                    <div class="typing-indicator">
                        <div class="typing-dot"></div>
                        <div class="typing-dot"></div>
                        <div class="typing-dot"></div>
                    </div>
                </div>
            </div>
        }
        .into_any();
    }

    let segments = msg.segments();
    let speak_text = (role == Role::Ai)
        .then(|| msg.text().map(str::to_string))
        .flatten()
        .filter(|t| !t.is_empty());

    let image = msg.image.clone().map(|src| {
        view! { <img src=src class="message-image" alt="Uploaded image" /> }
    });

    let sources = (!msg.sources.is_empty()).then(|| {
        let items = msg
            .sources
            .iter()
            .map(|s| {
                view! {
                    <li class="source">
                        <span class="source-id">{s.paper_id.clone()}</span>
                        " "
                        <span class="source-content">{s.content.clone()}</span>
                    </li>
                }
            })
            .collect_view();
        view! { <ul class="message-sources">{items}</ul> }
    });

    let voice_meta = msg.voice.clone().map(|meta| {
        let play = meta.audio_base64.clone().filter(|a| !a.is_empty()).map(|audio| {
            view! {
                <div class="audio-controls">
                    <button
                        class="btn-play"
                        on:click=move |_| voice::play_reply(ctx, player, &audio)
                    >
                        <i data-lucide="play"></i>
                        <span>"Play Response"</span>
                    </button>
                </div>
            }
        });
        view! {
            <div class="voice-result">
                <div class="metadata">
                    <span class="badge">
                        <i data-lucide="route"></i>
                        " "
                        {meta.route.clone()}
                    </span>
                    <span class="badge">
                        <i data-lucide="clock"></i>
                        " "
                        {meta.latency_label()}
                    </span>
                    <span class="badge">
                        <i data-lucide="mic"></i>
                        " Voice Query"
                    </span>
                </div>
                {play}
            </div>
        }
    });

    // 音声応答は再生ボタンがあるので読み上げは出さない
    let speak = speak_text.filter(|_| msg.voice.is_none()).map(|text| {
        view! {
            <button
                class="btn-speak"
                title="Read aloud"
                on:click=move |_| voice::speak(player, text.clone())
            >
                <i data-lucide="volume-2" size="16"></i>
            </button>
        }
    });

    view! {
        <div class=msg.class()>
            <div class=avatar_class>
                <i data-lucide=role.avatar_icon() size="20" color="white"></i>
            </div>
            <div class="message-content">
                <div class="message-text">{render_segments(segments)}</div>
                {image}
                {sources}
                {voice_meta}
                {speak}
            </div>
        </div>
    }
    .into_any()
}
