//! 音声クエリパネル

use crate::api;
use crate::app::AppContext;
use crate::voice::{self, ActiveRecorder, Player, Recording};
use leptos::prelude::*;
use leptos::task::spawn_local;
use paper_rag_common::voice::{MSG_MIC_DENIED, MSG_QUERY_DONE, MSG_QUERY_FAILED};
use paper_rag_common::{Error, ToastKind, VoicePhase};
use web_sys::Blob;

/// 録音停止後の送信（MediaRecorderの stop イベントから呼ばれる）
fn send_recording(
    ctx: AppContext,
    session: RwSignal<Recording, LocalStorage>,
    recorder: StoredValue<Option<ActiveRecorder>, LocalStorage>,
    player: StoredValue<Player, LocalStorage>,
) {
    // トラックは停止クリック時に解放済み
    let Some(chunks) = session.try_update(|s| s.take_chunks()).flatten() else {
        return;
    };

    spawn_local(async move {
        let result = match voice::chunks_to_blob(&chunks) {
            Ok(blob) => api::voice_query(&blob).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(reply) => {
                ctx.conversation.update(|c| {
                    c.push_voice_reply(&reply);
                });
                if let Some(audio) = reply.audio_base64.as_deref().filter(|a| !a.is_empty()) {
                    voice::play_reply(ctx, player, audio);
                }
                ctx.notify(MSG_QUERY_DONE, ToastKind::Success);
            }
            Err(e) => {
                gloo::console::error!("Error processing voice query:", e.to_string());
                ctx.notify(MSG_QUERY_FAILED, ToastKind::Error);
            }
        }

        session.update(|s| s.finish());
        // イベントハンドラの外で破棄する
        recorder.set_value(None);
    });
}

#[component]
pub fn VoicePanel(ctx: AppContext, player: StoredValue<Player, LocalStorage>) -> impl IntoView {
    let session: RwSignal<Recording, LocalStorage> = RwSignal::new_local(Recording::new());
    let recorder = StoredValue::new_local(None::<ActiveRecorder>);

    let phase = move || session.with(|s| s.phase());

    on_cleanup(move || {
        session.try_update(|s| s.abort());
    });

    let on_record = move |_| {
        if session.with_untracked(|s| s.phase()) != VoicePhase::Idle {
            return;
        }

        spawn_local(async move {
            let stream = match voice::open_microphone().await {
                Ok(stream) => stream,
                Err(e) => {
                    gloo::console::error!("Error starting recording:", e.to_string());
                    session.update(|s| s.abort());
                    ctx.notify(MSG_MIC_DENIED, ToastKind::Error);
                    return;
                }
            };

            // 待っている間に別の録音が始まっていればトラックは閉じられる
            if !session
                .try_update(|s| s.start(voice::tracks_of(&stream)))
                .unwrap_or(false)
            {
                return;
            }

            let on_data = move |blob: Blob| session.update(|s| s.push_chunk(blob));
            let on_stop = move || send_recording(ctx, session, recorder, player);
            match ActiveRecorder::start(&stream, on_data, on_stop) {
                Ok(active) => recorder.set_value(Some(active)),
                Err(e) => {
                    gloo::console::error!("Error starting recording:", e.to_string());
                    session.update(|s| s.abort());
                    ctx.notify(MSG_MIC_DENIED, ToastKind::Error);
                }
            }
        });
    };

    let on_stop = move |_| {
        // その場でマイクを解放してProcessingへ（二度押しはここで弾く）
        if !session.try_update(|s| s.stop()).unwrap_or(false) {
            return;
        }

        let stopped = recorder
            .with_value(|r| r.as_ref().map(ActiveRecorder::stop))
            .unwrap_or_else(|| Err(Error::Network("recorder is not running".into())));
        if let Err(e) = stopped {
            // stop イベントは来ないのでここで片付ける
            gloo::console::error!("Error stopping recorder:", e.to_string());
            session.update(|s| s.abort());
            recorder.set_value(None);
            ctx.notify(MSG_QUERY_FAILED, ToastKind::Error);
        }
    };

    view! {
        <div id="voice-panel" class="voice-panel">
            <div class="voice-controls">
                <Show
                    when=move || phase() == VoicePhase::Recording
                    fallback=move || view! {
                        <button
                            id="voice-record-btn"
                            class="btn btn-primary"
                            title="Record voice query"
                            disabled=move || phase() == VoicePhase::Processing
                            on:click=on_record
                        >
                            <i data-lucide="mic"></i>
                            <span>"Record Voice Query"</span>
                        </button>
                    }
                >
                    <button
                        id="voice-stop-btn"
                        class="btn btn-primary btn-danger"
                        title="Stop recording"
                        on:click=on_stop
                    >
                        <i data-lucide="square"></i>
                        <span>"Stop Recording"</span>
                    </button>
                </Show>
                <div
                    id="voice-status"
                    class=move || {
                        if phase() == VoicePhase::Idle {
                            "voice-status"
                        } else {
                            "voice-status active"
                        }
                    }
                >
                    {move || phase().status_text()}
                </div>
            </div>
            <Show when=move || phase() == VoicePhase::Recording>
                <div id="voice-waveform" class="voice-waveform">
                    <div class="waveform-bar"></div>
                    <div class="waveform-bar"></div>
                    <div class="waveform-bar"></div>
                    <div class="waveform-bar"></div>
                    <div class="waveform-bar"></div>
                </div>
            </Show>
        </div>
    }
}
