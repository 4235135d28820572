//! マイク録音と音声再生（MediaRecorder / HtmlAudioElement）
//!
//! 状態遷移は `VoiceSession` / `AudioPlayer` に任せ、ここはブラウザAPIの薄い包み。

use crate::api;
use crate::app::AppContext;
use leptos::prelude::*;
use leptos::task::spawn_local;
use paper_rag_common::api::{AUDIO_MIME, DEFAULT_TTS_LANG};
use paper_rag_common::error::{Error, Result};
use paper_rag_common::voice::{audio_data_url, MSG_PLAYING, MSG_PLAY_FAILED};
use paper_rag_common::{AudioPlayer, CaptureTrack, Playback, ToastKind, VoiceSession};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Blob, BlobEvent, BlobPropertyBag, HtmlAudioElement, MediaRecorder, MediaStream,
    MediaStreamConstraints, MediaStreamTrack, Url,
};

fn js_err(e: JsValue) -> Error {
    Error::Network(format!("{:?}", e))
}

/// マイクのトラック
pub struct MediaTrack(pub MediaStreamTrack);

impl CaptureTrack for MediaTrack {
    fn stop(&self) {
        self.0.stop();
    }
}

/// 再生中の音声
pub struct WebAudio(pub HtmlAudioElement);

impl Playback for WebAudio {
    fn pause(&self) {
        let _ = self.0.pause();
    }
}

pub type Recording = VoiceSession<MediaTrack, Blob>;
pub type Player = AudioPlayer<WebAudio>;

/// マイクを開く。拒否・非対応は Permission エラー
pub async fn open_microphone() -> Result<MediaStream> {
    let window = web_sys::window().ok_or_else(|| Error::Permission("no window".into()))?;
    let devices = window
        .navigator()
        .media_devices()
        .map_err(|e| Error::Permission(format!("{:?}", e)))?;

    let constraints = MediaStreamConstraints::new();
    constraints.set_audio(&JsValue::TRUE);
    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(|e| Error::Permission(format!("{:?}", e)))?;

    JsFuture::from(promise)
        .await
        .map_err(|e| Error::Permission(format!("{:?}", e)))?
        .dyn_into()
        .map_err(|e| Error::Permission(format!("{:?}", e)))
}

pub fn tracks_of(stream: &MediaStream) -> Vec<MediaTrack> {
    stream
        .get_tracks()
        .iter()
        .filter_map(|t| t.dyn_into::<MediaStreamTrack>().ok())
        .map(MediaTrack)
        .collect()
}

/// 録音中のMediaRecorderとイベントハンドラ
pub struct ActiveRecorder {
    recorder: MediaRecorder,
    _on_data: Closure<dyn FnMut(BlobEvent)>,
    _on_stop: Closure<dyn FnMut(web_sys::Event)>,
}

impl ActiveRecorder {
    /// 録音開始。`on_stop` は最後のチャンクが届いた後に呼ばれる
    pub fn start(
        stream: &MediaStream,
        mut on_data: impl FnMut(Blob) + 'static,
        mut on_stop: impl FnMut() + 'static,
    ) -> Result<Self> {
        let recorder = MediaRecorder::new_with_media_stream(stream).map_err(js_err)?;

        let on_data = Closure::wrap(Box::new(move |ev: BlobEvent| {
            if let Some(blob) = ev.data() {
                on_data(blob);
            }
        }) as Box<dyn FnMut(BlobEvent)>);
        let on_stop = Closure::wrap(Box::new(move |_: web_sys::Event| {
            on_stop();
        }) as Box<dyn FnMut(web_sys::Event)>);

        recorder.set_ondataavailable(Some(on_data.as_ref().unchecked_ref()));
        recorder.set_onstop(Some(on_stop.as_ref().unchecked_ref()));
        recorder.start().map_err(js_err)?;

        Ok(Self {
            recorder,
            _on_data: on_data,
            _on_stop: on_stop,
        })
    }

    /// 成功すれば最後のチャンクの後に `on_stop` が呼ばれる
    pub fn stop(&self) -> Result<()> {
        self.recorder.stop().map_err(js_err)
    }
}

impl Drop for ActiveRecorder {
    fn drop(&mut self) {
        self.recorder.set_ondataavailable(None);
        self.recorder.set_onstop(None);
    }
}

/// 録音チャンクを1つのwebm Blobにまとめる
pub fn chunks_to_blob(chunks: &[Blob]) -> Result<Blob> {
    let parts = js_sys::Array::new();
    for chunk in chunks {
        parts.push(chunk);
    }
    let opts = BlobPropertyBag::new();
    opts.set_type(AUDIO_MIME);
    Blob::new_with_blob_sequence_and_options(&parts, &opts).map_err(js_err)
}

async fn start_playback(audio: &HtmlAudioElement) -> Result<()> {
    let promise = audio.play().map_err(js_err)?;
    JsFuture::from(promise).await.map_err(js_err)?;
    Ok(())
}

/// 応答音声を再生（前の再生は止める）
pub fn play_reply(ctx: AppContext, player: StoredValue<Player, LocalStorage>, audio_base64: &str) {
    let audio = match HtmlAudioElement::new_with_src(&audio_data_url(audio_base64)) {
        Ok(audio) => audio,
        Err(e) => {
            gloo::console::error!("Error creating audio:", e);
            ctx.notify(MSG_PLAY_FAILED, ToastKind::Error);
            return;
        }
    };
    player.update_value(|p| {
        p.play(WebAudio(audio.clone()));
    });
    ctx.notify(MSG_PLAYING, ToastKind::Info);

    spawn_local(async move {
        if let Err(e) = start_playback(&audio).await {
            gloo::console::error!("Error playing audio:", e.to_string());
            ctx.notify(MSG_PLAY_FAILED, ToastKind::Error);
        }
    });
}

/// テキストを読み上げる。録音状態とは無関係で、失敗はログのみ
pub fn speak(player: StoredValue<Player, LocalStorage>, text: String) {
    spawn_local(async move {
        let result = async {
            let blob = api::synthesize(&text, DEFAULT_TTS_LANG).await?;
            let url = Url::create_object_url_with_blob(&blob).map_err(js_err)?;
            let audio = HtmlAudioElement::new_with_src(&url).map_err(js_err)?;
            player.update_value(|p| {
                p.play(WebAudio(audio.clone()));
            });
            start_playback(&audio).await
        }
        .await;

        if let Err(e) = result {
            gloo::console::error!("Error speaking text:", e.to_string());
        }
    });
}
