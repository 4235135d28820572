//! 音声アシスタントの状態機械と再生管理
//!
//! 録音: Idle → Recording → Processing → Idle
//! - 録音停止時は成否に関わらずキャプチャデバイス（全トラック）を必ず解放する
//! - 停止後もレコーダーの最終チャンクは受け取り、`take_chunks` で一度だけ取り出す
//! - 権限拒否やキャプチャ失敗は部分状態を残さずIdleへ戻る
//!
//! 再生: 同時に再生するのは1つだけ。新しい再生を始める前に前の再生を止めて破棄する。

use crate::toast::ToastKind;

/// 音声モード設定のlocalStorageキー
pub const VOICE_ENABLED_KEY: &str = "voice-enabled";

pub const STATUS_RECORDING: &str = "Recording... Click stop when done";
pub const STATUS_PROCESSING: &str = "Processing your query...";

pub const MSG_MIC_DENIED: &str = "Could not access microphone. Please check permissions.";
pub const MSG_QUERY_DONE: &str = "Voice query completed!";
pub const MSG_QUERY_FAILED: &str = "Error processing voice query. Please try again.";
pub const MSG_PLAYING: &str = "Playing response...";
pub const MSG_PLAY_FAILED: &str = "Error playing audio";

/// キャプチャ中のメディアトラック
pub trait CaptureTrack {
    fn stop(&self);
}

/// 再生中のオーディオ
pub trait Playback {
    fn pause(&self);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VoicePhase {
    #[default]
    Idle,
    Recording,
    Processing,
}

impl VoicePhase {
    pub fn status_text(&self) -> &'static str {
        match self {
            VoicePhase::Idle => "",
            VoicePhase::Recording => STATUS_RECORDING,
            VoicePhase::Processing => STATUS_PROCESSING,
        }
    }
}

/// 録音セッション
///
/// `T` はキャプチャトラック、`C` は録音チャンク（ブラウザでは `Blob`）
#[derive(Debug)]
pub struct VoiceSession<T: CaptureTrack, C> {
    phase: VoicePhase,
    tracks: Vec<T>,
    chunks: Vec<C>,
    /// 停止済みで最終チャンク待ち
    draining: bool,
}

impl<T: CaptureTrack, C> Default for VoiceSession<T, C> {
    fn default() -> Self {
        Self {
            phase: VoicePhase::Idle,
            tracks: Vec::new(),
            chunks: Vec::new(),
            draining: false,
        }
    }
}

impl<T: CaptureTrack, C> VoiceSession<T, C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> VoicePhase {
        self.phase
    }

    pub fn is_recording(&self) -> bool {
        self.phase == VoicePhase::Recording
    }

    /// マイク許可後に録音開始。Idle以外では受け付けず、渡されたトラックは止める
    pub fn start(&mut self, tracks: Vec<T>) -> bool {
        if self.phase != VoicePhase::Idle {
            tracks.iter().for_each(CaptureTrack::stop);
            return false;
        }
        self.tracks = tracks;
        self.chunks.clear();
        self.phase = VoicePhase::Recording;
        true
    }

    /// 録音チャンクを蓄積（録音中と、停止後の取り出し前のみ）
    pub fn push_chunk(&mut self, chunk: C) {
        if self.phase == VoicePhase::Recording || self.draining {
            self.chunks.push(chunk);
        }
    }

    fn release_tracks(&mut self) {
        for track in self.tracks.drain(..) {
            track.stop();
        }
    }

    /// 録音停止。その場でデバイスを解放してProcessingへ移る
    ///
    /// 録音中でなければfalse
    pub fn stop(&mut self) -> bool {
        if self.phase != VoicePhase::Recording {
            return false;
        }
        self.release_tracks();
        self.phase = VoicePhase::Processing;
        self.draining = true;
        true
    }

    /// 停止後に蓄積チャンクを取り出す（送信1回分）。二度目以降はNone
    pub fn take_chunks(&mut self) -> Option<Vec<C>> {
        if !self.draining {
            return None;
        }
        self.draining = false;
        Some(std::mem::take(&mut self.chunks))
    }

    /// 送信完了（成否問わず）でIdleへ
    pub fn finish(&mut self) {
        self.release_tracks();
        self.chunks.clear();
        self.draining = false;
        self.phase = VoicePhase::Idle;
    }

    /// 権限拒否・キャプチャ失敗。何も残さずIdleへ
    pub fn abort(&mut self) {
        self.finish();
    }

    pub fn active_tracks(&self) -> usize {
        self.tracks.len()
    }
}

/// 同時再生1つを保証するプレイヤー
#[derive(Debug)]
pub struct AudioPlayer<P: Playback> {
    current: Option<P>,
}

impl<P: Playback> Default for AudioPlayer<P> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<P: Playback> AudioPlayer<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 前の再生を止めて破棄し、新しい再生を登録して参照を返す
    pub fn play(&mut self, playback: P) -> &P {
        self.stop();
        self.current.insert(playback)
    }

    pub fn stop(&mut self) {
        if let Some(prev) = self.current.take() {
            prev.pause();
        }
    }

    pub fn current(&self) -> Option<&P> {
        self.current.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.current.is_some()
    }
}

/// 応答音声のdata URL（MP3）
pub fn audio_data_url(audio_base64: &str) -> String {
    format!("data:audio/mpeg;base64,{}", audio_base64)
}

/// 保存値を解釈（"true" のみ有効）
pub fn parse_voice_enabled(stored: Option<&str>) -> bool {
    matches!(stored.map(str::trim), Some("true"))
}

pub fn voice_enabled_value(enabled: bool) -> &'static str {
    if enabled {
        "true"
    } else {
        "false"
    }
}

/// 音声モード切り替え時の通知
pub fn toggle_message(enabled: bool) -> (String, ToastKind) {
    (
        format!("Voice mode {}", if enabled { "enabled" } else { "disabled" }),
        ToastKind::Success,
    )
}

/// 切り替えボタンのアイコンとツールチップ
pub fn toggle_icon(enabled: bool) -> (&'static str, &'static str) {
    if enabled {
        ("mic", "Voice mode is ON")
    } else {
        ("mic-off", "Voice mode is OFF")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// stop() 呼び出し回数を共有カウンタに記録するトラック
    struct FakeTrack {
        stopped: Rc<Cell<u32>>,
    }

    impl CaptureTrack for FakeTrack {
        fn stop(&self) {
            self.stopped.set(self.stopped.get() + 1);
        }
    }

    struct FakeAudio {
        name: &'static str,
        paused: Rc<Cell<bool>>,
    }

    impl Playback for FakeAudio {
        fn pause(&self) {
            self.paused.set(true);
        }
    }

    fn tracks(n: usize, counter: &Rc<Cell<u32>>) -> Vec<FakeTrack> {
        (0..n).map(|_| FakeTrack { stopped: counter.clone() }).collect()
    }

    #[test]
    fn test_record_stop_releases_device() {
        let stopped = Rc::new(Cell::new(0));
        let mut session: VoiceSession<FakeTrack, Vec<u8>> = VoiceSession::new();

        assert!(session.start(tracks(2, &stopped)));
        assert_eq!(session.phase().status_text(), STATUS_RECORDING);
        session.push_chunk(vec![1, 2]);
        session.push_chunk(vec![3]);

        assert!(session.stop());
        assert_eq!(stopped.get(), 2);
        assert_eq!(session.active_tracks(), 0);
        assert_eq!(session.phase(), VoicePhase::Processing);

        let chunks = session.take_chunks().unwrap();
        assert_eq!(chunks, vec![vec![1, 2], vec![3]]);
        assert!(session.take_chunks().is_none());

        session.finish();
        assert_eq!(session.phase(), VoicePhase::Idle);
        // 解放は一度だけ
        assert_eq!(stopped.get(), 2);
    }

    #[test]
    fn test_chunks_ignored_outside_recording() {
        let stopped = Rc::new(Cell::new(0));
        let mut session: VoiceSession<FakeTrack, u8> = VoiceSession::new();
        session.push_chunk(1);
        session.start(tracks(1, &stopped));
        session.stop();
        assert_eq!(session.take_chunks(), Some(vec![]));
        session.push_chunk(2);
        session.finish();
        session.push_chunk(3);
        session.start(tracks(1, &stopped));
        session.stop();
        assert_eq!(session.take_chunks(), Some(Vec::<u8>::new()));
    }

    #[test]
    fn test_stop_releases_device_before_final_chunk() {
        let stopped = Rc::new(Cell::new(0));
        let mut session: VoiceSession<FakeTrack, u8> = VoiceSession::new();
        session.start(tracks(1, &stopped));
        session.push_chunk(1);

        // クリック時点で解放・Processing、二度目の停止は無視
        assert!(session.stop());
        assert_eq!(stopped.get(), 1);
        assert_eq!(session.phase(), VoicePhase::Processing);
        assert!(!session.is_recording());
        assert!(!session.stop());

        // レコーダーの最後のdataavailableは停止後に届く
        session.push_chunk(2);
        assert_eq!(session.take_chunks(), Some(vec![1, 2]));
        session.push_chunk(3);
        session.finish();
        assert_eq!(session.phase(), VoicePhase::Idle);
        assert_eq!(stopped.get(), 1);
    }

    #[test]
    fn test_abort_after_stop_drops_pending_chunks() {
        let stopped = Rc::new(Cell::new(0));
        let mut session: VoiceSession<FakeTrack, u8> = VoiceSession::new();
        session.start(tracks(2, &stopped));
        session.push_chunk(1);
        session.stop();

        // レコーダー停止に失敗した場合
        session.abort();
        assert_eq!(stopped.get(), 2);
        assert_eq!(session.phase(), VoicePhase::Idle);
        assert!(session.take_chunks().is_none());
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let mut session: VoiceSession<FakeTrack, u8> = VoiceSession::new();
        assert!(!session.stop());
        assert!(session.take_chunks().is_none());
        assert_eq!(session.phase(), VoicePhase::Idle);
    }

    #[test]
    fn test_start_while_processing_releases_new_tracks() {
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));
        let mut session: VoiceSession<FakeTrack, u8> = VoiceSession::new();
        session.start(tracks(1, &first));
        session.stop();

        assert!(!session.start(tracks(1, &second)));
        assert_eq!(second.get(), 1);
        assert_eq!(session.phase(), VoicePhase::Processing);
    }

    #[test]
    fn test_abort_releases_and_returns_idle() {
        let stopped = Rc::new(Cell::new(0));
        let mut session: VoiceSession<FakeTrack, u8> = VoiceSession::new();
        session.start(tracks(1, &stopped));
        session.push_chunk(9);
        session.abort();

        assert_eq!(stopped.get(), 1);
        assert_eq!(session.phase(), VoicePhase::Idle);
        assert!(!session.stop());
    }

    #[test]
    fn test_only_one_playback_active() {
        let mut player = AudioPlayer::new();
        let first_paused = Rc::new(Cell::new(false));
        let second_paused = Rc::new(Cell::new(false));

        player.play(FakeAudio { name: "first", paused: first_paused.clone() });
        assert!(!first_paused.get());

        player.play(FakeAudio { name: "second", paused: second_paused.clone() });
        assert!(first_paused.get());
        assert!(!second_paused.get());
        assert_eq!(player.current().map(|a| a.name), Some("second"));

        player.stop();
        assert!(second_paused.get());
        assert!(!player.is_playing());
    }

    #[test]
    fn test_voice_preference_parsing() {
        assert!(parse_voice_enabled(Some("true")));
        assert!(!parse_voice_enabled(Some("false")));
        assert!(!parse_voice_enabled(Some("yes")));
        assert!(!parse_voice_enabled(None));
        assert!(parse_voice_enabled(Some(voice_enabled_value(true))));
    }

    #[test]
    fn test_toggle_texts() {
        assert_eq!(toggle_message(true).0, "Voice mode enabled");
        assert_eq!(toggle_message(false).0, "Voice mode disabled");
        assert_eq!(toggle_icon(false), ("mic-off", "Voice mode is OFF"));
    }

    #[test]
    fn test_audio_data_url() {
        assert_eq!(audio_data_url("SUQz"), "data:audio/mpeg;base64,SUQz");
    }
}
