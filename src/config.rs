use crate::error::{PaperRagError, Result};
use paper_rag_common::api::{DEFAULT_MAX_RESULTS, DEFAULT_TTS_LANG};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// ベースURLを上書きする環境変数
pub const BASE_URL_ENV: &str = "PAPER_RAG_BASE_URL";

/// 音声モードON時の応答音声の保存先
pub const DEFAULT_REPLY_FILE: &str = "voice-reply.mp3";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub max_results: u32,
    pub tts_lang: String,
    /// 取り込みは長くかかるので長め
    pub timeout_seconds: u64,
    pub voice_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            max_results: DEFAULT_MAX_RESULTS,
            tts_lang: DEFAULT_TTS_LANG.into(),
            timeout_seconds: 300,
            voice_enabled: false,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PaperRagError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("paper-rag").join("config.json"))
    }

    /// 実際に使うベースURL（環境変数を優先）
    pub fn effective_base_url(&self) -> String {
        self.base_url_with_override(std::env::var(BASE_URL_ENV).ok())
    }

    pub fn base_url_with_override(&self, env_value: Option<String>) -> String {
        match env_value {
            Some(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
            _ => self.base_url.clone(),
        }
    }

    pub fn set_base_url(&mut self, url: String) -> Result<()> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(PaperRagError::Config(format!(
                "URLは http:// または https:// で始めてください: {}",
                url
            )));
        }
        self.base_url = url.trim_end_matches('/').to_string();
        Ok(())
    }

    pub fn set_max_results(&mut self, max_results: u32) -> Result<()> {
        if max_results == 0 {
            return Err(PaperRagError::Config("max_results は1以上にしてください".into()));
        }
        self.max_results = max_results;
        Ok(())
    }

    /// 音声クエリの応答音声の保存先
    ///
    /// 指定があればそれを使い、なければ音声モードON のときだけ既定のファイル名
    pub fn reply_audio_path(&self, explicit: Option<PathBuf>) -> Option<PathBuf> {
        explicit.or_else(|| self.voice_enabled.then(|| PathBuf::from(DEFAULT_REPLY_FILE)))
    }

    /// 音声モードを反転して新しい値を返す
    pub fn toggle_voice(&mut self) -> bool {
        self.voice_enabled = !self.voice_enabled;
        self.voice_enabled
    }
}
