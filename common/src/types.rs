//! バックエンドAPIの型定義
//!
//! ブラウザ(WASM)とCLIで共有されるリクエスト/レスポンス型:
//! - アップロード / ArXiv検索・取り込み
//! - テキスト・画像クエリ / 統計
//! - 論文一覧・詳細・削除
//! - 音声クエリ
//!
//! レスポンスはバックエンドからの素通しなので、欠けたフィールドはデフォルト値で受ける。

use serde::{Deserialize, Serialize};

/// ArXiv検索結果1件
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArxivPaper {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub published: String,
}

impl ArxivPaper {
    /// 著者名を ", " で連結
    pub fn authors_line(&self) -> String {
        self.authors.join(", ")
    }
}

/// 取り込み済み論文1件（論文管理モーダル用）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperRecord {
    pub paper_id: String,
    pub title: String,
    pub chunk_count: u64,
    pub total_size: u64,
}

/// 論文のチャンク（テキスト/図の断片）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Chunk {
    #[serde(rename = "type")]
    pub chunk_type: String,
    pub content: String,
}

// ============================================
// リクエスト
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArxivSearchRequest {
    pub query: String,
    pub max_results: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestRequest {
    pub paper_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    /// data URLプレフィックスを除いたBase64
    pub image_base64: Option<String>,
}

// ============================================
// レスポンス
// ============================================

/// アップロードで処理されたファイル
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadedFile {
    pub filename: String,
    pub paper_id: String,
    pub chunks_added: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub files: Vec<UploadedFile>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArxivSearchResponse {
    pub success: bool,
    pub count: u64,
    pub results: Vec<ArxivPaper>,
}

/// 取り込み成功した論文
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestedPaper {
    pub paper_id: String,
    pub chunks_added: u64,
    pub status: String,
}

/// 取り込み失敗した論文
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FailedPaper {
    pub paper_id: String,
    pub error: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestResponse {
    pub success: bool,
    pub message: String,
    pub papers: Vec<IngestedPaper>,
    pub failed: Vec<FailedPaper>,
    pub total_requested: u64,
    pub successful: u64,
    pub failed_count: u64,
}

/// 回答の根拠チャンク
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Source {
    pub paper_id: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryResponse {
    pub response: String,
    pub sources: Vec<Source>,
    pub image_caption: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub papers_count: u64,
    pub chunks_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PapersListResponse {
    pub success: bool,
    pub papers: Vec<PaperRecord>,
    pub total_papers: u64,
    pub total_chunks: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperDetailResponse {
    pub success: bool,
    pub paper: PaperRecord,
    pub total_chunks: u64,
    pub chunks: Vec<Chunk>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteResponse {
    pub success: bool,
    pub chunks_deleted: u64,
    pub papers_deleted: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceQueryResponse {
    pub transcribed_text: String,
    pub response_text: String,
    pub route: String,
    /// 秒
    pub latency: f64,
    pub audio_base64: Option<String>,
}
