//! バックエンドAPIの契約（エンドポイントと既定値）
//!
//! ブラウザ版(fetch)とCLI版(reqwest)はどちらもここのパスとリクエスト生成を使う。
//! 1呼び出し = 1リクエスト。リトライ・バッチ化はしない。

use crate::types::{ArxivSearchRequest, IngestRequest};

pub const UPLOAD_PATH: &str = "/api/ingest/upload";
pub const ARXIV_SEARCH_PATH: &str = "/api/arxiv/search";
pub const ARXIV_INGEST_PATH: &str = "/api/arxiv/ingest";
pub const QUERY_TEXT_PATH: &str = "/api/query/text";
pub const STATS_PATH: &str = "/api/stats";
pub const PAPERS_LIST_PATH: &str = "/api/papers/list";
pub const PAPERS_DELETE_PATH: &str = "/api/papers/delete";
pub const VOICE_QUERY_PATH: &str = "/api/voice/query";
pub const VOICE_SYNTHESIZE_PATH: &str = "/api/voice/synthesize";

/// マルチパートのフィールド名
pub const UPLOAD_FIELD: &str = "files";
pub const AUDIO_FIELD: &str = "audio";
pub const AUDIO_FILE_NAME: &str = "recording.webm";
pub const AUDIO_MIME: &str = "audio/webm";

pub const DEFAULT_MAX_RESULTS: u32 = 20;
pub const DEFAULT_TTS_LANG: &str = "en";

/// 論文詳細のパス
pub fn paper_path(paper_id: &str) -> String {
    format!("/api/papers/{}", paper_id)
}

/// ベースURLとパスを結合（末尾スラッシュは1つに揃える）
pub fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

pub fn search_request(query: &str, max_results: u32) -> ArxivSearchRequest {
    ArxivSearchRequest {
        query: query.to_string(),
        max_results,
    }
}

pub fn ingest_request(paper_ids: &[String]) -> IngestRequest {
    IngestRequest {
        paper_ids: paper_ids.to_vec(),
    }
}
