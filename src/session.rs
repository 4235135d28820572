//! 端末クライアントのセッション
//!
//! ブラウザ版の各パネルと同じ操作モデル（common）をAPIクライアントにつなぐ。
//! 非同期処理の失敗はここで受け止めてログに残し、汎用メッセージの結果として返す。

use crate::api::ApiClient;
use crate::error::Result;
use crate::scanner::{mime_from_path, LocalFile};
use base64::Engine;
use paper_rag_common::chat::{Conversation, MessageId};
use paper_rag_common::papers::{self, DeleteOutcome, DeleteTarget, PaperDetailView, PapersManager};
use paper_rag_common::search::{Feedback, SearchModel};
use paper_rag_common::state::AppState;
use paper_rag_common::toast::ToastKind;
use paper_rag_common::types::{IngestResponse, Stats, UploadResponse};
use paper_rag_common::upload::{UploadModel, UploadOutcome};
use paper_rag_common::voice;

/// アップロード結果
#[derive(Debug)]
pub struct UploadReport {
    pub outcome: UploadOutcome,
    pub response: Option<UploadResponse>,
    pub stats: Option<Stats>,
}

/// 一括取り込み結果
#[derive(Debug)]
pub struct IngestReport {
    pub feedback: Feedback,
    pub response: Option<IngestResponse>,
    pub stats: Option<Stats>,
}

/// 音声クエリ結果
#[derive(Debug)]
pub struct VoiceReport {
    pub message: &'static str,
    pub kind: ToastKind,
    pub messages: Option<(MessageId, MessageId)>,
    pub audio_base64: Option<String>,
}

pub struct Session {
    api: ApiClient,
    pub state: AppState<LocalFile>,
    pub upload: UploadModel,
    pub search: SearchModel,
    pub conversation: Conversation,
    pub papers: PapersManager,
}

impl Session {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: AppState::new(),
            upload: UploadModel::new(),
            search: SearchModel::new(),
            conversation: Conversation::new(),
            papers: PapersManager::new(),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// 統計の再取得（失敗はログのみ）
    pub async fn refresh_stats(&self) -> Option<Stats> {
        match self.api.stats().await {
            Ok(stats) => Some(stats),
            Err(e) => {
                tracing::warn!("Error loading stats: {}", e);
                None
            }
        }
    }

    // ============================================
    // アップロード
    // ============================================

    pub fn select_files(&mut self, files: Vec<LocalFile>) -> usize {
        self.upload.select_files(&mut self.state, files)
    }

    /// 選択中のPDFをアップロード。開始できなければNone
    pub async fn upload(&mut self) -> Option<UploadReport> {
        if !self.upload.begin_upload(&self.state) {
            return None;
        }

        let result = self.api.upload_pdfs(self.state.selected_files()).await;
        let (success, response) = match result {
            Ok(resp) => (resp.success, Some(resp)),
            Err(e) => {
                tracing::warn!("Upload error: {}", e);
                (false, None)
            }
        };

        let outcome = self.upload.finish_upload(&mut self.state, success);
        let stats = if outcome.refresh_stats {
            self.refresh_stats().await
        } else {
            None
        };
        Some(UploadReport {
            outcome,
            response,
            stats,
        })
    }

    // ============================================
    // ArXiv検索・取り込み
    // ============================================

    /// 検索。空クエリはNone（何もしない）
    pub async fn search(&mut self, raw: &str, max_results: u32) -> Option<Option<Feedback>> {
        let query = self.search.begin_search(raw)?;
        let result = self
            .api
            .search_arxiv(&query, max_results)
            .await
            .map(|resp| resp.results);
        if let Err(e) = &result {
            tracing::warn!("Search error: {}", e);
        }
        Some(self.search.finish_search(&mut self.state, result))
    }

    pub fn toggle_result(&mut self, index: usize) -> Option<bool> {
        self.search.toggle_index(&mut self.state, index)
    }

    /// 選択中の論文を一括取り込み。選択がなければNone
    pub async fn ingest_selected(&mut self) -> Option<IngestReport> {
        let ids = self.search.begin_ingest(&self.state)?;

        let (success, response) = match self.api.ingest_papers(&ids).await {
            Ok(resp) => (resp.success, Some(resp)),
            Err(e) => {
                tracing::warn!("Ingest error: {}", e);
                (false, None)
            }
        };

        let feedback = self.search.finish_ingest(&mut self.state, success);
        let stats = if feedback.refresh_stats {
            self.refresh_stats().await
        } else {
            None
        };
        Some(IngestReport {
            feedback,
            response,
            stats,
        })
    }

    // ============================================
    // チャット
    // ============================================

    /// 画像を添付（data URLとして保持）
    pub fn attach_image(&mut self, file: &LocalFile) -> Result<()> {
        let bytes = file.read()?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        let data_url = format!("data:{};base64,{}", mime_from_path(&file.path), encoded);
        self.state.set_uploaded_image(data_url);
        Ok(())
    }

    /// 送信して応答を待つ。送るものがなければNone、あればAIメッセージのID
    pub async fn ask(&mut self, input: &str) -> Option<MessageId> {
        let pending = self.conversation.begin_send(&mut self.state, input)?;
        let result = self.api.query_text(&pending.request).await;
        if let Err(e) = &result {
            tracing::warn!("Query error: {}", e);
        }
        self.conversation.complete(pending.typing_id, result);
        Some(pending.typing_id)
    }

    // ============================================
    // 音声
    // ============================================

    pub async fn voice_query(&mut self, file: &LocalFile) -> VoiceReport {
        let result = match file.read() {
            Ok(bytes) => {
                self.api
                    .voice_query(bytes, &file.file_name, mime_from_path(&file.path))
                    .await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(reply) => {
                let ids = self.conversation.push_voice_reply(&reply);
                VoiceReport {
                    message: voice::MSG_QUERY_DONE,
                    kind: ToastKind::Success,
                    messages: Some(ids),
                    audio_base64: reply.audio_base64.filter(|a| !a.is_empty()),
                }
            }
            Err(e) => {
                tracing::warn!("Error processing voice query: {}", e);
                VoiceReport {
                    message: voice::MSG_QUERY_FAILED,
                    kind: ToastKind::Error,
                    messages: None,
                    audio_base64: None,
                }
            }
        }
    }

    // ============================================
    // 論文管理
    // ============================================

    /// 一覧を読み込む。失敗時はエラー表示にしてfalse
    pub async fn load_papers(&mut self) -> bool {
        match self.api.list_papers().await {
            Ok(listing) => {
                self.papers.set_listing(listing);
                true
            }
            Err(e) => {
                tracing::warn!("Error loading papers: {}", e);
                self.papers.set_load_error();
                false
            }
        }
    }

    /// 確認済みの削除を実行。成功時は一覧を再読み込みし統計も更新する
    pub async fn delete(&mut self, target: &DeleteTarget) -> (Option<DeleteOutcome>, Option<Stats>) {
        let result = self.api.delete_papers(&target.ids()).await;
        if let Err(e) = &result {
            tracing::warn!("Error deleting papers: {}", e);
        }
        let outcome = self.papers.finish_delete(target, result);

        let mut stats = None;
        if outcome.as_ref().is_some_and(|o| o.reload) {
            self.load_papers().await;
            stats = self.refresh_stats().await;
        }
        (outcome, stats)
    }

    pub async fn paper_detail(&self, paper_id: &str) -> Option<PaperDetailView> {
        match self.api.paper_detail(paper_id).await {
            Ok(detail) => papers::detail_view(&detail),
            Err(e) => {
                tracing::warn!("Error loading paper details: {}", e);
                None
            }
        }
    }
}
