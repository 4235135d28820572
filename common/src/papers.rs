//! 論文管理モーダルのモデル
//!
//! 一覧・選択・削除・詳細表示。選択はモーダル内だけの状態で、閉じるとクリアされる。
//! 削除は確認必須の1リクエストで、取り消しはない。

use crate::selection::Selection;
use crate::toast::ToastKind;
use crate::types::{Chunk, DeleteResponse, PaperDetailResponse, PaperRecord, PapersListResponse};

/// 詳細に表示するチャンク数
pub const CHUNK_PREVIEW_LIMIT: usize = 10;
/// チャンク本文の表示文字数
pub const CHUNK_PREVIEW_CHARS: usize = 300;

pub const MSG_LOAD_FAILED: &str = "Error loading papers. Please try again.";
pub const MSG_DELETE_MANY_FAILED: &str = "Error deleting papers. Please try again.";
pub const MSG_DELETE_ONE_FAILED: &str = "Error deleting paper. Please try again.";
pub const MSG_DETAIL_FAILED: &str = "Error loading paper details";

/// 一覧エリアの表示
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListView {
    #[default]
    Loading,
    Empty,
    Error,
    List,
}

/// バイト数を人が読める形に
///
/// 0 → "0 Bytes"、以降は1024単位で小数2桁まで
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let mut i = 0;
    let mut unit = 1u64;
    while i + 1 < UNITS.len() && bytes >= unit * 1024 {
        unit *= 1024;
        i += 1;
    }
    let value = (bytes as f64 / unit as f64 * 100.0).round() / 100.0;
    format!("{} {}", value, UNITS[i])
}

/// 削除対象
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteTarget {
    Selected(Vec<String>),
    Single(String),
}

impl DeleteTarget {
    pub fn ids(&self) -> Vec<String> {
        match self {
            DeleteTarget::Selected(ids) => ids.clone(),
            DeleteTarget::Single(id) => vec![id.clone()],
        }
    }
}

/// 削除完了時の結果
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteOutcome {
    pub message: String,
    pub kind: ToastKind,
    /// 一覧を再読み込みし、外部の統計更新フックを呼ぶ
    pub reload: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PapersManager {
    papers: Vec<PaperRecord>,
    selection: Selection,
    open: bool,
    view: ListView,
    count_label: Option<String>,
}

impl PapersManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn papers(&self) -> &[PaperRecord] {
        &self.papers
    }

    pub fn view(&self) -> ListView {
        self.view
    }

    /// ツールバーの件数表示
    pub fn count_label(&self) -> &str {
        self.count_label.as_deref().unwrap_or("Loading...")
    }

    /// モーダルを開く（呼び出し側で一覧を読み込む）
    pub fn open(&mut self) {
        self.open = true;
        self.view = ListView::Loading;
    }

    /// モーダルを閉じて選択をクリア
    pub fn close(&mut self) {
        self.open = false;
        self.selection.clear();
    }

    /// 一覧レスポンスを反映。`success` がfalseなら現状維持
    pub fn set_listing(&mut self, listing: PapersListResponse) {
        if !listing.success {
            return;
        }
        self.count_label = Some(format!(
            "{} papers ({} chunks)",
            listing.total_papers, listing.total_chunks
        ));
        self.papers = listing.papers;
        let ids: Vec<String> = self.papers.iter().map(|p| p.paper_id.clone()).collect();
        self.selection.retain_known(ids.iter().map(String::as_str));
        self.view = if self.papers.is_empty() {
            ListView::Empty
        } else {
            ListView::List
        };
    }

    pub fn set_load_error(&mut self) {
        self.view = ListView::Error;
    }

    pub fn is_selected(&self, paper_id: &str) -> bool {
        self.selection.contains(paper_id)
    }

    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    /// チェックボックスの切り替え（一覧にないIDは無視）
    pub fn toggle(&mut self, paper_id: &str) -> bool {
        if !self.papers.iter().any(|p| p.paper_id == paper_id) {
            return false;
        }
        self.selection.toggle(paper_id)
    }

    pub fn all_selected(&self) -> bool {
        !self.papers.is_empty() && self.selection.len() == self.papers.len()
    }

    /// 全選択。既に全選択なら全解除
    pub fn select_all(&mut self) {
        if self.all_selected() {
            self.selection.clear();
        } else {
            for paper in &self.papers {
                self.selection.insert(&paper.paper_id);
            }
        }
    }

    /// 全選択ボタンのラベルとアイコン
    pub fn select_all_label(&self) -> (&'static str, &'static str) {
        if self.all_selected() {
            ("Deselect All", "square")
        } else {
            ("Select All", "check-square")
        }
    }

    pub fn can_delete(&self) -> bool {
        !self.selection.is_empty()
    }

    /// 選択分の削除対象（選択なしはNone）
    pub fn delete_selected_target(&self) -> Option<DeleteTarget> {
        if self.selection.is_empty() {
            return None;
        }
        Some(DeleteTarget::Selected(self.selection.to_vec()))
    }

    /// 削除前の確認文
    pub fn confirm_message(&self, target: &DeleteTarget) -> String {
        match target {
            DeleteTarget::Selected(ids) => format!(
                "Are you sure you want to delete {} paper(s)?\nThis will remove all chunks and cannot be undone.",
                ids.len()
            ),
            DeleteTarget::Single(id) => {
                let paper = self.papers.iter().find(|p| &p.paper_id == id);
                let title = paper
                    .map(|p| p.title.as_str())
                    .filter(|t| !t.is_empty())
                    .unwrap_or(id.as_str());
                let chunks = paper.map(|p| p.chunk_count).unwrap_or(0);
                format!(
                    "Delete paper \"{}\"?\nThis will remove {} chunks and cannot be undone.",
                    title, chunks
                )
            }
        }
    }

    /// 削除レスポンスを反映
    pub fn finish_delete<E>(&mut self, target: &DeleteTarget, result: Result<DeleteResponse, E>) -> Option<DeleteOutcome> {
        match result {
            Ok(resp) if resp.success => {
                let message = match target {
                    DeleteTarget::Selected(_) => format!(
                        "Successfully deleted {} chunks from {} papers",
                        resp.chunks_deleted,
                        resp.papers_deleted.len()
                    ),
                    DeleteTarget::Single(_) => "Successfully deleted paper".to_string(),
                };
                if matches!(target, DeleteTarget::Selected(_)) {
                    self.selection.clear();
                }
                Some(DeleteOutcome {
                    message,
                    kind: ToastKind::Success,
                    reload: true,
                })
            }
            // success=false は何も表示しない
            Ok(_) => None,
            Err(_) => Some(DeleteOutcome {
                message: match target {
                    DeleteTarget::Selected(_) => MSG_DELETE_MANY_FAILED,
                    DeleteTarget::Single(_) => MSG_DELETE_ONE_FAILED,
                }
                .to_string(),
                kind: ToastKind::Error,
                reload: false,
            }),
        }
    }
}

/// 一覧の1行
#[derive(Debug, Clone, PartialEq)]
pub struct PaperRow {
    pub paper_id: String,
    pub title: String,
    pub chunks_label: String,
    pub size_label: String,
    pub selected: bool,
}

impl PapersManager {
    pub fn rows(&self) -> Vec<PaperRow> {
        self.papers
            .iter()
            .map(|p| PaperRow {
                paper_id: p.paper_id.clone(),
                title: p.title.clone(),
                chunks_label: format!("{} chunks", p.chunk_count),
                size_label: format_bytes(p.total_size),
                selected: self.selection.contains(&p.paper_id),
            })
            .collect()
    }
}

/// 詳細表示のチャンクプレビュー
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkPreview {
    pub label: String,
    pub chunk_type: String,
    pub excerpt: String,
}

/// 論文詳細（読み取り専用）
#[derive(Debug, Clone, PartialEq)]
pub struct PaperDetailView {
    pub title: String,
    pub paper_id: String,
    pub total_chunks: u64,
    pub previews: Vec<ChunkPreview>,
    /// 表示しきれなかったチャンク数
    pub remaining: usize,
}

impl PaperDetailView {
    pub fn remaining_label(&self) -> Option<String> {
        (self.remaining > 0).then(|| format!("And {} more chunks...", self.remaining))
    }
}

fn excerpt(chunk: &Chunk) -> String {
    let mut text: String = chunk.content.chars().take(CHUNK_PREVIEW_CHARS).collect();
    text.push_str("...");
    text
}

/// 詳細レスポンスから表示モデルを作る（`success` がfalseならNone）
pub fn detail_view(detail: &PaperDetailResponse) -> Option<PaperDetailView> {
    if !detail.success {
        return None;
    }
    let previews = detail
        .chunks
        .iter()
        .take(CHUNK_PREVIEW_LIMIT)
        .enumerate()
        .map(|(idx, chunk)| ChunkPreview {
            label: format!("Chunk {}", idx + 1),
            chunk_type: chunk.chunk_type.clone(),
            excerpt: excerpt(chunk),
        })
        .collect();

    Some(PaperDetailView {
        title: detail.paper.title.clone(),
        paper_id: detail.paper.paper_id.clone(),
        total_chunks: detail.total_chunks,
        previews,
        remaining: detail.chunks.len().saturating_sub(CHUNK_PREVIEW_LIMIT),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, chunks: u64) -> PaperRecord {
        PaperRecord {
            paper_id: id.to_string(),
            title: format!("Title {}", id),
            chunk_count: chunks,
            total_size: chunks * 1000,
        }
    }

    fn listing(papers: Vec<PaperRecord>) -> PapersListResponse {
        let total_chunks = papers.iter().map(|p| p.chunk_count).sum();
        PapersListResponse {
            success: true,
            total_papers: papers.len() as u64,
            total_chunks,
            papers,
        }
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(512), "512 Bytes");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1_048_576), "1 MB");
        assert_eq!(format_bytes(1234567), "1.18 MB");
        assert_eq!(format_bytes(5 * 1024 * 1024 * 1024 * 1024), "5120 GB");
    }

    #[test]
    fn test_listing_and_count_label() {
        let mut mgr = PapersManager::new();
        mgr.open();
        assert_eq!(mgr.view(), ListView::Loading);
        assert_eq!(mgr.count_label(), "Loading...");

        mgr.set_listing(listing(vec![record("a", 10), record("b", 5)]));
        assert_eq!(mgr.view(), ListView::List);
        assert_eq!(mgr.count_label(), "2 papers (15 chunks)");
        assert_eq!(mgr.rows()[0].chunks_label, "10 chunks");
    }

    #[test]
    fn test_select_all_toggles() {
        let mut mgr = PapersManager::new();
        mgr.set_listing(listing(vec![record("a", 1), record("b", 1)]));

        assert_eq!(mgr.select_all_label().0, "Select All");
        mgr.select_all();
        assert!(mgr.all_selected());
        assert_eq!(mgr.select_all_label(), ("Deselect All", "square"));

        mgr.select_all();
        assert_eq!(mgr.selected_count(), 0);
        assert!(!mgr.can_delete());
    }

    #[test]
    fn test_toggle_updates_all_selected() {
        let mut mgr = PapersManager::new();
        mgr.set_listing(listing(vec![record("a", 1), record("b", 1)]));
        mgr.toggle("a");
        assert!(!mgr.all_selected());
        mgr.toggle("b");
        assert!(mgr.all_selected());
        assert!(!mgr.toggle("ghost"));
    }

    #[test]
    fn test_close_clears_selection() {
        let mut mgr = PapersManager::new();
        mgr.open();
        mgr.set_listing(listing(vec![record("a", 1)]));
        mgr.toggle("a");
        mgr.close();
        assert!(!mgr.is_open());
        assert_eq!(mgr.selected_count(), 0);
    }

    #[test]
    fn test_confirm_messages() {
        let mut mgr = PapersManager::new();
        mgr.set_listing(listing(vec![record("a", 7)]));

        let batch = DeleteTarget::Selected(vec!["a".into(), "b".into()]);
        assert_eq!(
            mgr.confirm_message(&batch),
            "Are you sure you want to delete 2 paper(s)?\nThis will remove all chunks and cannot be undone."
        );

        let single = DeleteTarget::Single("a".into());
        assert_eq!(
            mgr.confirm_message(&single),
            "Delete paper \"Title a\"?\nThis will remove 7 chunks and cannot be undone."
        );

        let unknown = DeleteTarget::Single("zz".into());
        assert!(mgr.confirm_message(&unknown).starts_with("Delete paper \"zz\"?\nThis will remove 0 chunks"));
    }

    #[test]
    fn test_delete_all_leaves_empty_state() {
        let mut mgr = PapersManager::new();
        mgr.open();
        mgr.set_listing(listing(vec![record("a", 3), record("b", 4)]));
        mgr.select_all();

        let target = mgr.delete_selected_target().unwrap();
        assert_eq!(target.ids(), vec!["a", "b"]);

        let resp = DeleteResponse {
            success: true,
            chunks_deleted: 7,
            papers_deleted: vec!["a".into(), "b".into()],
        };
        let outcome = mgr.finish_delete::<String>(&target, Ok(resp)).unwrap();
        assert_eq!(outcome.message, "Successfully deleted 7 chunks from 2 papers");
        assert!(outcome.reload);

        // 再読み込み
        mgr.set_listing(listing(vec![]));
        assert_eq!(mgr.view(), ListView::Empty);
        assert_eq!(mgr.count_label(), "0 papers (0 chunks)");
        assert_eq!(mgr.selected_count(), 0);
    }

    #[test]
    fn test_delete_failure() {
        let mut mgr = PapersManager::new();
        let target = DeleteTarget::Single("a".into());
        let outcome = mgr.finish_delete(&target, Err("offline")).unwrap();
        assert_eq!(outcome.message, MSG_DELETE_ONE_FAILED);
        assert!(!outcome.reload);

        let unsuccessful = DeleteResponse::default();
        assert!(mgr.finish_delete::<String>(&target, Ok(unsuccessful)).is_none());
    }

    #[test]
    fn test_reload_prunes_missing_selection() {
        let mut mgr = PapersManager::new();
        mgr.set_listing(listing(vec![record("a", 1), record("b", 1)]));
        mgr.toggle("a");
        mgr.toggle("b");
        mgr.set_listing(listing(vec![record("b", 1)]));
        assert!(!mgr.is_selected("a"));
        assert!(mgr.is_selected("b"));
    }

    #[test]
    fn test_unsuccessful_listing_is_ignored() {
        let mut mgr = PapersManager::new();
        mgr.open();
        mgr.set_listing(PapersListResponse::default());
        assert_eq!(mgr.view(), ListView::Loading);
    }

    #[test]
    fn test_detail_view_caps_previews() {
        let chunks: Vec<Chunk> = (0..13)
            .map(|i| Chunk {
                chunk_type: "text".into(),
                content: format!("content {}", i),
            })
            .collect();
        let detail = PaperDetailResponse {
            success: true,
            paper: record("p", 13),
            total_chunks: 13,
            chunks,
        };

        let view = detail_view(&detail).unwrap();
        assert_eq!(view.previews.len(), 10);
        assert_eq!(view.previews[0].label, "Chunk 1");
        assert_eq!(view.previews[0].excerpt, "content 0...");
        assert_eq!(view.remaining, 3);
        assert_eq!(view.remaining_label().as_deref(), Some("And 3 more chunks..."));
    }

    #[test]
    fn test_detail_excerpt_truncates_on_char_boundary() {
        let detail = PaperDetailResponse {
            success: true,
            paper: record("p", 1),
            total_chunks: 1,
            chunks: vec![Chunk {
                chunk_type: "text".into(),
                content: "あ".repeat(400),
            }],
        };
        let view = detail_view(&detail).unwrap();
        assert_eq!(view.previews[0].excerpt.chars().count(), 303);
        assert!(view.remaining_label().is_none());
    }
}
