//! PDFアップロードの操作モデル
//!
//! 状態遷移: Idle → FilesSelected → Uploading → Idle
//!
//! アップロード中は開始ボタンを無効化する（サーバ側の冪等性は前提にしない）。
//! 失敗時もロールバックはせず、選択をクリアしてIdleへ戻る。

use crate::state::AppState;
use crate::toast::ToastKind;

pub const PDF_MIME: &str = "application/pdf";

/// 選択名のプレビューに出す件数
const PREVIEW_COUNT: usize = 3;

/// プラットフォームのファイルハンドルから名前とMIMEを取り出す
pub trait PickedFile {
    fn file_name(&self) -> String;
    fn mime_type(&self) -> String;
}

pub fn is_pdf<F: PickedFile>(file: &F) -> bool {
    file.mime_type() == PDF_MIME
}

/// PDF以外は黙って捨てる
pub fn filter_pdfs<F: PickedFile>(files: impl IntoIterator<Item = F>) -> Vec<F> {
    files.into_iter().filter(is_pdf).collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadPhase {
    #[default]
    Idle,
    FilesSelected,
    Uploading,
}

/// アップロード完了時にUIへ返す結果
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub message: &'static str,
    pub kind: ToastKind,
    /// trueなら統計を再取得
    pub refresh_stats: bool,
}

/// 選択表示の見出しとファイル名プレビュー
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSummary {
    pub heading: String,
    pub preview: String,
}

pub fn selection_summary(names: &[String]) -> SelectionSummary {
    let count = names.len();
    let heading = format!("{} PDF{} selected", count, if count > 1 { "s" } else { "" });
    let mut preview = names
        .iter()
        .take(PREVIEW_COUNT)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    if count > PREVIEW_COUNT {
        preview.push_str("...");
    }
    SelectionSummary { heading, preview }
}

#[derive(Debug, Clone, Default)]
pub struct UploadModel {
    phase: UploadPhase,
}

impl UploadModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> UploadPhase {
        self.phase
    }

    pub fn is_uploading(&self) -> bool {
        self.phase == UploadPhase::Uploading
    }

    /// ボタン有効条件
    pub fn can_upload<F>(&self, state: &AppState<F>) -> bool {
        self.phase == UploadPhase::FilesSelected && !state.selected_files().is_empty()
    }

    /// ドロップ/ファイル選択。PDFだけを選択に入れ、入ったPDFの件数を返す
    ///
    /// PDFが1件もなければ状態を変えない
    pub fn select_files<F: PickedFile>(
        &mut self,
        state: &mut AppState<F>,
        files: impl IntoIterator<Item = F>,
    ) -> usize {
        if self.is_uploading() {
            return 0;
        }
        let pdfs = filter_pdfs(files);
        let count = pdfs.len();
        if count == 0 {
            return 0;
        }
        state.set_selected_files(pdfs);
        self.phase = UploadPhase::FilesSelected;
        count
    }

    pub fn summary<F: PickedFile>(&self, state: &AppState<F>) -> Option<SelectionSummary> {
        if state.selected_files().is_empty() {
            return None;
        }
        let names: Vec<String> = state.selected_files().iter().map(|f| f.file_name()).collect();
        Some(selection_summary(&names))
    }

    /// アップロード開始。開始できたらtrue
    pub fn begin_upload<F>(&mut self, state: &AppState<F>) -> bool {
        if !self.can_upload(state) {
            return false;
        }
        self.phase = UploadPhase::Uploading;
        true
    }

    /// 完了処理。成否に関わらず選択をクリアしてIdleへ
    ///
    /// `success` は通信成功かつレスポンスの `success` フラグ
    pub fn finish_upload<F>(&mut self, state: &mut AppState<F>, success: bool) -> UploadOutcome {
        self.phase = UploadPhase::Idle;
        state.clear_selected_files();
        if success {
            UploadOutcome {
                message: "Papers uploaded and indexed successfully!",
                kind: ToastKind::Success,
                refresh_stats: true,
            }
        } else {
            UploadOutcome {
                message: "Error uploading files",
                kind: ToastKind::Error,
                refresh_stats: false,
            }
        }
    }
}
