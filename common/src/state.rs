//! アプリケーション状態
//!
//! ページ（タブ）の寿命の間だけ存在し、永続化しない。
//! グローバルではなく、各ハンドラに参照で渡す。
//!
//! 不変条件: `selected_papers` は常に直近の `arxiv_results` のIDの部分集合。

use crate::selection::Selection;
use crate::types::ArxivPaper;

/// `F` はプラットフォームのファイルハンドル（ブラウザは `web_sys::File`、CLIはパス）
#[derive(Debug, Clone)]
pub struct AppState<F> {
    selected_files: Vec<F>,
    selected_papers: Selection,
    arxiv_results: Vec<ArxivPaper>,
    uploaded_image: Option<String>,
}

impl<F> Default for AppState<F> {
    fn default() -> Self {
        Self {
            selected_files: Vec::new(),
            selected_papers: Selection::new(),
            arxiv_results: Vec::new(),
            uploaded_image: None,
        }
    }
}

impl<F> AppState<F> {
    pub fn new() -> Self {
        Self::default()
    }

    // --- アップロード対象 ---

    pub fn selected_files(&self) -> &[F] {
        &self.selected_files
    }

    pub fn set_selected_files(&mut self, files: Vec<F>) {
        self.selected_files = files;
    }

    pub fn clear_selected_files(&mut self) {
        self.selected_files.clear();
    }

    // --- ArXiv検索結果と選択 ---

    pub fn arxiv_results(&self) -> &[ArxivPaper] {
        &self.arxiv_results
    }

    /// 結果を差し替え、一覧から消えた選択を落とす
    pub fn set_arxiv_results(&mut self, results: Vec<ArxivPaper>) {
        self.arxiv_results = results;
        let ids: Vec<String> = self.arxiv_results.iter().map(|p| p.id.clone()).collect();
        self.selected_papers.retain_known(ids.iter().map(String::as_str));
    }

    pub fn selected_papers(&self) -> &Selection {
        &self.selected_papers
    }

    pub fn is_paper_selected(&self, paper_id: &str) -> bool {
        self.selected_papers.contains(paper_id)
    }

    fn is_listed(&self, paper_id: &str) -> bool {
        self.arxiv_results.iter().any(|p| p.id == paper_id)
    }

    /// 検索結果にないIDは無視する
    pub fn add_selected_paper(&mut self, paper_id: &str) -> bool {
        if !self.is_listed(paper_id) {
            return false;
        }
        self.selected_papers.insert(paper_id)
    }

    pub fn remove_selected_paper(&mut self, paper_id: &str) -> bool {
        self.selected_papers.remove(paper_id)
    }

    /// 選択を反転。反転後に選択状態ならtrue
    pub fn toggle_selected_paper(&mut self, paper_id: &str) -> bool {
        if self.selected_papers.contains(paper_id) {
            self.selected_papers.remove(paper_id);
            false
        } else {
            self.add_selected_paper(paper_id)
        }
    }

    pub fn clear_selected_papers(&mut self) {
        self.selected_papers.clear();
    }

    // --- チャット添付画像 ---

    pub fn uploaded_image(&self) -> Option<&str> {
        self.uploaded_image.as_deref()
    }

    /// data URL（`data:image/png;base64,...`）
    pub fn set_uploaded_image(&mut self, data_url: String) {
        self.uploaded_image = Some(data_url);
    }

    /// 送信用に取り出してクリア
    pub fn take_uploaded_image(&mut self) -> Option<String> {
        self.uploaded_image.take()
    }

    pub fn clear_uploaded_image(&mut self) {
        self.uploaded_image = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(id: &str) -> ArxivPaper {
        ArxivPaper {
            id: id.to_string(),
            title: format!("Paper {}", id),
            ..Default::default()
        }
    }

    fn state_with_results() -> AppState<String> {
        let mut state = AppState::new();
        state.set_arxiv_results(vec![paper("a"), paper("b"), paper("c")]);
        state
    }

    #[test]
    fn test_new_state_is_empty() {
        let state: AppState<String> = AppState::new();
        assert!(state.selected_files().is_empty());
        assert!(state.selected_papers().is_empty());
        assert!(state.arxiv_results().is_empty());
        assert!(state.uploaded_image().is_none());
    }

    #[test]
    fn test_toggle_twice_restores_selection() {
        let mut state = state_with_results();
        state.add_selected_paper("a");
        let before = state.selected_papers().clone();

        assert!(state.toggle_selected_paper("b"));
        assert!(!state.toggle_selected_paper("b"));
        assert_eq!(state.selected_papers(), &before);
    }

    #[test]
    fn test_unknown_id_is_not_selected() {
        let mut state = state_with_results();
        assert!(!state.add_selected_paper("zzz"));
        assert!(!state.toggle_selected_paper("zzz"));
        assert!(state.selected_papers().is_empty());
    }

    #[test]
    fn test_new_results_prune_selection() {
        let mut state = state_with_results();
        state.add_selected_paper("a");
        state.add_selected_paper("c");

        state.set_arxiv_results(vec![paper("c"), paper("d")]);
        assert_eq!(state.selected_papers().to_vec(), vec!["c"]);
    }

    #[test]
    fn test_take_uploaded_image_clears() {
        let mut state: AppState<String> = AppState::new();
        state.set_uploaded_image("data:image/png;base64,AAAA".to_string());

        assert_eq!(state.take_uploaded_image().as_deref(), Some("data:image/png;base64,AAAA"));
        assert!(state.uploaded_image().is_none());
        assert!(state.take_uploaded_image().is_none());
    }

    #[test]
    fn test_selected_files_replace() {
        let mut state: AppState<String> = AppState::new();
        state.set_selected_files(vec!["a.pdf".into(), "b.pdf".into()]);
        state.set_selected_files(vec!["c.pdf".into()]);
        assert_eq!(state.selected_files(), &["c.pdf".to_string()]);

        state.clear_selected_files();
        assert!(state.selected_files().is_empty());
    }
}
