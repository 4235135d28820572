//! ArXiv検索と一括取り込みの操作モデル
//!
//! 状態遷移: Idle → Searching → ResultsShown → Ingesting → ResultsShown
//!
//! 取り込み中フラグは検索の状態とは別に持つ。取り込み中に検索が終わっても
//! 取り込みボタンは完了まで無効のまま。
//!
//! 取り込み完了時は成否に関わらず選択とハイライトを必ずクリアする。
//! 部分成功はこの層では区別しない。

use crate::request::RequestState;
use crate::state::AppState;
use crate::toast::ToastKind;
use crate::types::ArxivPaper;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchPhase {
    #[default]
    Idle,
    Searching,
    ResultsShown,
    Ingesting,
}

/// 結果エリアの表示
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResultsView {
    /// 初期表示（まだ検索していない）
    #[default]
    Prompt,
    Loading,
    NoResults,
    Error,
    List,
}

impl ResultsView {
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            ResultsView::NoResults => Some("No papers found"),
            ResultsView::Error => Some("Error searching papers"),
            _ => None,
        }
    }
}

/// 検索結果1件の表示モデル
#[derive(Debug, Clone, PartialEq)]
pub struct ResultItem {
    pub index: usize,
    pub id: String,
    pub title: String,
    pub authors: String,
    pub published: String,
    pub selected: bool,
}

/// 完了時のトースト
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub message: String,
    pub kind: ToastKind,
    pub refresh_stats: bool,
}

impl Feedback {
    fn success(message: String) -> Self {
        Self {
            message,
            kind: ToastKind::Success,
            refresh_stats: false,
        }
    }

    fn error(message: &str) -> Self {
        Self {
            message: message.to_string(),
            kind: ToastKind::Error,
            refresh_stats: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchModel {
    /// 検索側の状態（Ingestingにはならない）
    phase: SearchPhase,
    view: ResultsView,
    ingest: RequestState<()>,
    /// 送信中のID数
    ingest_count: usize,
}

/// 入力をトリム。空なら検索しない
pub fn normalize_query(raw: &str) -> Option<String> {
    let query = raw.trim();
    if query.is_empty() {
        None
    } else {
        Some(query.to_string())
    }
}

impl SearchModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SearchPhase {
        if self.is_ingesting() {
            SearchPhase::Ingesting
        } else {
            self.phase
        }
    }

    pub fn view(&self) -> ResultsView {
        self.view
    }

    pub fn is_ingesting(&self) -> bool {
        self.ingest.is_pending()
    }

    /// 検索開始。送信するクエリを返す（空入力はNone）
    pub fn begin_search(&mut self, raw: &str) -> Option<String> {
        let query = normalize_query(raw)?;
        self.phase = SearchPhase::Searching;
        self.view = ResultsView::Loading;
        Some(query)
    }

    /// 検索結果を反映。表示すべきトーストがあれば返す
    pub fn finish_search<F, E>(
        &mut self,
        state: &mut AppState<F>,
        result: Result<Vec<ArxivPaper>, E>,
    ) -> Option<Feedback> {
        match result {
            Ok(results) if results.is_empty() => {
                state.set_arxiv_results(results);
                self.phase = SearchPhase::Idle;
                self.view = ResultsView::NoResults;
                None
            }
            Ok(results) => {
                let count = results.len();
                state.set_arxiv_results(results);
                self.phase = SearchPhase::ResultsShown;
                self.view = ResultsView::List;
                Some(Feedback::success(format!("Found {} papers", count)))
            }
            Err(_) => {
                state.set_arxiv_results(Vec::new());
                self.phase = SearchPhase::Idle;
                self.view = ResultsView::Error;
                Some(Feedback::error("Error searching ArXiv"))
            }
        }
    }

    /// 結果のクリック。反転後に選択状態ならtrue
    pub fn toggle<F>(&self, state: &mut AppState<F>, paper_id: &str) -> bool {
        state.toggle_selected_paper(paper_id)
    }

    /// インデックス指定のクリック
    pub fn toggle_index<F>(&self, state: &mut AppState<F>, index: usize) -> Option<bool> {
        let id = state.arxiv_results().get(index)?.id.clone();
        Some(state.toggle_selected_paper(&id))
    }

    pub fn can_ingest<F>(&self, state: &AppState<F>) -> bool {
        !self.is_ingesting() && !state.selected_papers().is_empty()
    }

    /// 取り込み開始。送信するIDを選択順で返す
    pub fn begin_ingest<F>(&mut self, state: &AppState<F>) -> Option<Vec<String>> {
        if !self.can_ingest(state) || !self.ingest.try_begin() {
            return None;
        }
        let ids = state.selected_papers().to_vec();
        self.ingest_count = ids.len();
        Some(ids)
    }

    /// 取り込み完了。成否に関わらず選択をクリアする
    pub fn finish_ingest<F>(&mut self, state: &mut AppState<F>, success: bool) -> Feedback {
        let count = std::mem::take(&mut self.ingest_count);
        state.clear_selected_papers();

        if success {
            self.ingest.settle::<String>(Ok(()));
            Feedback {
                message: format!("{} papers ingested successfully!", count),
                kind: ToastKind::Success,
                refresh_stats: true,
            }
        } else {
            self.ingest.settle(Err("Error ingesting papers"));
            Feedback::error("Error ingesting papers")
        }
    }

    /// 結果一覧の表示モデル
    pub fn items<F>(&self, state: &AppState<F>) -> Vec<ResultItem> {
        state
            .arxiv_results()
            .iter()
            .enumerate()
            .map(|(index, paper)| ResultItem {
                index,
                id: paper.id.clone(),
                title: paper.title.clone(),
                authors: paper.authors_line(),
                published: paper.published.clone(),
                selected: state.is_paper_selected(&paper.id),
            })
            .collect()
    }
}
