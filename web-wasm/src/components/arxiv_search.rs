//! ArXiv検索・取り込みコンポーネント

use crate::api;
use crate::app::AppContext;
use leptos::prelude::*;
use leptos::task::spawn_local;
use paper_rag_common::api::DEFAULT_MAX_RESULTS;
use paper_rag_common::search::ResultsView;
use paper_rag_common::SearchModel;

#[component]
pub fn ArxivSearch(ctx: AppContext) -> impl IntoView {
    let search = RwSignal::new(SearchModel::new());
    let (query, set_query) = signal(String::new());

    let run_search = move || {
        let Some(q) = search.try_update(|s| s.begin_search(&query.get_untracked())).flatten() else {
            return;
        };

        spawn_local(async move {
            let result = api::search_arxiv(&q, DEFAULT_MAX_RESULTS)
                .await
                .map(|resp| resp.results);
            if let Err(e) = &result {
                gloo::console::error!("Search error:", e.to_string());
            }

            let feedback = ctx
                .state
                .try_update(|state| search.try_update(|s| s.finish_search(state, result)))
                .flatten()
                .flatten();
            if let Some(fb) = feedback {
                ctx.toast(fb.message, fb.kind);
            }
        });
    };

    let on_ingest = move |_| {
        let ids = ctx
            .state
            .with_untracked(|state| search.try_update(|s| s.begin_ingest(state)))
            .flatten();
        let Some(ids) = ids else {
            return;
        };

        spawn_local(async move {
            let success = match api::ingest_papers(&ids).await {
                Ok(resp) => resp.success,
                Err(e) => {
                    gloo::console::error!("Ingest error:", e.to_string());
                    false
                }
            };

            let feedback = ctx
                .state
                .try_update(|state| search.try_update(|s| s.finish_ingest(state, success)))
                .flatten();
            if let Some(fb) = feedback {
                ctx.toast(fb.message, fb.kind);
                if fb.refresh_stats {
                    ctx.refresh_stats();
                }
            }
        });
    };

    let items = move || ctx.state.with(|state| search.with(|s| s.items(state)));
    let can_ingest = move || ctx.state.with(|state| search.with(|s| s.can_ingest(state)));
    let is_ingesting = move || search.with(|s| s.is_ingesting());

    let toggle = move |index: usize| {
        ctx.state.update(|state| {
            search.with_untracked(|s| {
                s.toggle_index(state, index);
            });
        });
    };

    view! {
        <div class="search-box">
            <input
                type="text"
                id="arxivSearch"
                placeholder="Search ArXiv papers..."
                prop:value=move || query.get()
                on:input=move |ev| set_query.set(event_target_value(&ev))
                on:keydown=move |ev| {
                    if ev.key() == "Enter" {
                        run_search();
                    }
                }
            />
            <button class="icon-btn" id="searchButton" on:click=move |_| run_search()>
                <i data-lucide="search" size="20"></i>
            </button>
        </div>

        <div class="arxiv-results" id="arxivResults">
            {move || match search.with(|s| s.view()) {
                ResultsView::Prompt => ().into_any(),
                ResultsView::Loading => view! {
                    <div class="results-placeholder">
                        <div class="loading"></div>
                    </div>
                }
                .into_any(),
                shown @ (ResultsView::NoResults | ResultsView::Error) => view! {
                    <div class="results-placeholder">
                        <p>{shown.placeholder()}</p>
                    </div>
                }
                .into_any(),
                ResultsView::List => items()
                    .into_iter()
                    .map(|item| {
                        let index = item.index;
                        view! {
                            <div
                                class=if item.selected { "arxiv-paper selected" } else { "arxiv-paper" }
                                data-index=index.to_string()
                                on:click=move |_| toggle(index)
                            >
                                <div class="paper-title">{item.title}</div>
                                <div class="paper-authors">{item.authors}</div>
                                <div class="paper-date">{item.published}</div>
                            </div>
                        }
                    })
                    .collect_view()
                    .into_any(),
            }}
        </div>

        <button
            class="btn btn-primary"
            id="ingestBtn"
            disabled=move || !can_ingest()
            on:click=on_ingest
        >
            <Show
                when=is_ingesting
                fallback=|| view! {
                    <i data-lucide="database" size="20"></i>
                    " Ingest Selected Papers"
                }
            >
                <div class="loading"></div>
                " Ingesting..."
            </Show>
        </button>
    }
}
