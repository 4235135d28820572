//! 論文管理モーダル（一覧・選択削除・詳細）

use crate::api;
use crate::app::AppContext;
use leptos::prelude::*;
use leptos::task::spawn_local;
use paper_rag_common::papers::{self, DeleteTarget, ListView, PaperDetailView, MSG_DETAIL_FAILED};
use paper_rag_common::{RequestState, ToastKind};

fn load_papers(ctx: AppContext) {
    spawn_local(async move {
        match api::list_papers().await {
            Ok(listing) => ctx.papers.update(|m| m.set_listing(listing)),
            Err(e) => {
                gloo::console::error!("Error loading papers:", e.to_string());
                ctx.papers.update(|m| m.set_load_error());
            }
        }
    });
}

/// モーダルを開いて一覧を読み込む
pub fn open_papers(ctx: AppContext) {
    ctx.papers.update(|m| m.open());
    load_papers(ctx);
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// 確認ダイアログの後に削除
fn delete(ctx: AppContext, target: DeleteTarget) {
    let message = ctx.papers.with_untracked(|m| m.confirm_message(&target));
    if !confirm(&message) {
        return;
    }

    spawn_local(async move {
        let result = api::delete_papers(&target.ids()).await;
        if let Err(e) = &result {
            gloo::console::error!("Error deleting papers:", e.to_string());
        }

        let outcome = ctx
            .papers
            .try_update(|m| m.finish_delete(&target, result))
            .flatten();
        if let Some(outcome) = outcome {
            ctx.notify(outcome.message, outcome.kind);
            if outcome.reload {
                load_papers(ctx);
                ctx.refresh_stats();
            }
        }
    });
}

#[component]
fn PaperDetail(view: PaperDetailView, on_close: impl Fn() + Copy + Send + Sync + 'static) -> impl IntoView {
    let remaining = view.remaining_label();
    let previews = view
        .previews
        .into_iter()
        .map(|p| {
            view! {
                <div class="chunk-preview">
                    <div class="chunk-header">
                        <span class="chunk-label">{p.label}</span>
                        <span class="chunk-type">{p.chunk_type}</span>
                    </div>
                    <div class="chunk-content">{p.excerpt}</div>
                </div>
            }
        })
        .collect_view();

    view! {
        <div class="paper-details-modal">
            <div class="papers-modal-overlay" on:click=move |_| on_close()></div>
            <div class="paper-details-content">
                <div class="paper-details-header">
                    <h2>
                        <i data-lucide="file-text"></i>
                        {view.title}
                    </h2>
                    <button class="papers-modal-close" on:click=move |_| on_close()>
                        <i data-lucide="x"></i>
                    </button>
                </div>
                <div class="paper-details-meta">
                    <p><strong>"Paper ID: "</strong>{view.paper_id}</p>
                    <p><strong>"Total Chunks: "</strong>{view.total_chunks}</p>
                </div>
                <div class="paper-details-chunks">
                    <h3>"Chunks Preview"</h3>
                    {previews}
                    {remaining.map(|label| view! { <p class="chunks-more">{label}</p> })}
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn PapersModal(ctx: AppContext) -> impl IntoView {
    let detail = RwSignal::new(RequestState::<PaperDetailView>::Idle);
    let detail_pending = move || detail.with(|d| d.is_pending());

    let view_paper = move |paper_id: String| {
        if !detail.try_update(|d| d.try_begin()).unwrap_or(false) {
            return;
        }
        spawn_local(async move {
            match api::paper_detail(&paper_id).await {
                Ok(resp) => match papers::detail_view(&resp) {
                    Some(view) => detail.update(|d| d.settle::<String>(Ok(view))),
                    // success=false は何もしない
                    None => detail.update(|d| d.reset()),
                },
                Err(e) => {
                    gloo::console::error!("Error loading paper details:", e.to_string());
                    ctx.notify(MSG_DETAIL_FAILED, ToastKind::Error);
                    detail.update(|d| d.settle(Err(e)));
                }
            }
        });
    };

    let close = move || ctx.papers.update(|m| m.close());
    let is_open = move || ctx.papers.with(|m| m.is_open());
    let list_view = move || ctx.papers.with(|m| m.view());

    let on_delete_selected = move |_| {
        if let Some(target) = ctx.papers.with_untracked(|m| m.delete_selected_target()) {
            delete(ctx, target);
        }
    };

    view! {
        <Show when=is_open>
            <div id="papers-modal" class="papers-modal">
                <div class="papers-modal-overlay" on:click=move |_| close()></div>
                <div class="papers-modal-content">
                    <div class="papers-modal-header">
                        <h2>
                            <i data-lucide="database"></i>
                            "Manage Papers"
                        </h2>
                        <button class="papers-modal-close" on:click=move |_| close()>
                            <i data-lucide="x"></i>
                        </button>
                    </div>

                    <div class="papers-modal-toolbar">
                        <div class="papers-toolbar-left">
                            <span class="papers-count">
                                {move || ctx.papers.with(|m| m.count_label().to_string())}
                            </span>
                        </div>
                        <div class="papers-toolbar-right">
                            <button
                                class="btn btn-primary"
                                id="selectAllBtn"
                                on:click=move |_| ctx.papers.update(|m| m.select_all())
                            >
                                <i data-lucide=move || ctx.papers.with(|m| m.select_all_label().1)></i>
                                " "
                                {move || ctx.papers.with(|m| m.select_all_label().0)}
                            </button>
                            <button
                                class="btn btn-primary btn-danger"
                                id="deleteSelectedBtn"
                                disabled=move || !ctx.papers.with(|m| m.can_delete())
                                on:click=on_delete_selected
                            >
                                <i data-lucide="trash-2"></i>
                                " Delete Selected"
                            </button>
                        </div>
                    </div>

                    <div class="papers-list" id="papersList">
                        {move || match list_view() {
                            ListView::Loading => view! {
                                <div class="papers-loading">
                                    <div class="loading"></div>
                                    <p>"Loading papers..."</p>
                                </div>
                            }
                            .into_any(),
                            ListView::Error => view! {
                                <div class="papers-error">
                                    <i data-lucide="alert-circle"></i>
                                    <p>{papers::MSG_LOAD_FAILED}</p>
                                </div>
                            }
                            .into_any(),
                            ListView::Empty => view! {
                                <div class="papers-empty">
                                    <i data-lucide="inbox" size="64"></i>
                                    <h3>"No papers found"</h3>
                                    <p>"Upload PDFs or search ArXiv to add papers"</p>
                                </div>
                            }
                            .into_any(),
                            ListView::List => ctx
                                .papers
                                .with(|m| m.rows())
                                .into_iter()
                                .map(|row| {
                                    let id_toggle = row.paper_id.clone();
                                    let id_view = row.paper_id.clone();
                                    let id_info = row.paper_id.clone();
                                    let id_delete = row.paper_id.clone();
                                    view! {
                                        <div class="paper-item" data-paper-id=row.paper_id.clone()>
                                            <div class="paper-checkbox">
                                                <input
                                                    type="checkbox"
                                                    id=format!("paper-{}", row.paper_id)
                                                    prop:checked=row.selected
                                                    on:change=move |_| {
                                                        ctx.papers.update(|m| {
                                                            m.toggle(&id_toggle);
                                                        })
                                                    }
                                                />
                                            </div>
                                            <div
                                                class="paper-info"
                                                on:click=move |_| view_paper(id_info.clone())
                                            >
                                                <div class="paper-title">
                                                    <i data-lucide="file-text"></i>
                                                    <strong>{row.title}</strong>
                                                </div>
                                                <div class="paper-meta">
                                                    <span class="paper-meta-item">
                                                        <i data-lucide="hash"></i>
                                                        {format!("ID: {}", row.paper_id)}
                                                    </span>
                                                    <span class="paper-meta-item">
                                                        <i data-lucide="layers"></i>
                                                        {row.chunks_label}
                                                    </span>
                                                    <span class="paper-meta-item">
                                                        <i data-lucide="file"></i>
                                                        {row.size_label}
                                                    </span>
                                                </div>
                                            </div>
                                            <div class="paper-actions">
                                                <button
                                                    class="paper-action-btn"
                                                    title="View details"
                                                    disabled=detail_pending
                                                    on:click=move |_| view_paper(id_view.clone())
                                                >
                                                    <i data-lucide="eye"></i>
                                                </button>
                                                <button
                                                    class="paper-action-btn paper-action-delete"
                                                    title="Delete paper"
                                                    on:click=move |_| {
                                                        delete(ctx, DeleteTarget::Single(id_delete.clone()))
                                                    }
                                                >
                                                    <i data-lucide="trash-2"></i>
                                                </button>
                                            </div>
                                        </div>
                                    }
                                })
                                .collect_view()
                                .into_any(),
                        }}
                    </div>
                </div>
            </div>
        </Show>

        {move || detail.with(|d| d.value().cloned()).map(|view| view! {
            <PaperDetail view=view on_close=move || detail.update(|d| d.reset()) />
        })}
    }
}
