//! サイドバー（タブ切り替え）

use crate::app::AppContext;
use crate::components::{arxiv_search::ArxivSearch, upload_area::UploadArea};
use leptos::prelude::*;
use paper_rag_common::Tab;

#[component]
pub fn Sidebar(ctx: AppContext) -> impl IntoView {
    let tab_class = move |tab: Tab| {
        if ctx.active_tab.get() == tab {
            "active"
        } else {
            ""
        }
    };

    view! {
        <aside class="sidebar">
            <div class="tabs">
                {Tab::ALL
                    .into_iter()
                    .map(|tab| {
                        view! {
                            <button
                                class=move || format!("tab-btn {}", tab_class(tab))
                                data-tab=tab.key()
                                on:click=move |_| ctx.active_tab.set(tab)
                            >
                                <i data-lucide=tab.icon() size="18"></i>
                                {tab.label()}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>

            <div
                class=move || format!("tab-content {}", tab_class(Tab::Upload))
                id="uploadTab"
            >
                <UploadArea ctx=ctx />
            </div>

            <div
                class=move || format!("tab-content {}", tab_class(Tab::Arxiv))
                id="arxivTab"
            >
                <ArxivSearch ctx=ctx />
            </div>
        </aside>
    }
}
