//! ヘッダーコンポーネント

use crate::app::AppContext;
use crate::components::papers_modal::open_papers;
use leptos::prelude::*;

#[component]
pub fn Header(ctx: AppContext) -> impl IntoView {
    view! {
        <header class="header">
            <div class="header-title">
                <i data-lucide="book-open"></i>
                <h1>"Research Paper Assistant"</h1>
            </div>
            <div class="header-stats">
                <div class="stat">
                    <span class="stat-value" id="papersCount">
                        {move || ctx.stats.get().papers_count}
                    </span>
                    <span class="stat-label">"Papers"</span>
                </div>
                <div class="stat">
                    <span class="stat-value" id="chunksCount">
                        {move || ctx.stats.get().chunks_count}
                    </span>
                    <span class="stat-label">"Chunks"</span>
                </div>
                <div
                    id="papers-manage-btn"
                    class="voice-toggle"
                    on:click=move |_| open_papers(ctx)
                >
                    <i data-lucide="database"></i>
                    <span>"Manage Papers"</span>
                </div>
            </div>
        </header>
    }
}
