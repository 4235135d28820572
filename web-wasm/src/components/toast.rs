//! トースト・通知の表示

use crate::app::AppContext;
use leptos::prelude::*;

#[component]
pub fn ToastLayer(ctx: AppContext) -> impl IntoView {
    view! {
        <div class="toast-layer">
            <For
                each=move || ctx.toasts.with(|t| t.items().to_vec())
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    let base = toast.class();
                    let class = move || {
                        if ctx.fading.with(|f| f.contains(&id)) {
                            format!("{} fading", base)
                        } else {
                            base.clone()
                        }
                    };
                    view! {
                        <div class=class>
                            <i data-lucide=toast.icon()></i>
                            <span>{toast.message}</span>
                        </div>
                    }
                }
            />
        </div>
    }
}
