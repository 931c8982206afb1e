//! 処理中オーバーレイ
//!
//! 表示・ステップ・割合を描くだけでロジックは持たない。

use leptos::prelude::*;

/// 割合つきの表示文言
pub fn overlay_label(step: &str, percent: Option<u8>) -> String {
    let step = if step.is_empty() { "Processing..." } else { step };
    match percent {
        Some(p) => format!("{} {}%", step, p.min(100)),
        None => step.to_string(),
    }
}

#[component]
pub fn ProcessingOverlay(
    #[prop(into)] visible: Signal<bool>,
    #[prop(into)] step: Signal<String>,
    #[prop(into)] percent: Signal<Option<u8>>,
) -> impl IntoView {
    view! {
        <Show when=move || visible.get()>
            <div class="overlay">
                <div class="spinner"></div>
                <p class="overlay-step">{move || overlay_label(&step.get(), percent.get())}</p>
                {move || percent.get().map(|p| view! {
                    <div class="progress-bar">
                        <div class="progress-fill" style=format!("width: {}%", p.min(100)) />
                    </div>
                })}
            </div>
        </Show>
    }
}
