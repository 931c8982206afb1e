//! ヘッダーコンポーネント

use crate::app::use_app;
use leptos::prelude::*;
use magicpixels_common::Route;

#[component]
pub fn Header() -> impl IntoView {
    let app = use_app();
    let has_result = move || app.store.with(|s| s.processed_image().is_some());

    view! {
        <header class="header">
            <h1 on:click=move |_| app.navigate(Route::Home)>"MagicPixels"</h1>
            <nav>
                <button class="btn btn-link" on:click=move |_| app.navigate(Route::Home)>"Tools"</button>
                <Show when=has_result>
                    <button class="btn btn-link" on:click=move |_| app.navigate(Route::Result)>"Result"</button>
                </Show>
            </nav>
        </header>
    }
}
