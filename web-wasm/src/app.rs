//! メインアプリケーションコンポーネント
//!
//! グローバルストア・現在のルート・通知をコンテキストで配る。

use crate::components::{
    header::Header,
    processing_overlay::ProcessingOverlay,
    result_preview::ResultPreview,
    toggle_switch::ToggleSwitch,
    tool_page::ToolPageView,
};
use gloo::timers::callback::Timeout;
use leptos::prelude::*;
use magicpixels_common::{AiOption, AppStore, Notification, NotificationLevel, Route};

/// 通知を消すまでの時間
const NOTIFICATION_MS: u32 = 4000;
const READING_FILES: &str = "Reading files...";

/// 全ページで共有する状態
#[derive(Clone, Copy)]
pub struct AppContext {
    pub store: RwSignal<AppStore>,
    pub route: RwSignal<Route>,
    pub notification: RwSignal<Option<Notification>>,
}

impl AppContext {
    pub fn navigate(&self, route: Route) {
        self.route.set(route);
    }

    /// 通知を表示し、一定時間後に消す
    pub fn notify(&self, notification: Notification) {
        let slot = self.notification;
        let shown = notification.clone();
        slot.set(Some(notification));
        Timeout::new(NOTIFICATION_MS, move || {
            slot.update(|current| {
                if current.as_ref() == Some(&shown) {
                    *current = None;
                }
            });
        })
        .forget();
    }
}

pub fn use_app() -> AppContext {
    expect_context::<AppContext>()
}

/// ホームに並べるツール (ルート, 名前, 説明)
pub const TOOLS: &[(Route, &str, &str)] = &[
    (Route::Resize, "Resize", "Change dimensions or use social presets"),
    (Route::Compress, "Compress", "Reduce file size by quality or target size"),
    (Route::Convert, "Convert", "PNG, JPG, WebP, AVIF, GIF, TIFF"),
    (Route::Crop, "Crop", "Aspect ratio, circle or custom area"),
    (Route::BackgroundRemove, "Background", "Remove or replace the background"),
    (Route::WatermarkRemove, "Watermark", "Detect and remove watermarks"),
    (Route::PdfTools, "PDF Tools", "Create, merge, split and edit PDFs"),
    (Route::AiTool, "AI Edit", "Describe the edit in plain words"),
    (Route::CloudinaryTools, "Cloudinary AI", "Generative fill, recolor, filters and more"),
];

#[component]
pub fn App() -> impl IntoView {
    let context = AppContext {
        store: RwSignal::new(AppStore::new()),
        route: RwSignal::new(Route::Home),
        notification: RwSignal::new(None),
    };
    provide_context(context);

    view! {
        <div class="container">
            <Header />
            <NotificationToast />
            <ProcessingOverlay
                visible=Signal::derive(move || context.store.with(|s| s.is_processing() || s.is_uploading()))
                step=Signal::derive(move || {
                    context.store.with(|s| {
                        if s.is_uploading() { READING_FILES.to_string() } else { s.processing_step().to_string() }
                    })
                })
                percent=Signal::derive(move || {
                    context.store.with(|s| s.is_uploading().then(|| s.upload_progress()))
                })
            />
            <main>
                {move || match context.route.get() {
                    Route::Home => view! { <HomePage /> }.into_any(),
                    Route::Result => view! { <ResultPage /> }.into_any(),
                    route => view! { <ToolPageView route=route /> }.into_any(),
                }}
            </main>
        </div>
    }
}

#[component]
fn NotificationToast() -> impl IntoView {
    let app = use_app();
    move || {
        app.notification.get().map(|n| {
            let class = match n.level {
                NotificationLevel::Success => "toast toast-success",
                NotificationLevel::Warning => "toast toast-warning",
                NotificationLevel::Error => "toast toast-error",
                NotificationLevel::Info => "toast toast-info",
            };
            view! { <div class=class role="status">{n.message}</div> }
        })
    }
}

#[component]
fn HomePage() -> impl IntoView {
    let app = use_app();
    view! {
        <section class="tool-grid">
            {TOOLS
                .iter()
                .map(|(route, name, description)| {
                    let route = *route;
                    view! {
                        <button class="tool-card" on:click=move |_| app.navigate(route)>
                            <h3>{*name}</h3>
                            <p class="text-muted">{*description}</p>
                        </button>
                    }
                })
                .collect_view()}
        </section>
    }
}

/// AI編集・Cloudinaryの結果画面
///
/// 処理結果がなければ案内を出す。AIオプションと元に戻す操作もここに置く。
#[component]
fn ResultPage() -> impl IntoView {
    let app = use_app();
    let store = app.store;
    let record = Memo::new(move |_| store.with(|s| s.processed_image().cloned()));
    let can_undo = Memo::new(move |_| store.with(|s| s.can_undo()));

    view! {
        <section class="result-page">
            <Show
                when=move || record.with(Option::is_some)
                fallback=move || view! {
                    <p class="text-muted">"No processed image yet."</p>
                    <button class="btn btn-primary" on:click=move |_| app.navigate(Route::AiTool)>
                        "Open AI Edit"
                    </button>
                }
            >
                {move || record.get().map(|record| view! { <ResultPreview record=record /> })}
                <div class="result-actions">
                    <button
                        class="btn btn-secondary"
                        disabled=move || !can_undo.get()
                        on:click=move |_| {
                            store.update(|s| {
                                s.undo_last_edit();
                            });
                        }
                    >
                        "Undo"
                    </button>
                    <button
                        class="btn btn-tertiary"
                        on:click=move |_| {
                            store.update(|s| {
                                s.clear_images();
                                s.clear_results();
                            });
                            app.navigate(Route::Home);
                        }
                    >
                        "Start Over"
                    </button>
                </div>
                <p class="text-muted">
                    {move || format!("History: {} edit(s)", store.with(|s| s.image_history().len()))}
                </p>
            </Show>

            <div class="ai-options">
                {AiOption::ALL
                    .iter()
                    .map(|option| {
                        let option = *option;
                        view! {
                            <ToggleSwitch
                                label=option.label()
                                checked=Signal::derive(move || store.with(|s| s.ai_options().get(option)))
                                on_change=move |value| store.update(|s| s.set_ai_option(option, value))
                            />
                        }
                    })
                    .collect_view()}
            </div>
        </section>
    }
}
