//! 結果プレビュー
//!
//! 形式を選んでダウンロード（バイナリを取り直して保存）と、URLのコピーを行う。
//! Cloudinaryの結果はダウンロード回数を記録し、残数を表示する。

use crate::api;
use crate::app::use_app;
use gloo::timers::callback::Timeout;
use leptos::prelude::*;
use magicpixels_common::preview::{
    self, CopyState, DownloadLevel, DownloadTracker, COPY_FAILED, COPY_RESET_MS, DOWNLOAD_EMPTY,
    DOWNLOAD_FAILED, DOWNLOAD_FORMATS, URL_COPIED,
};
use magicpixels_common::{Notification, ProcessedImageRecord};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};

#[component]
pub fn ResultPreview(record: ProcessedImageRecord) -> impl IntoView {
    let app = use_app();
    let format = RwSignal::new(
        record
            .metadata
            .format
            .clone()
            .map(|f| f.to_lowercase().replace("jpeg", "jpg"))
            .filter(|f| DOWNLOAD_FORMATS.contains(&f.as_str()))
            .unwrap_or_else(|| DOWNLOAD_FORMATS[0].to_string()),
    );
    let copy_state = RwSignal::new(CopyState::default());
    let downloading = RwSignal::new(false);
    let tracker = RwSignal::new(DownloadTracker::for_record(&record));
    let public_id = record.public_id.clone();
    let url = record.url.clone();

    // 残数はサーバー側が正
    if let Some(id) = public_id.clone() {
        spawn_local(async move {
            match api::client().download_status(&id).await {
                Ok(status) => tracker.update(|t| t.apply(&status)),
                Err(e) => tracing::debug!(error = %e, "Could not refresh download status"),
            }
        });
    }

    let on_download = {
        let url = url.clone();
        let public_id = public_id.clone();
        move |_| {
            if downloading.get_untracked() {
                return;
            }
            downloading.set(true);
            let url = url.clone();
            let public_id = public_id.clone();
            let fmt = format.get_untracked();

            spawn_local(async move {
                let result = download(&url, public_id.as_deref(), &fmt, tracker).await;
                downloading.set(false);
                match result {
                    Ok(message) => app.notify(Notification::success(message)),
                    Err(message) => app.notify(Notification::error(message)),
                }
            });
        }
    };

    let on_copy = {
        let url = url.clone();
        move |_| {
            let url = url.clone();
            spawn_local(async move {
                match copy_to_clipboard(&url).await {
                    Ok(()) => {
                        copy_state.update(CopyState::mark_copied);
                        app.notify(Notification::success(URL_COPIED));
                        Timeout::new(COPY_RESET_MS, move || copy_state.update(CopyState::reset)).forget();
                    }
                    Err(()) => app.notify(Notification::error(COPY_FAILED)),
                }
            });
        }
    };

    let rows = preview::metadata_rows(&record.metadata);
    let is_tracked = public_id.is_some();

    view! {
        <div class="result-preview">
            <img class="result-image" src=url.clone() alt="Processed image" />

            <dl class="metadata">
                {rows
                    .into_iter()
                    .map(|(label, value)| view! { <dt>{label}</dt><dd>{value}</dd> })
                    .collect_view()}
            </dl>

            <div class="download-row">
                <select on:change=move |ev| format.set(event_target_value(&ev))>
                    {DOWNLOAD_FORMATS
                        .iter()
                        .map(|f| view! {
                            <option value=*f selected=move || format.get() == *f>{f.to_uppercase()}</option>
                        })
                        .collect_view()}
                </select>
                <button
                    class="btn btn-primary"
                    disabled=move || downloading.get() || (is_tracked && !tracker.with(|t| t.can_download()))
                    on:click=on_download
                >
                    {move || if downloading.get() { "Downloading..." } else { "Download" }}
                </button>
                <button class="btn btn-secondary" on:click=on_copy>
                    {move || if copy_state.get().is_copied() { "Copied!" } else { "Copy URL" }}
                </button>
            </div>

            <Show when=move || is_tracked>
                <div class=move || match tracker.with(|t| t.level()) {
                    DownloadLevel::Normal => "downloads",
                    DownloadLevel::Last => "downloads downloads-last",
                    DownloadLevel::Exhausted => "downloads downloads-exhausted",
                }>
                    <span>{move || tracker.with(|t| t.label())}</span>
                    <div class="progress-bar">
                        <div class="progress-fill" style=move || format!("width: {}%", tracker.with(|t| t.percent()))></div>
                    </div>
                    <p class="text-muted">{move || tracker.with(|t| t.hint())}</p>
                </div>
            </Show>
        </div>
    }
}

/// 1回分のダウンロード
///
/// # Returns
/// 成功時の通知文言
async fn download(
    url: &str,
    public_id: Option<&str>,
    format: &str,
    tracker: RwSignal<DownloadTracker>,
) -> Result<String, String> {
    let client = api::client();

    let (source, file_name) = match public_id {
        Some(id) => {
            let status = client.track_download(id, format).await.map_err(|e| e.to_string())?;
            tracker.update(|t| t.apply(&status));
            let source = status.download_url.unwrap_or_else(|| url.to_string());
            (source, preview::timestamped_file_name(js_sys::Date::now() as i64, format))
        }
        None => (url.to_string(), preview::download_file_name(format)),
    };

    let bytes = client.fetch_bytes(&source).await.map_err(|e| {
        tracing::debug!(error = %e, "Download failed");
        DOWNLOAD_FAILED.to_string()
    })?;
    if bytes.is_empty() {
        return Err(DOWNLOAD_EMPTY.to_string());
    }

    save_blob(&bytes, &format!("image/{}", format.replace("jpg", "jpeg")), &file_name)
        .map_err(|_| DOWNLOAD_FAILED.to_string())?;

    Ok(match public_id {
        Some(_) => tracker.with_untracked(|t| t.downloaded_message()),
        None => preview::downloaded_as(format),
    })
}

/// Object URL を作って `<a download>` をクリックする
fn save_blob(bytes: &[u8], mime_type: &str, file_name: &str) -> Result<(), wasm_bindgen::JsValue> {
    let blob = crate::api::fetch::to_blob(bytes, mime_type)
        .map_err(|e| wasm_bindgen::JsValue::from_str(&e.to_string()))?;
    let object_url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| wasm_bindgen::JsValue::from_str("document is not available"))?;
    let anchor: web_sys::HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&object_url);
    anchor.set_download(file_name);
    anchor.click();

    web_sys::Url::revoke_object_url(&object_url)
}

async fn copy_to_clipboard(text: &str) -> Result<(), ()> {
    let window = web_sys::window().ok_or(())?;
    let promise = window.navigator().clipboard().write_text(text);
    JsFuture::from(promise).await.map(|_| ()).map_err(|_| ())
}
