//! ツールページ
//!
//! ファイル選択・オプション・送信・結果表示を1画面にまとめる。
//! 送信の流れは `ToolPage` (begin / finish) に任せ、ここでは信号の更新と通知だけを行う。

use crate::api;
use crate::app::{use_app, TOOLS};
use crate::components::image_uploader::ImageUploader;
use crate::components::options_form::{OptionsForm, ToolForm};
use crate::components::result_preview::ResultPreview;
use leptos::prelude::*;
use magicpixels_common::preview;
use magicpixels_common::types::WatermarkDetection;
use magicpixels_common::uploader::format_bytes;
use magicpixels_common::{
    AiOption, Notification, ProcessedData, ProcessedImageRecord, Route, ToolOutput, ToolPage,
    ToolRequest, UploadedFile, UploaderConfig,
};
use wasm_bindgen_futures::{spawn_local, JsFuture};

#[component]
pub fn ToolPageView(route: Route) -> impl IntoView {
    let app = use_app();
    let Some(initial) = ToolForm::for_route(route) else {
        return view! { <p class="text-muted">"Unknown tool"</p> }.into_any();
    };
    let title = TOOLS
        .iter()
        .find(|(r, _, _)| *r == route)
        .map(|(_, name, description)| (*name, *description))
        .unwrap_or_default();

    let form = RwSignal::new(initial);
    let page = RwSignal::new(ToolPage::new());
    let uploader = Memo::new(move |_| form.with(ToolForm::uploader));
    let request = Memo::new(move |_| form.with(ToolForm::to_request));

    // PDFツールの切り替えで受け付けるファイルが変わったら選び直し
    Effect::new(move |previous: Option<UploaderConfig>| {
        let current = uploader.get();
        if previous.is_some_and(|p| p != current) {
            page.update(ToolPage::clear_files);
        }
        current
    });

    let files = Signal::derive(move || page.with(|p| p.files().to_vec()));
    let busy = Signal::derive(move || page.with(ToolPage::is_busy));
    let can_submit = Signal::derive(move || {
        request.with(|r| r.as_ref().is_some_and(|r| page.with(|p| p.can_submit(r))))
    });

    let on_files = move |selected: Vec<UploadedFile>| {
        if let Some(first) = selected.iter().find(|f| f.mime_type.starts_with("image/")).cloned() {
            spawn_local(async move {
                if let Some((width, height)) = image_dimensions(&first).await {
                    form.update(|f| f.set_image_dimensions(width, height));
                }
            });
        }
        if uploader.get_untracked().multiple {
            page.update(|p| p.add_files(selected));
        } else {
            page.update(|p| p.set_files(selected));
        }
    };
    let on_remove = move |index: usize| {
        page.update(|p| {
            p.remove_file(index);
        });
    };

    let run = move |request: ToolRequest| {
        let started = app
            .store
            .try_update(|store| page.try_update(|p| p.begin(store, &request)))
            .flatten();
        let files = match started {
            Some(Ok(files)) => files,
            Some(Err(error)) => {
                app.notify(Notification::from_error(&error));
                return;
            }
            None => return,
        };

        spawn_local(async move {
            let result = api::client().run(&request, &files).await;
            let outcome = app
                .store
                .try_update(|store| page.try_update(|p| p.finish(store, &request, result)))
                .flatten();

            match outcome {
                Some(outcome) => {
                    app.notify(outcome.notification);
                    if let Some(route) = outcome.navigate {
                        app.navigate(route);
                    }
                }
                // ページを離れた後に完了した
                None => app.store.update(|s| s.set_processing(false, "")),
            }
        });
    };

    let on_submit = move |_| {
        if let Some(request) = request.get_untracked() {
            run(request);
        }
    };
    let on_detect = move |_| {
        if let ToolForm::Watermark(watermark) = form.get_untracked() {
            run(watermark.detect_request());
        }
    };
    let on_enhance = move |_| {
        let auto_apply = app.store.with_untracked(|s| s.ai_options().get(AiOption::AutoEnhance));
        run(ToolRequest::AiEnhance { auto_apply });
    };

    let is_watermark = route == Route::WatermarkRemove;
    let is_ai = route == Route::AiTool;
    let result = Memo::new(move |_| page.with(|p| p.result().cloned()));
    let error = Memo::new(move |_| {
        page.with(|p| match p.request_state() {
            magicpixels_common::RequestState::Error(message) => Some(message.clone()),
            _ => None,
        })
    });

    view! {
        <section class="tool-page">
            <header class="tool-header">
                <button class="btn btn-link" on:click=move |_| app.navigate(Route::Home)>"← Tools"</button>
                <h2>{title.0}</h2>
                <p class="text-muted">{title.1}</p>
            </header>

            <Show
                when=move || result.with(Option::is_none)
                fallback=move || view! {
                    <ToolResult output=result.get().unwrap_or(ToolOutput::Processed(ProcessedData::default())) request=request.get() />
                    <button class="btn btn-secondary" on:click=move |_| page.update(ToolPage::reset_result)>
                        "Process another"
                    </button>
                }
            >
                <ImageUploader
                    config=uploader
                    files=files
                    on_files=on_files
                    on_remove=on_remove
                />
                <OptionsForm form=form />

                {move || error.get().map(|message| view! { <p class="form-error">{message}</p> })}

                <div class="actions">
                    <Show when=move || is_watermark>
                        <button
                            class="btn btn-secondary"
                            disabled=move || busy.get() || files.with(Vec::is_empty)
                            on:click=on_detect
                        >
                            "Detect watermark"
                        </button>
                    </Show>
                    <Show when=move || is_ai>
                        <button
                            class="btn btn-secondary"
                            disabled=move || busy.get() || files.with(Vec::is_empty)
                            on:click=on_enhance
                        >
                            "Auto enhance"
                        </button>
                    </Show>
                    <button
                        class="btn btn-primary"
                        disabled=move || !can_submit.get()
                        on:click=on_submit
                    >
                        {move || if busy.get() { "Processing..." } else { "Apply" }}
                    </button>
                </div>
            </Show>
        </section>
    }
    .into_any()
}

/// ページ内に残る結果（画像ツール・PDF・透かし検出）
#[component]
fn ToolResult(output: ToolOutput, request: Option<ToolRequest>) -> impl IntoView {
    let data = match output {
        ToolOutput::Detection(detection) => return detection_view(detection).into_any(),
        ToolOutput::Processed(data) => data,
    };
    let is_pdf = matches!(request, Some(ToolRequest::Pdf(_)));
    let tool = request.as_ref().map(ToolRequest::tool_name);

    let savings = match (data.original_size, data.compressed_size) {
        (Some(original), Some(compressed)) => Some(format!(
            "{} → {}",
            format_bytes(original),
            format_bytes(compressed)
        )),
        _ => None,
    };

    let body = if !data.pages.is_empty() {
        view! {
            <ul class="page-list">
                {data
                    .pages
                    .iter()
                    .enumerate()
                    .map(|(index, page)| {
                        let number = page.page.unwrap_or(index as u32 + 1);
                        view! {
                            <li>
                                <a href=page.url.clone() target="_blank" rel="noopener">
                                    {format!("Page {}", number)}
                                </a>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
        }
        .into_any()
    } else if data.is_blob {
        match blob_href(&data) {
            Some(href) => view! {
                <a class="btn btn-primary" href=href download=preview::download_file_name("pdf")>
                    "Download PDF"
                </a>
            }
            .into_any(),
            None => {
                use_app().notify(Notification::error(preview::DOWNLOAD_FAILED));
                view! { <p class="form-error">{preview::DOWNLOAD_FAILED}</p> }.into_any()
            }
        }
    } else if is_pdf {
        view! {
            <a class="btn btn-primary" href=data.url.clone().unwrap_or_default() target="_blank" rel="noopener">
                "Open PDF"
            </a>
        }
        .into_any()
    } else {
        let record = ProcessedImageRecord::from_data(&data, tool, None);
        view! { <ResultPreview record=record /> }.into_any()
    };

    view! {
        <div class="tool-result">
            {body}
            {savings.map(|text| view! { <p class="text-muted">{text}</p> })}
            {data.page_count.map(|count| view! { <p class="text-muted">{format!("{} page(s)", count)}</p> })}
        </div>
    }
    .into_any()
}

/// 直接ダウンロードしたPDFの参照先（取得時に作った Object URL を使い回す）
fn blob_href(data: &ProcessedData) -> Option<String> {
    data.url.clone().filter(|url| data.is_blob && !url.is_empty())
}

fn detection_view(detection: WatermarkDetection) -> impl IntoView {
    let detail = detection.detection.unwrap_or_default();
    view! {
        <div class="tool-result detection">
            <h3>
                {if detection.watermark_detected { "Watermark detected" } else { "No watermark detected" }}
            </h3>
            {detail.kind.map(|kind| view! { <p>{format!("Type: {}", kind)}</p> })}
            {detail.position.map(|position| view! { <p>{format!("Position: {}", position)}</p> })}
        </div>
    }
}

/// 選択した画像の寸法を読む
async fn image_dimensions(file: &UploadedFile) -> Option<(u32, u32)> {
    let blob = api::fetch::to_blob(&file.bytes, &file.mime_type).ok()?;
    let url = web_sys::Url::create_object_url_with_blob(&blob).ok()?;
    let image = web_sys::HtmlImageElement::new().ok()?;

    let loaded = js_sys::Promise::new(&mut |resolve, reject| {
        image.set_onload(Some(&resolve));
        image.set_onerror(Some(&reject));
    });
    image.set_src(&url);
    let result = JsFuture::from(loaded).await;
    let _ = web_sys::Url::revoke_object_url(&url);

    result.ok()?;
    Some((image.natural_width(), image.natural_height()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_href_reuses_object_url() {
        let data = ProcessedData {
            url: Some("blob:https://app.example/1234".into()),
            is_blob: true,
            blob: Some(vec![0x25]),
            ..Default::default()
        };
        assert_eq!(blob_href(&data).as_deref(), Some("blob:https://app.example/1234"));
    }

    #[test]
    fn test_blob_href_missing_url() {
        let data = ProcessedData { is_blob: true, blob: Some(vec![0x25]), ..Default::default() };
        assert_eq!(blob_href(&data), None);

        let empty = ProcessedData { url: Some(String::new()), is_blob: true, ..Default::default() };
        assert_eq!(blob_href(&empty), None);
    }
}
