//! ファイル選択コンポーネント
//!
//! ドラッグ&ドロップまたはクリックで選択し、許可リストとサイズで振り分ける。
//! 単一モードでは選択済みの画像と削除ボタンを表示する。
//! 読み込みの進み具合はグローバルストアの upload progress に反映する。

use crate::app::use_app;
use leptos::prelude::*;
use magicpixels_common::uploader::{format_bytes, UploaderConfig};
use magicpixels_common::{Notification, UploadedFile};
use web_sys::{DragEvent, FileList};

#[component]
pub fn ImageUploader<F, R>(
    #[prop(into)] config: Signal<UploaderConfig>,
    #[prop(into)] files: Signal<Vec<UploadedFile>>,
    on_files: F,
    on_remove: R,
) -> impl IntoView
where
    F: Fn(Vec<UploadedFile>) + Clone + Send + Sync + 'static,
    R: Fn(usize) + Clone + Send + Sync + 'static,
{
    let app = use_app();
    let (is_dragover, set_is_dragover) = signal(false);
    let preview_url = RwSignal::new(None::<String>);

    let handle_files = move |list: FileList| {
        let on_files = on_files.clone();
        let config = config.get_untracked();
        let selected: Vec<web_sys::File> = (0..list.length()).filter_map(|i| list.get(i)).collect();

        wasm_bindgen_futures::spawn_local(async move {
            let total = selected.len();
            app.store.update(|s| s.track_upload(0, total));

            let mut loaded = Vec::new();
            for (index, file) in selected.into_iter().enumerate() {
                match read_file(file).await {
                    Ok(file) => loaded.push(file),
                    Err(message) => app.notify(Notification::error(message)),
                }
                app.store.update(|s| s.track_upload(index + 1, total));
            }

            let selection = config.accept(loaded);
            if let Some(message) = selection.rejection_message() {
                app.notify(Notification::error(message));
            }
            if !selection.accepted.is_empty() {
                if !config.multiple {
                    preview_url.set(object_url(&selection.accepted[0]));
                }
                on_files(selection.accepted);
            }
        });
    };

    let on_drop = {
        let handle_files = handle_files.clone();
        move |ev: DragEvent| {
            ev.prevent_default();
            set_is_dragover.set(false);
            if let Some(list) = ev.data_transfer().and_then(|dt| dt.files()) {
                handle_files(list);
            }
        }
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(true);
    };

    let on_dragleave = move |_: DragEvent| set_is_dragover.set(false);

    let input_ref = NodeRef::<leptos::html::Input>::new();
    let on_change = move |_| {
        if let Some(list) = input_ref.get().and_then(|input| input.files()) {
            handle_files(list);
        }
    };
    let on_click = move |_| {
        if let Some(input) = input_ref.get() {
            input.set_value("");
            input.click();
        }
    };

    let remove_selected = on_remove.clone();
    let remove_listed = on_remove;
    let show_selected = move || !config.with(|c| c.multiple) && files.with(|f| !f.is_empty());

    view! {
        <div class="image-uploader">
            <input
                node_ref=input_ref
                type="file"
                class="hidden"
                accept=move || config.with(|c| c.accept_attr())
                multiple=move || config.with(|c| c.multiple)
                on:change=on_change
            />
            <Show
                when=show_selected
                fallback=move || view! {
                    <div
                        class=move || if is_dragover.get() { "upload-area dragover" } else { "upload-area" }
                        on:drop=on_drop.clone()
                        on:dragover=on_dragover
                        on:dragleave=on_dragleave
                        on:click=on_click
                    >
                        <div class="upload-icon">"📷"</div>
                        <p>"Drag & drop or click to select"</p>
                        <p class="text-muted">
                            {move || format!("Max {}", format_bytes(config.with(|c| c.max_bytes)))}
                        </p>
                    </div>
                }
            >
                <div class="selected-image">
                    {move || preview_url.get().map(|url| view! { <img src=url alt="Selected image" /> })}
                    <button
                        class="btn btn-tertiary btn-small"
                        on:click={
                            let remove_selected = remove_selected.clone();
                            move |_| {
                                preview_url.set(None);
                                remove_selected(0);
                            }
                        }
                    >
                        "Remove"
                    </button>
                </div>
            </Show>

            <Show when=move || config.with(|c| c.multiple) && files.with(|f| !f.is_empty())>
                <ul class="file-list">
                    {
                        let remove_listed = remove_listed.clone();
                        move || {
                            files
                                .get()
                                .into_iter()
                                .enumerate()
                                .map(|(index, file)| {
                                    let on_remove = remove_listed.clone();
                                    view! {
                                        <li>
                                            <span>{file.name.clone()}</span>
                                            <span class="text-muted">{format_bytes(file.size())}</span>
                                            <button class="btn btn-link" on:click=move |_| on_remove(index)>"×"</button>
                                        </li>
                                    }
                                })
                                .collect_view()
                        }
                    }
                </ul>
            </Show>
        </div>
    }
}

async fn read_file(file: web_sys::File) -> Result<UploadedFile, String> {
    let name = file.name();
    let mime_type = file.type_();
    let file = gloo::file::File::from(file);
    let bytes = gloo::file::futures::read_as_bytes(&file)
        .await
        .map_err(|e| format!("{}: {}", name, e))?;
    Ok(UploadedFile::new(name, mime_type, bytes))
}

fn object_url(file: &UploadedFile) -> Option<String> {
    let blob = crate::api::fetch::to_blob(&file.bytes, &file.mime_type).ok()?;
    web_sys::Url::create_object_url_with_blob(&blob).ok()
}
