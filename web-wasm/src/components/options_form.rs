//! ツールごとのオプション入力
//!
//! ページのフォーム状態は `ToolForm` 1つにまとめ、送信時に `ToolRequest` へ変換する。

use leptos::prelude::*;
use magicpixels_common::forms::{
    AiEditForm, BackgroundChoice, BackgroundForm, CloudinaryForm, CompressForm, CompressMode, ConvertForm, CropForm,
    CropMode, PdfForm, PdfTool, ResizeForm, WatermarkForm, ASPECT_PRESETS, BACKGROUND_COLORS,
    PROMPT_SUGGESTIONS, RESIZE_PRESETS, SOCIAL_PRESETS,
};
use magicpixels_common::tools::{
    FitMode, Gravity, NamedColor, OutputFormat, PageNumberPosition, PageSize, Rotation,
    WatermarkMethod, WatermarkStrength, ARTISTIC_FILTERS, CLOUDINARY_TOOLS,
};
use magicpixels_common::{Route, ToolRequest, UploaderConfig};

/// 表示中のツールのフォーム
#[derive(Debug, Clone)]
pub enum ToolForm {
    Resize(ResizeForm),
    Compress(CompressForm),
    Convert(ConvertForm),
    Crop(CropForm),
    Background(BackgroundForm),
    Watermark(WatermarkForm),
    Pdf(PdfForm),
    AiEdit(AiEditForm),
    Cloudinary(CloudinaryForm),
}

impl ToolForm {
    /// ツールページのルートなら初期フォームを返す
    pub fn for_route(route: Route) -> Option<Self> {
        let form = match route {
            Route::Resize => ToolForm::Resize(ResizeForm::new()),
            Route::Compress => ToolForm::Compress(CompressForm::default()),
            Route::Convert => ToolForm::Convert(ConvertForm::default()),
            Route::Crop => ToolForm::Crop(CropForm::new()),
            Route::BackgroundRemove => ToolForm::Background(BackgroundForm::default()),
            Route::WatermarkRemove => ToolForm::Watermark(WatermarkForm::default()),
            Route::PdfTools => ToolForm::Pdf(PdfForm::new()),
            Route::AiTool => ToolForm::AiEdit(AiEditForm::default()),
            Route::CloudinaryTools => ToolForm::Cloudinary(CloudinaryForm::new()),
            Route::Home | Route::Result => return None,
        };
        Some(form)
    }

    /// Cloudinaryでツール未選択のときだけ None
    pub fn to_request(&self) -> Option<ToolRequest> {
        match self {
            ToolForm::Resize(f) => Some(f.to_request()),
            ToolForm::Compress(f) => Some(f.to_request()),
            ToolForm::Convert(f) => Some(f.to_request()),
            ToolForm::Crop(f) => Some(f.to_request()),
            ToolForm::Background(f) => Some(f.to_request()),
            ToolForm::Watermark(f) => Some(f.to_request()),
            ToolForm::Pdf(f) => Some(f.to_request()),
            ToolForm::AiEdit(f) => Some(f.to_request()),
            ToolForm::Cloudinary(f) => f.to_request(),
        }
    }

    pub fn uploader(&self) -> UploaderConfig {
        match self {
            ToolForm::Pdf(f) => f.tool.uploader(),
            _ => UploaderConfig::images(),
        }
    }

    /// 読み込んだ画像の寸法を反映する（リサイズの縦横比・切り抜き範囲）
    pub fn set_image_dimensions(&mut self, width: u32, height: u32) {
        match self {
            ToolForm::Resize(f) => f.set_original_dimensions(width, height),
            ToolForm::Crop(f) => f.set_image_dimensions(width, height),
            _ => {}
        }
    }
}

/// 指定した種類のフォームから値を読む（別の種類なら既定値）
macro_rules! read {
    ($form:expr, $variant:ident, |$f:ident| $body:expr) => {
        $form.with(|tool| match tool {
            ToolForm::$variant($f) => $body,
            _ => Default::default(),
        })
    };
}

/// 指定した種類のフォームだけを書き換える
macro_rules! edit {
    ($form:expr, $variant:ident, |$f:ident| $body:expr) => {
        $form.update(|tool| {
            if let ToolForm::$variant($f) = tool {
                $body;
            }
        })
    };
}

fn parse_number<T: std::str::FromStr>(ev: &leptos::ev::Event) -> Option<T> {
    event_target_value(ev).trim().parse().ok()
}

#[component]
pub fn OptionsForm(form: RwSignal<ToolForm>) -> impl IntoView {
    let fields = match form.get_untracked() {
        ToolForm::Resize(_) => view! { <ResizeOptions form=form /> }.into_any(),
        ToolForm::Compress(_) => view! { <CompressOptions form=form /> }.into_any(),
        ToolForm::Convert(_) => view! { <ConvertOptions form=form /> }.into_any(),
        ToolForm::Crop(_) => view! { <CropOptions form=form /> }.into_any(),
        ToolForm::Background(_) => view! { <BackgroundOptions form=form /> }.into_any(),
        ToolForm::Watermark(_) => view! { <WatermarkOptions form=form /> }.into_any(),
        ToolForm::Pdf(_) => view! { <PdfOptions form=form /> }.into_any(),
        ToolForm::AiEdit(_) => view! { <AiEditOptions form=form /> }.into_any(),
        ToolForm::Cloudinary(_) => view! { <CloudinaryOptions form=form /> }.into_any(),
    };
    view! { <div class="options-form">{fields}</div> }
}

#[component]
fn ResizeOptions(form: RwSignal<ToolForm>) -> impl IntoView {
    view! {
        <label>"Preset"
            <select on:change=move |ev| {
                let name = event_target_value(&ev);
                if let Some(preset) = RESIZE_PRESETS.iter().find(|p| p.name == name) {
                    edit!(form, Resize, |f| f.apply_preset(preset));
                }
            }>
                <option value="">"Custom"</option>
                {RESIZE_PRESETS
                    .iter()
                    .map(|p| view! { <option value=p.name>{format!("{} ({}×{})", p.name, p.width, p.height)}</option> })
                    .collect_view()}
            </select>
        </label>
        <div class="row">
            <label>"Width"
                <input
                    type="number"
                    min="1"
                    prop:value=move || read!(form, Resize, |f| f.width.map(|w| w.to_string()).unwrap_or_default())
                    on:input=move |ev| edit!(form, Resize, |f| f.set_width(parse_number(&ev)))
                />
            </label>
            <label>"Height"
                <input
                    type="number"
                    min="1"
                    prop:value=move || read!(form, Resize, |f| f.height.map(|h| h.to_string()).unwrap_or_default())
                    on:input=move |ev| edit!(form, Resize, |f| f.set_height(parse_number(&ev)))
                />
            </label>
        </div>
        <label class="checkbox">
            <input
                type="checkbox"
                prop:checked=move || read!(form, Resize, |f| f.maintain_aspect_ratio)
                on:change=move |ev| edit!(form, Resize, |f| f.maintain_aspect_ratio = event_target_checked(&ev))
            />
            "Maintain aspect ratio"
        </label>
        <label>"Fit"
            <select on:change=move |ev| {
                if let Ok(fit) = event_target_value(&ev).parse::<FitMode>() {
                    edit!(form, Resize, |f| f.fit = fit);
                }
            }>
                {FitMode::ALL
                    .iter()
                    .map(|m| view! {
                        <option value=m.as_str() selected=move || read!(form, Resize, |f| f.fit == *m)>{m.as_str()}</option>
                    })
                    .collect_view()}
            </select>
        </label>
        <QualitySlider
            value=Signal::derive(move || read!(form, Resize, |f| f.quality))
            on_change=move |q| edit!(form, Resize, |f| f.quality = q)
        />
    }
}

#[component]
fn CompressOptions(form: RwSignal<ToolForm>) -> impl IntoView {
    let mode = Signal::derive(move || read!(form, Compress, |f| f.mode));
    view! {
        <div class="segmented">
            <button
                class=move || if mode.get() == CompressMode::Quality { "active" } else { "" }
                on:click=move |_| edit!(form, Compress, |f| f.mode = CompressMode::Quality)
            >
                "By quality"
            </button>
            <button
                class=move || if mode.get() == CompressMode::TargetSize { "active" } else { "" }
                on:click=move |_| edit!(form, Compress, |f| f.mode = CompressMode::TargetSize)
            >
                "By target size"
            </button>
        </div>
        <Show
            when=move || mode.get() == CompressMode::TargetSize
            fallback=move || view! {
                <QualitySlider
                    value=Signal::derive(move || read!(form, Compress, |f| f.quality))
                    on_change=move |q| edit!(form, Compress, |f| f.quality = q)
                />
            }
        >
            <label>"Target size (KB)"
                <input
                    type="number"
                    min="1"
                    prop:value=move || read!(form, Compress, |f| f.target_kb.map(|kb| kb.to_string()).unwrap_or_default())
                    on:input=move |ev| edit!(form, Compress, |f| f.target_kb = parse_number(&ev))
                />
            </label>
        </Show>
    }
}

#[component]
fn ConvertOptions(form: RwSignal<ToolForm>) -> impl IntoView {
    view! {
        <div class="format-grid">
            {OutputFormat::ALL
                .iter()
                .map(|format| {
                    let format = *format;
                    view! {
                        <button
                            class=move || if read!(form, Convert, |f| f.options.format == format) { "format active" } else { "format" }
                            on:click=move |_| edit!(form, Convert, |f| f.select_format(format))
                        >
                            {format.as_str().to_uppercase()}
                        </button>
                    }
                })
                .collect_view()}
        </div>
        <QualitySlider
            value=Signal::derive(move || read!(form, Convert, |f| f.options.quality))
            on_change=move |q| edit!(form, Convert, |f| f.options.quality = q)
        />
    }
}

#[component]
fn CropOptions(form: RwSignal<ToolForm>) -> impl IntoView {
    let mode = Signal::derive(move || read!(form, Crop, |f| f.mode));
    let uses_rect = move || {
        read!(form, Crop, |f| f.mode == CropMode::Coords || (f.mode == CropMode::Aspect && f.ratio.is_none()))
    };

    let rect_input = move |label: &'static str, get: fn(&CropForm) -> u32, set: fn(&mut CropForm, u32)| {
        view! {
            <label>{label}
                <input
                    type="number"
                    min="0"
                    prop:value=move || read!(form, Crop, |f| get(f).to_string())
                    on:input=move |ev| {
                        if let Some(value) = parse_number::<u32>(&ev) {
                            edit!(form, Crop, |f| set(f, value));
                        }
                    }
                />
            </label>
        }
    };

    view! {
        <div class="segmented">
            {[(CropMode::Aspect, "Aspect ratio"), (CropMode::Circle, "Circle"), (CropMode::Coords, "Custom area")]
                .into_iter()
                .map(|(value, label)| view! {
                    <button
                        class=move || if mode.get() == value { "active" } else { "" }
                        on:click=move |_| edit!(form, Crop, |f| f.mode = value)
                    >
                        {label}
                    </button>
                })
                .collect_view()}
        </div>

        <Show when=move || mode.get() == CropMode::Aspect>
            <div class="preset-row">
                {ASPECT_PRESETS
                    .iter()
                    .map(|(label, ratio)| {
                        let ratio = *ratio;
                        view! {
                            <button
                                class=move || if read!(form, Crop, |f| f.ratio == ratio) { "chip active" } else { "chip" }
                                on:click=move |_| edit!(form, Crop, |f| f.ratio = ratio)
                            >
                                {*label}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
            <div class="preset-row">
                {SOCIAL_PRESETS
                    .iter()
                    .map(|(label, ratio, size)| {
                        let ratio = *ratio;
                        view! {
                            <button class="chip" title=*size on:click=move |_| edit!(form, Crop, |f| f.ratio = Some(ratio))>
                                {*label}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
            <label>"Gravity"
                <select on:change=move |ev| {
                    if let Ok(gravity) = event_target_value(&ev).parse::<Gravity>() {
                        edit!(form, Crop, |f| f.gravity = gravity);
                    }
                }>
                    {Gravity::ALL
                        .iter()
                        .map(|g| view! {
                            <option value=g.as_str() selected=move || read!(form, Crop, |f| f.gravity == *g)>{g.as_str()}</option>
                        })
                        .collect_view()}
                </select>
            </label>
        </Show>

        <Show when=uses_rect>
            <div class="row">
                {rect_input("Left", |f| f.rect.left, |f, v| f.rect.left = v)}
                {rect_input("Top", |f| f.rect.top, |f, v| f.rect.top = v)}
                {rect_input("Width", |f| f.rect.width, |f, v| f.rect.width = v)}
                {rect_input("Height", |f| f.rect.height, |f, v| f.rect.height = v)}
            </div>
        </Show>
    }
}

#[component]
fn BackgroundOptions(form: RwSignal<ToolForm>) -> impl IntoView {
    let selected = Signal::derive(move || {
        read!(form, Background, |f| match &f.choice {
            BackgroundChoice::Preset(value) => value.to_string(),
            BackgroundChoice::Custom => f.custom_color.clone(),
        })
    });

    view! {
        <div class="swatches">
            {BACKGROUND_COLORS
                .iter()
                .map(|(name, value)| view! {
                    <button
                        class="swatch"
                        title=*name
                        style=format!("background: {}", value)
                        on:click=move |_| edit!(form, Background, |f| f.choose(value))
                    >
                        {*name}
                    </button>
                })
                .collect_view()}
        </div>
        <label>"Custom color"
            <input
                type="color"
                prop:value=move || read!(form, Background, |f| f.custom_color.clone())
                on:input=move |ev| edit!(form, Background, |f| f.choose(&event_target_value(&ev)))
            />
        </label>
        <p class="text-muted">{move || format!("Selected: {}", selected.get())}</p>
    }
}

#[component]
fn WatermarkOptions(form: RwSignal<ToolForm>) -> impl IntoView {
    view! {
        <label>"Method"
            <select on:change=move |ev| {
                if let Ok(method) = event_target_value(&ev).parse::<WatermarkMethod>() {
                    edit!(form, Watermark, |f| f.method = method);
                }
            }>
                {WatermarkMethod::ALL
                    .iter()
                    .map(|m| view! {
                        <option value=m.as_str() selected=move || read!(form, Watermark, |f| f.method == *m)>{m.as_str()}</option>
                    })
                    .collect_view()}
            </select>
        </label>
        <label>"Strength"
            <select on:change=move |ev| {
                if let Ok(strength) = event_target_value(&ev).parse::<WatermarkStrength>() {
                    edit!(form, Watermark, |f| f.strength = strength);
                }
            }>
                {WatermarkStrength::ALL
                    .iter()
                    .map(|s| view! {
                        <option value=s.as_str() selected=move || read!(form, Watermark, |f| f.strength == *s)>{s.as_str()}</option>
                    })
                    .collect_view()}
            </select>
        </label>
    }
}

#[component]
fn PdfOptions(form: RwSignal<ToolForm>) -> impl IntoView {
    let tool = Signal::derive(move || read!(form, Pdf, |f| f.tool));

    view! {
        <div class="pdf-tools">
            {PdfTool::ALL
                .iter()
                .map(|t| {
                    let t = *t;
                    view! {
                        <button
                            class=move || if tool.get() == t { "tool-card active" } else { "tool-card" }
                            on:click=move |_| edit!(form, Pdf, |f| f.tool = t)
                        >
                            <strong>{t.name()}</strong>
                            <span class="text-muted">{t.description()}</span>
                        </button>
                    }
                })
                .collect_view()}
        </div>

        {move || match tool.get() {
            PdfTool::Create => view! {
                <label>"Page size"
                    <select on:change=move |ev| {
                        if let Ok(size) = event_target_value(&ev).parse::<PageSize>() {
                            edit!(form, Pdf, |f| f.page_size = size);
                        }
                    }>
                        {PageSize::ALL
                            .iter()
                            .map(|s| view! {
                                <option value=s.as_str() selected=move || read!(form, Pdf, |f| f.page_size == *s)>{s.as_str()}</option>
                            })
                            .collect_view()}
                    </select>
                </label>
            }
            .into_any(),
            PdfTool::Watermark => view! {
                <label>"Watermark text"
                    <input
                        type="text"
                        placeholder="CONFIDENTIAL"
                        prop:value=move || read!(form, Pdf, |f| f.watermark_text.clone())
                        on:input=move |ev| edit!(form, Pdf, |f| f.watermark_text = event_target_value(&ev))
                    />
                </label>
            }
            .into_any(),
            PdfTool::PageNumbers => view! {
                <label>"Position"
                    <select on:change=move |ev| {
                        if let Ok(position) = event_target_value(&ev).parse::<PageNumberPosition>() {
                            edit!(form, Pdf, |f| f.position = position);
                        }
                    }>
                        {PageNumberPosition::ALL
                            .iter()
                            .map(|p| view! {
                                <option value=p.as_str() selected=move || read!(form, Pdf, |f| f.position == *p)>{p.as_str()}</option>
                            })
                            .collect_view()}
                    </select>
                </label>
            }
            .into_any(),
            PdfTool::Rotate => view! {
                <label>"Rotation"
                    <select on:change=move |ev| {
                        if let Ok(rotation) = event_target_value(&ev).parse::<Rotation>() {
                            edit!(form, Pdf, |f| f.rotation = rotation);
                        }
                    }>
                        {Rotation::ALL
                            .iter()
                            .map(|r| view! {
                                <option
                                    value=r.degrees().to_string()
                                    selected=move || read!(form, Pdf, |f| f.rotation == *r)
                                >
                                    {format!("{}°", r.degrees())}
                                </option>
                            })
                            .collect_view()}
                    </select>
                </label>
            }
            .into_any(),
            PdfTool::ToImages | PdfTool::Merge | PdfTool::Split => ().into_any(),
        }}
    }
}

#[component]
fn AiEditOptions(form: RwSignal<ToolForm>) -> impl IntoView {
    view! {
        <label>"Describe your edit"
            <textarea
                rows="3"
                placeholder="e.g. Make the sky more dramatic"
                prop:value=move || read!(form, AiEdit, |f| f.prompt.clone())
                on:input=move |ev| edit!(form, AiEdit, |f| f.prompt = event_target_value(&ev))
            ></textarea>
        </label>
        <div class="suggestions">
            {PROMPT_SUGGESTIONS
                .iter()
                .enumerate()
                .map(|(index, text)| view! {
                    <button class="chip" on:click=move |_| edit!(form, AiEdit, |f| f.use_suggestion(index))>
                        {*text}
                    </button>
                })
                .collect_view()}
        </div>
    }
}

#[component]
fn CloudinaryOptions(form: RwSignal<ToolForm>) -> impl IntoView {
    let selected = Signal::derive(move || read!(form, Cloudinary, |f| f.selected_id()));

    let color_select = move |current: fn(&CloudinaryForm) -> NamedColor, set: fn(&mut CloudinaryForm, NamedColor)| {
        view! {
            <select on:change=move |ev| {
                if let Ok(color) = event_target_value(&ev).parse::<NamedColor>() {
                    edit!(form, Cloudinary, |f| set(f, color));
                }
            }>
                {NamedColor::ALL
                    .iter()
                    .map(|c| {
                        let c = *c;
                        view! {
                            <option
                                value=c.as_str()
                                selected=move || form.with(|tool| matches!(tool, ToolForm::Cloudinary(f) if current(f) == c))
                            >
                                {c.as_str()}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>
        }
    };

    let size_inputs = move |get: fn(&CloudinaryForm) -> (u32, u32), set: fn(&mut CloudinaryForm, Option<u32>, Option<u32>)| {
        view! {
            <div class="row">
                <label>"Width"
                    <input
                        type="number"
                        min="1"
                        prop:value=move || form.with(|tool| match tool {
                            ToolForm::Cloudinary(f) => get(f).0.to_string(),
                            _ => String::new(),
                        })
                        on:input=move |ev| edit!(form, Cloudinary, |f| set(f, parse_number(&ev), None))
                    />
                </label>
                <label>"Height"
                    <input
                        type="number"
                        min="1"
                        prop:value=move || form.with(|tool| match tool {
                            ToolForm::Cloudinary(f) => get(f).1.to_string(),
                            _ => String::new(),
                        })
                        on:input=move |ev| edit!(form, Cloudinary, |f| set(f, None, parse_number(&ev)))
                    />
                </label>
            </div>
        }
    };

    let slider = move |label: &'static str, get: fn(&CloudinaryForm) -> i32, set: fn(&mut CloudinaryForm, i32)| {
        view! {
            <label>{move || format!("{}: {}", label, read!(form, Cloudinary, |f| get(f)))}
                <input
                    type="range"
                    min="-100"
                    max="100"
                    prop:value=move || read!(form, Cloudinary, |f| get(f)).to_string()
                    on:input=move |ev| {
                        if let Some(value) = parse_number::<i32>(&ev) {
                            edit!(form, Cloudinary, |f| set(f, value));
                        }
                    }
                />
            </label>
        }
    };

    view! {
        <div class="cloudinary-tools">
            {CLOUDINARY_TOOLS
                .iter()
                .map(|(id, name, category)| view! {
                    <button
                        class=move || if selected.get() == Some(*id) { "tool-card active" } else { "tool-card" }
                        on:click=move |_| edit!(form, Cloudinary, |f| {
                            if let Err(e) = f.select(id) {
                                tracing::warn!(error = %e, "Unknown Cloudinary tool");
                            }
                        })
                    >
                        <strong>{*name}</strong>
                        <span class="text-muted">{*category}</span>
                    </button>
                })
                .collect_view()}
        </div>

        {move || match selected.get() {
            Some("bg-replace") => view! {
                <label>"Background color" {color_select(|f| f.bg_color, |f, c| f.bg_color = c)}</label>
            }
            .into_any(),
            Some("gen-fill") => size_inputs(
                |f| (f.fill_width, f.fill_height),
                |f, w, h| {
                    if let Some(w) = w { f.fill_width = w; }
                    if let Some(h) = h { f.fill_height = h; }
                },
            )
            .into_any(),
            Some("smart-crop") => size_inputs(
                |f| (f.crop_width, f.crop_height),
                |f, w, h| {
                    if let Some(w) = w { f.crop_width = w; }
                    if let Some(h) = h { f.crop_height = h; }
                },
            )
            .into_any(),
            Some("gen-remove") => view! {
                <label>"Object to remove"
                    <input
                        type="text"
                        placeholder="e.g. the person on the left"
                        prop:value=move || read!(form, Cloudinary, |f| f.remove_prompt.clone())
                        on:input=move |ev| edit!(form, Cloudinary, |f| f.remove_prompt = event_target_value(&ev))
                    />
                </label>
            }
            .into_any(),
            Some("gen-recolor") => view! {
                <label>"Object to recolor"
                    <input
                        type="text"
                        placeholder="e.g. the car"
                        prop:value=move || read!(form, Cloudinary, |f| f.recolor_prompt.clone())
                        on:input=move |ev| edit!(form, Cloudinary, |f| f.recolor_prompt = event_target_value(&ev))
                    />
                </label>
                <label>"New color" {color_select(|f| f.recolor_color, |f, c| f.recolor_color = c)}</label>
            }
            .into_any(),
            Some("artistic-filter") => view! {
                <label>"Filter"
                    <select on:change=move |ev| {
                        if let Ok(filter) = event_target_value(&ev).parse() {
                            edit!(form, Cloudinary, |f| f.filter = filter);
                        }
                    }>
                        {ARTISTIC_FILTERS
                            .iter()
                            .map(|(id, name)| view! {
                                <option value=*id selected=move || read!(form, Cloudinary, |f| f.filter.id() == *id)>{*name}</option>
                            })
                            .collect_view()}
                    </select>
                </label>
            }
            .into_any(),
            Some("adjust-colors") => view! {
                {slider("Brightness", |f| f.brightness, |f, v| f.brightness = v)}
                {slider("Contrast", |f| f.contrast, |f, v| f.contrast = v)}
                {slider("Saturation", |f| f.saturation, |f, v| f.saturation = v)}
            }
            .into_any(),
            _ => ().into_any(),
        }}
    }
}

#[component]
fn QualitySlider<F>(#[prop(into)] value: Signal<u8>, on_change: F) -> impl IntoView
where
    F: Fn(u8) + Send + Sync + 'static,
{
    view! {
        <label>{move || format!("Quality: {}%", value.get())}
            <input
                type="range"
                min="1"
                max="100"
                prop:value=move || value.get().to_string()
                on:input=move |ev| {
                    if let Some(q) = parse_number::<u8>(&ev) {
                        on_change(q);
                    }
                }
            />
        </label>
    }
}
