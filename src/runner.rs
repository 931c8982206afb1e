//! ツールの1回実行
//!
//! CLI引数をフォームに詰めて `ToolRequest` を作り、ページコントローラ経由で送信する。
//! 検証・処理中表示・通知・グローバルストアへの反映はWeb版と同じ経路を通る。

use crate::cli::{CloudArgs, OutputArgs, PdfCommand};
use crate::error::{MagicPixelsError, Result};
use crate::files;
use crate::overlay::ProcessingOverlay;
use magicpixels_common::controller::{NotificationLevel, SubmitOutcome};
use magicpixels_common::forms::{
    AiEditForm, BackgroundForm, CloudinaryForm, CompressForm, CompressMode, ConvertForm, CropForm,
    CropMode, PdfForm, PdfTool, ResizeForm,
};
use magicpixels_common::preview;
use magicpixels_common::tools::{
    ArtisticFilter, AspectRatio, CropRect, FitMode, Gravity, OutputFormat, WatermarkOptions,
};
use magicpixels_common::types::ProcessedData;
use magicpixels_common::uploader::UploaderConfig;
use magicpixels_common::validation;
use magicpixels_common::{ApiClient, AppStore, Notification, ToolOutput, ToolPage, ToolRequest, Transport};
use std::path::{Path, PathBuf};

/// 実行するツールと入力
#[derive(Debug, Clone)]
pub struct Invocation {
    pub request: ToolRequest,
    pub inputs: Vec<PathBuf>,
    pub uploader: UploaderConfig,
    pub output: OutputArgs,
}

impl Invocation {
    pub fn image(request: ToolRequest, input: &Path, output: &OutputArgs) -> Self {
        Self {
            request,
            inputs: vec![input.to_path_buf()],
            uploader: UploaderConfig::images(),
            output: output.clone(),
        }
    }
}

// =============================================
// リクエストの組み立て
// =============================================

/// リサイズ
///
/// 片方の寸法だけ指定された場合、元画像の寸法が分かれば縦横比を保ってもう片方を計算する
///
/// # Arguments
/// * `dimensions` - 元画像の (幅, 高さ)。読めなかった場合は None
pub fn resize_request(
    width: Option<u32>,
    height: Option<u32>,
    keep_aspect: bool,
    fit: FitMode,
    quality: u8,
    preset: Option<&str>,
    dimensions: Option<(u32, u32)>,
) -> Result<ToolRequest> {
    let mut form = ResizeForm::new();
    form.fit = fit;
    form.quality = quality;

    if let Some(name) = preset {
        let preset = magicpixels_common::forms::find_resize_preset(name)
            .ok_or_else(|| MagicPixelsError::InvalidArgs(format!("Unknown preset: {}", name)))?;
        form.apply_preset(preset);
        return Ok(form.to_request());
    }

    form.maintain_aspect_ratio = keep_aspect && dimensions.is_some();
    if let Some((w, h)) = dimensions {
        form.set_original_dimensions(w, h);
    }

    match (width, height) {
        (Some(_), Some(_)) => {
            form.width = width;
            form.height = height;
        }
        (Some(_), None) => form.set_width(width),
        (None, Some(_)) => form.set_height(height),
        (None, None) => {}
    }
    Ok(form.to_request())
}

pub fn compress_request(quality: u8, target_kb: Option<u64>) -> ToolRequest {
    let form = CompressForm {
        mode: if target_kb.is_some() { CompressMode::TargetSize } else { CompressMode::Quality },
        quality,
        target_kb,
    };
    form.to_request()
}

pub fn convert_request(format: OutputFormat, quality: u8) -> ToolRequest {
    let mut form = ConvertForm::default();
    form.select_format(format);
    form.options.quality = quality;
    form.to_request()
}

/// 切り抜き
///
/// 縦横比も座標もなければ画像全体の座標指定になる（寸法が読めないときはエラー）
pub fn crop_request(
    ratio: Option<AspectRatio>,
    gravity: Gravity,
    circle: bool,
    rect: Option<CropRect>,
    dimensions: Option<(u32, u32)>,
) -> Result<ToolRequest> {
    let mut form = CropForm { gravity, ratio, ..CropForm::new() };
    if let Some((w, h)) = dimensions {
        form.set_image_dimensions(w, h);
    }

    if circle {
        form.mode = CropMode::Circle;
    } else if let Some(rect) = rect {
        form.mode = CropMode::Coords;
        form.rect = rect;
    } else if ratio.is_none() && dimensions.is_none() {
        return Err(MagicPixelsError::InvalidArgs(
            "--ratio か --rect を指定してください（画像の寸法を読めませんでした）".into(),
        ));
    }
    Ok(form.to_request())
}

pub fn background_request(color: Option<&str>) -> ToolRequest {
    let mut form = BackgroundForm::default();
    if let Some(color) = color {
        form.choose(color);
    }
    form.to_request()
}

pub fn watermark_request(options: WatermarkOptions, detect: bool) -> ToolRequest {
    let form = magicpixels_common::forms::WatermarkForm {
        method: options.method,
        strength: options.strength,
    };
    if detect {
        form.detect_request()
    } else {
        form.to_request()
    }
}

pub fn ai_edit_request(prompt: &str) -> ToolRequest {
    AiEditForm { prompt: prompt.to_string() }.to_request()
}

/// PDFサブコマンドを実行内容に変換
pub fn pdf_invocation(command: &PdfCommand) -> Invocation {
    let mut form = PdfForm::new();
    let (inputs, output) = match command {
        PdfCommand::Create { inputs, page_size, output } => {
            form.tool = PdfTool::Create;
            form.page_size = *page_size;
            (inputs.clone(), output)
        }
        PdfCommand::Merge { inputs, output } => {
            form.tool = PdfTool::Merge;
            (inputs.clone(), output)
        }
        PdfCommand::Split { input, output } => {
            form.tool = PdfTool::Split;
            (vec![input.clone()], output)
        }
        PdfCommand::Watermark { input, text, output } => {
            form.tool = PdfTool::Watermark;
            form.watermark_text = text.clone();
            (vec![input.clone()], output)
        }
        PdfCommand::ToImages { input, output } => {
            form.tool = PdfTool::ToImages;
            (vec![input.clone()], output)
        }
        PdfCommand::PageNumbers { input, position, output } => {
            form.tool = PdfTool::PageNumbers;
            form.position = *position;
            (vec![input.clone()], output)
        }
        PdfCommand::Rotate { input, rotation, output } => {
            form.tool = PdfTool::Rotate;
            form.rotation = *rotation;
            (vec![input.clone()], output)
        }
    };

    Invocation {
        request: form.to_request(),
        inputs,
        uploader: form.tool.uploader(),
        output: output.clone(),
    }
}

/// Cloudinaryツール
pub fn cloud_request(tool: &str, args: &CloudArgs) -> Result<ToolRequest> {
    let mut form = CloudinaryForm::new();
    form.select(tool).map_err(MagicPixelsError::InvalidArgs)?;

    if let Some(color) = args.color {
        form.bg_color = color;
    }
    if let Some(width) = args.width {
        form.crop_width = width;
        form.fill_width = width;
    }
    if let Some(height) = args.height {
        form.crop_height = height;
        form.fill_height = height;
    }
    if let Some(prompt) = &args.prompt {
        form.remove_prompt = prompt.clone();
        form.recolor_prompt = prompt.clone();
    }
    if let Some(color) = args.to_color {
        form.recolor_color = color;
    }
    if let Some(filter) = &args.filter {
        form.filter = filter.parse::<ArtisticFilter>().map_err(MagicPixelsError::InvalidArgs)?;
    }
    for (value, slot) in [
        (args.brightness, &mut form.brightness),
        (args.contrast, &mut form.contrast),
        (args.saturation, &mut form.saturation),
    ] {
        if let Some(value) = value {
            *slot = value.clamp(-100, 100);
        }
    }

    form.to_request()
        .ok_or_else(|| MagicPixelsError::InvalidArgs(format!("Unknown tool: {}", tool)))
}

// =============================================
// 実行
// =============================================

/// ファイルを読み込み、ページコントローラ経由でツールを実行する
///
/// 送信前の検証で弾かれた場合や、指定したファイルが受け付けられない場合は
/// リクエストを送らずにエラーを返す
pub async fn run_tool<T: Transport>(
    client: &ApiClient<T>,
    store: &mut AppStore,
    invocation: &Invocation,
) -> Result<ToolOutput> {
    let loaded = files::read_inputs(&invocation.inputs, &invocation.uploader)?;
    // 画像→PDFの形式エラーは不正なファイルを列挙した検証メッセージで返す
    validation::validate(&invocation.request, &loaded)?;
    let files = files::accept_inputs(loaded, &invocation.uploader)?;
    if let Some(first) = invocation.inputs.first() {
        store.set_current_image(Some(first.display().to_string()));
    }

    let mut page = ToolPage::new();
    page.set_files(files);
    execute(client, store, &mut page, &invocation.request, invocation.output.json).await
}

/// `begin` → 送信 → `finish` を通し、通知を表示する
pub async fn execute<T: Transport>(
    client: &ApiClient<T>,
    store: &mut AppStore,
    page: &mut ToolPage,
    request: &ToolRequest,
    quiet: bool,
) -> Result<ToolOutput> {
    let files = page.begin(store, request)?;

    let overlay = if quiet {
        ProcessingOverlay::hidden()
    } else {
        ProcessingOverlay::show(store.processing_step())
    };
    let result = client.run(request, &files).await;
    overlay.close();

    let outcome = page.finish(store, request, result);
    if !quiet {
        print_notification(&outcome.notification);
    }
    outcome_into_result(outcome)
}

fn outcome_into_result(outcome: SubmitOutcome) -> Result<ToolOutput> {
    match outcome.output {
        Some(output) => Ok(output),
        None => Err(MagicPixelsError::ToolFailed(outcome.notification.message)),
    }
}

pub fn print_notification(notification: &Notification) {
    let icon = match notification.level {
        NotificationLevel::Success => "✔",
        NotificationLevel::Warning => "⚠",
        NotificationLevel::Error => "✘",
        NotificationLevel::Info => "ℹ",
    };
    println!("{} {}", icon, notification.message);
}

/// 結果の表示
pub fn print_output(output: &ToolOutput, json: bool) -> Result<()> {
    if json {
        let text = match output {
            ToolOutput::Processed(data) => serde_json::to_string_pretty(data)?,
            ToolOutput::Detection(detection) => serde_json::to_string_pretty(detection)?,
        };
        println!("{}", text);
        return Ok(());
    }

    match output {
        ToolOutput::Detection(detection) => {
            if let Some(detail) = &detection.detection {
                for (label, value) in [("Type", &detail.kind), ("Position", &detail.position)] {
                    if let Some(value) = value {
                        println!("  {}: {}", label, value);
                    }
                }
            }
        }
        ToolOutput::Processed(data) => print_processed(data),
    }
    Ok(())
}

fn print_processed(data: &ProcessedData) {
    if let Some(url) = &data.url {
        if data.is_blob {
            println!("  PDF: {} bytes (direct download)", data.blob.as_ref().map_or(0, Vec::len));
        } else {
            println!("  URL: {}", url);
        }
    }
    for (label, value) in preview::metadata_rows(&data.metadata()) {
        println!("  {}: {}", label, value);
    }
    if let (Some(original), Some(compressed)) = (data.original_size, data.compressed_size) {
        println!(
            "  {} → {}",
            magicpixels_common::uploader::format_bytes(original),
            magicpixels_common::uploader::format_bytes(compressed)
        );
    }
    if let Some(public_id) = &data.public_id {
        println!("  Public ID: {}", public_id);
    }
    if let Some(total) = data.total_pages.or(data.page_count) {
        println!("  Pages: {}", total);
    }
    for (index, page) in data.pages.iter().enumerate() {
        println!("  [{}] {}", page.page.unwrap_or(index as u32 + 1), page.url);
    }
}

/// 結果を保存する
///
/// 直接ダウンロードのPDFは受け取ったバイナリを、ページ分割の結果は各ページを、
/// それ以外は結果URLを取得して書き出す
///
/// # Returns
/// 保存したファイル
pub async fn save_output<T: Transport>(
    client: &ApiClient<T>,
    output: &ToolOutput,
    target: &Path,
) -> Result<Vec<PathBuf>> {
    let data = output.processed().ok_or(MagicPixelsError::NoResultUrl)?;

    if let Some(blob) = &data.blob {
        let path = files::output_path(target, &preview::download_file_name("pdf"));
        files::write_output(&path, blob)?;
        return Ok(vec![path]);
    }

    if !data.pages.is_empty() {
        std::fs::create_dir_all(target)?;
        let mut saved = Vec::new();
        for (index, page) in data.pages.iter().enumerate() {
            let format = page.format.as_deref().unwrap_or("pdf");
            let number = page.page.unwrap_or(index as u32 + 1);
            let path = target.join(format!("page-{}.{}", number, format));
            let bytes = client.fetch_bytes(&page.url).await?;
            files::write_output(&path, &bytes)?;
            saved.push(path);
        }
        return Ok(saved);
    }

    let url = data.url.as_deref().ok_or(MagicPixelsError::NoResultUrl)?;
    let format = result_format(data);
    let path = files::output_path(target, &preview::download_file_name(&format));
    let bytes = client
        .fetch_bytes(url)
        .await
        .map_err(|e| MagicPixelsError::Download(format!("{}: {}", preview::DOWNLOAD_FAILED, e)))?;
    files::write_output(&path, &bytes)?;
    Ok(vec![path])
}

/// 保存時の拡張子
fn result_format(data: &ProcessedData) -> String {
    data.new_format
        .as_deref()
        .or(data.format.as_deref())
        .unwrap_or("png")
        .to_lowercase()
        .replace("jpeg", "jpg")
}

/// 表示と保存をまとめて行う
pub async fn finish_output<T: Transport>(
    client: &ApiClient<T>,
    output: &ToolOutput,
    args: &OutputArgs,
) -> Result<()> {
    print_output(output, args.json)?;
    if let Some(target) = &args.save {
        for path in save_output(client, output, target).await? {
            if !args.json {
                println!("✔ 保存: {}", path.display());
            }
        }
    }
    Ok(())
}
