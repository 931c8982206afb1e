//! ツールページのコントローラ
//!
//! 各ツールページは同じ状態遷移をたどる:
//! `idle → configuring → submitting → {succeeded | failed} → configuring`
//!
//! 送信は `begin`（検証・処理中フラグ）と `finish`（結果の反映・通知）に分かれる。
//! 間の非同期呼び出しは呼び出し側が行うため、UI側は状態を借用したまま await しなくてよい。

use crate::api::{ApiClient, ToolOutput, Transport};
use crate::error::{Error, Result};
use crate::store::AppStore;
use crate::tools::{CropOptions, ToolRequest};
use crate::types::{ProcessedImageRecord, UploadedFile};
use crate::validation;

/// 1ページにつき同時に1リクエストまで
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    InFlight,
    Done,
    Error(String),
}

/// 画面上の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    /// ファイル未選択
    Idle,
    Configuring,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Warning,
    Error,
    Info,
}

/// 一時的な通知（トースト）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NotificationLevel::Success, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: NotificationLevel::Warning, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NotificationLevel::Error, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NotificationLevel::Info, message: message.into() }
    }

    pub fn from_error(error: &Error) -> Self {
        Self::error(error.to_string())
    }
}

/// 画面
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Resize,
    Compress,
    Convert,
    Crop,
    BackgroundRemove,
    WatermarkRemove,
    PdfTools,
    AiTool,
    CloudinaryTools,
    Result,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Resize => "/resize",
            Route::Compress => "/compress",
            Route::Convert => "/convert",
            Route::Crop => "/crop",
            Route::BackgroundRemove => "/background-remove",
            Route::WatermarkRemove => "/watermark-remove",
            Route::PdfTools => "/pdf-tools",
            Route::AiTool => "/ai-tool",
            Route::CloudinaryTools => "/cloudinary-tools",
            Route::Result => "/result",
        }
    }
}

/// 送信の結果
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub notification: Notification,
    /// 遷移先（AI編集・Cloudinaryは結果画面へ）
    pub navigate: Option<Route>,
    pub output: Option<ToolOutput>,
}

pub const AI_FALLBACK_WARNING: &str = "AI service busy - Used smart preset processing instead";
pub const WATERMARK_DETECTED: &str = "Watermark detected! Adjust settings and remove.";
pub const NO_WATERMARK_DETECTED: &str = "No obvious watermark detected. You can still try removal.";

/// 1ツールページの状態
#[derive(Debug, Clone, Default)]
pub struct ToolPage {
    files: Vec<UploadedFile>,
    request_state: RequestState,
    result: Option<ToolOutput>,
}

impl ToolPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    pub fn request_state(&self) -> &RequestState {
        &self.request_state
    }

    /// このページに残る結果（ローカル結果のツール）
    pub fn result(&self) -> Option<&ToolOutput> {
        self.result.as_ref()
    }

    pub fn state(&self) -> PageState {
        match self.request_state {
            RequestState::InFlight => PageState::Submitting,
            RequestState::Done if self.result.is_some() => PageState::Succeeded,
            RequestState::Error(_) => PageState::Failed,
            _ if self.files.is_empty() => PageState::Idle,
            _ => PageState::Configuring,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.request_state == RequestState::InFlight
    }

    /// ファイルを差し替える。前回の結果は消す
    pub fn set_files(&mut self, files: Vec<UploadedFile>) {
        self.files = files;
        self.reset_result();
    }

    pub fn add_files(&mut self, files: impl IntoIterator<Item = UploadedFile>) {
        self.files.extend(files);
        self.reset_result();
    }

    pub fn remove_file(&mut self, index: usize) -> Option<UploadedFile> {
        if index >= self.files.len() {
            return None;
        }
        let removed = self.files.remove(index);
        self.reset_result();
        Some(removed)
    }

    pub fn clear_files(&mut self) {
        self.set_files(Vec::new());
    }

    /// 結果画面から設定画面に戻る（入力は保持）
    pub fn reset_result(&mut self) {
        if self.request_state != RequestState::InFlight {
            self.request_state = RequestState::Idle;
            self.result = None;
        }
    }

    /// 送信ボタンを有効にできるか
    pub fn can_submit(&self, request: &ToolRequest) -> bool {
        !self.is_busy() && validation::validate(request, &self.files).is_ok()
    }

    /// 送信開始
    ///
    /// 処理中なら `Error::Busy`、検証エラーなら `Error::Validation` を返し、状態は変えない。
    /// 成功時は送るファイルを返す。
    pub fn begin(&mut self, store: &mut AppStore, request: &ToolRequest) -> Result<Vec<UploadedFile>> {
        if self.is_busy() {
            return Err(Error::Busy);
        }
        validation::validate(request, &self.files)?;

        self.request_state = RequestState::InFlight;
        store.set_processing(true, processing_step(request));
        tracing::debug!(tool = request.tool_name(), files = self.files.len(), "Submitting");
        Ok(self.files.clone())
    }

    /// 送信完了
    ///
    /// 失敗時は入力を保持したまま `Failed` になる。グローバルストアは変更しない。
    pub fn finish(
        &mut self,
        store: &mut AppStore,
        request: &ToolRequest,
        result: Result<ToolOutput>,
    ) -> SubmitOutcome {
        store.set_processing(false, "");

        match result {
            Ok(output) => {
                let notification = success_notification(request, &output);
                let mut navigate = None;

                if request.uses_global_store() {
                    if let ToolOutput::Processed(data) = &output {
                        let default_format = matches!(request, ToolRequest::AiEdit { .. }).then_some("png");
                        let record = ProcessedImageRecord::from_data(data, Some(request.tool_name()), default_format);
                        store.set_processed_image(record);
                        navigate = Some(Route::Result);
                    }
                }

                self.request_state = RequestState::Done;
                self.result = Some(output.clone());
                SubmitOutcome { notification, navigate, output: Some(output) }
            }
            Err(error) => {
                let message = failure_message(request, &error);
                tracing::debug!(tool = request.tool_name(), error = %message, "Request failed");
                self.request_state = RequestState::Error(message.clone());
                SubmitOutcome {
                    notification: Notification::error(message),
                    navigate: None,
                    output: None,
                }
            }
        }
    }

    /// 検証・送信・反映をまとめて行う
    ///
    /// 送信前に弾かれた場合は通知だけを返し、リクエストは送らない
    pub async fn submit<T: Transport>(
        &mut self,
        client: &ApiClient<T>,
        store: &mut AppStore,
        request: &ToolRequest,
    ) -> SubmitOutcome {
        let files = match self.begin(store, request) {
            Ok(files) => files,
            Err(error) => {
                return SubmitOutcome {
                    notification: Notification::from_error(&error),
                    navigate: None,
                    output: None,
                }
            }
        };

        let result = client.run(request, &files).await;
        self.finish(store, request, result)
    }
}

/// 処理中に表示するステップ
pub fn processing_step(request: &ToolRequest) -> String {
    match request {
        ToolRequest::Resize(_) => "Resizing image...".to_string(),
        ToolRequest::Compress(_) => "Compressing image...".to_string(),
        ToolRequest::Convert(options) => {
            format!("Converting to {}...", options.format.as_str().to_uppercase())
        }
        ToolRequest::Crop(_) => "Cropping image...".to_string(),
        ToolRequest::BackgroundRemove(_) => "Removing background...".to_string(),
        ToolRequest::WatermarkRemove(_) => "Removing watermark...".to_string(),
        ToolRequest::WatermarkDetect => "Detecting watermark...".to_string(),
        ToolRequest::Pdf(_) => "Processing PDF...".to_string(),
        ToolRequest::AiEdit { .. } => "Applying AI transformations...".to_string(),
        ToolRequest::AiEnhance { .. } => "Enhancing image...".to_string(),
        ToolRequest::Cloudinary(tool) => format!("Applying {}...", tool.name()),
    }
}

/// 成功時の通知
pub fn success_notification(request: &ToolRequest, output: &ToolOutput) -> Notification {
    if let ToolOutput::Detection(detection) = output {
        return if detection.watermark_detected {
            Notification::success(WATERMARK_DETECTED)
        } else {
            Notification::info(NO_WATERMARK_DETECTED)
        };
    }

    if let (ToolRequest::AiEdit { .. }, ToolOutput::Processed(data)) = (request, output) {
        if data.used_fallback() {
            return Notification::warning(AI_FALLBACK_WARNING);
        }
    }

    let message = match request {
        ToolRequest::Resize(_) => "Image resized successfully!".to_string(),
        ToolRequest::Compress(_) => "Image compressed successfully!".to_string(),
        ToolRequest::Convert(options) => {
            format!("Converted to {} successfully!", options.format.as_str().to_uppercase())
        }
        ToolRequest::Crop(CropOptions::Circle) => "Circle crop applied!".to_string(),
        ToolRequest::Crop(CropOptions::Coords(_)) => "Custom crop applied!".to_string(),
        ToolRequest::Crop(CropOptions::Aspect { ratio, .. }) => format!("Cropped to {}!", ratio),
        ToolRequest::BackgroundRemove(_) => "Background processed successfully!".to_string(),
        ToolRequest::WatermarkRemove(_) => "Watermark removal complete!".to_string(),
        ToolRequest::WatermarkDetect => NO_WATERMARK_DETECTED.to_string(),
        ToolRequest::Pdf(_) => "PDF processed successfully!".to_string(),
        ToolRequest::AiEdit { .. } | ToolRequest::AiEnhance { .. } | ToolRequest::Cloudinary(_) => {
            "Image processed successfully!".to_string()
        }
    };
    Notification::success(message)
}

/// 失敗時の通知メッセージ
///
/// エラーにメッセージがなければツールごとの既定文言を使う
pub fn failure_message(request: &ToolRequest, error: &Error) -> String {
    let message = error.to_string();
    if !message.trim().is_empty() {
        return message;
    }

    match request {
        ToolRequest::Resize(_) => "Failed to resize image",
        ToolRequest::Compress(_) => "Failed to compress image",
        ToolRequest::Convert(_) => "Failed to convert image",
        ToolRequest::Crop(_) => "Failed to crop image",
        ToolRequest::WatermarkRemove(_) => "Failed to remove watermark",
        ToolRequest::WatermarkDetect => "Detection failed",
        ToolRequest::Pdf(_) => "Failed to process PDF",
        ToolRequest::BackgroundRemove(_)
        | ToolRequest::AiEdit { .. }
        | ToolRequest::AiEnhance { .. }
        | ToolRequest::Cloudinary(_) => "Failed to process image",
    }
    .to_string()
}
