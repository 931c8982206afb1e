//! 画像系エンドポイント（アップロード、リサイズ、圧縮、変換、切り抜き、背景、透かし）

use super::{ApiClient, Transport};
use crate::error::Result;
use crate::request::{ApiRequest, MultipartForm};
use crate::tools::{
    BackgroundOptions, CompressOptions, ConvertOptions, CropOptions, CropRect, FileField,
    OutputFormat, ResizeOptions, ToolRequest, WatermarkOptions,
};
use crate::types::{ProcessedData, UploadedFile, WatermarkDetection};
use serde_json::{json, Value};

impl<T: Transport> ApiClient<T> {
    /// `POST /upload`
    pub async fn upload(&self, file: &UploadedFile) -> Result<ProcessedData> {
        let form = MultipartForm::single(FileField::Image, file.clone());
        self.post_processed("/upload", form).await
    }

    /// `POST /upload/multiple`
    pub async fn upload_multiple(&self, files: &[UploadedFile]) -> Result<Value> {
        let form = files
            .iter()
            .cloned()
            .fold(MultipartForm::new(), |form, f| form.file(FileField::Images.as_str(), f));
        self.post_form("/upload/multiple", form).await
    }

    /// `POST /upload/base64`（JSON）
    pub async fn upload_base64(&self, image_data: &str, filename: &str) -> Result<ProcessedData> {
        let request = ApiRequest::post_json(
            "/upload/base64",
            json!({ "image": image_data, "filename": filename }),
        );
        ProcessedData::from_value(self.request_data(request).await?)
    }

    pub async fn resize(&self, file: &UploadedFile, options: &ResizeOptions) -> Result<ProcessedData> {
        self.process(&ToolRequest::Resize(options.clone()), std::slice::from_ref(file))
            .await
    }

    /// `POST /resize/batch` 複数サイズを一度に
    pub async fn resize_batch(&self, file: &UploadedFile, sizes: &[(u32, u32)]) -> Result<Value> {
        let sizes: Vec<Value> = sizes
            .iter()
            .map(|(width, height)| json!({ "width": width, "height": height }))
            .collect();
        let form = MultipartForm::single(FileField::Image, file.clone())
            .text("sizes", Value::Array(sizes).to_string());
        self.post_form("/resize/batch", form).await
    }

    /// `POST /resize/presets`
    pub async fn resize_preset(&self, file: &UploadedFile, preset: &str) -> Result<Value> {
        let form = MultipartForm::single(FileField::Image, file.clone()).text("preset", preset);
        self.post_form("/resize/presets", form).await
    }

    pub async fn compress(&self, file: &UploadedFile, options: &CompressOptions) -> Result<ProcessedData> {
        self.process(&ToolRequest::Compress(options.clone()), std::slice::from_ref(file))
            .await
    }

    pub async fn convert(&self, file: &UploadedFile, options: &ConvertOptions) -> Result<ProcessedData> {
        self.process(&ToolRequest::Convert(options.clone()), std::slice::from_ref(file))
            .await
    }

    /// `POST /convert/multi-format`
    pub async fn convert_multi(&self, file: &UploadedFile, formats: &[OutputFormat]) -> Result<Value> {
        let formats: Vec<&str> = formats.iter().map(OutputFormat::as_str).collect();
        let form = MultipartForm::single(FileField::Image, file.clone())
            .text("formats", json!(formats).to_string());
        self.post_form("/convert/multi-format", form).await
    }

    /// `GET /convert/formats`
    pub async fn supported_formats(&self) -> Result<Value> {
        self.get_data("/convert/formats").await
    }

    pub async fn crop(&self, file: &UploadedFile, options: &CropOptions) -> Result<ProcessedData> {
        self.process(&ToolRequest::Crop(options.clone()), std::slice::from_ref(file))
            .await
    }

    /// `POST /crop/freeform`
    pub async fn crop_freeform(&self, file: &UploadedFile, rect: &CropRect) -> Result<ProcessedData> {
        let form = MultipartForm::single(FileField::Image, file.clone())
            .text("left", rect.left.to_string())
            .text("top", rect.top.to_string())
            .text("width", rect.width.to_string())
            .text("height", rect.height.to_string());
        self.post_processed("/crop/freeform", form).await
    }

    /// `GET /crop/presets`
    pub async fn crop_presets(&self) -> Result<Value> {
        self.get_data("/crop/presets").await
    }

    pub async fn remove_background(
        &self,
        file: &UploadedFile,
        options: &BackgroundOptions,
    ) -> Result<ProcessedData> {
        self.process(&ToolRequest::BackgroundRemove(options.clone()), std::slice::from_ref(file))
            .await
    }

    pub async fn remove_watermark(
        &self,
        file: &UploadedFile,
        options: &WatermarkOptions,
    ) -> Result<ProcessedData> {
        self.process(&ToolRequest::WatermarkRemove(*options), std::slice::from_ref(file))
            .await
    }

    /// `POST /watermark-remove/detect`
    pub async fn detect_watermark(&self, file: &UploadedFile) -> Result<WatermarkDetection> {
        let request = ToolRequest::WatermarkDetect;
        let form = MultipartForm::for_tool(&request, std::slice::from_ref(file));
        let data = self.post_form(request.endpoint(), form).await?;
        Ok(serde_json::from_value(data)?)
    }
}
