//! AI編集・AI補正
use super::{ApiClient, Transport};
use crate::error::Result;
use crate::request::MultipartForm;
use crate::tools::{FileField, ToolRequest};
use crate::types::{ProcessedData, UploadedFile};
use serde_json::Value;

impl<T: Transport> ApiClient<T> {
    /// 自然文の指示で画像を編集
    pub async fn ai_edit(&self, file: &UploadedFile, prompt: &str) -> Result<ProcessedData> {
        let request = ToolRequest::AiEdit { prompt: prompt.to_string() };
        self.process(&request, std::slice::from_ref(file)).await
    }

    /// `POST /ai-edit/analyze` 指示は任意
    pub async fn ai_analyze(&self, file: &UploadedFile, prompt: Option<&str>) -> Result<Value> {
        let mut form = MultipartForm::single(FileField::Image, file.clone());
        if let Some(prompt) = prompt.filter(|p| !p.trim().is_empty()) {
            form = form.text("prompt", prompt);
        }
        self.post_form("/ai-edit/analyze", form).await
    }

    /// `POST /ai-edit/ideas` 編集案の提案
    pub async fn ai_ideas(&self, file: &UploadedFile) -> Result<Value> {
        let form = MultipartForm::single(FileField::Image, file.clone());
        self.post_form("/ai-edit/ideas", form).await
    }

    pub async fn ai_enhance(&self, file: &UploadedFile, auto_apply: bool) -> Result<ProcessedData> {
        let request = ToolRequest::AiEnhance { auto_apply };
        self.process(&request, std::slice::from_ref(file)).await
    }

    /// `POST /ai-enhance/alt-text` 代替テキスト生成
    pub async fn alt_text(&self, file: &UploadedFile) -> Result<Value> {
        let form = MultipartForm::single(FileField::Image, file.clone());
        self.post_form("/ai-enhance/alt-text", form).await
    }
}
