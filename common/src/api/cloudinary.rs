//! Cloudinary AIツールとダウンロード追跡
use super::{ApiClient, Transport};
use crate::error::Result;
use crate::request::ApiRequest;
use crate::tools::{CloudinaryTool, ToolRequest};
use crate::types::{DownloadStatus, ProcessedData, UploadedFile};
use serde_json::{json, Value};

impl<T: Transport> ApiClient<T> {
    pub async fn cloudinary(&self, file: &UploadedFile, tool: &CloudinaryTool) -> Result<ProcessedData> {
        self.process(&ToolRequest::Cloudinary(tool.clone()), std::slice::from_ref(file))
            .await
    }

    /// `GET /cloudinary/filters`
    pub async fn cloudinary_filters(&self) -> Result<Value> {
        self.get_data("/cloudinary/filters").await
    }

    /// ダウンロードを記録し、ダウンロードURLと残り回数を受け取る
    ///
    /// # Arguments
    /// * `public_id` - 処理結果の publicId
    /// * `format` - 保存するフォーマット
    pub async fn track_download(&self, public_id: &str, format: &str) -> Result<DownloadStatus> {
        let request = ApiRequest::post_json(
            "/cloudinary/download",
            json!({ "publicId": public_id, "format": format }),
        );
        Ok(serde_json::from_value(self.request_data(request).await?)?)
    }

    /// `GET /cloudinary/status/:id`
    pub async fn download_status(&self, public_id: &str) -> Result<DownloadStatus> {
        let path = format!("/cloudinary/status/{}", urlencoding::encode(public_id));
        Ok(serde_json::from_value(self.get_data(&path).await?)?)
    }
}
