//! APIクライアント
//!
//! 外部の画像処理APIへのリクエストを組み立て、エンベロープを解く。
//! 実際の送信は `Transport` に任せる（CLIは reqwest、Webは fetch）。
//! グローバル状態は変更しない。結果の保存は呼び出し側の責任。

mod ai;
mod cloudinary;
mod image;
mod pdf;

use crate::envelope::{status_error, Envelope};
use crate::error::{Error, Result};
use crate::request::{ApiRequest, MultipartForm, RawResponse};
use crate::tools::{PdfOperation, ToolRequest};
use crate::types::{ProcessedData, UploadedFile, WatermarkDetection};
use async_trait::async_trait;
use serde_json::Value;

pub use pdf::{NO_PDF_IMAGES_PROVIDED, NO_VALID_PDF_IMAGES, PDF_DIRECT_PATH};

/// `success=false` で `error` が空だった場合のメッセージ
pub const PROCESSING_FAILED: &str = "Processing failed";

/// JSONとして読めない2xxレスポンス
pub const INVALID_RESPONSE: &str = "Invalid response from server";

/// 1リクエストあたりのタイムアウト（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// 直接ダウンロードの結果にローカル参照を作れない環境での参照
pub const LOCAL_BLOB_URL: &str = "blob:local";

/// HTTP送信の抽象
///
/// 非2xxでもエラーにせず `RawResponse` を返すこと。ステータスの解釈はクライアント側で行う。
/// 接続失敗・タイムアウトは `Error::Transport` で返す。
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse>;

    /// バイナリからローカル参照URLを作る（ブラウザでは Object URL）
    fn object_url(&self, bytes: &[u8], mime_type: &str) -> Result<String> {
        let _ = (bytes, mime_type);
        Ok(LOCAL_BLOB_URL.to_string())
    }
}

/// ツール実行の結果
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    Processed(ProcessedData),
    Detection(WatermarkDetection),
}

impl ToolOutput {
    pub fn processed(&self) -> Option<&ProcessedData> {
        match self {
            ToolOutput::Processed(data) => Some(data),
            ToolOutput::Detection(_) => None,
        }
    }
}

/// APIクライアント
pub struct ApiClient<T> {
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// ツールリクエストを実行
    ///
    /// 検証は呼び出し側（ページコントローラ）で済ませておくこと
    ///
    /// # Arguments
    /// * `request` - ツールとオプション
    /// * `files` - 単一ファイルのツールでは先頭のみ使う
    pub async fn run(&self, request: &ToolRequest, files: &[UploadedFile]) -> Result<ToolOutput> {
        match request {
            ToolRequest::WatermarkDetect => {
                let file = first_file(files)?;
                self.detect_watermark(file).await.map(ToolOutput::Detection)
            }
            ToolRequest::Pdf(PdfOperation::Create { page_size }) => self
                .pdf_from_images(files, *page_size)
                .await
                .map(ToolOutput::Processed),
            other => self.process(other, files).await.map(ToolOutput::Processed),
        }
    }

    /// ツールの標準エンドポイントへマルチパートで送る
    pub(crate) async fn process(
        &self,
        request: &ToolRequest,
        files: &[UploadedFile],
    ) -> Result<ProcessedData> {
        let form = MultipartForm::for_tool(request, files);
        self.post_processed(request.endpoint(), form).await
    }

    pub(crate) async fn post_processed(&self, path: &str, form: MultipartForm) -> Result<ProcessedData> {
        let data = self.post_form(path, form).await?;
        ProcessedData::from_value(data)
    }

    pub(crate) async fn post_form(&self, path: &str, form: MultipartForm) -> Result<Value> {
        self.request_data(ApiRequest::post_form(path, form)).await
    }

    pub(crate) async fn get_data(&self, path: &str) -> Result<Value> {
        self.request_data(ApiRequest::get(path)).await
    }

    /// エンベロープを解いて `data` を返す
    pub(crate) async fn request_data(&self, request: ApiRequest) -> Result<Value> {
        let path = request.path.clone();
        let response = self.send_raw(request).await?;
        let envelope = Envelope::from_slice(&response.body).map_err(|e| {
            tracing::debug!(path = %path, error = %e, "Response body is not an envelope");
            Error::Api(INVALID_RESPONSE.to_string())
        })?;

        envelope.into_result(PROCESSING_FAILED).map_err(|e| {
            tracing::debug!(path = %path, error = %e, "API reported failure");
            e
        })
    }

    /// 送信して非2xxをエラーに変換する
    pub(crate) async fn send_raw(&self, request: ApiRequest) -> Result<RawResponse> {
        tracing::debug!(method = request.method.as_str(), path = %request.path, "API request");
        let path = request.path.clone();
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            tracing::debug!(path = %path, status = response.status, "API returned error status");
            return Err(status_error(response.status, &response.body));
        }
        Ok(response)
    }

    /// URLの内容をバイナリで取得（結果のダウンロード）
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.send_raw(ApiRequest::get(url)).await?;
        Ok(response.body)
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<Value> {
        let response = self.send_raw(ApiRequest::get("/health")).await?;
        // ヘルスチェックはエンベロープで包まれていないことがある
        match Envelope::from_slice(&response.body) {
            Ok(envelope) if envelope.data.is_some() || !envelope.success => {
                envelope.into_result(PROCESSING_FAILED)
            }
            _ => Ok(serde_json::from_slice(&response.body)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&response.body).to_string()))),
        }
    }
}

pub(crate) fn first_file(files: &[UploadedFile]) -> Result<&UploadedFile> {
    files
        .first()
        .ok_or_else(|| Error::validation(crate::validation::NO_IMAGE))
}

#[cfg(test)]
pub(crate) mod testing {
    //! テスト用のインメモリトランスポート

    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// 送信されたリクエストを記録し、用意したレスポンスを順に返す
    #[derive(Default)]
    pub struct FakeTransport {
        pub sent: RefCell<Vec<ApiRequest>>,
        pub responses: RefCell<VecDeque<Result<RawResponse>>>,
    }

    impl FakeTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, response: Result<RawResponse>) -> Self {
            self.responses.borrow_mut().push_back(response);
            self
        }

        pub fn respond_ok(self, data: Value) -> Self {
            self.respond(Ok(RawResponse::json(200, &serde_json::json!({ "success": true, "data": data }))))
        }

        pub fn paths(&self) -> Vec<String> {
            self.sent.borrow().iter().map(|r| r.path.clone()).collect()
        }
    }

    #[async_trait(?Send)]
    impl Transport for FakeTransport {
        async fn send(&self, request: ApiRequest) -> Result<RawResponse> {
            self.sent.borrow_mut().push(request);
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(Error::Transport("no response queued".to_string())))
        }

        fn object_url(&self, bytes: &[u8], mime_type: &str) -> Result<String> {
            Ok(format!("blob:test/{}/{}", mime_type, bytes.len()))
        }
    }
}
