//! reqwest によるトランスポート
//!
//! 非2xxもそのまま `RawResponse` として返し、解釈は APIクライアントに任せる。

use crate::config::Config;
use crate::error::Result;
use async_trait::async_trait;
use magicpixels_common::request::{ApiRequest, Method, MultipartForm, RawResponse, RequestBody};
use magicpixels_common::{Error, Transport};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use std::time::Duration;

pub const TIMEOUT_MESSAGE: &str = "Request timed out";
pub const NETWORK_ERROR_MESSAGE: &str = "Network Error";

pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url: base_url.into() })
    }

    /// 設定とCLI引数からトランスポートを作る
    pub fn from_config(config: &Config, api_url: Option<&str>) -> Result<Self> {
        let base_url = config.resolve_api_url(api_url)?;
        tracing::debug!(base_url = %base_url, timeout = config.timeout_seconds, "HTTP transport");
        Self::new(base_url, Duration::from_secs(config.timeout_seconds))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> magicpixels_common::Result<RawResponse> {
        let url = request.url(&self.base_url);
        let builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        let builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(&body),
            RequestBody::Multipart(form) => builder.multipart(to_multipart(form)?),
        };

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(transport_error)?.to_vec();

        Ok(RawResponse { status, content_type, body })
    }
}

fn to_multipart(form: MultipartForm) -> magicpixels_common::Result<Form> {
    let mut multipart = Form::new();
    for part in form.files {
        let file = Part::bytes(part.file.bytes)
            .file_name(part.file.name)
            .mime_str(&part.file.mime_type)
            .map_err(|e| Error::Transport(e.to_string()))?;
        multipart = multipart.part(part.field, file);
    }
    for (key, value) in form.fields {
        multipart = multipart.text(key, value);
    }
    Ok(multipart)
}

/// タイムアウトと接続失敗は汎用メッセージにまとめる
fn transport_error(error: reqwest::Error) -> Error {
    tracing::debug!(error = %error, "HTTP transport error");
    if error.is_timeout() {
        Error::Transport(TIMEOUT_MESSAGE.to_string())
    } else if error.is_connect() || error.is_request() {
        Error::Transport(NETWORK_ERROR_MESSAGE.to_string())
    } else {
        Error::Transport(error.to_string())
    }
}
