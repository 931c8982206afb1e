//! トランスポートに渡すリクエスト/レスポンスの表現
//!
//! HTTPクライアントに依存しない形で組み立て、CLI（reqwest）と
//! Web（fetch）のそれぞれのトランスポートが実際の送信を行う。

use crate::tools::{FileField, ToolRequest};
use crate::types::UploadedFile;
use serde_json::Value;

/// HTTPメソッド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// マルチパートのファイルパート
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub field: String,
    pub file: UploadedFile,
}

/// マルチパートフォーム
///
/// テキストフィールドの値はすべて文字列化済み
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    pub files: Vec<FilePart>,
    pub fields: Vec<(String, String)>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, field: &str, file: UploadedFile) -> Self {
        self.files.push(FilePart { field: field.to_string(), file });
        self
    }

    pub fn text(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields.push((key.to_string(), value.into()));
        self
    }

    /// 同じキーが複数あれば最初の値
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// 指定フィールドのファイル
    pub fn files_in(&self, field: &str) -> Vec<&UploadedFile> {
        self.files
            .iter()
            .filter(|p| p.field == field)
            .map(|p| &p.file)
            .collect()
    }

    /// ツールリクエストからフォームを組み立てる
    ///
    /// 単一ファイルのフィールドには先頭の1件だけを載せる
    pub fn for_tool(request: &ToolRequest, files: &[UploadedFile]) -> Self {
        let field = request.file_field();
        let attached: &[UploadedFile] = if field.is_multiple() {
            files
        } else {
            files.get(..1).unwrap_or(&[])
        };

        let form = attached
            .iter()
            .cloned()
            .fold(Self::new(), |form, file| form.file(field.as_str(), file));

        request
            .form_fields()
            .into_iter()
            .fold(form, |form, (key, value)| form.text(&key, value))
    }

    /// 単一ファイル用の簡易コンストラクタ
    pub fn single(field: FileField, file: UploadedFile) -> Self {
        Self::new().file(field.as_str(), file)
    }
}

/// リクエストボディ
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(MultipartForm),
}

/// トランスポート非依存のリクエスト
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// ベースURLからの相対パス、または絶対URL
    pub path: String,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self { method: Method::Get, path: path.into(), body: RequestBody::Empty }
    }

    pub fn post_json(path: impl Into<String>, body: Value) -> Self {
        Self { method: Method::Post, path: path.into(), body: RequestBody::Json(body) }
    }

    pub fn post_form(path: impl Into<String>, form: MultipartForm) -> Self {
        Self { method: Method::Post, path: path.into(), body: RequestBody::Multipart(form) }
    }

    /// 送信先URL
    pub fn url(&self, base_url: &str) -> String {
        resolve_url(base_url, &self.path)
    }

    pub fn form(&self) -> Option<&MultipartForm> {
        match &self.body {
            RequestBody::Multipart(form) => Some(form),
            _ => None,
        }
    }
}

/// トランスポートが返す生レスポンス
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self { status, content_type: None, body }
    }

    pub fn json(status: u16, value: &Value) -> Self {
        Self {
            status,
            content_type: Some("application/json".to_string()),
            body: value.to_string().into_bytes(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// ベースURLとパスを結合する
///
/// パスが絶対URL（http/https/blob/data）ならそのまま返す
pub fn resolve_url(base_url: &str, path: &str) -> String {
    const ABSOLUTE: [&str; 4] = ["http://", "https://", "blob:", "data:"];
    if ABSOLUTE.iter().any(|prefix| path.starts_with(prefix)) {
        return path.to_string();
    }

    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}
