//! APIレスポンスエンベロープ
//!
//! すべてのレスポンスは `{ success, data?, error? }` の形で返る。
//! `success` が true のときだけ `data` を、false のときだけ `error` を見る。

use crate::error::{Error, Result, FALLBACK_ERROR_MESSAGE};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{ success, data?, error? }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(message.into()) }
    }

    /// `success` に従って `data` か `error` を取り出す
    ///
    /// # Arguments
    /// * `fallback` - `error` が空だった場合のメッセージ
    pub fn into_result(self, fallback: &str) -> Result<T> {
        if !self.success {
            let message = self
                .error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| fallback.to_string());
            return Err(Error::Api(message));
        }

        self.data
            .ok_or_else(|| Error::Api("Response contained no data".to_string()))
    }
}

impl Envelope<Value> {
    /// 生のレスポンスボディをパース
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(body)?)
    }
}

/// エラーレスポンスのボディから `error` を取り出す
///
/// JSONでない、または `error` がない場合は None
pub fn error_message_from_body(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("error")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// 非2xxレスポンスをエラーに変換
///
/// ボディに `error` があればそれを、なければステータスコード付きの汎用メッセージを使う
pub fn status_error(status: u16, body: &[u8]) -> Error {
    let message = error_message_from_body(body).unwrap_or_else(|| {
        if status == 0 {
            FALLBACK_ERROR_MESSAGE.to_string()
        } else {
            format!("Request failed with status code {}", status)
        }
    });
    Error::Api(message)
}
