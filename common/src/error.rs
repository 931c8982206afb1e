//! エラー型定義
//!
//! 通知にそのまま表示できるよう、Validation / Transport / Api はメッセージのみを Display する。

use thiserror::Error;

/// メッセージが取れなかった場合の汎用メッセージ
pub const FALLBACK_ERROR_MESSAGE: &str = "An error occurred";

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// 送信前のクライアント側検証エラー（ファイル未選択、必須項目なし、MIME不正）
    #[error("{0}")]
    Validation(String),

    /// 通信エラー（接続失敗、タイムアウト）
    #[error("{0}")]
    Transport(String),

    /// APIが返したエラー（非2xx、または success=false）
    #[error("{0}")]
    Api(String),

    /// 同じページでリクエストが処理中
    #[error("A request is already in progress")]
    Busy,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// 送信前に弾かれたエラーか
    pub fn is_client_side(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::Busy)
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_is_verbatim() {
        let error = Error::Validation("Please add at least 2 PDFs to merge".to_string());
        assert_eq!(error.to_string(), "Please add at least 2 PDFs to merge");

        let error = Error::Api("Image too large".to_string());
        assert_eq!(error.to_string(), "Image too large");
    }

    #[test]
    fn test_error_display_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error = Error::Json(json_error);
        assert!(error.to_string().contains("JSON error"));
    }

    #[test]
    fn test_error_display_config() {
        let error = Error::Config("base URL is empty".to_string());
        assert_eq!(error.to_string(), "Config error: base URL is empty");
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }

    #[test]
    fn test_is_client_side() {
        assert!(Error::validation("x").is_client_side());
        assert!(Error::Busy.is_client_side());
        assert!(!Error::Transport("timeout".into()).is_client_side());
        assert!(!Error::Api("bad".into()).is_client_side());
    }
}
