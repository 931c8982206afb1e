use thiserror::Error;

#[derive(Error, Debug)]
pub enum MagicPixelsError {
    /// APIクライアントのエラーはメッセージをそのまま表示する
    #[error(transparent)]
    Api(#[from] magicpixels_common::Error),

    /// ツールの実行に失敗（通知と同じ文言）
    #[error("{0}")]
    ToolFailed(String),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("引数エラー: {0}")]
    InvalidArgs(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("結果にダウンロードできるURLがありません")]
    NoResultUrl,

    #[error("ダウンロードエラー: {0}")]
    Download(String),

    #[error("HTTPクライアントエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("入力エラー: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MagicPixelsError>;
