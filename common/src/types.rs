//! データモデル
//!
//! CLIとWeb(WASM)で共有される型:
//! - UploadedFile: ユーザーが選択したファイル（メモリ上のみ）
//! - ProcessedData: 成功レスポンスの `data`
//! - ProcessedImageRecord: ストアに積まれる処理結果（生成後は不変）

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 選択されたファイル
///
/// 選択時に作られ、削除・差し替えで破棄される。永続化しない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    /// 宣言されたMIMEタイプ（ブラウザの File.type、CLIでは拡張子から推定）
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// ファイル名の拡張子からMIMEタイプを推定して作成
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime_type = mime_from_file_name(&name).to_string();
        Self { name, mime_type, bytes }
    }

    /// ローカルファイルから読み込み（非WASM環境のみ）
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_path(path: &std::path::Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(Self::from_bytes(name, bytes))
    }

    /// バイトサイズ
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// 小文字の拡張子（なければ空文字）
    pub fn extension(&self) -> String {
        extension_of(&self.name)
    }
}

fn extension_of(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_lowercase(),
        _ => String::new(),
    }
}

/// 拡張子からMIMEタイプを推定
pub fn mime_from_file_name(name: &str) -> &'static str {
    match extension_of(name).as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "avif" => "image/avif",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "json" => "application/json",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// 画像メタデータ（すべて任意）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageMetadata {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub size: Option<u64>,
    pub format: Option<String>,
}

/// ダウンロード回数の状態
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DownloadInfo {
    pub downloads: u32,
    pub remaining: u32,
}

/// AI編集の指示内容
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiInstructions {
    /// AIの上限超過などでプリセット処理に切り替わった
    pub used_fallback: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// PDF分割・画像変換の1ページ分
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageItem {
    pub page: Option<u32>,
    pub url: String,
    pub format: Option<String>,
}

/// 成功レスポンスの `data`
///
/// ツールごとにフィールドが異なるため、既知のものだけ型付けし残りは `extra` に入れる
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessedData {
    pub url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub size: Option<u64>,
    pub format: Option<String>,
    pub public_id: Option<String>,
    pub downloads: Option<DownloadInfo>,
    pub ai_instructions: Option<AiInstructions>,
    pub actions_applied: Vec<Value>,

    // 圧縮
    pub original_size: Option<u64>,
    pub compressed_size: Option<u64>,
    pub compression_ratio: Option<Value>,

    // 変換
    pub new_format: Option<String>,

    // PDF
    pub page_count: Option<u32>,
    pub page_size: Option<String>,
    pub total_pages: Option<u32>,
    pub pages: Vec<PageItem>,
    /// 直接ダウンロード経路で得たローカル参照
    pub is_blob: bool,

    /// 直接ダウンロード経路で受け取ったバイナリ
    #[serde(skip)]
    pub blob: Option<Vec<u8>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProcessedData {
    /// `data` をパース
    ///
    /// PDF分割は配列で返るので、その場合は `pages` に詰める
    pub fn from_value(value: Value) -> crate::Result<Self> {
        match value {
            Value::Array(items) => {
                let pages = items
                    .into_iter()
                    .map(serde_json::from_value)
                    .collect::<std::result::Result<Vec<PageItem>, _>>()?;
                Ok(Self {
                    total_pages: Some(pages.len() as u32),
                    pages,
                    ..Default::default()
                })
            }
            other => Ok(serde_json::from_value(other)?),
        }
    }

    pub fn metadata(&self) -> ImageMetadata {
        ImageMetadata {
            width: self.width,
            height: self.height,
            size: self.size,
            format: self.format.clone(),
        }
    }

    /// AI がフォールバック処理を使ったか
    pub fn used_fallback(&self) -> bool {
        self.ai_instructions
            .as_ref()
            .map(|i| i.used_fallback)
            .unwrap_or(false)
    }
}

/// 処理済み画像の記録
///
/// 成功レスポンスから作られ、以後は変更しない。次の成功で置き換わる。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedImageRecord {
    pub url: String,
    #[serde(default)]
    pub metadata: ImageMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloads: Option<DownloadInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions_applied: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_instructions: Option<AiInstructions>,
}

impl ProcessedImageRecord {
    /// レスポンスデータから記録を作成
    ///
    /// `default_format` はフォーマットが返らなかった場合に使う（AI編集は png）
    pub fn from_data(data: &ProcessedData, tool: Option<&str>, default_format: Option<&str>) -> Self {
        let mut metadata = data.metadata();
        if metadata.format.is_none() {
            metadata.format = default_format.map(str::to_string);
        }

        Self {
            url: data.url.clone().unwrap_or_default(),
            metadata,
            downloads: data.downloads,
            tool: tool.map(str::to_string),
            actions_applied: data.actions_applied.clone(),
            public_id: data.public_id.clone(),
            ai_instructions: data.ai_instructions.clone(),
        }
    }
}

/// 透かし検出の詳細
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetectionDetail {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub position: Option<String>,
    pub opacity: Option<Value>,
    pub coverage: Option<Value>,
}

/// 透かし検出結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WatermarkDetection {
    pub watermark_detected: bool,
    pub detection: Option<DetectionDetail>,
}

/// ダウンロード追跡の状態（Cloudinary）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DownloadStatus {
    pub download_url: Option<String>,
    pub downloads: Option<u32>,
    pub remaining: Option<u32>,
}
