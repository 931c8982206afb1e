//! ファイル選択の受け入れ方針
//!
//! MIMEタイプの許可リストと最大サイズで選択ファイルを振り分ける。
//! ここでの拒否は表示上の案内であり、最終的な検証はAPI側で行われる。

use crate::types::UploadedFile;

/// 1ファイルの上限（10 MiB）
pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// 通常の画像ツールで受け付けるMIMEタイプ
pub const IMAGE_MIME_TYPES: &[&str] = &[
    "image/png",
    "image/jpg",
    "image/jpeg",
    "image/gif",
    "image/webp",
    "image/bmp",
    "image/tiff",
];

pub const PDF_MIME_TYPES: &[&str] = &["application/pdf"];

/// 拒否理由
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    UnsupportedType(String),
    TooLarge { size: u64, max: u64 },
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::UnsupportedType(mime) => write!(f, "Unsupported file type: {}", mime),
            RejectReason::TooLarge { size, max } => write!(
                f,
                "File is too large ({}). Maximum size is {}",
                format_bytes(*size),
                format_bytes(*max)
            ),
        }
    }
}

/// 拒否されたファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    pub name: String,
    pub reason: RejectReason,
}

/// 振り分け結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub accepted: Vec<UploadedFile>,
    pub rejected: Vec<Rejected>,
}

impl Selection {
    /// 拒否があれば「ファイル名: 理由」を改行で連結
    pub fn rejection_message(&self) -> Option<String> {
        if self.rejected.is_empty() {
            return None;
        }
        Some(
            self.rejected
                .iter()
                .map(|r| format!("{}: {}", r.name, r.reason))
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }
}

/// アップローダの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploaderConfig {
    pub accept: &'static [&'static str],
    pub max_bytes: u64,
    pub multiple: bool,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self::images()
    }
}

impl UploaderConfig {
    /// 画像1枚
    pub fn images() -> Self {
        Self {
            accept: IMAGE_MIME_TYPES,
            max_bytes: DEFAULT_MAX_BYTES,
            multiple: false,
        }
    }

    /// 画像→PDF用（複数）
    pub fn pdf_images() -> Self {
        Self {
            accept: crate::validation::PDF_IMAGE_MIME_TYPES,
            max_bytes: DEFAULT_MAX_BYTES,
            multiple: true,
        }
    }

    pub fn pdf_documents(multiple: bool) -> Self {
        Self {
            accept: PDF_MIME_TYPES,
            max_bytes: DEFAULT_MAX_BYTES,
            multiple,
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// `<input accept=...>` 用の文字列
    pub fn accept_attr(&self) -> String {
        self.accept.join(",")
    }

    pub fn is_accepted_type(&self, mime_type: &str) -> bool {
        let mime_type = mime_type.to_lowercase();
        self.accept.iter().any(|a| *a == mime_type)
    }

    /// 選択されたファイルを受け入れ/拒否に振り分ける
    ///
    /// 単一モードでは最初に受け入れた1件だけを残す
    ///
    /// # Arguments
    /// * `files` - ドロップまたは選択されたファイル
    pub fn accept(&self, files: Vec<UploadedFile>) -> Selection {
        let mut selection = Selection::default();

        for file in files {
            if !self.is_accepted_type(&file.mime_type) {
                tracing::debug!(name = %file.name, mime = %file.mime_type, "File type rejected");
                selection.rejected.push(Rejected {
                    reason: RejectReason::UnsupportedType(file.mime_type.clone()),
                    name: file.name,
                });
                continue;
            }
            if file.size() > self.max_bytes {
                selection.rejected.push(Rejected {
                    reason: RejectReason::TooLarge { size: file.size(), max: self.max_bytes },
                    name: file.name,
                });
                continue;
            }
            if !self.multiple && !selection.accepted.is_empty() {
                continue;
            }
            selection.accepted.push(file);
        }

        selection
    }
}

/// バイト数を読みやすく（"1.5 MB"）
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, size: usize) -> UploadedFile {
        UploadedFile::from_bytes(name, vec![0; size])
    }

    #[test]
    fn test_single_mode_keeps_first_accepted() {
        let config = UploaderConfig::images();
        let selection = config.accept(vec![file("notes.txt", 3), file("a.png", 3), file("b.jpg", 3)]);

        assert_eq!(selection.accepted.len(), 1);
        assert_eq!(selection.accepted[0].name, "a.png");
        assert_eq!(selection.rejected.len(), 1);
        assert_eq!(selection.rejected[0].name, "notes.txt");
    }

    #[test]
    fn test_size_limit() {
        let config = UploaderConfig::images().with_max_bytes(10);
        let selection = config.accept(vec![file("big.png", 11), file("ok.png", 10)]);

        assert_eq!(selection.accepted[0].name, "ok.png");
        assert_eq!(
            selection.rejected[0].reason,
            RejectReason::TooLarge { size: 11, max: 10 }
        );
        assert!(selection.rejection_message().unwrap().starts_with("big.png: File is too large"));
    }

    #[test]
    fn test_pdf_configs() {
        let images = UploaderConfig::pdf_images();
        assert!(images.multiple);
        assert!(!images.is_accepted_type("image/bmp"));

        let merge = UploaderConfig::pdf_documents(true);
        let selection = merge.accept(vec![file("a.pdf", 1), file("b.pdf", 1), file("c.png", 1)]);
        assert_eq!(selection.accepted.len(), 2);
        assert_eq!(merge.accept_attr(), "application/pdf");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(DEFAULT_MAX_BYTES), "10.0 MB");
    }
}
