//! 結果プレビューの表示ロジック
//!
//! ダウンロードのファイル名、メタデータ表示、URLコピーの確認表示、
//! Cloudinaryのダウンロード残数を扱う。描画はフロントエンド側。

use crate::types::{DownloadStatus, ImageMetadata, ProcessedImageRecord};

/// ダウンロードできる形式
pub const DOWNLOAD_FORMATS: &[&str] = &["png", "jpg", "webp"];

/// URLコピー後に確認表示を戻すまでの時間（ミリ秒）
pub const COPY_RESET_MS: u32 = 2000;

/// ファイルが削除されるまでのダウンロード回数
pub const MAX_DOWNLOADS: u32 = 3;

pub const DOWNLOAD_FAILED: &str = "Download failed";
pub const DOWNLOAD_EMPTY: &str = "Downloaded file is empty";
pub const URL_COPIED: &str = "URL copied to clipboard";
pub const COPY_FAILED: &str = "Failed to copy URL";
pub const LAST_DOWNLOAD: &str = "File downloaded! This was your last download - file will be deleted.";

/// 形式指定ダウンロードのファイル名
pub fn download_file_name(format: &str) -> String {
    format!("magicpixels-image.{}", format)
}

/// 追跡付きダウンロードのファイル名（時刻で一意にする）
pub fn timestamped_file_name(timestamp_ms: i64, format: &str) -> String {
    format!("magicpixels-{}.{}", timestamp_ms, format)
}

pub fn downloaded_as(format: &str) -> String {
    format!("Downloaded as {}", format.to_uppercase())
}

/// メタデータの表示行 (ラベル, 値)。値のない項目は出さない
pub fn metadata_rows(metadata: &ImageMetadata) -> Vec<(&'static str, String)> {
    let mut rows = Vec::new();
    if let Some(width) = metadata.width {
        rows.push(("Width", format!("{}px", width)));
    }
    if let Some(height) = metadata.height {
        rows.push(("Height", format!("{}px", height)));
    }
    if let Some(size) = metadata.size {
        rows.push(("Size", format!("{:.1} KB", size as f64 / 1024.0)));
    }
    if let Some(format) = &metadata.format {
        rows.push(("Format", format.to_uppercase()));
    }
    rows
}

/// URLコピーの確認表示
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyState {
    copied: bool,
}

impl CopyState {
    pub fn is_copied(&self) -> bool {
        self.copied
    }

    pub fn mark_copied(&mut self) {
        self.copied = true;
    }

    /// `COPY_RESET_MS` 経過後に呼ぶ
    pub fn reset(&mut self) {
        self.copied = false;
    }
}

/// 残数による表示の段階
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadLevel {
    Normal,
    Last,
    Exhausted,
}

/// Cloudinary結果のダウンロード残数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadTracker {
    pub downloads: u32,
    pub remaining: u32,
}

impl Default for DownloadTracker {
    fn default() -> Self {
        Self { downloads: 0, remaining: MAX_DOWNLOADS }
    }
}

impl DownloadTracker {
    /// 記録に残数があればそれを、なければ既定（3回）
    pub fn for_record(record: &ProcessedImageRecord) -> Self {
        record
            .downloads
            .map(|d| Self { downloads: d.downloads, remaining: d.remaining })
            .unwrap_or_default()
    }

    /// サーバーから取得した状態で上書き（返らなかった値は維持）
    pub fn apply(&mut self, status: &DownloadStatus) {
        if let Some(downloads) = status.downloads {
            self.downloads = downloads;
        }
        if let Some(remaining) = status.remaining {
            self.remaining = remaining;
        }
    }

    /// ダウンロード後の通知
    pub fn downloaded_message(&self) -> String {
        if self.remaining == 0 {
            LAST_DOWNLOAD.to_string()
        } else {
            format!("Downloaded! {} downloads remaining.", self.remaining)
        }
    }

    pub fn can_download(&self) -> bool {
        self.remaining > 0
    }

    pub fn level(&self) -> DownloadLevel {
        match self.remaining {
            0 => DownloadLevel::Exhausted,
            1 => DownloadLevel::Last,
            _ => DownloadLevel::Normal,
        }
    }

    pub fn label(&self) -> String {
        match self.remaining {
            0 => "No Downloads Left".to_string(),
            1 => "1 Download Remaining".to_string(),
            n => format!("{} Downloads Remaining", n),
        }
    }

    pub fn hint(&self) -> &'static str {
        if self.remaining == 0 {
            "File will be deleted for privacy."
        } else {
            "File auto-deletes after 3 downloads for privacy."
        }
    }

    /// 残数バーの幅（%）
    pub fn percent(&self) -> u32 {
        (self.remaining.min(MAX_DOWNLOADS) * 100) / MAX_DOWNLOADS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DownloadInfo;

    #[test]
    fn test_file_names() {
        assert_eq!(download_file_name("webp"), "magicpixels-image.webp");
        assert_eq!(timestamped_file_name(1700000000000, "png"), "magicpixels-1700000000000.png");
        assert_eq!(downloaded_as("jpg"), "Downloaded as JPG");
    }

    #[test]
    fn test_metadata_rows_skip_missing() {
        let metadata = ImageMetadata {
            width: Some(800),
            height: None,
            size: Some(2048),
            format: Some("webp".into()),
        };
        assert_eq!(
            metadata_rows(&metadata),
            vec![
                ("Width", "800px".to_string()),
                ("Size", "2.0 KB".to_string()),
                ("Format", "WEBP".to_string())
            ]
        );
    }

    #[test]
    fn test_tracker_defaults_to_three() {
        let tracker = DownloadTracker::for_record(&ProcessedImageRecord::default());
        assert_eq!(tracker.remaining, 3);
        assert_eq!(tracker.label(), "3 Downloads Remaining");
        assert_eq!(tracker.percent(), 100);
    }

    #[test]
    fn test_tracker_messages() {
        let record = ProcessedImageRecord {
            downloads: Some(DownloadInfo { downloads: 1, remaining: 2 }),
            ..Default::default()
        };
        let mut tracker = DownloadTracker::for_record(&record);
        assert_eq!(tracker.downloaded_message(), "Downloaded! 2 downloads remaining.");

        tracker.apply(&DownloadStatus { download_url: None, downloads: Some(2), remaining: Some(1) });
        assert_eq!(tracker.level(), DownloadLevel::Last);
        assert_eq!(tracker.label(), "1 Download Remaining");

        tracker.apply(&DownloadStatus { remaining: Some(0), ..Default::default() });
        assert_eq!(tracker.downloaded_message(), LAST_DOWNLOAD);
        assert!(!tracker.can_download());
        assert_eq!(tracker.label(), "No Downloads Left");
        assert_eq!(tracker.downloads, 2);
    }

    #[test]
    fn test_copy_state() {
        let mut state = CopyState::default();
        state.mark_copied();
        assert!(state.is_copied());
        state.reset();
        assert!(!state.is_copied());
    }
}
