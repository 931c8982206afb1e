//! リサイズフォーム
//!
//! 縦横比固定のとき、幅を変えると高さを `round(width / aspect)`、
//! 高さを変えると幅を `round(height * aspect)` に再計算する。

use crate::tools::{FitMode, ResizeOptions, ToolRequest};

/// 名前付きリサイズプリセット
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizePreset {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
}

pub const RESIZE_PRESETS: &[ResizePreset] = &[
    ResizePreset { name: "Instagram Square", width: 1080, height: 1080 },
    ResizePreset { name: "Instagram Story", width: 1080, height: 1920 },
    ResizePreset { name: "Facebook Post", width: 1200, height: 630 },
    ResizePreset { name: "Twitter Post", width: 1200, height: 675 },
    ResizePreset { name: "LinkedIn Post", width: 1200, height: 627 },
    ResizePreset { name: "YouTube Thumbnail", width: 1280, height: 720 },
    ResizePreset { name: "Full HD", width: 1920, height: 1080 },
    ResizePreset { name: "4K", width: 3840, height: 2160 },
];

/// 名前（大文字小文字・空白を無視）でプリセットを探す
pub fn find_resize_preset(name: &str) -> Option<&'static ResizePreset> {
    let wanted = normalize(name);
    RESIZE_PRESETS.iter().find(|p| normalize(p.name) == wanted)
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeForm {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub maintain_aspect_ratio: bool,
    pub fit: FitMode,
    pub quality: u8,
    /// 元画像の幅/高さ。読み込み前は 1.0
    original_aspect: f64,
}

impl Default for ResizeForm {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            maintain_aspect_ratio: true,
            fit: FitMode::Cover,
            quality: 90,
            original_aspect: 1.0,
        }
    }
}

impl ResizeForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// 画像を読み込んだときに元の寸法を記録
    pub fn set_original_dimensions(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.original_aspect = width as f64 / height as f64;
        }
    }

    pub fn original_aspect(&self) -> f64 {
        self.original_aspect
    }

    pub fn set_width(&mut self, width: Option<u32>) {
        self.width = width;
        if let (true, Some(w)) = (self.maintain_aspect_ratio, width) {
            self.height = Some((w as f64 / self.original_aspect).round() as u32);
        }
    }

    pub fn set_height(&mut self, height: Option<u32>) {
        self.height = height;
        if let (true, Some(h)) = (self.maintain_aspect_ratio, height) {
            self.width = Some((h as f64 * self.original_aspect).round() as u32);
        }
    }

    /// プリセットは両方の寸法をそのまま設定する（縦横比は再計算しない）
    pub fn apply_preset(&mut self, preset: &ResizePreset) {
        self.width = Some(preset.width);
        self.height = Some(preset.height);
    }

    pub fn to_request(&self) -> ToolRequest {
        ToolRequest::Resize(ResizeOptions {
            width: self.width.filter(|w| *w > 0),
            height: self.height.filter(|h| *h > 0),
            fit: self.fit,
            quality: self.quality,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_lock_width_drives_height() {
        let mut form = ResizeForm::new();
        form.set_original_dimensions(2000, 1000);
        form.set_width(Some(1000));
        assert_eq!(form.height, Some(500));
    }

    #[test]
    fn test_aspect_lock_height_drives_width() {
        let mut form = ResizeForm::new();
        form.set_original_dimensions(1920, 1080);
        form.set_height(Some(720));
        assert_eq!(form.width, Some(1280));
    }

    #[test]
    fn test_aspect_rounding() {
        let mut form = ResizeForm::new();
        form.set_original_dimensions(3, 2);
        form.set_width(Some(100));
        // 100 / 1.5 = 66.67
        assert_eq!(form.height, Some(67));
    }

    #[test]
    fn test_unlocked_dimensions_are_independent() {
        let mut form = ResizeForm::new();
        form.maintain_aspect_ratio = false;
        form.set_original_dimensions(2000, 1000);
        form.set_width(Some(300));
        assert_eq!(form.height, None);
    }

    #[test]
    fn test_clearing_width_keeps_height() {
        let mut form = ResizeForm::new();
        form.set_original_dimensions(2000, 1000);
        form.set_width(Some(1000));
        form.set_width(None);
        assert_eq!(form.width, None);
        assert_eq!(form.height, Some(500));
    }

    #[test]
    fn test_preset_lookup_and_apply() {
        let preset = find_resize_preset("youtube thumbnail").unwrap();
        let mut form = ResizeForm::new();
        form.set_original_dimensions(1000, 1000);
        form.apply_preset(preset);
        assert_eq!((form.width, form.height), (Some(1280), Some(720)));
        assert!(find_resize_preset("4k").is_some());
        assert!(find_resize_preset("Billboard").is_none());
    }

    #[test]
    fn test_to_request_drops_zero_dimension() {
        let mut form = ResizeForm::new();
        form.maintain_aspect_ratio = false;
        form.width = Some(0);
        form.height = Some(400);
        match form.to_request() {
            ToolRequest::Resize(options) => {
                assert_eq!(options.width, None);
                assert_eq!(options.height, Some(400));
            }
            other => panic!("unexpected request {:?}", other),
        }
    }
}
