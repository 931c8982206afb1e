//! 切り抜きフォーム
use crate::tools::{AspectRatio, CropOptions, CropRect, Gravity, ToolRequest};

/// (ラベル, 縦横比)。None は自由
pub const ASPECT_PRESETS: &[(&str, Option<AspectRatio>)] = &[
    ("Free", None),
    ("1:1", Some(AspectRatio::new(1, 1))),
    ("16:9", Some(AspectRatio::new(16, 9))),
    ("9:16", Some(AspectRatio::new(9, 16))),
    ("4:3", Some(AspectRatio::new(4, 3))),
    ("3:2", Some(AspectRatio::new(3, 2))),
];

/// SNS向けプリセット (ラベル, 縦横比, 目安サイズ)
pub const SOCIAL_PRESETS: &[(&str, AspectRatio, &str)] = &[
    ("Instagram Post", AspectRatio::new(1, 1), "1080×1080"),
    ("Instagram Story", AspectRatio::new(9, 16), "1080×1920"),
    ("Facebook Cover", AspectRatio::new(16, 9), "820×312"),
    ("Twitter Header", AspectRatio::new(3, 1), "1500×500"),
    ("YouTube Thumbnail", AspectRatio::new(16, 9), "1280×720"),
    ("LinkedIn Banner", AspectRatio::new(4, 1), "1584×396"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CropMode {
    #[default]
    Aspect,
    Circle,
    Coords,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CropForm {
    pub mode: CropMode,
    /// None は Free
    pub ratio: Option<AspectRatio>,
    pub gravity: Gravity,
    pub rect: CropRect,
}

impl CropForm {
    pub fn new() -> Self {
        Self {
            rect: CropRect { left: 0, top: 0, width: 100, height: 100 },
            ..Default::default()
        }
    }

    /// 画像読み込み時は全体を切り抜き範囲にする
    pub fn set_image_dimensions(&mut self, width: u32, height: u32) {
        self.rect = CropRect::full(width, height);
    }

    /// 縦横比モードで Free のときは座標指定の切り抜きになる
    pub fn to_request(&self) -> ToolRequest {
        let options = match (self.mode, self.ratio) {
            (CropMode::Circle, _) => CropOptions::Circle,
            (CropMode::Aspect, Some(ratio)) => CropOptions::Aspect { ratio, gravity: self.gravity },
            (CropMode::Aspect, None) | (CropMode::Coords, _) => CropOptions::Coords(self.rect),
        };
        ToolRequest::Crop(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_ratio_falls_back_to_coords() {
        let mut form = CropForm::new();
        form.set_image_dimensions(640, 480);
        assert_eq!(form.to_request(), ToolRequest::Crop(CropOptions::Coords(CropRect::full(640, 480))));
    }

    #[test]
    fn test_aspect_mode_uses_ratio_and_gravity() {
        let form = CropForm {
            ratio: Some(AspectRatio::new(16, 9)),
            gravity: Gravity::South,
            ..CropForm::new()
        };
        assert_eq!(
            form.to_request(),
            ToolRequest::Crop(CropOptions::Aspect { ratio: AspectRatio::new(16, 9), gravity: Gravity::South })
        );
    }

    #[test]
    fn test_circle_ignores_ratio() {
        let form = CropForm { mode: CropMode::Circle, ratio: Some(AspectRatio::new(1, 1)), ..CropForm::new() };
        assert_eq!(form.to_request(), ToolRequest::Crop(CropOptions::Circle));
    }

    #[test]
    fn test_default_rect_before_image_loads() {
        assert_eq!(CropForm::new().rect, CropRect { left: 0, top: 0, width: 100, height: 100 });
    }
}
