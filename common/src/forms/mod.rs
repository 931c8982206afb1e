//! ツールごとの入力フォーム
//!
//! 画面の選択値を保持し、`ToolRequest` に変換する。フォームはページごとに独立しており、
//! ページ間でオプションを共有しない。

mod cloudinary;
mod crop;
mod pdf;
mod resize;

pub use cloudinary::CloudinaryForm;
pub use crop::{CropForm, CropMode, ASPECT_PRESETS, SOCIAL_PRESETS};
pub use pdf::{PdfForm, PdfTool};
pub use resize::{find_resize_preset, ResizeForm, ResizePreset, RESIZE_PRESETS};

use crate::tools::{
    BackgroundOptions, CompressOptions, ConvertOptions, OutputFormat, ToolRequest,
    WatermarkMethod, WatermarkOptions, WatermarkStrength,
};

// =============================================
// 圧縮
// =============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressMode {
    #[default]
    Quality,
    TargetSize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompressForm {
    pub mode: CompressMode,
    pub quality: u8,
    /// 目標サイズ（KB）
    pub target_kb: Option<u64>,
}

impl Default for CompressForm {
    fn default() -> Self {
        Self { mode: CompressMode::Quality, quality: 80, target_kb: None }
    }
}

impl CompressForm {
    pub fn to_request(&self) -> ToolRequest {
        let options = match self.mode {
            CompressMode::Quality => CompressOptions::Quality(self.quality),
            CompressMode::TargetSize => CompressOptions::TargetSize {
                kilobytes: self.target_kb.unwrap_or(0),
            },
        };
        ToolRequest::Compress(options)
    }
}

// =============================================
// 変換
// =============================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConvertForm {
    pub options: ConvertOptions,
}

impl ConvertForm {
    pub fn select_format(&mut self, format: OutputFormat) {
        self.options.format = format;
    }

    pub fn to_request(&self) -> ToolRequest {
        ToolRequest::Convert(self.options.clone())
    }
}

// =============================================
// 背景
// =============================================

/// 背景色の候補 (名前, 値)。"transparent" は背景除去
pub const BACKGROUND_COLORS: &[(&str, &str)] = &[
    ("Transparent", "transparent"),
    ("White", "#ffffff"),
    ("Black", "#000000"),
    ("Red", "#ef4444"),
    ("Blue", "#3b82f6"),
    ("Green", "#22c55e"),
    ("Purple", "#a855f7"),
    ("Gray", "#6b7280"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackgroundChoice {
    /// 候補の値（"transparent" または16進カラー）
    Preset(&'static str),
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundForm {
    pub choice: BackgroundChoice,
    pub custom_color: String,
}

impl Default for BackgroundForm {
    fn default() -> Self {
        Self {
            choice: BackgroundChoice::Preset("transparent"),
            custom_color: "#ffffff".to_string(),
        }
    }
}

impl BackgroundForm {
    /// 色の指定を解釈する（候補名・候補値・"#rrggbb"）
    pub fn choose(&mut self, color: &str) {
        let color = color.trim();
        let preset = BACKGROUND_COLORS
            .iter()
            .find(|(name, value)| name.eq_ignore_ascii_case(color) || value.eq_ignore_ascii_case(color));

        match preset {
            Some((_, value)) => self.choice = BackgroundChoice::Preset(*value),
            None => {
                self.choice = BackgroundChoice::Custom;
                self.custom_color = color.to_string();
            }
        }
    }

    pub fn to_request(&self) -> ToolRequest {
        let color = match &self.choice {
            BackgroundChoice::Preset(value) => value.to_string(),
            BackgroundChoice::Custom => self.custom_color.clone(),
        };
        let options = if color == "transparent" {
            BackgroundOptions::Transparent
        } else {
            BackgroundOptions::Replace { color }
        };
        ToolRequest::BackgroundRemove(options)
    }
}

// =============================================
// 透かし除去
// =============================================

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WatermarkForm {
    pub method: WatermarkMethod,
    pub strength: WatermarkStrength,
}

impl WatermarkForm {
    pub fn to_request(&self) -> ToolRequest {
        ToolRequest::WatermarkRemove(WatermarkOptions { method: self.method, strength: self.strength })
    }

    pub fn detect_request(&self) -> ToolRequest {
        ToolRequest::WatermarkDetect
    }
}

// =============================================
// AI編集
// =============================================

pub const PROMPT_SUGGESTIONS: &[&str] = &[
    "Make it look more vibrant and colorful",
    "Convert to black and white with high contrast",
    "Crop to 16:9 aspect ratio",
    "Make it look like a vintage photo",
    "Sharpen and enhance details",
    "Add a warm, golden hour effect",
];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AiEditForm {
    pub prompt: String,
}

impl AiEditForm {
    pub fn use_suggestion(&mut self, index: usize) {
        if let Some(suggestion) = PROMPT_SUGGESTIONS.get(index) {
            self.prompt = suggestion.to_string();
        }
    }

    pub fn to_request(&self) -> ToolRequest {
        ToolRequest::AiEdit { prompt: self.prompt.trim().to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_form_target_mode() {
        let form = CompressForm { mode: CompressMode::TargetSize, target_kb: Some(500), ..Default::default() };
        let request = form.to_request();
        assert_eq!(request.endpoint(), "/compress/auto");
        assert_eq!(request.form_fields(), vec![("targetSize".to_string(), "512000".to_string())]);
    }

    #[test]
    fn test_compress_form_defaults_to_quality_80() {
        assert_eq!(
            CompressForm::default().to_request(),
            ToolRequest::Compress(CompressOptions::Quality(80))
        );
    }

    #[test]
    fn test_background_choice() {
        let mut form = BackgroundForm::default();
        assert_eq!(form.to_request(), ToolRequest::BackgroundRemove(BackgroundOptions::Transparent));

        form.choose("red");
        assert_eq!(
            form.to_request(),
            ToolRequest::BackgroundRemove(BackgroundOptions::Replace { color: "#ef4444".into() })
        );

        form.choose("#123abc");
        assert_eq!(form.choice, BackgroundChoice::Custom);
        assert_eq!(form.to_request().endpoint(), "/background-remove/replace");
    }

    #[test]
    fn test_watermark_form_defaults() {
        let fields = WatermarkForm::default().to_request().form_fields();
        assert_eq!(
            fields,
            vec![
                ("method".to_string(), "inpaint".to_string()),
                ("strength".to_string(), "medium".to_string())
            ]
        );
    }

    #[test]
    fn test_ai_edit_suggestion() {
        let mut form = AiEditForm::default();
        form.use_suggestion(3);
        assert_eq!(form.prompt, "Make it look like a vintage photo");
        form.use_suggestion(99);
        assert_eq!(form.prompt, "Make it look like a vintage photo");
    }
}
