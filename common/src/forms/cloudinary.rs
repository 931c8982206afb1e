//! Cloudinary AIツールフォーム
//!
//! 選択中のツールIDに応じて13種類のオプションのうち1つを組み立てる。

use crate::tools::{ArtisticFilter, CloudinaryTool, ColorAdjustments, NamedColor, ToolRequest};

#[derive(Debug, Clone, PartialEq)]
pub struct CloudinaryForm {
    /// 選択中のツール（未選択は None）
    pub selected: Option<CloudinaryTool>,
    pub bg_color: NamedColor,
    pub filter: ArtisticFilter,
    pub remove_prompt: String,
    pub recolor_prompt: String,
    pub recolor_color: NamedColor,
    pub crop_width: u32,
    pub crop_height: u32,
    pub fill_width: u32,
    pub fill_height: u32,
    pub brightness: i32,
    pub contrast: i32,
    pub saturation: i32,
}

impl Default for CloudinaryForm {
    fn default() -> Self {
        Self {
            selected: None,
            bg_color: NamedColor::White,
            filter: ArtisticFilter::default(),
            remove_prompt: String::new(),
            recolor_prompt: String::new(),
            recolor_color: NamedColor::Blue,
            crop_width: 800,
            crop_height: 600,
            fill_width: 1200,
            fill_height: 800,
            brightness: 0,
            contrast: 0,
            saturation: 0,
        }
    }
}

impl CloudinaryForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// ツールを選択。未知のIDならエラー
    pub fn select(&mut self, id: &str) -> Result<(), String> {
        let tool = CloudinaryTool::from_id(id).ok_or_else(|| format!("Unknown tool: {}", id))?;
        self.selected = Some(tool);
        Ok(())
    }

    pub fn selected_id(&self) -> Option<&'static str> {
        self.selected.as_ref().map(CloudinaryTool::id)
    }

    /// 選択中のツールにフォームの値を詰めてリクエストを作る。未選択なら None
    pub fn to_request(&self) -> Option<ToolRequest> {
        let tool = match self.selected.as_ref()? {
            CloudinaryTool::BgReplace { .. } => CloudinaryTool::BgReplace { color: self.bg_color },
            CloudinaryTool::GenFill { gravity, .. } => CloudinaryTool::GenFill {
                width: self.fill_width,
                height: self.fill_height,
                gravity: *gravity,
            },
            CloudinaryTool::GenRemove { .. } => {
                CloudinaryTool::GenRemove { prompt: self.remove_prompt.clone() }
            }
            CloudinaryTool::GenRecolor { .. } => CloudinaryTool::GenRecolor {
                prompt: self.recolor_prompt.clone(),
                to_color: self.recolor_color,
            },
            CloudinaryTool::SmartCrop { gravity, .. } => CloudinaryTool::SmartCrop {
                width: self.crop_width,
                height: self.crop_height,
                gravity: *gravity,
            },
            CloudinaryTool::ArtisticFilter { .. } => {
                CloudinaryTool::ArtisticFilter { filter: self.filter.clone() }
            }
            CloudinaryTool::AdjustColors(_) => CloudinaryTool::AdjustColors(ColorAdjustments {
                brightness: Some(self.brightness),
                contrast: Some(self.contrast),
                saturation: Some(self.saturation),
            }),
            other @ (CloudinaryTool::BgRemove
            | CloudinaryTool::Enhance
            | CloudinaryTool::Upscale
            | CloudinaryTool::AutoImprove
            | CloudinaryTool::BlurFaces
            | CloudinaryTool::PixelateFaces) => other.clone(),
        };
        Some(ToolRequest::Cloudinary(tool))
    }
}
