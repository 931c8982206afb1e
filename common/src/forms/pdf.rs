//! PDFツールフォーム
use crate::tools::{OutputFormat, PageNumberPosition, PageSize, PdfOperation, Rotation, ToolRequest};
use crate::uploader::UploaderConfig;

/// PDFページで選べるツール
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PdfTool {
    #[default]
    Create,
    ToImages,
    Merge,
    Split,
    Watermark,
    PageNumbers,
    Rotate,
}

impl PdfTool {
    pub const ALL: [PdfTool; 7] = [
        PdfTool::Create,
        PdfTool::ToImages,
        PdfTool::Merge,
        PdfTool::Split,
        PdfTool::Watermark,
        PdfTool::PageNumbers,
        PdfTool::Rotate,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PdfTool::Create => "Images to PDF",
            PdfTool::ToImages => "PDF to Images",
            PdfTool::Merge => "Merge PDFs",
            PdfTool::Split => "Split PDF",
            PdfTool::Watermark => "Add Watermark",
            PdfTool::PageNumbers => "Page Numbers",
            PdfTool::Rotate => "Rotate Pages",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PdfTool::Create => "Create PDF from images",
            PdfTool::ToImages => "Convert PDF pages to images",
            PdfTool::Merge => "Combine multiple PDFs",
            PdfTool::Split => "Split PDF into pages",
            PdfTool::Watermark => "Add text watermark",
            PdfTool::PageNumbers => "Add page numbers",
            PdfTool::Rotate => "Rotate PDF pages",
        }
    }

    /// 複数ファイルを受け付けるか
    pub fn accepts_multiple(&self) -> bool {
        matches!(self, PdfTool::Create | PdfTool::Merge)
    }

    /// ファイル選択の設定（画像→PDFのみ画像、ほかはPDF）
    pub fn uploader(&self) -> UploaderConfig {
        match self {
            PdfTool::Create => UploaderConfig::pdf_images(),
            _ => UploaderConfig::pdf_documents(self.accepts_multiple()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PdfForm {
    pub tool: PdfTool,
    pub page_size: PageSize,
    pub watermark_text: String,
    pub rotation: Rotation,
    pub position: PageNumberPosition,
}

impl PdfForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_request(&self) -> ToolRequest {
        let op = match self.tool {
            PdfTool::Create => PdfOperation::Create { page_size: self.page_size },
            PdfTool::ToImages => PdfOperation::ToImages { format: OutputFormat::Png, quality: 90 },
            PdfTool::Merge => PdfOperation::Merge,
            PdfTool::Split => PdfOperation::Split,
            PdfTool::Watermark => PdfOperation::Watermark { text: self.watermark_text.clone() },
            PdfTool::PageNumbers => PdfOperation::PageNumbers { position: self.position },
            PdfTool::Rotate => PdfOperation::Rotate { rotation: self.rotation },
        };
        ToolRequest::Pdf(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let form = PdfForm::new();
        assert_eq!(form.to_request(), ToolRequest::Pdf(PdfOperation::Create { page_size: PageSize::A4 }));
        assert_eq!(form.rotation.degrees(), 90);
        assert_eq!(form.position, PageNumberPosition::BottomCenter);
    }

    #[test]
    fn test_to_images_is_png_90() {
        let form = PdfForm { tool: PdfTool::ToImages, ..PdfForm::new() };
        let fields = form.to_request().form_fields();
        assert!(fields.contains(&("format".to_string(), "png".to_string())));
        assert!(fields.contains(&("quality".to_string(), "90".to_string())));
    }

    #[test]
    fn test_multiple_only_for_create_and_merge() {
        let multiple: Vec<PdfTool> = PdfTool::ALL.into_iter().filter(PdfTool::accepts_multiple).collect();
        assert_eq!(multiple, vec![PdfTool::Create, PdfTool::Merge]);
        assert!(!PdfTool::Split.uploader().multiple);
    }
}
