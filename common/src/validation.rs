//! 送信前のクライアント側検証
//!
//! 検証に失敗した場合はネットワーク呼び出しを行わず `Error::Validation` を返す。
//! メッセージはそのまま通知に表示される。

use crate::error::{Error, Result};
use crate::tools::{
    CloudinaryTool, ColorAdjustments, CompressOptions, ConvertOptions, CropOptions,
    PdfOperation, ToolRequest,
};
use crate::types::UploadedFile;

/// 画像→PDF変換で受け付けるMIMEタイプ
pub const PDF_IMAGE_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// 圧縮品質の範囲
pub const COMPRESS_QUALITY_RANGE: std::ops::RangeInclusive<u8> = 10..=100;

pub const NO_IMAGE: &str = "Please upload an image first";
pub const NO_CLOUDINARY_INPUT: &str = "Please select an image and tool";
pub const NO_DIMENSIONS: &str = "Please enter width or height";
pub const NO_PROMPT: &str = "Please enter a prompt";
pub const NO_REMOVE_PROMPT: &str = "Please describe what to remove";
pub const NO_RECOLOR_PROMPT: &str = "Please describe what to recolor";
pub const NO_PDF_IMAGES: &str = "Please add at least one image to create a PDF";
pub const NO_FILES: &str = "Please add files first";
pub const MERGE_NEEDS_TWO: &str = "Please add at least 2 PDFs to merge";
pub const SPLIT_NEEDS_ONE: &str = "Please add exactly 1 PDF to split";
pub const NEEDS_ONE_PDF: &str = "Please add exactly 1 PDF";
pub const NO_WATERMARK_TEXT: &str = "Please enter watermark text";

/// ツールごとの最低入力条件を検証
///
/// # Arguments
/// * `request` - ツールとオプション
/// * `files` - 選択されたファイル
pub fn validate(request: &ToolRequest, files: &[UploadedFile]) -> Result<()> {
    match request {
        ToolRequest::Pdf(op) => validate_pdf(op, files),
        ToolRequest::Cloudinary(tool) => {
            require_file(files, NO_CLOUDINARY_INPUT)?;
            validate_cloudinary(tool)
        }
        other => {
            require_file(files, NO_IMAGE)?;
            validate_image_options(other)
        }
    }
}

fn require_file(files: &[UploadedFile], message: &str) -> Result<()> {
    if files.is_empty() {
        return Err(Error::validation(message));
    }
    Ok(())
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn validate_image_options(request: &ToolRequest) -> Result<()> {
    match request {
        ToolRequest::Resize(options) => {
            let has_width = options.width.is_some_and(|w| w > 0);
            let has_height = options.height.is_some_and(|h| h > 0);
            if !has_width && !has_height {
                return Err(Error::validation(NO_DIMENSIONS));
            }
            check_quality(options.quality, 1..=100)
        }
        ToolRequest::Compress(CompressOptions::Quality(quality)) => {
            check_quality(*quality, COMPRESS_QUALITY_RANGE)
        }
        ToolRequest::Compress(CompressOptions::TargetSize { kilobytes }) => {
            if *kilobytes == 0 {
                return Err(Error::validation("Please enter a target size"));
            }
            Ok(())
        }
        ToolRequest::Convert(ConvertOptions { quality, .. }) => check_quality(*quality, 1..=100),
        ToolRequest::Crop(CropOptions::Coords(rect)) => {
            if rect.width == 0 || rect.height == 0 {
                return Err(Error::validation("Please enter crop width and height"));
            }
            Ok(())
        }
        ToolRequest::AiEdit { prompt } if is_blank(prompt) => Err(Error::validation(NO_PROMPT)),
        _ => Ok(()),
    }
}

fn check_quality(quality: u8, range: std::ops::RangeInclusive<u8>) -> Result<()> {
    if !range.contains(&quality) {
        return Err(Error::validation(format!(
            "Quality must be between {} and {}",
            range.start(),
            range.end()
        )));
    }
    Ok(())
}

fn validate_cloudinary(tool: &CloudinaryTool) -> Result<()> {
    match tool {
        CloudinaryTool::GenRemove { prompt } if is_blank(prompt) => {
            Err(Error::validation(NO_REMOVE_PROMPT))
        }
        CloudinaryTool::GenRecolor { prompt, .. } if is_blank(prompt) => {
            Err(Error::validation(NO_RECOLOR_PROMPT))
        }
        CloudinaryTool::GenFill { width, height, .. }
        | CloudinaryTool::SmartCrop { width, height, .. }
            if *width == 0 || *height == 0 =>
        {
            Err(Error::validation("Please enter width and height"))
        }
        CloudinaryTool::AdjustColors(adjustments) => check_adjustments(adjustments),
        _ => Ok(()),
    }
}

fn check_adjustments(adjustments: &ColorAdjustments) -> Result<()> {
    let values = [adjustments.brightness, adjustments.contrast, adjustments.saturation];
    if values
        .into_iter()
        .flatten()
        .any(|v| !ColorAdjustments::RANGE.contains(&v))
    {
        return Err(Error::validation("Adjustments must be between -100 and 100"));
    }
    Ok(())
}

fn validate_pdf(op: &PdfOperation, files: &[UploadedFile]) -> Result<()> {
    if let PdfOperation::Create { .. } = op {
        require_file(files, NO_PDF_IMAGES)?;
        return check_image_mime_types(files);
    }

    require_file(files, NO_FILES)?;
    match op {
        PdfOperation::Merge if files.len() < 2 => Err(Error::validation(MERGE_NEEDS_TWO)),
        PdfOperation::Merge | PdfOperation::Create { .. } => Ok(()),
        PdfOperation::Split if files.len() != 1 => Err(Error::validation(SPLIT_NEEDS_ONE)),
        PdfOperation::Split => Ok(()),
        _ if files.len() != 1 => Err(Error::validation(NEEDS_ONE_PDF)),
        PdfOperation::Watermark { text } if is_blank(text) => {
            Err(Error::validation(NO_WATERMARK_TEXT))
        }
        _ => Ok(()),
    }
}

/// 画像→PDF用のMIMEタイプ検証
///
/// 許可されていないファイルをすべて列挙したエラーを返す
pub fn check_image_mime_types(files: &[UploadedFile]) -> Result<()> {
    let invalid: Vec<&str> = files
        .iter()
        .filter(|f| !PDF_IMAGE_MIME_TYPES.contains(&f.mime_type.as_str()))
        .map(|f| f.name.as_str())
        .collect();

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(Error::validation(format!(
            "Invalid file types: {}. Only images allowed.",
            invalid.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{
        CloudinaryTool, NamedColor, PageSize, ResizeOptions, Rotation,
    };

    fn image(name: &str) -> UploadedFile {
        UploadedFile::from_bytes(name, vec![0xff, 0xd8])
    }

    fn pdf(name: &str) -> UploadedFile {
        UploadedFile::new(name, "application/pdf", vec![0x25])
    }

    fn message(result: Result<()>) -> String {
        match result {
            Err(Error::Validation(m)) => m,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_every_tool_rejects_zero_files() {
        let requests = vec![
            ToolRequest::Resize(ResizeOptions { width: Some(10), ..Default::default() }),
            ToolRequest::Compress(CompressOptions::Quality(80)),
            ToolRequest::Convert(ConvertOptions::default()),
            ToolRequest::Crop(CropOptions::Circle),
            ToolRequest::WatermarkDetect,
            ToolRequest::AiEdit { prompt: "brighter".into() },
            ToolRequest::AiEnhance { auto_apply: true },
            ToolRequest::Cloudinary(CloudinaryTool::Enhance),
            ToolRequest::Pdf(PdfOperation::Merge),
            ToolRequest::Pdf(PdfOperation::Create { page_size: PageSize::A4 }),
        ];

        for request in requests {
            assert!(
                matches!(validate(&request, &[]), Err(Error::Validation(_))),
                "{:?} accepted zero files",
                request
            );
        }
    }

    #[test]
    fn test_resize_needs_a_dimension() {
        let request = ToolRequest::Resize(ResizeOptions::default());
        assert_eq!(message(validate(&request, &[image("a.png")])), NO_DIMENSIONS);

        let request = ToolRequest::Resize(ResizeOptions { height: Some(300), ..Default::default() });
        assert!(validate(&request, &[image("a.png")]).is_ok());
    }

    #[test]
    fn test_merge_needs_two_pdfs() {
        let request = ToolRequest::Pdf(PdfOperation::Merge);
        assert_eq!(message(validate(&request, &[pdf("a.pdf")])), MERGE_NEEDS_TWO);
        assert!(validate(&request, &[pdf("a.pdf"), pdf("b.pdf")]).is_ok());
    }

    #[test]
    fn test_single_pdf_tools_need_exactly_one() {
        let two = [pdf("a.pdf"), pdf("b.pdf")];
        assert_eq!(message(validate(&ToolRequest::Pdf(PdfOperation::Split), &two)), SPLIT_NEEDS_ONE);

        let single_file_ops = vec![
            PdfOperation::Watermark { text: "DRAFT".into() },
            PdfOperation::Rotate { rotation: Rotation::Half },
            PdfOperation::ToImages { format: crate::tools::OutputFormat::Png, quality: 90 },
            PdfOperation::PageNumbers { position: Default::default() },
        ];
        for op in single_file_ops {
            let request = ToolRequest::Pdf(op);
            assert_eq!(message(validate(&request, &two)), NEEDS_ONE_PDF);
            assert!(validate(&request, &two[..1]).is_ok());
        }
    }

    #[test]
    fn test_pdf_watermark_needs_text() {
        let request = ToolRequest::Pdf(PdfOperation::Watermark { text: "  ".into() });
        assert_eq!(message(validate(&request, &[pdf("a.pdf")])), NO_WATERMARK_TEXT);
    }

    #[test]
    fn test_image_to_pdf_lists_every_invalid_file() {
        let files = [
            image("ok.png"),
            image("scan.bmp"),
            UploadedFile::new("notes.txt", "text/plain", vec![1]),
            image("photo.webp"),
        ];
        let request = ToolRequest::Pdf(PdfOperation::Create { page_size: PageSize::A4 });
        assert_eq!(
            message(validate(&request, &files)),
            "Invalid file types: scan.bmp, notes.txt. Only images allowed."
        );
    }

    #[test]
    fn test_generative_prompts_required() {
        let files = [image("a.jpg")];
        let remove = ToolRequest::Cloudinary(CloudinaryTool::GenRemove { prompt: "".into() });
        assert_eq!(message(validate(&remove, &files)), NO_REMOVE_PROMPT);

        let recolor = ToolRequest::Cloudinary(CloudinaryTool::GenRecolor {
            prompt: " ".into(),
            to_color: NamedColor::Red,
        });
        assert_eq!(message(validate(&recolor, &files)), NO_RECOLOR_PROMPT);

        let edit = ToolRequest::AiEdit { prompt: "\n".into() };
        assert_eq!(message(validate(&edit, &files)), NO_PROMPT);
    }

    #[test]
    fn test_compress_quality_range() {
        let files = [image("a.jpg")];
        assert!(validate(&ToolRequest::Compress(CompressOptions::Quality(5)), &files).is_err());
        assert!(validate(&ToolRequest::Compress(CompressOptions::Quality(10)), &files).is_ok());
        assert!(validate(
            &ToolRequest::Compress(CompressOptions::TargetSize { kilobytes: 0 }),
            &files
        )
        .is_err());
    }

    #[test]
    fn test_adjust_colors_range() {
        let files = [image("a.jpg")];
        let request = ToolRequest::Cloudinary(CloudinaryTool::AdjustColors(ColorAdjustments {
            brightness: Some(150),
            ..Default::default()
        }));
        assert!(validate(&request, &files).is_err());
    }
}
