//! ツールごとのオプション型
//!
//! ツールIDで分岐していたオプションを `ToolRequest` の列挙子に置き換える。
//! 各列挙子は自分のオプションレコードを持ち、エンドポイント・ファイルフィールド・
//! フォームフィールドへの変換は網羅的な match で行う。

use std::fmt;
use std::str::FromStr;

/// ワイヤ上の文字列と相互変換できる列挙型を定義する
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let lower = s.trim().to_lowercase();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().to_lowercase() == lower)
                    .ok_or_else(|| {
                        let options: Vec<&str> = $name::ALL.iter().map(|v| v.as_str()).collect();
                        format!("Unknown {}: {}. Use one of: {}", stringify!($name), s, options.join(", "))
                    })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum! {
    /// リサイズ方式
    pub enum FitMode {
        Cover => "cover",
        Contain => "contain",
        Fill => "fill",
    }
}

wire_enum! {
    /// 切り抜き・拡張で残す領域の基準点
    pub enum Gravity {
        Center => "center",
        North => "north",
        South => "south",
        East => "east",
        West => "west",
        NorthEast => "northeast",
        NorthWest => "northwest",
        SouthEast => "southeast",
        SouthWest => "southwest",
        Auto => "auto",
    }
}

wire_enum! {
    /// 変換先フォーマット
    pub enum OutputFormat {
        Png => "png",
        Jpg => "jpg",
        Webp => "webp",
        Avif => "avif",
        Gif => "gif",
        Tiff => "tiff",
    }
}

wire_enum! {
    pub enum WatermarkMethod {
        Inpaint => "inpaint",
        Clone => "clone",
        Basic => "basic",
    }
}

wire_enum! {
    pub enum WatermarkStrength {
        Light => "light",
        Medium => "medium",
        Heavy => "heavy",
    }
}

wire_enum! {
    /// PDFの用紙サイズ
    pub enum PageSize {
        A4 => "A4",
        Letter => "Letter",
        A3 => "A3",
        A5 => "A5",
        Legal => "Legal",
    }
}

wire_enum! {
    /// ページ番号の位置
    pub enum PageNumberPosition {
        TopLeft => "top-left",
        TopCenter => "top-center",
        TopRight => "top-right",
        BottomLeft => "bottom-left",
        BottomCenter => "bottom-center",
        BottomRight => "bottom-right",
    }
}

wire_enum! {
    /// 背景置換・再着色で使う色
    pub enum NamedColor {
        White => "white",
        Black => "black",
        Transparent => "transparent",
        Red => "red",
        Blue => "blue",
        Green => "green",
        Yellow => "yellow",
        Purple => "purple",
        Pink => "pink",
        Gray => "gray",
    }
}

impl NamedColor {
    pub fn hex(&self) -> &'static str {
        match self {
            NamedColor::White => "#ffffff",
            NamedColor::Black => "#000000",
            NamedColor::Transparent => "transparent",
            NamedColor::Red => "#ef4444",
            NamedColor::Blue => "#3b82f6",
            NamedColor::Green => "#22c55e",
            NamedColor::Yellow => "#eab308",
            NamedColor::Purple => "#a855f7",
            NamedColor::Pink => "#ec4899",
            NamedColor::Gray => "#6b7280",
        }
    }
}

impl Default for FitMode {
    fn default() -> Self {
        FitMode::Cover
    }
}

impl Default for Gravity {
    fn default() -> Self {
        Gravity::Center
    }
}

impl Default for WatermarkMethod {
    fn default() -> Self {
        WatermarkMethod::Inpaint
    }
}

impl Default for WatermarkStrength {
    fn default() -> Self {
        WatermarkStrength::Medium
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::A4
    }
}

impl Default for PageNumberPosition {
    fn default() -> Self {
        PageNumberPosition::BottomCenter
    }
}

/// PDFページの回転角
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Clockwise90,
    Half,
    Clockwise270,
    CounterClockwise90,
}

impl Rotation {
    pub const ALL: &'static [Rotation] = &[
        Rotation::Clockwise90,
        Rotation::Half,
        Rotation::Clockwise270,
        Rotation::CounterClockwise90,
    ];

    pub fn degrees(&self) -> i32 {
        match self {
            Rotation::Clockwise90 => 90,
            Rotation::Half => 180,
            Rotation::Clockwise270 => 270,
            Rotation::CounterClockwise90 => -90,
        }
    }

    pub fn from_degrees(degrees: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|r| r.degrees() == degrees)
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Rotation::Clockwise90
    }
}

impl FromStr for Rotation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .trim_end_matches('°')
            .parse::<i32>()
            .ok()
            .and_then(Rotation::from_degrees)
            .ok_or_else(|| format!("Unknown rotation: {}. Use 90, 180, 270 or -90", s))
    }
}

/// 縦横比 "16:9"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn as_f64(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| format!("Invalid aspect ratio: {}. Use W:H, e.g. 16:9", s))?;
        let width: u32 = w.trim().parse().map_err(|_| format!("Invalid aspect ratio: {}", s))?;
        let height: u32 = h.trim().parse().map_err(|_| format!("Invalid aspect ratio: {}", s))?;
        if width == 0 || height == 0 {
            return Err(format!("Invalid aspect ratio: {}", s));
        }
        Ok(Self { width, height })
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

/// 座標指定の切り抜き範囲（px）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CropRect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    /// 画像全体
    pub fn full(width: u32, height: u32) -> Self {
        Self { left: 0, top: 0, width, height }
    }

    fn fields(&self) -> Vec<(String, String)> {
        vec![
            field("left", self.left),
            field("top", self.top),
            field("width", self.width),
            field("height", self.height),
        ]
    }
}

impl FromStr for CropRect {
    type Err = String;

    /// "left,top,width,height"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<u32> = s
            .split(',')
            .map(|p| p.trim().parse::<u32>())
            .collect::<Result<_, _>>()
            .map_err(|_| format!("Invalid crop rectangle: {}. Use left,top,width,height", s))?;
        match parts.as_slice() {
            [left, top, width, height] => Ok(Self {
                left: *left,
                top: *top,
                width: *width,
                height: *height,
            }),
            _ => Err(format!("Invalid crop rectangle: {}. Use left,top,width,height", s)),
        }
    }
}

/// アーティスティックフィルタ (ID, 表示名)
pub const ARTISTIC_FILTERS: &[(&str, &str)] = &[
    ("al_dente", "Al Dente"),
    ("athena", "Athena"),
    ("audrey", "Audrey"),
    ("aurora", "Aurora"),
    ("daguerre", "Daguerre"),
    ("eucalyptus", "Eucalyptus"),
    ("fes", "Fes"),
    ("frost", "Frost"),
    ("hairspray", "Hairspray"),
    ("hokusai", "Hokusai"),
    ("incognito", "Incognito"),
    ("peacock", "Peacock"),
    ("primavera", "Primavera"),
    ("quartz", "Quartz"),
    ("red_rock", "Red Rock"),
    ("sizzle", "Sizzle"),
    ("sonnet", "Sonnet"),
    ("ukulele", "Ukulele"),
    ("zorro", "Zorro"),
];

/// 既知のフィルタIDだけを持つ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtisticFilter(String);

impl ArtisticFilter {
    pub fn id(&self) -> &str {
        &self.0
    }

    pub fn name(&self) -> &'static str {
        ARTISTIC_FILTERS
            .iter()
            .find(|(id, _)| *id == self.0)
            .map(|(_, name)| *name)
            .unwrap_or("")
    }
}

impl Default for ArtisticFilter {
    fn default() -> Self {
        ArtisticFilter("athena".to_string())
    }
}

impl FromStr for ArtisticFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().to_lowercase().replace([' ', '-'], "_");
        if ARTISTIC_FILTERS.iter().any(|(known, _)| *known == id) {
            Ok(ArtisticFilter(id))
        } else {
            Err(format!("Unknown filter: {}", s))
        }
    }
}

// =============================================
// ツールごとのオプション
// =============================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fit: FitMode,
    pub quality: u8,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self { width: None, height: None, fit: FitMode::Cover, quality: 90 }
    }
}

/// 圧縮（品質指定と目標サイズ指定は排他）
#[derive(Debug, Clone, PartialEq)]
pub enum CompressOptions {
    Quality(u8),
    TargetSize { kilobytes: u64 },
}

impl CompressOptions {
    /// 目標サイズ（バイト）
    pub fn target_size_bytes(&self) -> Option<u64> {
        match self {
            CompressOptions::TargetSize { kilobytes } => Some(kilobytes * 1024),
            CompressOptions::Quality(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    pub format: OutputFormat,
    pub quality: u8,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self { format: OutputFormat::Webp, quality: 90 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CropOptions {
    Aspect { ratio: AspectRatio, gravity: Gravity },
    Circle,
    Coords(CropRect),
}

/// 背景除去（透明）か色での置換
#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundOptions {
    Transparent,
    Replace { color: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatermarkOptions {
    pub method: WatermarkMethod,
    pub strength: WatermarkStrength,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self { method: WatermarkMethod::default(), strength: WatermarkStrength::default() }
    }
}

/// PDFツール
#[derive(Debug, Clone, PartialEq)]
pub enum PdfOperation {
    Create { page_size: PageSize },
    Merge,
    Split,
    Watermark { text: String },
    ToImages { format: OutputFormat, quality: u8 },
    PageNumbers { position: PageNumberPosition },
    Rotate { rotation: Rotation },
}

impl PdfOperation {
    pub fn id(&self) -> &'static str {
        match self {
            PdfOperation::Create { .. } => "create",
            PdfOperation::Merge => "merge",
            PdfOperation::Split => "split",
            PdfOperation::Watermark { .. } => "watermark",
            PdfOperation::ToImages { .. } => "toImages",
            PdfOperation::PageNumbers { .. } => "pageNumbers",
            PdfOperation::Rotate { .. } => "rotate",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PdfOperation::Create { .. } => "Images to PDF",
            PdfOperation::Merge => "Merge PDFs",
            PdfOperation::Split => "Split PDF",
            PdfOperation::Watermark { .. } => "Add Watermark",
            PdfOperation::ToImages { .. } => "PDF to Images",
            PdfOperation::PageNumbers { .. } => "Page Numbers",
            PdfOperation::Rotate { .. } => "Rotate Pages",
        }
    }
}

/// 明るさ・コントラスト・彩度（-100..=100、未指定は送らない）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorAdjustments {
    pub brightness: Option<i32>,
    pub contrast: Option<i32>,
    pub saturation: Option<i32>,
}

impl ColorAdjustments {
    pub const RANGE: std::ops::RangeInclusive<i32> = -100..=100;

    fn fields(&self) -> Vec<(String, String)> {
        [
            ("brightness", self.brightness),
            ("contrast", self.contrast),
            ("saturation", self.saturation),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| field(key, v)))
        .collect()
    }
}

/// Cloudinary AIツール（13種）
#[derive(Debug, Clone, PartialEq)]
pub enum CloudinaryTool {
    BgRemove,
    BgReplace { color: NamedColor },
    Enhance,
    Upscale,
    AutoImprove,
    GenFill { width: u32, height: u32, gravity: Gravity },
    GenRemove { prompt: String },
    GenRecolor { prompt: String, to_color: NamedColor },
    SmartCrop { width: u32, height: u32, gravity: Gravity },
    BlurFaces,
    PixelateFaces,
    ArtisticFilter { filter: ArtisticFilter },
    AdjustColors(ColorAdjustments),
}

/// Cloudinaryツールの一覧 (ID, 表示名, カテゴリ)
pub const CLOUDINARY_TOOLS: &[(&str, &str, &str)] = &[
    ("bg-remove", "Remove Background", "Background"),
    ("bg-replace", "Replace Background", "Background"),
    ("enhance", "AI Enhance", "Enhancement"),
    ("upscale", "AI Upscale", "Enhancement"),
    ("auto-improve", "Auto Improve", "Enhancement"),
    ("gen-fill", "Generative Fill", "Generative"),
    ("gen-remove", "Remove Object", "Generative"),
    ("gen-recolor", "Recolor Object", "Generative"),
    ("smart-crop", "Smart Crop", "Crop & Resize"),
    ("blur-faces", "Blur Faces", "Privacy"),
    ("pixelate-faces", "Pixelate Faces", "Privacy"),
    ("artistic-filter", "Artistic Filters", "Filters"),
    ("adjust-colors", "Color Adjust", "Adjustments"),
];

impl CloudinaryTool {
    /// IDから既定オプションのツールを作る
    pub fn from_id(id: &str) -> Option<Self> {
        let tool = match id {
            "bg-remove" => CloudinaryTool::BgRemove,
            "bg-replace" => CloudinaryTool::BgReplace { color: NamedColor::White },
            "enhance" => CloudinaryTool::Enhance,
            "upscale" => CloudinaryTool::Upscale,
            "auto-improve" => CloudinaryTool::AutoImprove,
            "gen-fill" => CloudinaryTool::GenFill { width: 1200, height: 800, gravity: Gravity::Center },
            "gen-remove" => CloudinaryTool::GenRemove { prompt: String::new() },
            "gen-recolor" => CloudinaryTool::GenRecolor { prompt: String::new(), to_color: NamedColor::Blue },
            "smart-crop" => CloudinaryTool::SmartCrop { width: 800, height: 600, gravity: Gravity::Auto },
            "blur-faces" => CloudinaryTool::BlurFaces,
            "pixelate-faces" => CloudinaryTool::PixelateFaces,
            "artistic-filter" => CloudinaryTool::ArtisticFilter { filter: ArtisticFilter::default() },
            "adjust-colors" => CloudinaryTool::AdjustColors(ColorAdjustments::default()),
            _ => return None,
        };
        Some(tool)
    }

    pub fn id(&self) -> &'static str {
        match self {
            CloudinaryTool::BgRemove => "bg-remove",
            CloudinaryTool::BgReplace { .. } => "bg-replace",
            CloudinaryTool::Enhance => "enhance",
            CloudinaryTool::Upscale => "upscale",
            CloudinaryTool::AutoImprove => "auto-improve",
            CloudinaryTool::GenFill { .. } => "gen-fill",
            CloudinaryTool::GenRemove { .. } => "gen-remove",
            CloudinaryTool::GenRecolor { .. } => "gen-recolor",
            CloudinaryTool::SmartCrop { .. } => "smart-crop",
            CloudinaryTool::BlurFaces => "blur-faces",
            CloudinaryTool::PixelateFaces => "pixelate-faces",
            CloudinaryTool::ArtisticFilter { .. } => "artistic-filter",
            CloudinaryTool::AdjustColors(_) => "adjust-colors",
        }
    }

    pub fn name(&self) -> &'static str {
        tool_name(self.id())
    }

    fn fields(&self) -> Vec<(String, String)> {
        match self {
            CloudinaryTool::BgRemove
            | CloudinaryTool::Enhance
            | CloudinaryTool::Upscale
            | CloudinaryTool::AutoImprove
            | CloudinaryTool::BlurFaces
            | CloudinaryTool::PixelateFaces => Vec::new(),
            CloudinaryTool::BgReplace { color } => vec![field("backgroundColor", color)],
            CloudinaryTool::GenFill { width, height, gravity }
            | CloudinaryTool::SmartCrop { width, height, gravity } => vec![
                field("width", width),
                field("height", height),
                field("gravity", gravity),
            ],
            CloudinaryTool::GenRemove { prompt } => vec![field("prompt", prompt)],
            CloudinaryTool::GenRecolor { prompt, to_color } => {
                vec![field("prompt", prompt), field("toColor", to_color)]
            }
            CloudinaryTool::ArtisticFilter { filter } => vec![field("filter", filter.id())],
            CloudinaryTool::AdjustColors(adjustments) => adjustments.fields(),
        }
    }
}

/// CloudinaryツールIDから表示名
pub fn tool_name(id: &str) -> &'static str {
    CLOUDINARY_TOOLS
        .iter()
        .find(|(tool_id, _, _)| *tool_id == id)
        .map(|(_, name, _)| *name)
        .unwrap_or("")
}

// =============================================
// ToolRequest
// =============================================

/// マルチパートでファイルを載せるフィールド名
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileField {
    Image,
    Images,
    Pdf,
    Pdfs,
}

impl FileField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileField::Image => "image",
            FileField::Images => "images",
            FileField::Pdf => "pdf",
            FileField::Pdfs => "pdfs",
        }
    }

    /// 複数ファイルを載せるか
    pub fn is_multiple(&self) -> bool {
        matches!(self, FileField::Images | FileField::Pdfs)
    }
}

/// ツール + オプション
#[derive(Debug, Clone, PartialEq)]
pub enum ToolRequest {
    Resize(ResizeOptions),
    Compress(CompressOptions),
    Convert(ConvertOptions),
    Crop(CropOptions),
    BackgroundRemove(BackgroundOptions),
    WatermarkRemove(WatermarkOptions),
    WatermarkDetect,
    Pdf(PdfOperation),
    AiEdit { prompt: String },
    AiEnhance { auto_apply: bool },
    Cloudinary(CloudinaryTool),
}

impl ToolRequest {
    /// APIパス（ベースURLからの相対）
    pub fn endpoint(&self) -> &'static str {
        match self {
            ToolRequest::Resize(_) => "/resize",
            ToolRequest::Compress(CompressOptions::Quality(_)) => "/compress",
            ToolRequest::Compress(CompressOptions::TargetSize { .. }) => "/compress/auto",
            ToolRequest::Convert(_) => "/convert",
            ToolRequest::Crop(CropOptions::Aspect { .. }) => "/crop/aspect-ratio",
            ToolRequest::Crop(CropOptions::Circle) => "/crop/circle",
            ToolRequest::Crop(CropOptions::Coords(_)) => "/crop",
            ToolRequest::BackgroundRemove(BackgroundOptions::Transparent) => "/background-remove",
            ToolRequest::BackgroundRemove(BackgroundOptions::Replace { .. }) => {
                "/background-remove/replace"
            }
            ToolRequest::WatermarkRemove(_) => "/watermark-remove",
            ToolRequest::WatermarkDetect => "/watermark-remove/detect",
            ToolRequest::Pdf(op) => match op {
                PdfOperation::Create { .. } => "/pdf/from-images",
                PdfOperation::Merge => "/pdf/merge",
                PdfOperation::Split => "/pdf/split",
                PdfOperation::Watermark { .. } => "/pdf/watermark",
                PdfOperation::ToImages { .. } => "/pdf/to-images",
                PdfOperation::PageNumbers { .. } => "/pdf/add-page-numbers",
                PdfOperation::Rotate { .. } => "/pdf/rotate",
            },
            ToolRequest::AiEdit { .. } => "/ai-edit",
            ToolRequest::AiEnhance { .. } => "/ai-enhance",
            ToolRequest::Cloudinary(tool) => match tool {
                CloudinaryTool::BgRemove => "/cloudinary/bg-remove",
                CloudinaryTool::BgReplace { .. } => "/cloudinary/bg-replace",
                CloudinaryTool::Enhance => "/cloudinary/enhance",
                CloudinaryTool::Upscale => "/cloudinary/upscale",
                CloudinaryTool::AutoImprove => "/cloudinary/auto-improve",
                CloudinaryTool::GenFill { .. } => "/cloudinary/gen-fill",
                CloudinaryTool::GenRemove { .. } => "/cloudinary/gen-remove",
                CloudinaryTool::GenRecolor { .. } => "/cloudinary/gen-recolor",
                CloudinaryTool::SmartCrop { .. } => "/cloudinary/smart-crop",
                CloudinaryTool::BlurFaces => "/cloudinary/blur-faces",
                CloudinaryTool::PixelateFaces => "/cloudinary/pixelate-faces",
                CloudinaryTool::ArtisticFilter { .. } => "/cloudinary/artistic-filter",
                CloudinaryTool::AdjustColors(_) => "/cloudinary/adjust-colors",
            },
        }
    }

    pub fn file_field(&self) -> FileField {
        match self {
            ToolRequest::Pdf(PdfOperation::Create { .. }) => FileField::Images,
            ToolRequest::Pdf(PdfOperation::Merge) => FileField::Pdfs,
            ToolRequest::Pdf(_) => FileField::Pdf,
            _ => FileField::Image,
        }
    }

    /// ファイル以外のフォームフィールド（値はすべて文字列化）
    pub fn form_fields(&self) -> Vec<(String, String)> {
        match self {
            ToolRequest::Resize(options) => {
                let mut fields = Vec::new();
                if let Some(width) = options.width {
                    fields.push(field("width", width));
                }
                if let Some(height) = options.height {
                    fields.push(field("height", height));
                }
                fields.push(field("fit", options.fit));
                fields.push(field("quality", options.quality));
                fields
            }
            ToolRequest::Compress(CompressOptions::Quality(quality)) => vec![field("quality", quality)],
            ToolRequest::Compress(options @ CompressOptions::TargetSize { .. }) => {
                vec![field("targetSize", options.target_size_bytes().unwrap_or(0))]
            }
            ToolRequest::Convert(options) => vec![
                field("format", options.format),
                field("quality", options.quality),
            ],
            ToolRequest::Crop(CropOptions::Aspect { ratio, gravity }) => {
                vec![field("ratio", ratio), field("gravity", gravity)]
            }
            ToolRequest::Crop(CropOptions::Circle) => Vec::new(),
            ToolRequest::Crop(CropOptions::Coords(rect)) => rect.fields(),
            ToolRequest::BackgroundRemove(BackgroundOptions::Transparent) => Vec::new(),
            ToolRequest::BackgroundRemove(BackgroundOptions::Replace { color }) => {
                vec![field("backgroundColor", color)]
            }
            ToolRequest::WatermarkRemove(options) => vec![
                field("method", options.method),
                field("strength", options.strength),
            ],
            ToolRequest::WatermarkDetect => Vec::new(),
            ToolRequest::Pdf(op) => match op {
                PdfOperation::Create { page_size } => vec![field("pageSize", page_size)],
                PdfOperation::Merge | PdfOperation::Split => Vec::new(),
                PdfOperation::Watermark { text } => vec![field("text", text)],
                PdfOperation::ToImages { format, quality } => {
                    vec![field("format", format), field("quality", quality)]
                }
                PdfOperation::PageNumbers { position } => vec![field("position", position)],
                PdfOperation::Rotate { rotation } => vec![field("rotation", rotation.degrees())],
            },
            ToolRequest::AiEdit { prompt } => vec![field("prompt", prompt)],
            ToolRequest::AiEnhance { auto_apply } => vec![field("autoApply", auto_apply)],
            ToolRequest::Cloudinary(tool) => tool.fields(),
        }
    }

    /// 通知や履歴に出す名前
    pub fn tool_name(&self) -> &'static str {
        match self {
            ToolRequest::Resize(_) => "Resize",
            ToolRequest::Compress(_) => "Compress",
            ToolRequest::Convert(_) => "Convert",
            ToolRequest::Crop(_) => "Crop",
            ToolRequest::BackgroundRemove(_) => "Background Remove",
            ToolRequest::WatermarkRemove(_) => "Watermark Remove",
            ToolRequest::WatermarkDetect => "Watermark Detect",
            ToolRequest::Pdf(op) => op.name(),
            ToolRequest::AiEdit { .. } => "AI Edit",
            ToolRequest::AiEnhance { .. } => "AI Enhance",
            ToolRequest::Cloudinary(tool) => tool.name(),
        }
    }

    /// 結果をグローバルストアに書き込み、結果画面へ遷移するツールか
    pub fn uses_global_store(&self) -> bool {
        matches!(
            self,
            ToolRequest::AiEdit { .. } | ToolRequest::AiEnhance { .. } | ToolRequest::Cloudinary(_)
        )
    }
}

fn field(key: &str, value: impl fmt::Display) -> (String, String) {
    (key.to_string(), value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(request: &ToolRequest) -> Vec<(String, String)> {
        request.form_fields()
    }

    fn get<'a>(fields: &'a [(String, String)], key: &str) -> Option<&'a str> {
        fields.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_wire_enum_parse_and_display() {
        assert_eq!("cover".parse::<FitMode>().unwrap(), FitMode::Cover);
        assert_eq!("NorthEast".parse::<Gravity>().unwrap(), Gravity::NorthEast);
        assert_eq!("letter".parse::<PageSize>().unwrap(), PageSize::Letter);
        assert_eq!(PageSize::A4.to_string(), "A4");
        assert_eq!(PageNumberPosition::BottomCenter.as_str(), "bottom-center");
        assert!("diagonal".parse::<Gravity>().is_err());
    }

    #[test]
    fn test_compress_target_size_is_sent_in_bytes() {
        let request = ToolRequest::Compress(CompressOptions::TargetSize { kilobytes: 500 });
        assert_eq!(request.endpoint(), "/compress/auto");
        assert_eq!(get(&fields(&request), "targetSize"), Some("512000"));
    }

    #[test]
    fn test_compress_quality_mode() {
        let request = ToolRequest::Compress(CompressOptions::Quality(80));
        assert_eq!(request.endpoint(), "/compress");
        assert_eq!(fields(&request), vec![("quality".to_string(), "80".to_string())]);
    }

    #[test]
    fn test_resize_skips_missing_dimension() {
        let request = ToolRequest::Resize(ResizeOptions {
            width: Some(1000),
            height: None,
            fit: FitMode::Contain,
            quality: 90,
        });
        let fields = fields(&request);
        assert_eq!(get(&fields, "width"), Some("1000"));
        assert_eq!(get(&fields, "height"), None);
        assert_eq!(get(&fields, "fit"), Some("contain"));
        assert_eq!(get(&fields, "quality"), Some("90"));
    }

    #[test]
    fn test_crop_modes_map_to_endpoints() {
        let aspect = ToolRequest::Crop(CropOptions::Aspect {
            ratio: "16:9".parse().unwrap(),
            gravity: Gravity::North,
        });
        assert_eq!(aspect.endpoint(), "/crop/aspect-ratio");
        assert_eq!(get(&fields(&aspect), "ratio"), Some("16:9"));
        assert_eq!(get(&fields(&aspect), "gravity"), Some("north"));

        let circle = ToolRequest::Crop(CropOptions::Circle);
        assert_eq!(circle.endpoint(), "/crop/circle");
        assert!(fields(&circle).is_empty());

        let coords = ToolRequest::Crop(CropOptions::Coords("10,20,300,200".parse().unwrap()));
        assert_eq!(coords.endpoint(), "/crop");
        assert_eq!(get(&fields(&coords), "left"), Some("10"));
        assert_eq!(get(&fields(&coords), "height"), Some("200"));
    }

    #[test]
    fn test_pdf_file_fields() {
        let create = ToolRequest::Pdf(PdfOperation::Create { page_size: PageSize::A4 });
        assert_eq!(create.file_field(), FileField::Images);
        assert_eq!(create.endpoint(), "/pdf/from-images");

        assert_eq!(ToolRequest::Pdf(PdfOperation::Merge).file_field(), FileField::Pdfs);
        assert_eq!(ToolRequest::Pdf(PdfOperation::Split).file_field(), FileField::Pdf);

        let rotate = ToolRequest::Pdf(PdfOperation::Rotate { rotation: Rotation::CounterClockwise90 });
        assert_eq!(get(&fields(&rotate), "rotation"), Some("-90"));
        assert_eq!(rotate.endpoint(), "/pdf/rotate");
    }

    #[test]
    fn test_cloudinary_adjust_colors_sends_only_set_values() {
        let request = ToolRequest::Cloudinary(CloudinaryTool::AdjustColors(ColorAdjustments {
            brightness: Some(20),
            contrast: None,
            saturation: Some(-15),
        }));
        let fields = fields(&request);
        assert_eq!(fields.len(), 2);
        assert_eq!(get(&fields, "brightness"), Some("20"));
        assert_eq!(get(&fields, "saturation"), Some("-15"));
        assert_eq!(request.endpoint(), "/cloudinary/adjust-colors");
    }

    #[test]
    fn test_cloudinary_tool_table_matches_ids() {
        assert_eq!(CLOUDINARY_TOOLS.len(), 13);
        assert_eq!(CloudinaryTool::BgRemove.name(), "Remove Background");
        let recolor = CloudinaryTool::GenRecolor { prompt: "car".into(), to_color: NamedColor::Blue };
        assert_eq!(recolor.name(), "Recolor Object");
        assert_eq!(get(&recolor.fields(), "toColor"), Some("blue"));
    }

    #[test]
    fn test_artistic_filter_parse() {
        let filter: ArtisticFilter = "Red Rock".parse().unwrap();
        assert_eq!(filter.id(), "red_rock");
        assert_eq!(filter.name(), "Red Rock");
        assert!("sepia".parse::<ArtisticFilter>().is_err());
        assert_eq!(ArtisticFilter::default().id(), "athena");
    }

    #[test]
    fn test_aspect_ratio_and_rotation_parse() {
        let ratio: AspectRatio = "3:2".parse().unwrap();
        assert_eq!(ratio, AspectRatio::new(3, 2));
        assert!("3:0".parse::<AspectRatio>().is_err());
        assert!("wide".parse::<AspectRatio>().is_err());

        assert_eq!("180".parse::<Rotation>().unwrap(), Rotation::Half);
        assert_eq!("-90°".parse::<Rotation>().unwrap(), Rotation::CounterClockwise90);
        assert!("45".parse::<Rotation>().is_err());
    }

    #[test]
    fn test_ai_enhance_bool_is_string_coerced() {
        let request = ToolRequest::AiEnhance { auto_apply: true };
        assert_eq!(get(&fields(&request), "autoApply"), Some("true"));
        assert!(request.uses_global_store());
        assert!(!ToolRequest::Resize(ResizeOptions::default()).uses_global_store());
    }
}
