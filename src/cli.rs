use clap::{Args, Parser, Subcommand};
use magicpixels_common::tools::{
    AspectRatio, CropRect, FitMode, Gravity, NamedColor, OutputFormat, PageNumberPosition,
    PageSize, Rotation, WatermarkMethod, WatermarkStrength,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "magicpixels")]
#[command(about = "MagicPixels 画像処理APIクライアント", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// APIのベースURL（環境変数 MAGICPIXELS_API_URL・設定ファイルより優先）
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

/// ツール実行結果の出力先
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// 結果を保存（ディレクトリ指定時は magicpixels-image.<形式>）
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// レスポンスの data をJSONで出力
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像をリサイズ
    Resize {
        #[arg(required = true)]
        input: PathBuf,

        #[arg(short = 'W', long)]
        width: Option<u32>,

        #[arg(short = 'H', long)]
        height: Option<u32>,

        /// 縦横比を固定しない
        #[arg(long)]
        no_keep_aspect: bool,

        /// リサイズ方式 (cover/contain/fill)
        #[arg(long, default_value = "cover")]
        fit: FitMode,

        #[arg(short, long, default_value = "90")]
        quality: u8,

        /// 名前付きプリセット（例: "Instagram Square"）
        #[arg(long)]
        preset: Option<String>,

        /// 複数サイズを一括生成（例: 800x600,1200x630）
        #[arg(long, value_delimiter = ',', conflicts_with_all = ["width", "height", "preset"])]
        sizes: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// 画像を圧縮
    Compress {
        #[arg(required = true)]
        input: PathBuf,

        /// 品質 (10-100)
        #[arg(short, long, default_value = "80")]
        quality: u8,

        /// 目標サイズ（KB）。指定すると品質は無視
        #[arg(short, long)]
        target_kb: Option<u64>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// 形式を変換
    Convert {
        #[arg(required = true)]
        input: PathBuf,

        /// 変換先 (png/jpg/webp/avif/gif/tiff)
        #[arg(short, long, default_value = "webp")]
        format: OutputFormat,

        #[arg(short, long, default_value = "90")]
        quality: u8,

        /// 複数形式へ一括変換（例: png,webp）
        #[arg(long, value_delimiter = ',', conflicts_with = "format")]
        formats: Vec<OutputFormat>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// 切り抜き
    Crop {
        #[arg(required = true)]
        input: PathBuf,

        /// 縦横比（例: 16:9）。省略時は --rect か画像全体
        #[arg(short, long)]
        ratio: Option<AspectRatio>,

        #[arg(short, long, default_value = "center")]
        gravity: Gravity,

        /// 円形に切り抜く
        #[arg(long, conflicts_with_all = ["ratio", "rect"])]
        circle: bool,

        /// 座標指定 left,top,width,height
        #[arg(long, conflicts_with = "ratio")]
        rect: Option<CropRect>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// 背景を除去、または色で置換
    BgRemove {
        #[arg(required = true)]
        input: PathBuf,

        /// 背景色（名前または #rrggbb）。省略時は透明
        #[arg(short, long)]
        color: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// 透かしを除去（--detect で検出のみ）
    Watermark {
        #[arg(required = true)]
        input: PathBuf,

        #[arg(short, long, default_value = "inpaint")]
        method: WatermarkMethod,

        #[arg(short, long, default_value = "medium")]
        strength: WatermarkStrength,

        #[arg(long)]
        detect: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// PDFツール
    Pdf {
        #[command(subcommand)]
        command: PdfCommand,
    },

    /// 自然文の指示でAI編集
    AiEdit {
        #[arg(required = true)]
        input: PathBuf,

        #[arg(short, long)]
        prompt: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// AI補正
    AiEnhance {
        #[arg(required = true)]
        input: PathBuf,

        /// 提案を自動適用
        #[arg(long)]
        auto_apply: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Cloudinary AIツール
    Cloud {
        /// ツールID（bg-remove, gen-fill, smart-crop など）
        #[arg(required = true)]
        tool: String,

        #[arg(required = true)]
        input: PathBuf,

        #[command(flatten)]
        options: CloudArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Cloudinaryの結果をダウンロード（回数制限あり）
    Download {
        #[arg(required = true)]
        public_id: String,

        #[arg(short, long, default_value = "png")]
        format: String,

        /// 保存先（省略時は設定のダウンロード先）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Cloudinaryの結果の残りダウンロード回数
    Status {
        #[arg(required = true)]
        public_id: String,
    },

    /// 参照系エンドポイント
    Query {
        #[command(subcommand)]
        command: QueryCommand,
    },

    /// APIの稼働確認
    Health,

    /// 1枚の画像を対話的に編集（履歴・元に戻す）
    Session {
        #[arg(required = true)]
        input: PathBuf,
    },

    /// 設定を表示/編集
    Config {
        /// APIのベースURLを保存
        #[arg(long)]
        set_api_url: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Subcommand)]
pub enum PdfCommand {
    /// 画像からPDFを作成（フォルダ指定可）
    Create {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// 用紙サイズ (A4/Letter/A3/A5/Legal)
        #[arg(long, default_value = "A4")]
        page_size: PageSize,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// 複数のPDFを結合
    Merge {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// ページごとに分割
    Split {
        #[arg(required = true)]
        input: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// テキストの透かしを追加
    Watermark {
        #[arg(required = true)]
        input: PathBuf,

        #[arg(short, long)]
        text: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// ページを画像に変換
    ToImages {
        #[arg(required = true)]
        input: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// ページ番号を追加
    PageNumbers {
        #[arg(required = true)]
        input: PathBuf,

        #[arg(long, default_value = "bottom-center")]
        position: PageNumberPosition,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// ページを回転 (90/180/270/-90)
    Rotate {
        #[arg(required = true)]
        input: PathBuf,

        #[arg(long, default_value = "90", allow_hyphen_values = true)]
        rotation: Rotation,

        #[command(flatten)]
        output: OutputArgs,
    },
}

/// Cloudinaryツールのオプション（ツールに関係ないものは無視）
#[derive(Args, Debug, Clone, Default)]
pub struct CloudArgs {
    /// 背景色 (bg-replace)
    #[arg(long)]
    pub color: Option<NamedColor>,

    /// 幅 (gen-fill / smart-crop)
    #[arg(long)]
    pub width: Option<u32>,

    /// 高さ (gen-fill / smart-crop)
    #[arg(long)]
    pub height: Option<u32>,

    /// 対象の説明 (gen-remove / gen-recolor)
    #[arg(long)]
    pub prompt: Option<String>,

    /// 再着色の色 (gen-recolor)
    #[arg(long)]
    pub to_color: Option<NamedColor>,

    /// フィルタ名 (artistic-filter)
    #[arg(long)]
    pub filter: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    pub brightness: Option<i32>,

    #[arg(long, allow_hyphen_values = true)]
    pub contrast: Option<i32>,

    #[arg(long, allow_hyphen_values = true)]
    pub saturation: Option<i32>,
}

#[derive(Subcommand)]
pub enum QueryCommand {
    /// 変換できる形式
    Formats,
    /// アーティスティックフィルタ一覧
    Filters,
    /// 切り抜きプリセット
    CropPresets,
    /// 画像をアップロードのみ行う
    Upload {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// AIで画像を分析
    Analyze {
        #[arg(required = true)]
        input: PathBuf,

        #[arg(short, long)]
        prompt: Option<String>,
    },
    /// AIによる編集案
    Ideas {
        #[arg(required = true)]
        input: PathBuf,
    },
    /// 代替テキストを生成
    AltText {
        #[arg(required = true)]
        input: PathBuf,
    },
}

/// "800x600" をパース
pub fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .trim()
        .split_once(['x', 'X', '×'])
        .ok_or_else(|| format!("Invalid size: {}. Use WIDTHxHEIGHT", s))?;
    let width = w.trim().parse::<u32>().map_err(|_| format!("Invalid width: {}", s))?;
    let height = h.trim().parse::<u32>().map_err(|_| format!("Invalid height: {}", s))?;
    Ok((width, height))
}
