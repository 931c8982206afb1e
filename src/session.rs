//! 対話式編集セッション
//!
//! 1枚の画像に AI編集・AI補正・Cloudinaryツールを適用する。
//! 各編集は常に元画像に対して行い、結果はグローバルストアの履歴に積まれる。
//! 履歴は元に戻すことができる。

use crate::error::{MagicPixelsError, Result};
use crate::files;
use crate::runner;
use dialoguer::{Input, Select};
use magicpixels_common::preview::{self, DownloadTracker};
use magicpixels_common::store::AiOption;
use magicpixels_common::tools::CLOUDINARY_TOOLS;
use magicpixels_common::{
    ApiClient, AppStore, ProcessedImageRecord, ToolOutput, ToolPage, ToolRequest, Transport,
    UploadedFile,
};
use std::path::{Path, PathBuf};

/// メニューの操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    AiEdit,
    AiEnhance,
    Cloudinary,
    ToggleAiOption,
    Undo,
    History,
    Save,
    Clear,
    Quit,
}

impl SessionAction {
    pub const ALL: [SessionAction; 9] = [
        SessionAction::AiEdit,
        SessionAction::AiEnhance,
        SessionAction::Cloudinary,
        SessionAction::ToggleAiOption,
        SessionAction::Undo,
        SessionAction::History,
        SessionAction::Save,
        SessionAction::Clear,
        SessionAction::Quit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SessionAction::AiEdit => "AI編集（指示を入力）",
            SessionAction::AiEnhance => "AI補正",
            SessionAction::Cloudinary => "Cloudinaryツール",
            SessionAction::ToggleAiOption => "AIオプションの切替",
            SessionAction::Undo => "元に戻す",
            SessionAction::History => "履歴を表示",
            SessionAction::Save => "現在の結果を保存",
            SessionAction::Clear => "すべてクリア",
            SessionAction::Quit => "終了",
        }
    }
}

pub struct Session<T> {
    client: ApiClient<T>,
    store: AppStore,
    page: ToolPage,
    file: UploadedFile,
}

impl<T: Transport> Session<T> {
    pub fn new(client: ApiClient<T>, file: UploadedFile) -> Self {
        let mut store = AppStore::new();
        store.set_current_image(Some(file.name.clone()));
        let mut page = ToolPage::new();
        page.set_files(vec![file.clone()]);
        Self { client, store, page, file }
    }

    pub fn store(&self) -> &AppStore {
        &self.store
    }

    pub fn client(&self) -> &ApiClient<T> {
        &self.client
    }

    /// 元画像にツールを適用（成功すれば履歴に積まれる）
    pub async fn apply(&mut self, request: &ToolRequest) -> Result<ToolOutput> {
        let output =
            runner::execute(&self.client, &mut self.store, &mut self.page, request, false).await?;
        if let (ToolOutput::Processed(_), Some(record)) = (&output, self.store.processed_image()) {
            self.store.add_result(record.clone());
        }
        Ok(output)
    }

    /// AI補正（自動適用はAIオプションの autoEnhance に従う）
    pub fn enhance_request(&self) -> ToolRequest {
        ToolRequest::AiEnhance { auto_apply: self.store.ai_options().get(AiOption::AutoEnhance) }
    }

    pub fn undo(&mut self) -> bool {
        self.store.undo_last_edit()
    }

    pub fn toggle(&mut self, option: AiOption) -> bool {
        self.store.toggle_ai_option(option)
    }

    /// 画像と履歴を消して最初の状態に戻す
    pub fn clear(&mut self) {
        self.store.clear_images();
        self.store.clear_results();
        self.store.reset_ai_options();
        self.store.set_current_image(Some(self.file.name.clone()));
        self.page.set_files(vec![self.file.clone()]);
    }

    pub fn history_lines(&self) -> Vec<String> {
        let history = self.store.image_history();
        history
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let marker = if i + 1 == history.len() { "*" } else { " " };
                format!(
                    "{} {}. {} {}",
                    marker,
                    i + 1,
                    record.tool.as_deref().unwrap_or("-"),
                    record.url
                )
            })
            .collect()
    }

    /// 現在の処理結果を保存する
    ///
    /// Cloudinaryの結果はダウンロード回数を記録してから取得する
    ///
    /// # Returns
    /// 保存先と、回数制限がある場合はその状態
    pub async fn save_current(
        &self,
        dir: &Path,
        format: &str,
    ) -> Result<(PathBuf, Option<DownloadTracker>)> {
        let record = self
            .store
            .processed_image()
            .ok_or(MagicPixelsError::NoResultUrl)?;
        save_record(&self.client, record, dir, format).await
    }
}

async fn save_record<T: Transport>(
    client: &ApiClient<T>,
    record: &ProcessedImageRecord,
    dir: &Path,
    format: &str,
) -> Result<(PathBuf, Option<DownloadTracker>)> {
    let (url, tracker) = match &record.public_id {
        Some(public_id) => {
            let mut tracker = DownloadTracker::for_record(record);
            if !tracker.can_download() {
                return Err(MagicPixelsError::Download(tracker.label()));
            }
            let status = client.track_download(public_id, format).await?;
            tracker.apply(&status);
            let url = status.download_url.unwrap_or_else(|| record.url.clone());
            (url, Some(tracker))
        }
        None => (record.url.clone(), None),
    };

    if url.is_empty() {
        return Err(MagicPixelsError::NoResultUrl);
    }
    let bytes = client.fetch_bytes(&url).await?;
    let path = dir.join(preview::download_file_name(format));
    files::write_output(&path, &bytes)?;
    Ok((path, tracker))
}

/// 対話ループ
pub async fn run_interactive<T: Transport>(
    client: ApiClient<T>,
    input: &Path,
    download_dir: &Path,
) -> Result<()> {
    let file = files::load_file(input)?;
    let mut session = Session::new(client, file);

    println!("🎨 magicpixels - 編集セッション: {}\n", input.display());

    let labels: Vec<&str> = SessionAction::ALL.iter().map(SessionAction::label).collect();
    loop {
        let index = Select::new()
            .with_prompt("操作を選択")
            .items(&labels)
            .default(0)
            .interact()?;

        match SessionAction::ALL[index] {
            SessionAction::AiEdit => {
                let prompt: String = Input::new().with_prompt("指示").interact_text()?;
                let request = runner::ai_edit_request(&prompt);
                report(session.apply(&request).await);
            }
            SessionAction::AiEnhance => {
                let request = session.enhance_request();
                report(session.apply(&request).await);
            }
            SessionAction::Cloudinary => {
                let items: Vec<String> = CLOUDINARY_TOOLS
                    .iter()
                    .map(|(id, name, category)| format!("{} ({}) [{}]", name, id, category))
                    .collect();
                let selected = Select::new().with_prompt("ツール").items(&items).default(0).interact()?;
                let (id, _, _) = CLOUDINARY_TOOLS[selected];
                match prompt_cloud_args(id).and_then(|args| runner::cloud_request(id, &args)) {
                    Ok(request) => report(session.apply(&request).await),
                    Err(e @ MagicPixelsError::InvalidArgs(_)) => println!("✘ {}\n", e),
                    Err(e) => return Err(e),
                }
            }
            SessionAction::ToggleAiOption => {
                let options = session.store().ai_options();
                let items: Vec<String> = AiOption::ALL
                    .iter()
                    .map(|o| format!("[{}] {}", if options.get(*o) { "x" } else { " " }, o.label()))
                    .collect();
                let selected = Select::new().with_prompt("オプション").items(&items).interact()?;
                let option = AiOption::ALL[selected];
                let value = session.toggle(option);
                println!("  → {}: {}\n", option.label(), if value { "ON" } else { "OFF" });
            }
            SessionAction::Undo => {
                if session.undo() {
                    println!("  → 元に戻しました\n");
                } else {
                    println!("  → 元に戻せる編集がありません\n");
                }
            }
            SessionAction::History => {
                let lines = session.history_lines();
                if lines.is_empty() {
                    println!("  履歴はありません\n");
                }
                for line in lines {
                    println!("{}", line);
                }
            }
            SessionAction::Save => {
                let index = Select::new()
                    .with_prompt("形式")
                    .items(preview::DOWNLOAD_FORMATS)
                    .default(0)
                    .interact()?;
                match session.save_current(download_dir, preview::DOWNLOAD_FORMATS[index]).await {
                    Ok((path, tracker)) => {
                        println!("✔ 保存: {}", path.display());
                        if let Some(tracker) = tracker {
                            println!("  {}", tracker.downloaded_message());
                        }
                    }
                    Err(e) => println!("✘ {}", e),
                }
            }
            SessionAction::Clear => {
                session.clear();
                println!("  → クリアしました\n");
            }
            SessionAction::Quit => break,
        }
    }

    Ok(())
}

/// 失敗しても通知を表示済みなのでセッションは続ける
fn report(result: Result<ToolOutput>) {
    match result {
        Ok(ToolOutput::Processed(data)) => {
            if let Some(url) = data.url {
                println!("  → {}\n", url);
            }
        }
        Ok(ToolOutput::Detection(_)) => {}
        Err(MagicPixelsError::ToolFailed(_)) => println!(),
        Err(e) => println!("✘ {}\n", e),
    }
}

fn prompt_cloud_args(id: &str) -> Result<crate::cli::CloudArgs> {
    let mut args = crate::cli::CloudArgs::default();
    match id {
        "gen-remove" | "gen-recolor" => {
            let prompt: String = Input::new().with_prompt("対象の説明").interact_text()?;
            args.prompt = Some(prompt);
        }
        "gen-fill" | "smart-crop" => {
            let size: String = Input::new()
                .with_prompt("サイズ (WxH)")
                .default(if id == "gen-fill" { "1200x800".into() } else { "800x600".into() })
                .interact_text()?;
            return cloud_size_args(&size);
        }
        "artistic-filter" => {
            let filter: String = Input::new().with_prompt("フィルタ").default("athena".into()).interact_text()?;
            args.filter = Some(filter);
        }
        _ => {}
    }
    Ok(args)
}

/// `WxH` 形式のサイズを gen-fill / smart-crop のオプションにする
pub fn cloud_size_args(size: &str) -> Result<crate::cli::CloudArgs> {
    let (width, height) = crate::cli::parse_size(size).map_err(MagicPixelsError::InvalidArgs)?;
    Ok(crate::cli::CloudArgs {
        width: Some(width),
        height: Some(height),
        ..Default::default()
    })
}
