//! アプリケーション全体の状態
//!
//! 現在の画像・処理結果・履歴・アップロード/処理中フラグ・AIオプションを持つ。
//! 変更はこのモジュールのメソッド経由のみ。永続化はしない（セッション限り）。

use crate::types::ProcessedImageRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// AIオプションのキー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiOption {
    AutoEnhance,
    RemoveBackground,
    SmartCrop,
    Upscale,
}

impl AiOption {
    pub const ALL: [AiOption; 4] = [
        AiOption::AutoEnhance,
        AiOption::RemoveBackground,
        AiOption::SmartCrop,
        AiOption::Upscale,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            AiOption::AutoEnhance => "autoEnhance",
            AiOption::RemoveBackground => "removeBackground",
            AiOption::SmartCrop => "smartCrop",
            AiOption::Upscale => "upscale",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AiOption::AutoEnhance => "Auto Enhance",
            AiOption::RemoveBackground => "Remove Background",
            AiOption::SmartCrop => "Smart Crop",
            AiOption::Upscale => "Upscale",
        }
    }
}

impl fmt::Display for AiOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for AiOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_', ' '], "");
        AiOption::ALL
            .into_iter()
            .find(|o| o.key().to_lowercase() == normalized)
            .ok_or_else(|| format!("Unknown AI option: {}", s))
    }
}

/// AIオプション（4つの真偽値）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiOptions {
    pub auto_enhance: bool,
    pub remove_background: bool,
    pub smart_crop: bool,
    pub upscale: bool,
}

impl Default for AiOptions {
    fn default() -> Self {
        Self {
            auto_enhance: true,
            remove_background: false,
            smart_crop: false,
            upscale: false,
        }
    }
}

impl AiOptions {
    pub fn get(&self, option: AiOption) -> bool {
        match option {
            AiOption::AutoEnhance => self.auto_enhance,
            AiOption::RemoveBackground => self.remove_background,
            AiOption::SmartCrop => self.smart_crop,
            AiOption::Upscale => self.upscale,
        }
    }

    fn slot(&mut self, option: AiOption) -> &mut bool {
        match option {
            AiOption::AutoEnhance => &mut self.auto_enhance,
            AiOption::RemoveBackground => &mut self.remove_background,
            AiOption::SmartCrop => &mut self.smart_crop,
            AiOption::Upscale => &mut self.upscale,
        }
    }
}

/// グローバル状態
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppStore {
    current_image: Option<String>,
    processed_image: Option<ProcessedImageRecord>,
    image_history: Vec<ProcessedImageRecord>,
    is_uploading: bool,
    upload_progress: u8,
    is_processing: bool,
    processing_step: String,
    ai_options: AiOptions,
    results: Vec<ProcessedImageRecord>,
}

impl AppStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- 読み取り ----

    /// 元画像の参照（プレビューURLやファイルパス）
    pub fn current_image(&self) -> Option<&str> {
        self.current_image.as_deref()
    }

    pub fn processed_image(&self) -> Option<&ProcessedImageRecord> {
        self.processed_image.as_ref()
    }

    pub fn image_history(&self) -> &[ProcessedImageRecord] {
        &self.image_history
    }

    pub fn is_uploading(&self) -> bool {
        self.is_uploading
    }

    pub fn upload_progress(&self) -> u8 {
        self.upload_progress
    }

    pub fn is_processing(&self) -> bool {
        self.is_processing
    }

    pub fn processing_step(&self) -> &str {
        &self.processing_step
    }

    pub fn ai_options(&self) -> AiOptions {
        self.ai_options
    }

    pub fn results(&self) -> &[ProcessedImageRecord] {
        &self.results
    }

    /// undo できるか（履歴が2件以上）
    pub fn can_undo(&self) -> bool {
        self.image_history.len() > 1
    }

    // ---- 変更 ----

    pub fn set_current_image(&mut self, image: Option<String>) {
        self.current_image = image;
    }

    /// 処理結果を設定し、履歴にも追加する
    pub fn set_processed_image(&mut self, image: ProcessedImageRecord) {
        self.image_history.push(image.clone());
        self.processed_image = Some(image);
    }

    /// 現在画像・処理結果・履歴を消す
    pub fn clear_images(&mut self) {
        self.current_image = None;
        self.processed_image = None;
        self.image_history.clear();
    }

    pub fn set_uploading(&mut self, status: bool) {
        self.is_uploading = status;
    }

    /// 0..=100 に丸める
    pub fn set_upload_progress(&mut self, progress: u8) {
        self.upload_progress = progress.min(100);
    }

    /// ファイル読み込みの進み具合を反映する
    ///
    /// 全件読み終えたら uploading を下ろす
    pub fn track_upload(&mut self, done: usize, total: usize) {
        let percent = match total {
            0 => 100,
            _ => (done.min(total) * 100 / total) as u8,
        };
        self.set_upload_progress(percent);
        self.set_uploading(done < total);
    }

    /// 処理中フラグとステップ表示を同時に設定
    pub fn set_processing(&mut self, status: bool, step: impl Into<String>) {
        self.is_processing = status;
        self.processing_step = step.into();
    }

    pub fn set_ai_option(&mut self, option: AiOption, value: bool) {
        *self.ai_options.slot(option) = value;
    }

    pub fn toggle_ai_option(&mut self, option: AiOption) -> bool {
        let slot = self.ai_options.slot(option);
        *slot = !*slot;
        *slot
    }

    pub fn reset_ai_options(&mut self) {
        self.ai_options = AiOptions::default();
    }

    pub fn add_result(&mut self, result: ProcessedImageRecord) {
        self.results.push(result);
    }

    pub fn clear_results(&mut self) {
        self.results.clear();
    }

    /// 直前の編集を取り消す
    ///
    /// 履歴が2件以上のときだけ最後の1件を捨て、新しい最後の1件を現在の処理結果にする。
    /// それ以外は何もしない。
    ///
    /// # Returns
    /// 取り消しを行ったか
    pub fn undo_last_edit(&mut self) -> bool {
        if self.image_history.len() <= 1 {
            return false;
        }
        self.image_history.pop();
        self.processed_image = self.image_history.last().cloned();
        true
    }
}
