//! 処理中オーバーレイ（indicatif スピナー）
//!
//! 表示するのはステップ名と任意の進捗率だけ。

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub struct ProcessingOverlay {
    bar: ProgressBar,
    step: String,
}

impl ProcessingOverlay {
    pub fn show(step: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.magenta} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_message(step.to_string());
        Self { bar, step: step.to_string() }
    }

    /// 何も描画しない（`--json` 出力時）
    pub fn hidden() -> Self {
        Self { bar: ProgressBar::hidden(), step: String::new() }
    }

    pub fn set_step(&mut self, step: &str) {
        self.step = step.to_string();
        self.bar.set_message(overlay_label(&self.step, None));
    }

    pub fn set_percent(&self, percent: Option<u8>) {
        self.bar.set_message(overlay_label(&self.step, percent));
    }

    /// 非表示にする
    pub fn close(self) {
        self.bar.finish_and_clear();
    }
}

pub fn overlay_label(step: &str, percent: Option<u8>) -> String {
    match percent {
        Some(p) => format!("{} ({}%)", step, p.min(100)),
        None => step.to_string(),
    }
}
