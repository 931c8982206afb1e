use crate::error::{MagicPixelsError, Result};
use magicpixels_common::api::DEFAULT_TIMEOUT_SECS;
use magicpixels_common::uploader::DEFAULT_MAX_BYTES;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// ベースURLを上書きする環境変数
pub const API_URL_ENV: &str = "MAGICPIXELS_API_URL";

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub timeout_seconds: u64,
    pub max_upload_bytes: u64,
    /// `--save` にディレクトリも指定しなかった場合の保存先
    pub download_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.into(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            max_upload_bytes: DEFAULT_MAX_BYTES,
            download_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// ファイルがなければ既定値
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| MagicPixelsError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("magicpixels").join("config.json"))
    }

    /// 実際に使うベースURL
    ///
    /// 優先順: `--api-url` > 環境変数 > 設定ファイル
    pub fn resolve_api_url(&self, cli_override: Option<&str>) -> Result<String> {
        let env = std::env::var(API_URL_ENV).ok();
        let url = pick_api_url(cli_override, env.as_deref(), &self.api_base_url);
        if url.is_empty() {
            return Err(MagicPixelsError::Config("APIのベースURLが空です".into()));
        }
        Ok(url)
    }

    pub fn set_api_url(&mut self, url: String) -> Result<()> {
        self.api_base_url = url.trim().trim_end_matches('/').to_string();
        self.save()
    }

    /// 保存先ディレクトリ（未設定ならカレント）
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

fn pick_api_url(cli_override: Option<&str>, env: Option<&str>, file: &str) -> String {
    [cli_override, env]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|url| !url.is_empty())
        .unwrap_or(file.trim())
        .trim_end_matches('/')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.timeout_seconds, 60);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            api_base_url: "https://pixels.example/api".into(),
            ..Default::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "timeout_seconds": 5 }"#).unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_api_url_priority() {
        assert_eq!(
            pick_api_url(Some("http://cli/api/"), Some("http://env/api"), "http://file/api"),
            "http://cli/api"
        );
        assert_eq!(pick_api_url(None, Some("http://env/api"), "http://file/api"), "http://env/api");
        assert_eq!(pick_api_url(None, Some("  "), "http://file/api"), "http://file/api");
    }
}
