//! エラーケーステスト
//!
//! 入力ファイル・設定・ネットワークの失敗が利用者向けのエラーになることを検証

use magicpixels::config::Config;
use magicpixels::error::MagicPixelsError;
use magicpixels::files;
use magicpixels::http::{ReqwestTransport, NETWORK_ERROR_MESSAGE};
use magicpixels_common::{ApiClient, UploaderConfig};
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;

/// 存在しないファイルを入力にした場合
#[test]
fn test_load_missing_file() {
    let err = files::load_file(Path::new("/nonexistent/path/photo.jpg")).unwrap_err();
    assert!(matches!(err, MagicPixelsError::FileNotFound(_)));
}

/// 対応形式のないフォルダを入力にした場合
#[test]
fn test_folder_without_images() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("data.json"), "{}").unwrap();

    let err = files::load_inputs(&[dir.path().to_path_buf()], &UploaderConfig::images()).unwrap_err();
    assert!(matches!(err, MagicPixelsError::NoImagesFound(_)));
}

/// 上限を超えるファイルは送信せずにエラーになる
#[test]
fn test_oversized_file_is_reported() {
    let dir = tempdir().expect("Failed to create temp dir");
    let big = dir.path().join("big.png");
    let small = dir.path().join("small.png");
    std::fs::write(&big, vec![0u8; 2048]).unwrap();
    std::fs::write(&small, vec![0u8; 16]).unwrap();

    let uploader = UploaderConfig::pdf_images().with_max_bytes(1024);
    let loaded = files::load_inputs(&[small.clone()], &uploader).unwrap();
    assert_eq!(loaded[0].name, "small.png");

    let err = files::load_inputs(&[big, small], &uploader).unwrap_err();
    match err {
        MagicPixelsError::Api(magicpixels_common::Error::Validation(message)) => {
            assert!(message.contains("big.png"));
            assert!(!message.contains("small.png"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

/// 壊れた設定ファイル
#[test]
fn test_broken_config_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, MagicPixelsError::JsonParse(_)));
}

/// 接続できないAPI
#[tokio::test]
async fn test_unreachable_api_reports_network_error() {
    let transport = ReqwestTransport::new("http://127.0.0.1:9/api", Duration::from_secs(2)).unwrap();
    let client = ApiClient::new(transport);

    let err = client.health().await.unwrap_err();
    assert_eq!(err.to_string(), NETWORK_ERROR_MESSAGE);
}

/// MagicPixelsErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        MagicPixelsError::Config("テスト設定エラー".to_string()),
        MagicPixelsError::InvalidArgs("--ratio".to_string()),
        MagicPixelsError::FileNotFound("test.jpg".to_string()),
        MagicPixelsError::FolderNotFound("/path/to/folder".to_string()),
        MagicPixelsError::NoImagesFound("フォルダ".to_string()),
        MagicPixelsError::Download("Download failed".to_string()),
        MagicPixelsError::NoResultUrl,
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "Error display should not be empty");
    }

    let api = MagicPixelsError::from(magicpixels_common::Error::Api("Image too large".into()));
    assert_eq!(api.to_string(), "Image too large");
    assert_eq!(MagicPixelsError::ToolFailed("Processing failed".into()).to_string(), "Processing failed");
}

