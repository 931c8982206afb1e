//! 対話式編集セッションのテスト（プロンプトを使わない操作のみ）

mod common;

use common::RecordingTransport;
use magicpixels::error::MagicPixelsError;
use magicpixels::runner;
use magicpixels::session::{cloud_size_args, Session, SessionAction};
use magicpixels_common::{AiOption, ApiClient, ToolRequest, UploadedFile};
use serde_json::json;
use tempfile::tempdir;

fn photo() -> UploadedFile {
    UploadedFile::from_bytes("photo.png", vec![0x89, 0x50, 0x4e, 0x47])
}

fn edited(url: &str) -> serde_json::Value {
    json!({ "url": url, "format": "png" })
}

/// 送信された画像のファイル名
fn session_sent(session: &Session<RecordingTransport>) -> Vec<String> {
    session
        .client()
        .transport()
        .sent
        .borrow()
        .iter()
        .filter_map(|r| r.form())
        .flat_map(|form| form.files_in("image"))
        .map(|file| file.name.clone())
        .collect()
}

#[test]
fn test_menu_ends_with_quit() {
    assert_eq!(SessionAction::ALL.last(), Some(&SessionAction::Quit));
    assert!(SessionAction::ALL.iter().all(|a| !a.label().is_empty()));
}

#[tokio::test]
async fn test_each_edit_uses_original_and_can_be_undone() {
    let transport = RecordingTransport::new()
        .then_data(edited("https://cdn.example/1.png"))
        .then_data(edited("https://cdn.example/2.png"));
    let mut session = Session::new(ApiClient::new(transport), photo());

    session.apply(&runner::ai_edit_request("warmer")).await.unwrap();
    session.apply(&ToolRequest::AiEnhance { auto_apply: false }).await.unwrap();

    assert_eq!(session.store().image_history().len(), 2);
    assert_eq!(session.store().results().len(), 2);
    assert_eq!(session_sent(&session), vec!["photo.png", "photo.png"]);
    let lines = session.history_lines();
    assert!(lines[1].starts_with("* 2. AI Enhance"));

    assert!(session.undo());
    assert_eq!(
        session.store().processed_image().map(|r| r.url.as_str()),
        Some("https://cdn.example/1.png")
    );
    // 1件だけなら戻せない
    assert!(!session.undo());
}

#[tokio::test]
async fn test_failed_edit_keeps_history() {
    let transport = RecordingTransport::new()
        .then_data(edited("https://cdn.example/1.png"))
        .then(Ok(magicpixels_common::RawResponse::json(
            429,
            &json!({ "success": false, "error": "Rate limit exceeded" }),
        )));
    let mut session = Session::new(ApiClient::new(transport), photo());

    session.apply(&runner::ai_edit_request("sharpen")).await.unwrap();
    let err = session.apply(&runner::ai_edit_request("again")).await.unwrap_err();

    assert!(matches!(err, MagicPixelsError::ToolFailed(ref m) if m == "Rate limit exceeded"));
    assert_eq!(session.store().image_history().len(), 1);
}

#[tokio::test]
async fn test_empty_prompt_is_rejected_locally() {
    let mut session = Session::new(ApiClient::new(RecordingTransport::new()), photo());
    let err = session.apply(&runner::ai_edit_request("   ")).await.unwrap_err();
    assert!(matches!(err, MagicPixelsError::Api(magicpixels_common::Error::Validation(_))));
}

#[test]
fn test_enhance_follows_auto_enhance_option() {
    let mut session = Session::new(ApiClient::new(RecordingTransport::new()), photo());
    assert_eq!(session.enhance_request(), ToolRequest::AiEnhance { auto_apply: true });

    assert!(!session.toggle(AiOption::AutoEnhance));
    assert_eq!(session.enhance_request(), ToolRequest::AiEnhance { auto_apply: false });
}

#[tokio::test]
async fn test_clear_resets_to_original() {
    let transport = RecordingTransport::new().then_data(edited("https://cdn.example/1.png"));
    let mut session = Session::new(ApiClient::new(transport), photo());
    session.apply(&runner::ai_edit_request("vivid")).await.unwrap();
    session.toggle(AiOption::Upscale);

    session.clear();

    assert!(session.store().processed_image().is_none());
    assert!(session.store().results().is_empty());
    assert!(!session.store().ai_options().get(AiOption::Upscale));
    assert_eq!(session.store().current_image(), Some("photo.png"));
    assert!(session.history_lines().is_empty());
}

#[tokio::test]
async fn test_save_cloudinary_result_tracks_download() {
    let transport = RecordingTransport::new()
        .then_data(json!({
            "url": "https://res.example/enhanced.png",
            "publicId": "magicpixels/xyz",
            "downloads": { "downloads": 0, "remaining": 3 }
        }))
        .then_data(json!({
            "downloadUrl": "https://res.example/enhanced.webp",
            "downloads": 1,
            "remaining": 2
        }))
        .then_bytes(b"RIFFwebp");
    let mut session = Session::new(ApiClient::new(transport), photo());
    let request = runner::cloud_request("enhance", &Default::default()).unwrap();
    session.apply(&request).await.unwrap();

    let dir = tempdir().unwrap();
    let (path, tracker) = session.save_current(dir.path(), "webp").await.unwrap();

    assert_eq!(path, dir.path().join("magicpixels-image.webp"));
    let tracker = tracker.unwrap();
    assert_eq!(tracker.remaining, 2);
    assert_eq!(tracker.downloaded_message(), "Downloaded! 2 downloads remaining.");
}

#[tokio::test]
async fn test_save_without_result_fails() {
    let session = Session::new(ApiClient::new(RecordingTransport::new()), photo());
    let dir = tempdir().unwrap();
    let err = session.save_current(dir.path(), "png").await.unwrap_err();
    assert!(matches!(err, MagicPixelsError::NoResultUrl));
}

#[test]
fn test_bad_size_is_reported_as_invalid_args() {
    let err = cloud_size_args("abc").unwrap_err();
    assert!(matches!(err, MagicPixelsError::InvalidArgs(ref m) if m.contains("abc")));

    let args = cloud_size_args("640x480").unwrap();
    assert_eq!((args.width, args.height), (Some(640), Some(480)));
    let request = runner::cloud_request("gen-fill", &args).unwrap();
    assert!(matches!(request, ToolRequest::Cloudinary(_)));
}
