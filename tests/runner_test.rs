//! ツール実行の結合テスト
//!
//! ローカルファイルの読み込みから送信・ストア反映・保存までを通す

mod common;

use common::RecordingTransport;
use magicpixels::cli::{OutputArgs, PdfCommand};
use magicpixels::error::MagicPixelsError;
use magicpixels::runner::{self, Invocation};
use magicpixels_common::tools::{PageSize, WatermarkOptions};
use magicpixels_common::validation::MERGE_NEEDS_TWO;
use magicpixels_common::{ApiClient, AppStore, Error, RawResponse, ToolOutput};
use serde_json::json;
use std::path::Path;
use tempfile::tempdir;

fn quiet() -> OutputArgs {
    OutputArgs { save: None, json: true }
}

fn write(dir: &Path, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

#[tokio::test]
async fn test_compress_sends_file_and_quality() {
    let dir = tempdir().unwrap();
    let input = write(dir.path(), "photo.jpg", &[0xff, 0xd8, 0xff, 0xe0]);

    let client = ApiClient::new(RecordingTransport::new().then_data(json!({
        "url": "https://cdn.example/photo-small.jpg",
        "originalSize": 2048,
        "compressedSize": 512
    })));
    let mut store = AppStore::new();

    let invocation = Invocation::image(runner::compress_request(70, None), &input, &quiet());
    let output = runner::run_tool(&client, &mut store, &invocation).await.unwrap();

    assert_eq!(output.processed().unwrap().compressed_size, Some(512));
    assert_eq!(client.transport().paths(), vec!["/compress"]);

    let sent = client.transport().sent.borrow();
    let form = sent[0].form().unwrap();
    assert_eq!(form.field("quality"), Some("70"));
    assert_eq!(form.files_in("image")[0].name, "photo.jpg");

    // 画像ツールの結果はグローバルストアに残さない
    assert!(store.processed_image().is_none());
    assert_eq!(store.current_image(), Some(input.display().to_string().as_str()));
    assert!(!store.is_processing());
}

#[tokio::test]
async fn test_merge_with_one_pdf_sends_nothing() {
    let dir = tempdir().unwrap();
    let input = write(dir.path(), "only.pdf", b"%PDF-1.4");

    let client = ApiClient::new(RecordingTransport::new());
    let mut store = AppStore::new();

    let invocation = runner::pdf_invocation(&PdfCommand::Merge { inputs: vec![input], output: quiet() });
    let err = runner::run_tool(&client, &mut store, &invocation).await.unwrap_err();

    assert!(matches!(err, MagicPixelsError::Api(Error::Validation(_))));
    assert_eq!(err.to_string(), MERGE_NEEDS_TWO);
    assert!(client.transport().sent.borrow().is_empty());
}

#[tokio::test]
async fn test_server_error_becomes_tool_failure() {
    let dir = tempdir().unwrap();
    let input = write(dir.path(), "photo.png", &[0x89, 0x50, 0x4e, 0x47]);

    let client = ApiClient::new(RecordingTransport::new().then(Ok(RawResponse::json(
        500,
        &json!({ "success": false, "error": "Image too large" }),
    ))));
    let mut store = AppStore::new();

    let request = runner::watermark_request(WatermarkOptions::default(), false);
    let invocation = Invocation::image(request, &input, &quiet());
    let err = runner::run_tool(&client, &mut store, &invocation).await.unwrap_err();

    match err {
        MagicPixelsError::ToolFailed(message) => assert_eq!(message, "Image too large"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_ai_edit_records_result_in_store() {
    let dir = tempdir().unwrap();
    let input = write(dir.path(), "portrait.png", &[1, 2, 3]);

    let client = ApiClient::new(RecordingTransport::new().then_data(json!({
        "url": "https://cdn.example/edited.png",
        "publicId": "magicpixels/abc",
        "aiInstructions": { "usedFallback": true, "actions": ["brighten"] }
    })));
    let mut store = AppStore::new();

    let invocation = Invocation::image(runner::ai_edit_request("make it brighter"), &input, &quiet());
    let output = runner::run_tool(&client, &mut store, &invocation).await.unwrap();
    assert!(output.processed().unwrap().used_fallback());

    let record = store.processed_image().unwrap();
    assert_eq!(record.url, "https://cdn.example/edited.png");
    assert_eq!(record.tool.as_deref(), Some("AI Edit"));
    assert_eq!(record.metadata.format.as_deref(), Some("png"));
    assert_eq!(record.public_id.as_deref(), Some("magicpixels/abc"));
    assert_eq!(store.image_history().len(), 1);

    let sent = client.transport().sent.borrow();
    assert_eq!(sent[0].path, "/ai-edit");
    assert_eq!(sent[0].form().unwrap().field("prompt"), Some("make it brighter"));
}

#[tokio::test]
async fn test_pdf_create_saves_direct_download() {
    let dir = tempdir().unwrap();
    let images = dir.path().join("images");
    std::fs::create_dir(&images).unwrap();
    write(&images, "b.png", &[1]);
    write(&images, "a.jpg", &[2]);
    write(&images, "scan.bmp", &[3]);

    let pdf = b"%PDF-1.7 direct";
    let client = ApiClient::new(RecordingTransport::new().then_bytes(pdf));
    let mut store = AppStore::new();

    let invocation = runner::pdf_invocation(&PdfCommand::Create {
        inputs: vec![images],
        page_size: PageSize::Letter,
        output: quiet(),
    });
    let output = runner::run_tool(&client, &mut store, &invocation).await.unwrap();

    {
        let sent = client.transport().sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].path, "/pdf/from-images-direct");
        let names: Vec<&str> = sent[0].form().unwrap().files_in("images").iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "b.png"]);
    }

    let data = output.processed().unwrap();
    assert!(data.is_blob);
    assert_eq!(data.page_count, Some(2));

    let out_dir = tempdir().unwrap();
    let saved = runner::save_output(&client, &output, out_dir.path()).await.unwrap();
    assert_eq!(saved, vec![out_dir.path().join("magicpixels-image.pdf")]);
    assert_eq!(std::fs::read(&saved[0]).unwrap(), pdf);
}

#[tokio::test]
async fn test_pdf_create_lists_named_files_with_wrong_type() {
    let dir = tempdir().unwrap();
    let ok = write(dir.path(), "ok.png", &[1]);
    let scan = write(dir.path(), "scan.bmp", &[2]);

    let client = ApiClient::new(RecordingTransport::new().then_bytes(b"%PDF-1.7"));
    let mut store = AppStore::new();

    let invocation = runner::pdf_invocation(&PdfCommand::Create {
        inputs: vec![ok, scan],
        page_size: PageSize::A4,
        output: quiet(),
    });
    let err = runner::run_tool(&client, &mut store, &invocation).await.unwrap_err();

    match err {
        MagicPixelsError::Api(Error::Validation(message)) => {
            assert_eq!(message, "Invalid file types: scan.bmp. Only images allowed.");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(client.transport().sent.borrow().is_empty());
    assert!(!store.is_processing());
}

#[tokio::test]
async fn test_pdf_create_falls_back_after_direct_failure() {
    let dir = tempdir().unwrap();
    let input = write(dir.path(), "page.png", &[1, 2]);

    let client = ApiClient::new(
        RecordingTransport::new()
            .then(Err(Error::Transport("Network Error".into())))
            .then_data(json!({ "url": "https://cdn.example/out.pdf", "pageCount": 1 })),
    );
    let mut store = AppStore::new();

    let invocation = runner::pdf_invocation(&PdfCommand::Create {
        inputs: vec![input],
        page_size: PageSize::A4,
        output: quiet(),
    });
    let output = runner::run_tool(&client, &mut store, &invocation).await.unwrap();

    assert_eq!(client.transport().paths(), vec!["/pdf/from-images-direct", "/pdf/from-images"]);
    let data = output.processed().unwrap();
    assert!(!data.is_blob);
    assert_eq!(data.url.as_deref(), Some("https://cdn.example/out.pdf"));
}

#[tokio::test]
async fn test_save_output_fetches_result_url() {
    let client = ApiClient::new(RecordingTransport::new().then_bytes(b"RIFFwebp"));
    let output = ToolOutput::Processed(magicpixels_common::ProcessedData {
        url: Some("https://cdn.example/converted.webp".into()),
        new_format: Some("WEBP".into()),
        ..Default::default()
    });

    let dir = tempdir().unwrap();
    let saved = runner::save_output(&client, &output, dir.path()).await.unwrap();

    assert_eq!(saved, vec![dir.path().join("magicpixels-image.webp")]);
    assert_eq!(client.transport().paths(), vec!["https://cdn.example/converted.webp"]);
}

#[tokio::test]
async fn test_save_output_writes_each_page() {
    let client = ApiClient::new(RecordingTransport::new().then_bytes(b"one").then_bytes(b"two"));
    let data = magicpixels_common::ProcessedData::from_value(json!([
        { "page": 1, "url": "https://cdn.example/p1.png", "format": "png" },
        { "page": 2, "url": "https://cdn.example/p2.png", "format": "png" }
    ]))
    .unwrap();

    let dir = tempdir().unwrap();
    let target = dir.path().join("pages");
    let saved = runner::save_output(&client, &ToolOutput::Processed(data), &target).await.unwrap();

    assert_eq!(saved, vec![target.join("page-1.png"), target.join("page-2.png")]);
    assert_eq!(std::fs::read(&saved[1]).unwrap(), b"two");
}

#[tokio::test]
async fn test_save_output_rejects_empty_download() {
    let client = ApiClient::new(RecordingTransport::new().then_bytes(b""));
    let output = ToolOutput::Processed(magicpixels_common::ProcessedData {
        url: Some("https://cdn.example/empty.png".into()),
        ..Default::default()
    });

    let dir = tempdir().unwrap();
    let err = runner::save_output(&client, &output, dir.path()).await.unwrap_err();
    assert!(matches!(err, MagicPixelsError::Download(_)));
}
