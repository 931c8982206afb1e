//! PDF系エンドポイント
//!
//! 画像→PDFだけは直接ダウンロード経路を先に試し、失敗時に通常のJSON経路へ戻る。

use super::{ApiClient, Transport};
use crate::error::{Error, Result};
use crate::request::{ApiRequest, MultipartForm};
use crate::tools::{PageSize, PdfOperation, ToolRequest};
use crate::types::{ProcessedData, UploadedFile};

/// バイナリを直接返すエンドポイント
pub const PDF_DIRECT_PATH: &str = "/pdf/from-images-direct";

pub const NO_PDF_IMAGES_PROVIDED: &str =
    "No image files provided. Please select at least one image.";
pub const NO_VALID_PDF_IMAGES: &str = "No valid image files to upload.";

impl<T: Transport> ApiClient<T> {
    /// 画像からPDFを作成
    ///
    /// 1. `/pdf/from-images-direct` にPOSTし、空でないバイナリが返ればローカル参照を作って返す
    /// 2. 失敗・空の場合は警告ログを出して `/pdf/from-images` にPOSTする
    ///
    /// 0バイトのファイルは送信前に取り除く
    pub async fn pdf_from_images(
        &self,
        files: &[UploadedFile],
        page_size: PageSize,
    ) -> Result<ProcessedData> {
        if files.is_empty() {
            return Err(Error::validation(NO_PDF_IMAGES_PROVIDED));
        }

        let valid: Vec<UploadedFile> = files.iter().filter(|f| !f.is_empty()).cloned().collect();
        if valid.is_empty() {
            return Err(Error::validation(NO_VALID_PDF_IMAGES));
        }
        if valid.len() < files.len() {
            tracing::debug!(skipped = files.len() - valid.len(), "Dropped empty files before PDF upload");
        }

        let request = ToolRequest::Pdf(PdfOperation::Create { page_size });
        let form = MultipartForm::for_tool(&request, &valid);

        match self.pdf_direct(form.clone(), valid.len() as u32, page_size).await {
            Ok(Some(data)) => return Ok(data),
            Ok(None) => {
                tracing::warn!("Direct PDF download returned an empty body, falling back to {}", request.endpoint())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Direct PDF download failed, falling back to {}", request.endpoint())
            }
        }

        self.post_processed(request.endpoint(), form).await
    }

    async fn pdf_direct(
        &self,
        form: MultipartForm,
        page_count: u32,
        page_size: PageSize,
    ) -> Result<Option<ProcessedData>> {
        let response = self.send_raw(ApiRequest::post_form(PDF_DIRECT_PATH, form)).await?;
        if response.body.is_empty() {
            return Ok(None);
        }

        let url = self.transport.object_url(&response.body, "application/pdf")?;
        Ok(Some(ProcessedData {
            url: Some(url),
            size: Some(response.body.len() as u64),
            format: Some("pdf".to_string()),
            page_count: Some(page_count),
            page_size: Some(page_size.to_string()),
            is_blob: true,
            blob: Some(response.body),
            ..Default::default()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::FakeTransport;
    use super::*;
    use crate::request::RawResponse;
    use serde_json::json;

    fn jpg(name: &str, size: usize) -> UploadedFile {
        UploadedFile::new(name, "image/jpeg", vec![0xff; size])
    }

    #[tokio::test]
    async fn test_direct_path_short_circuits() {
        let transport = FakeTransport::new().respond(Ok(RawResponse::new(200, b"%PDF-1.7 ...".to_vec())));
        let client = ApiClient::new(transport);

        let data = client
            .pdf_from_images(&[jpg("a.jpg", 10), jpg("b.jpg", 20)], PageSize::Letter)
            .await
            .unwrap();

        assert!(data.is_blob);
        assert_eq!(data.page_count, Some(2));
        assert_eq!(data.page_size.as_deref(), Some("Letter"));
        assert_eq!(data.size, Some(12));
        assert_eq!(data.url.as_deref(), Some("blob:test/application/pdf/12"));
        assert_eq!(data.blob.as_deref(), Some(&b"%PDF-1.7 ..."[..]));
        assert_eq!(client.transport().paths(), vec![PDF_DIRECT_PATH]);
    }

    #[tokio::test]
    async fn test_falls_back_when_direct_fails() {
        let transport = FakeTransport::new()
            .respond(Ok(RawResponse::new(500, vec![])))
            .respond_ok(json!({ "url": "https://cdn.example/doc.pdf", "pageCount": 1 }));
        let client = ApiClient::new(transport);

        let data = client.pdf_from_images(&[jpg("a.jpg", 10)], PageSize::A4).await.unwrap();

        assert!(!data.is_blob);
        assert_eq!(data.url.as_deref(), Some("https://cdn.example/doc.pdf"));
        assert_eq!(client.transport().paths(), vec![PDF_DIRECT_PATH, "/pdf/from-images"]);

        // 両方の試行で同じフォームを送る
        let sent = client.transport().sent.borrow();
        assert_eq!(sent[0].body, sent[1].body);
        assert_eq!(sent[1].form().unwrap().field("pageSize"), Some("A4"));
    }

    #[tokio::test]
    async fn test_falls_back_when_direct_body_is_empty() {
        let transport = FakeTransport::new()
            .respond(Ok(RawResponse::new(200, vec![])))
            .respond_ok(json!({ "url": "https://cdn.example/doc.pdf" }));
        let client = ApiClient::new(transport);

        client.pdf_from_images(&[jpg("a.jpg", 10)], PageSize::A4).await.unwrap();
        assert_eq!(client.transport().sent.borrow().len(), 2);
    }

    #[tokio::test]
    async fn test_zero_byte_files_are_dropped() {
        let transport = FakeTransport::new().respond(Ok(RawResponse::new(200, vec![1])));
        let client = ApiClient::new(transport);

        let data = client
            .pdf_from_images(&[jpg("empty.jpg", 0), jpg("b.jpg", 5)], PageSize::A4)
            .await
            .unwrap();
        assert_eq!(data.page_count, Some(1));

        let sent = client.transport().sent.borrow();
        let files = sent[0].form().unwrap().files_in("images");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "b.jpg");
    }

    #[tokio::test]
    async fn test_no_request_when_all_files_empty() {
        let client = ApiClient::new(FakeTransport::new());

        let err = client.pdf_from_images(&[], PageSize::A4).await.unwrap_err();
        assert_eq!(err.to_string(), NO_PDF_IMAGES_PROVIDED);

        let err = client.pdf_from_images(&[jpg("a.jpg", 0)], PageSize::A4).await.unwrap_err();
        assert_eq!(err.to_string(), NO_VALID_PDF_IMAGES);
        assert!(client.transport().sent.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_split_returns_pages() {
        let client = ApiClient::new(FakeTransport::new().respond_ok(json!([
            { "page": 1, "url": "https://cdn.example/1.pdf" },
            { "page": 2, "url": "https://cdn.example/2.pdf" }
        ])));
        let pdf = UploadedFile::new("doc.pdf", "application/pdf", vec![0x25]);

        let output = client.run(&ToolRequest::Pdf(PdfOperation::Split), &[pdf]).await.unwrap();
        assert_eq!(output.processed().unwrap().pages.len(), 2);
        assert_eq!(client.transport().sent.borrow()[0].form().unwrap().files_in("pdf").len(), 1);
    }
}
