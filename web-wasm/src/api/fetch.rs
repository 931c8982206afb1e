//! fetch によるトランスポート
//!
//! 非2xxもそのまま返す。ファイルは FormData に Blob として載せる。

use async_trait::async_trait;
use gloo::timers::callback::Timeout;
use js_sys::{Array, Uint8Array};
use magicpixels_common::api::DEFAULT_TIMEOUT_SECS;
use magicpixels_common::request::{ApiRequest, MultipartForm, RawResponse, RequestBody};
use magicpixels_common::{Error, Result, Transport};
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, Blob, BlobPropertyBag, FormData, Request, RequestInit, Response, Url};

/// ビルド時に指定がなければ同一オリジンの `/api`
pub const DEFAULT_BASE_URL: &str = "/api";

const TIMEOUT_MESSAGE: &str = "Request timed out";
const NETWORK_ERROR_MESSAGE: &str = "Network Error";

pub struct FetchTransport {
    base_url: String,
}

impl FetchTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }

    pub fn from_env() -> Self {
        Self::new(option_env!("MAGICPIXELS_API_URL").unwrap_or(DEFAULT_BASE_URL))
    }
}

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse> {
        let url = request.url(&self.base_url);

        let opts = RequestInit::new();
        opts.set_method(request.method.as_str());
        let is_json = matches!(request.body, RequestBody::Json(_));
        match &request.body {
            RequestBody::Empty => {}
            RequestBody::Json(body) => opts.set_body(&JsValue::from_str(&body.to_string())),
            RequestBody::Multipart(form) => opts.set_body(&to_form_data(form)?),
        }

        let controller = AbortController::new().map_err(js_error)?;
        opts.set_signal(Some(&controller.signal()));
        let timed_out = Rc::new(Cell::new(false));
        let _timeout = {
            let timed_out = timed_out.clone();
            Timeout::new((DEFAULT_TIMEOUT_SECS * 1000) as u32, move || {
                timed_out.set(true);
                controller.abort();
            })
        };

        let fetch_request = Request::new_with_str_and_init(&url, &opts).map_err(js_error)?;
        if is_json {
            fetch_request
                .headers()
                .set("Content-Type", "application/json")
                .map_err(js_error)?;
        }

        let window = web_sys::window().ok_or_else(|| Error::Transport("window is not available".into()))?;
        let response = JsFuture::from(window.fetch_with_request(&fetch_request))
            .await
            .map_err(|e| {
                tracing::debug!(error = ?e, "fetch failed");
                if timed_out.get() {
                    Error::Transport(TIMEOUT_MESSAGE.to_string())
                } else {
                    Error::Transport(NETWORK_ERROR_MESSAGE.to_string())
                }
            })?;
        let response: Response = response.dyn_into().map_err(js_error)?;

        let status = response.status();
        let content_type = response.headers().get("content-type").ok().flatten();
        let buffer = JsFuture::from(response.array_buffer().map_err(js_error)?)
            .await
            .map_err(js_error)?;
        let body = Uint8Array::new(&buffer).to_vec();

        Ok(RawResponse { status, content_type, body })
    }

    fn object_url(&self, bytes: &[u8], mime_type: &str) -> Result<String> {
        let blob = to_blob(bytes, mime_type)?;
        Url::create_object_url_with_blob(&blob).map_err(js_error)
    }
}

fn to_form_data(form: &MultipartForm) -> Result<FormData> {
    let data = FormData::new().map_err(js_error)?;
    for part in &form.files {
        let blob = to_blob(&part.file.bytes, &part.file.mime_type)?;
        data.append_with_blob_and_filename(&part.field, &blob, &part.file.name)
            .map_err(js_error)?;
    }
    for (key, value) in &form.fields {
        data.append_with_str(key, value).map_err(js_error)?;
    }
    Ok(data)
}

pub fn to_blob(bytes: &[u8], mime_type: &str) -> Result<Blob> {
    let parts = Array::of1(&Uint8Array::from(bytes));
    let bag = BlobPropertyBag::new();
    bag.set_type(mime_type);
    Blob::new_with_u8_array_sequence_and_options(&parts, &bag).map_err(js_error)
}

fn js_error(value: JsValue) -> Error {
    Error::Transport(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}
