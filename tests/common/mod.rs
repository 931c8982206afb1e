//! 結合テスト用のトランスポート

#![allow(dead_code)]

use async_trait::async_trait;
use magicpixels_common::{ApiRequest, Error, RawResponse, Result, Transport};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::VecDeque;

/// 送信内容を記録し、積んだレスポンスを順に返す
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: RefCell<Vec<ApiRequest>>,
    responses: RefCell<VecDeque<Result<RawResponse>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(self, response: Result<RawResponse>) -> Self {
        self.responses.borrow_mut().push_back(response);
        self
    }

    pub fn then_data(self, data: Value) -> Self {
        self.then(Ok(RawResponse::json(200, &json!({ "success": true, "data": data }))))
    }

    pub fn then_bytes(self, bytes: &[u8]) -> Self {
        self.then(Ok(RawResponse::new(200, bytes.to_vec())))
    }

    pub fn paths(&self) -> Vec<String> {
        self.sent.borrow().iter().map(|r| r.path.clone()).collect()
    }
}

#[async_trait(?Send)]
impl Transport for RecordingTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse> {
        self.sent.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Transport("no response queued".to_string())))
    }
}
