//! MagicPixels Common Library
//!
//! CLIとWeb(WASM)で共有される型・APIクライアント・クライアント状態

pub mod api;
pub mod controller;
pub mod envelope;
pub mod error;
pub mod forms;
pub mod preview;
pub mod request;
pub mod store;
pub mod tools;
pub mod types;
pub mod uploader;
pub mod validation;

pub use api::{ApiClient, ToolOutput, Transport};
pub use controller::{Notification, NotificationLevel, PageState, RequestState, Route, ToolPage};
pub use envelope::Envelope;
pub use error::{Error, Result};
pub use request::{ApiRequest, Method, MultipartForm, RawResponse, RequestBody};
pub use store::{AiOption, AiOptions, AppStore};
pub use tools::ToolRequest;
pub use types::{ProcessedData, ProcessedImageRecord, UploadedFile};
pub use uploader::UploaderConfig;
