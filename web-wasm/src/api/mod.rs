//! ブラウザからのAPI呼び出し

pub mod fetch;

use fetch::FetchTransport;
use magicpixels_common::ApiClient;

/// ビルド時の `MAGICPIXELS_API_URL` を使うクライアント
pub fn client() -> ApiClient<FetchTransport> {
    ApiClient::new(FetchTransport::from_env())
}
