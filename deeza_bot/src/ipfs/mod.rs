pub mod handler;

use anyhow::Result;
use async_trait::async_trait;
use deeza_core::helpers::dto::ContentBlob;

/// Off-chain blob storage for the question/answers/message payload. `put`
/// always mints a fresh link; failures are fatal to the step that needed the
/// blob and are never retried here.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn put(&self, blob: &ContentBlob) -> Result<String>;
    async fn get(&self, link: &str) -> Result<ContentBlob>;
}
