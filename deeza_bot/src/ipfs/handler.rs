use anyhow::{anyhow, Result};
use async_trait::async_trait;
use deeza_core::helpers::dto::ContentBlob;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

use crate::ipfs::ContentStore;

const UPLOAD_URL: &str = "https://upload.lighthouse.storage/api/v0/add";
const GATEWAY_URL: &str = "https://gateway.lighthouse.storage/ipfs/";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(rename = "Hash")]
    hash: String,
}

/// Lighthouse-backed IPFS store for gift payloads.
#[derive(Clone)]
pub struct Lighthouse {
    client: Client,
    api_key: String,
}

impl Lighthouse {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }
}

#[async_trait]
impl ContentStore for Lighthouse {
    async fn put(&self, blob: &ContentBlob) -> Result<String> {
        let body = serde_json::to_vec(blob)?;
        let part = Part::bytes(body)
            .file_name("gift.json")
            .mime_str("application/json")?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(UPLOAD_URL)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let upload: UploadResponse = response.json().await?;
        if upload.hash.is_empty() {
            return Err(anyhow!("empty hash in upload response"));
        }
        Ok(format!("{}{}", GATEWAY_URL, upload.hash))
    }

    async fn get(&self, link: &str) -> Result<ContentBlob> {
        // Accept both bare CIDs and full gateway URLs.
        let url = if link.starts_with("Qm") || link.starts_with("baf") {
            format!("{}{}", GATEWAY_URL, link)
        } else {
            link.to_string()
        };
        let blob = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<ContentBlob>()
            .await?;
        Ok(blob)
    }
}
