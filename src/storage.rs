//! Object storage for rendered forms.
//!
//! Rendered PDFs go to a Supabase Storage bucket. Objects are never
//! overwritten: a key that already exists fails the upload.

use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub supabase_url: String,
    pub service_role_key: String,
    pub bucket_name: String,
}

#[async_trait]
pub trait ObjectStorage {
    /// Store `file_data` under `key` and return the URL it can be fetched from.
    async fn upload_file(
        &self,
        key: &str,
        file_data: &[u8],
        content_type: &str,
    ) -> Result<String, String>;

    fn get_asset_url(&self, key: &str) -> String;
}

pub struct SupabaseStorage {
    config: SupabaseConfig,
    client: reqwest::Client,
}

impl SupabaseStorage {
    pub fn new(config: SupabaseConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn object_endpoint(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.config.supabase_url.trim_end_matches('/'),
            self.config.bucket_name,
            key
        )
    }
}

#[async_trait]
impl ObjectStorage for SupabaseStorage {
    async fn upload_file(
        &self,
        key: &str,
        file_data: &[u8],
        content_type: &str,
    ) -> Result<String, String> {
        let response = self
            .client
            .post(self.object_endpoint(key))
            .bearer_auth(&self.config.service_role_key)
            .header("apikey", &self.config.service_role_key)
            .header("Content-Type", content_type)
            .header("x-upsert", "false")
            .body(file_data.to_vec())
            .send()
            .await
            .map_err(|e| format!("storage request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("storage returned {}: {}", status, body));
        }

        log::debug!("Uploaded {} bytes to {}", file_data.len(), key);
        Ok(self.get_asset_url(key))
    }

    fn get_asset_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.config.supabase_url.trim_end_matches('/'),
            self.config.bucket_name,
            key
        )
    }
}
