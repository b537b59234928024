//! Object storage for generated documents (Supabase Storage REST API).

use std::env;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::ConfigError;

const DEFAULT_BUCKET: &str = "planner-documents";

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub bucket_name: String,
}

impl SupabaseConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let supabase_url = env::var("SUPABASE_URL").map_err(|_| ConfigError::Missing("SUPABASE_URL"))?;
        let supabase_anon_key =
            env::var("SUPABASE_ANON_KEY").map_err(|_| ConfigError::Missing("SUPABASE_ANON_KEY"))?;
        let bucket_name = env::var("BUCKET_NAME").unwrap_or_else(|_| DEFAULT_BUCKET.to_string());

        Ok(Self {
            supabase_url: supabase_url.trim_end_matches('/').to_string(),
            supabase_anon_key,
            bucket_name,
        })
    }
}

#[async_trait]
pub trait ObjectStorage {
    /// Upload (or overwrite) an object at `filename`.
    async fn upload_file(&self, filename: &str, file_data: &[u8]) -> Result<(), String>;
    async fn download_file(&self, filename: &str) -> Result<Vec<u8>, String>;
    async fn delete_file(&self, filename: &str) -> Result<(), String>;
    /// Time-limited URL for a private object.
    async fn create_signed_url(&self, filename: &str, expires_in_secs: u64) -> Result<String, String>;
}

pub struct SupabaseStorage {
    config: SupabaseConfig,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct SignedUrlResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

fn content_type_for(filename: &str) -> &'static str {
    match filename.rsplit('.').next().map(str::to_ascii_lowercase).as_deref() {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}

impl SupabaseStorage {
    pub fn new(config: SupabaseConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn object_url(&self, filename: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.config.supabase_url, self.config.bucket_name, filename
        )
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.config.supabase_anon_key)
            .bearer_auth(&self.config.supabase_anon_key)
    }

    async fn check(response: reqwest::Response, action: &str) -> Result<reqwest::Response, String> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(format!("{} failed with status {}: {}", action, status, body))
    }
}

#[async_trait]
impl ObjectStorage for SupabaseStorage {
    async fn upload_file(&self, filename: &str, file_data: &[u8]) -> Result<(), String> {
        let request = self
            .client
            .post(self.object_url(filename))
            .header("Content-Type", content_type_for(filename))
            .header("x-upsert", "true")
            .body(file_data.to_vec());

        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| format!("Upload request failed: {}", e))?;
        Self::check(response, "Upload").await?;
        log::info!("Uploaded {} ({} bytes)", filename, file_data.len());
        Ok(())
    }

    async fn download_file(&self, filename: &str) -> Result<Vec<u8>, String> {
        let response = self
            .authorized(self.client.get(self.object_url(filename)))
            .send()
            .await
            .map_err(|e| format!("Download request failed: {}", e))?;
        let response = Self::check(response, "Download").await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| format!("Failed to read download body: {}", e))?;
        Ok(bytes.to_vec())
    }

    async fn delete_file(&self, filename: &str) -> Result<(), String> {
        let response = self
            .authorized(self.client.delete(self.object_url(filename)))
            .send()
            .await
            .map_err(|e| format!("Delete request failed: {}", e))?;
        Self::check(response, "Delete").await?;
        Ok(())
    }

    async fn create_signed_url(&self, filename: &str, expires_in_secs: u64) -> Result<String, String> {
        let url = format!(
            "{}/storage/v1/object/sign/{}/{}",
            self.config.supabase_url, self.config.bucket_name, filename
        );
        let response = self
            .authorized(self.client.post(url))
            .json(&json!({ "expiresIn": expires_in_secs }))
            .send()
            .await
            .map_err(|e| format!("Sign request failed: {}", e))?;
        let response = Self::check(response, "Sign").await?;
        let signed: SignedUrlResponse = response
            .json()
            .await
            .map_err(|e| format!("Invalid sign response: {}", e))?;

        Ok(format!(
            "{}/storage/v1{}",
            self.config.supabase_url, signed.signed_url
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> SupabaseStorage {
        SupabaseStorage::new(
            SupabaseConfig {
                supabase_url: "https://test.supabase.co".to_string(),
                supabase_anon_key: "test-anon-key".to_string(),
                bucket_name: "test-bucket".to_string(),
            },
            reqwest::Client::new(),
        )
    }

    #[test]
    fn test_object_url() {
        assert_eq!(
            storage().object_url("a.pdf"),
            "https://test.supabase.co/storage/v1/object/test-bucket/a.pdf"
        );
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("Planner-Doe-Jane.pdf"), "application/pdf");
        assert_eq!(content_type_for("logo.JPG"), "image/jpeg");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}
